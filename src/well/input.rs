//! Well input documents consumed by the econ engine, reversion and cutoff logic

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::de::{blank_f64, yes_no};
use crate::cutoff::CutOffModel;
use crate::econ::{DiscountTable, Phase, VolumeSeries};
use crate::ownership::OwnershipModel;

fn default_true() -> bool {
    true
}

fn default_gas_boe() -> f64 {
    6.0
}

fn default_one() -> f64 {
    1.0
}

/// Everything needed to evaluate a single well
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WellInput {
    /// Well identifier, used in logs and batch output
    pub well_id: String,

    pub date_dict: DateDict,

    pub ownership_model: OwnershipModel,

    #[serde(default)]
    pub cut_off_model: CutOffModel,

    #[serde(default)]
    pub general_option_model: GeneralOptionModel,

    /// Prices, expenses, taxes and capex for the reference econ engine
    #[serde(default)]
    pub econ_model: EconModel,

    #[serde(default)]
    pub production: Production,
}

/// Key dates of a well
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateDict {
    pub first_production_date: NaiveDate,
    pub as_of_date: NaiveDate,
    pub cf_start_date: NaiveDate,
    /// End of the cash-flow window, already limited by the maximum well life
    pub cf_end_date: NaiveDate,
    #[serde(default)]
    pub discount_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_history_date: Option<NaiveDate>,
    #[serde(default)]
    pub first_segment_date: Option<NaiveDate>,
}

impl DateDict {
    /// A well whose cash-flow window ends before it starts has no life to evaluate
    pub fn is_zero_life(&self) -> bool {
        self.cf_end_date < self.cf_start_date
    }

    /// Date that discounting is measured from (cash-flow start when not set)
    pub fn discount_anchor(&self) -> NaiveDate {
        self.discount_date.unwrap_or(self.cf_start_date)
    }

    /// Latest date the well can be economic
    pub fn max_life_date(&self) -> NaiveDate {
        self.cf_end_date
    }
}

/// General options shared across models
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralOptionModel {
    #[serde(default)]
    pub discount_table: DiscountTable,

    #[serde(default)]
    pub boe_conversion: BoeConversion,
}

/// Conversion factors to barrels of oil equivalent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoeConversion {
    #[serde(default = "default_one")]
    pub oil: f64,
    /// Mcf of dry gas per BOE
    #[serde(default = "default_gas_boe")]
    pub dry_gas: f64,
    /// Mcf of wet gas per BOE
    #[serde(default = "default_gas_boe")]
    pub wet_gas: f64,
    #[serde(default = "default_one")]
    pub ngl: f64,
    #[serde(default = "default_one")]
    pub drip_condensate: f64,
}

impl Default for BoeConversion {
    fn default() -> Self {
        Self {
            oil: 1.0,
            dry_gas: 6.0,
            wet_gas: 6.0,
            ngl: 1.0,
            drip_condensate: 1.0,
        }
    }
}

impl BoeConversion {
    /// Combine oil and gas streams into BOE
    pub fn to_boe(&self, oil: f64, gas: f64) -> f64 {
        let gas_factor = if self.wet_gas > 0.0 { self.wet_gas } else { default_gas_boe() };
        oil * self.oil + gas / gas_factor
    }
}

/// Well-head production prepared by the forecast pipeline
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Production {
    /// Monthly volumes; `start` is the first day of the first month
    #[serde(default)]
    pub monthly: Option<VolumeSeries>,

    /// Daily volumes, when available
    #[serde(default)]
    pub daily: Option<VolumeSeries>,
}

/// Pricing, expense, tax and capex assumptions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EconModel {
    #[serde(default)]
    pub pricing: Pricing,

    #[serde(default)]
    pub expenses: Vec<ExpenseItem>,

    #[serde(default)]
    pub production_taxes: ProductionTaxes,

    #[serde(default)]
    pub stream_properties: StreamProperties,

    #[serde(default)]
    pub capex: Vec<CapexItem>,
}

/// Flat prices ($/bbl for liquids, $/mcf for gas)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Pricing {
    #[serde(default)]
    pub oil: f64,
    #[serde(default)]
    pub gas: f64,
    #[serde(default)]
    pub ngl: f64,
    #[serde(default)]
    pub drip_condensate: f64,
}

/// A gross (8/8ths) operating expense line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseItem {
    #[serde(default)]
    pub name: String,

    /// Fixed cost per month
    #[serde(default)]
    pub fixed_per_month: f64,

    /// Variable cost per unit of `phase`
    #[serde(default)]
    pub per_unit: f64,

    #[serde(default)]
    pub phase: Option<Phase>,

    /// Whether this expense counts when finding the economic limit
    #[serde(default = "default_true", deserialize_with = "yes_no")]
    pub affect_econ_limit: bool,
}

/// Production taxes in percent of revenue
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductionTaxes {
    #[serde(default, deserialize_with = "blank_f64")]
    pub severance_tax_pct: Option<f64>,
}

/// Shrink/yield factors for liquids recovered from the gas stream
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamProperties {
    /// NGL yield in bbl per mmcf of gas
    #[serde(default)]
    pub ngl_yield: f64,
    /// Drip condensate yield in bbl per mmcf of gas
    #[serde(default)]
    pub drip_condensate_yield: f64,
}

/// A gross capital expenditure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapexItem {
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
    pub amount: f64,
    /// Spent at or after the economic limit (plugging, abandonment)
    #[serde(default, deserialize_with = "yes_no")]
    pub after_econ_limit: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_date_dict_zero_life() {
        let dates: DateDict = serde_json::from_value(json!({
            "first_production_date": "2020-01-01",
            "as_of_date": "2021-01-01",
            "cf_start_date": "2021-01-01",
            "cf_end_date": "2020-12-31",
        }))
        .unwrap();
        assert!(dates.is_zero_life());
        assert_eq!(dates.discount_anchor(), dates.cf_start_date);
    }

    #[test]
    fn test_boe_conversion() {
        let boe = BoeConversion::default();
        assert_eq!(boe.to_boe(10.0, 60.0), 20.0);
    }

    #[test]
    fn test_expense_defaults_affect_econ_limit() {
        let item: ExpenseItem = serde_json::from_value(json!({
            "name": "lease operating",
            "fixed_per_month": 1500.0,
        }))
        .unwrap();
        assert!(item.affect_econ_limit);
        assert!(item.phase.is_none());
    }
}
