//! Cut-off model document and criterion parsing

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CutOffError;
use crate::well::de::{blank_f64, is_blank, value_as_date, value_as_f64, yes_no};

/// Every recognized cut-off criterion key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CutOffKey {
    Date,
    YearsFromAsOf,
    OilRate,
    GasRate,
    WaterRate,
    BoeRate,
    MaxCumCashFlow,
    FirstNegativeCashFlow,
    LastPositiveCashFlow,
    NoCutOff,
}

impl CutOffKey {
    pub const ALL: [CutOffKey; 10] = [
        CutOffKey::Date,
        CutOffKey::YearsFromAsOf,
        CutOffKey::OilRate,
        CutOffKey::GasRate,
        CutOffKey::WaterRate,
        CutOffKey::BoeRate,
        CutOffKey::MaxCumCashFlow,
        CutOffKey::FirstNegativeCashFlow,
        CutOffKey::LastPositiveCashFlow,
        CutOffKey::NoCutOff,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CutOffKey::Date => "date",
            CutOffKey::YearsFromAsOf => "years_from_as_of",
            CutOffKey::OilRate => "oil_rate",
            CutOffKey::GasRate => "gas_rate",
            CutOffKey::WaterRate => "water_rate",
            CutOffKey::BoeRate => "boe_rate",
            CutOffKey::MaxCumCashFlow => "max_cum_cash_flow",
            CutOffKey::FirstNegativeCashFlow => "first_negative_cash_flow",
            CutOffKey::LastPositiveCashFlow => "last_positive_cash_flow",
            CutOffKey::NoCutOff => "no_cut_off",
        }
    }
}

/// Stream a rate cutoff is measured on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatePhase {
    Oil,
    Gas,
    Water,
    Boe,
}

/// Date cutoff option
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DateCutOff {
    Date(NaiveDate),
    /// Whole or fractional years after the as-of date
    YearsFromAsOf(f64),
}

/// The active economic-limit criterion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CutOffCriterion {
    NoCutOff,
    Date(DateCutOff),
    /// Volume per day at or below which the well is shut in
    Rate { phase: RatePhase, threshold: f64 },
    MaxCumCashFlow,
    FirstNegativeCashFlow,
    LastPositiveCashFlow,
}

/// Floor applied after the economic limit is found
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MinCutOff {
    None,
    Date(NaiveDate),
    /// Months after the as-of date
    AsOf(f64),
    EndHistory,
}

/// Cut-off section of a well.
///
/// The criterion key and its value sit alongside the options in the same
/// object, e.g. `{"oil_rate": 5, "econ_limit_delay": 2}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CutOffModel {
    #[serde(flatten)]
    pub criteria: Map<String, Value>,

    /// Count capex against the cash flow when locating the limit
    #[serde(default, deserialize_with = "yes_no")]
    pub include_capex: bool,

    /// Discount rate in percent for the max cumulative cash flow criterion
    #[serde(default, deserialize_with = "blank_f64")]
    pub discount: Option<f64>,

    /// Months to keep producing after the computed limit
    #[serde(default, deserialize_with = "blank_f64")]
    pub econ_limit_delay: Option<f64>,

    /// Consecutive negative months tolerated by the first negative criterion
    #[serde(default, deserialize_with = "blank_f64")]
    pub tolerance_month: Option<f64>,

    #[serde(default)]
    pub min_cut_off: Option<Value>,

    /// Move after-econ-limit capex to the cutoff month
    #[serde(default, deserialize_with = "yes_no")]
    pub capex_offset_to_ecl: bool,
}

impl Default for CutOffModel {
    fn default() -> Self {
        let mut criteria = Map::new();
        criteria.insert(CutOffKey::NoCutOff.as_str().to_string(), Value::String(String::new()));
        Self {
            criteria,
            include_capex: false,
            discount: None,
            econ_limit_delay: None,
            tolerance_month: None,
            min_cut_off: None,
            capex_offset_to_ecl: false,
        }
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> CutOffError {
    CutOffError::InvalidValue {
        field: field.to_string(),
        reason: reason.into(),
    }
}

/// Identify the single criterion key of a cut-off model
pub fn get_cut_off_key(criteria: &Map<String, Value>) -> Result<CutOffKey, CutOffError> {
    let present: Vec<CutOffKey> = CutOffKey::ALL
        .iter()
        .copied()
        .filter(|key| criteria.contains_key(key.as_str()))
        .collect();

    match present.as_slice() {
        [] => Err(CutOffError::MissingKey),
        [key] => Ok(*key),
        many => Err(CutOffError::AmbiguousKey(
            many.iter().map(|k| k.as_str().to_string()).collect(),
        )),
    }
}

impl CutOffModel {
    pub fn key(&self) -> Result<CutOffKey, CutOffError> {
        get_cut_off_key(&self.criteria)
    }

    /// Parse the active criterion
    pub fn criterion(&self) -> Result<CutOffCriterion, CutOffError> {
        let key = self.key()?;
        let value = &self.criteria[key.as_str()];
        let number = || {
            value_as_f64(value).ok_or_else(|| invalid(key.as_str(), format!("expected a number, got {}", value)))
        };
        let rate = |phase: RatePhase| -> Result<CutOffCriterion, CutOffError> {
            Ok(CutOffCriterion::Rate {
                phase,
                threshold: number()?,
            })
        };

        match key {
            CutOffKey::NoCutOff => Ok(CutOffCriterion::NoCutOff),
            CutOffKey::Date => value_as_date(value)
                .map(|date| CutOffCriterion::Date(DateCutOff::Date(date)))
                .ok_or_else(|| CutOffError::InvalidDateOption(value.to_string())),
            CutOffKey::YearsFromAsOf => match value_as_f64(value) {
                Some(years) if years.is_finite() && years >= 0.0 => {
                    Ok(CutOffCriterion::Date(DateCutOff::YearsFromAsOf(years)))
                }
                _ => Err(CutOffError::InvalidDateOption(value.to_string())),
            },
            CutOffKey::OilRate => rate(RatePhase::Oil),
            CutOffKey::GasRate => rate(RatePhase::Gas),
            CutOffKey::WaterRate => rate(RatePhase::Water),
            CutOffKey::BoeRate => rate(RatePhase::Boe),
            CutOffKey::MaxCumCashFlow => Ok(CutOffCriterion::MaxCumCashFlow),
            CutOffKey::FirstNegativeCashFlow => Ok(CutOffCriterion::FirstNegativeCashFlow),
            CutOffKey::LastPositiveCashFlow => Ok(CutOffCriterion::LastPositiveCashFlow),
        }
    }

    /// Parse the minimum cutoff: `{"none": ""}`, `{"date": d}`,
    /// `{"as_of": months}` or `{"end_history": ""}`
    pub fn min_cut_off(&self) -> Result<MinCutOff, CutOffError> {
        let doc = match &self.min_cut_off {
            None => return Ok(MinCutOff::None),
            Some(value) if is_blank(value) => return Ok(MinCutOff::None),
            Some(Value::Object(doc)) => doc,
            Some(other) => return Err(CutOffError::InvalidMinCutOff(other.to_string())),
        };

        if doc.contains_key("none") {
            Ok(MinCutOff::None)
        } else if let Some(value) = doc.get("date") {
            value_as_date(value)
                .map(MinCutOff::Date)
                .ok_or_else(|| CutOffError::InvalidMinCutOff(value.to_string()))
        } else if let Some(value) = doc.get("as_of") {
            value_as_f64(value)
                .map(MinCutOff::AsOf)
                .ok_or_else(|| CutOffError::InvalidMinCutOff(value.to_string()))
        } else if doc.contains_key("end_history") {
            Ok(MinCutOff::EndHistory)
        } else {
            Err(CutOffError::InvalidMinCutOff(Value::Object(doc.clone()).to_string()))
        }
    }

    /// Whole months of econ limit delay
    pub fn delay_months(&self) -> i64 {
        self.econ_limit_delay.map(|m| m.max(0.0).round() as i64).unwrap_or(0)
    }

    pub fn tolerance(&self) -> usize {
        self.tolerance_month.map(|m| m.max(0.0) as usize).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::d;
    use serde_json::json;

    fn model(value: Value) -> CutOffModel {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_default_is_no_cut_off() {
        let model = CutOffModel::default();
        assert_eq!(model.key(), Ok(CutOffKey::NoCutOff));
        assert_eq!(model.criterion(), Ok(CutOffCriterion::NoCutOff));
        assert_eq!(model.min_cut_off(), Ok(MinCutOff::None));
    }

    #[test]
    fn test_criterion_with_options() {
        let model = model(json!({
            "oil_rate": "5",
            "include_capex": "yes",
            "econ_limit_delay": 2,
            "tolerance_month": "",
            "min_cut_off": {"as_of": 12},
        }));
        assert_eq!(
            model.criterion(),
            Ok(CutOffCriterion::Rate { phase: RatePhase::Oil, threshold: 5.0 })
        );
        assert!(model.include_capex);
        assert_eq!(model.delay_months(), 2);
        assert_eq!(model.tolerance(), 0);
        assert_eq!(model.min_cut_off(), Ok(MinCutOff::AsOf(12.0)));
        // Options never count as criterion keys
        assert!(!model.criteria.contains_key("include_capex"));
    }

    #[test]
    fn test_key_errors() {
        assert_eq!(model(json!({"include_capex": "no"})).key(), Err(CutOffError::MissingKey));
        assert!(matches!(
            model(json!({"date": "2030-01-01", "oil_rate": 1})).key(),
            Err(CutOffError::AmbiguousKey(keys)) if keys.len() == 2
        ));
    }

    #[test]
    fn test_date_options() {
        assert_eq!(
            model(json!({"date": "2030-01-01"})).criterion(),
            Ok(CutOffCriterion::Date(DateCutOff::Date(d(2030, 1, 1))))
        );
        assert_eq!(
            model(json!({"years_from_as_of": 2.5})).criterion(),
            Ok(CutOffCriterion::Date(DateCutOff::YearsFromAsOf(2.5)))
        );
        assert!(matches!(
            model(json!({"date": "soon"})).criterion(),
            Err(CutOffError::InvalidDateOption(_))
        ));
        assert!(matches!(
            model(json!({"years_from_as_of": -1})).criterion(),
            Err(CutOffError::InvalidDateOption(_))
        ));
    }

    #[test]
    fn test_min_cut_off_options() {
        let parse = |value: Value| model(json!({"no_cut_off": "", "min_cut_off": value})).min_cut_off();
        assert_eq!(parse(json!({"date": "2030-01-01"})), Ok(MinCutOff::Date(d(2030, 1, 1))));
        assert_eq!(parse(json!({"end_history": ""})), Ok(MinCutOff::EndHistory));
        assert_eq!(parse(json!({"none": ""})), Ok(MinCutOff::None));
        assert!(matches!(parse(json!({"later": 1})), Err(CutOffError::InvalidMinCutOff(_))));
    }
}
