//! Econ result structures shared by the engine, reversion and cutoff logic

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::irr::calculate_irr;
use crate::ownership::OwnershipState;
use crate::time::month_start;

/// Well-head stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Oil,
    Gas,
    Water,
}

/// Oil, gas and water volumes on a regular (daily or monthly) axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeSeries {
    /// Date of the first entry (first day of the month for monthly series)
    pub start: NaiveDate,
    #[serde(default)]
    pub oil: Vec<f64>,
    #[serde(default)]
    pub gas: Vec<f64>,
    #[serde(default)]
    pub water: Vec<f64>,
}

impl VolumeSeries {
    pub fn new(start: NaiveDate) -> Self {
        Self {
            start,
            oil: Vec::new(),
            gas: Vec::new(),
            water: Vec::new(),
        }
    }

    /// Number of periods (the longest stream)
    pub fn len(&self) -> usize {
        self.oil.len().max(self.gas.len()).max(self.water.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn phase(&self, phase: Phase) -> &[f64] {
        match phase {
            Phase::Oil => &self.oil,
            Phase::Gas => &self.gas,
            Phase::Water => &self.water,
        }
    }

    /// Value of `phase` at period `idx`; periods past a stream's end are 0
    pub fn value(&self, phase: Phase, idx: usize) -> f64 {
        self.phase(phase).get(idx).copied().unwrap_or(0.0)
    }

    /// Index of `date` in a daily series
    pub fn day_index(&self, date: NaiveDate) -> Option<usize> {
        let idx = (date - self.start).num_days();
        if idx >= 0 && (idx as usize) < self.len() {
            Some(idx as usize)
        } else {
            None
        }
    }

    /// Date of period `idx` in a daily series
    pub fn day_date(&self, idx: usize) -> NaiveDate {
        self.start + Duration::days(idx as i64)
    }

    /// Index of the month containing `date` in a monthly series
    pub fn month_index(&self, date: NaiveDate) -> Option<usize> {
        let start = month_start(self.start);
        let idx = (date.year() as i64 - start.year() as i64) * 12 + date.month() as i64
            - start.month() as i64;
        if idx >= 0 && (idx as usize) < self.len() {
            Some(idx as usize)
        } else {
            None
        }
    }
}

/// A scheduled capital expenditure as it lands in the econ result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapexEntry {
    pub description: String,
    /// Net (WI-weighted) amount
    pub total: f64,
    /// Month offset from FPD at which the capex is scheduled
    pub index: i64,
    pub after_econ_limit: bool,
}

/// One net expense stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseLine {
    pub name: String,
    pub values: Vec<f64>,
    pub affect_econ_limit: bool,
}

/// Monthly econ output for one well
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EconResult {
    /// Month offsets from the FPD month
    pub time: Vec<i64>,
    /// First day of each month
    pub dates: Vec<NaiveDate>,

    /// Gross well-head volumes, one entry per month
    pub well_head: Option<VolumeSeries>,
    /// Daily well-head volumes when the forecast carries them
    pub daily: Option<VolumeSeries>,

    /// Working interest applied in each month
    pub wi: Vec<f64>,

    pub revenue: Vec<f64>,
    pub expense: Vec<f64>,
    pub expense_detail: Vec<ExpenseLine>,
    pub production_tax: Vec<f64>,
    pub net_profit_interest: Vec<f64>,
    pub capex: Vec<f64>,
    pub capex_detail: Vec<CapexEntry>,

    /// Before-income-tax cash flow
    pub bfit_cf: Vec<f64>,
}

impl EconResult {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Gross well-head volume of `phase` in month `idx`
    pub fn well_head_volume(&self, phase: Phase, idx: usize) -> f64 {
        self.well_head.as_ref().map(|v| v.value(phase, idx)).unwrap_or(0.0)
    }

    pub fn total_capex(&self) -> f64 {
        self.capex.iter().sum()
    }

    /// Summary statistics
    pub fn summary(&self) -> EconSummary {
        let total_revenue: f64 = self.revenue.iter().sum();
        let total_expense: f64 = self.expense.iter().sum();
        let total_production_tax: f64 = self.production_tax.iter().sum();
        let total_net_profit_interest: f64 = self.net_profit_interest.iter().sum();
        let total_capex = self.total_capex();
        let total_bfit_cf: f64 = self.bfit_cf.iter().sum();

        EconSummary {
            total_months: self.len() as u32,
            total_revenue,
            total_expense,
            total_production_tax,
            total_net_profit_interest,
            total_capex,
            total_bfit_cf,
            irr: calculate_irr(&self.bfit_cf, 12),
        }
    }
}

/// Summary statistics for an econ result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EconSummary {
    pub total_months: u32,
    pub total_revenue: f64,
    pub total_expense: f64,
    pub total_production_tax: f64,
    pub total_net_profit_interest: f64,
    pub total_capex: f64,
    pub total_bfit_cf: f64,
    /// Annual IRR of the monthly BFIT cash flow, when one exists
    pub irr: Option<f64>,
}

/// The partial well result handed to the econ calculator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WellResult {
    /// Ownership to distribute revenue and cost with
    pub ownership: OwnershipState,

    /// Truncate the cash flow after this date
    #[serde(default)]
    pub cutoff_date: Option<NaiveDate>,

    /// Start the cash flow here instead of the cash-flow start date
    #[serde(default)]
    pub window_start: Option<NaiveDate>,
}

impl WellResult {
    pub fn new(ownership: OwnershipState) -> Self {
        Self {
            ownership,
            cutoff_date: None,
            window_start: None,
        }
    }

    pub fn with_cutoff(mut self, cutoff_date: NaiveDate) -> Self {
        self.cutoff_date = Some(cutoff_date);
        self
    }
}
