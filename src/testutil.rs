//! Shared fixtures for unit tests

use chrono::NaiveDate;
use serde_json::json;

use crate::econ::{EconResult, WellResult};
use crate::error::EconError;
use crate::well::WellInput;

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// Two-year well: FPD 2020-01, cash flow 2021-01 through 2022-12, declining
/// 10% a month, one drilling capex in the first month.
pub fn sample_well() -> WellInput {
    let oil: Vec<f64> = (0..24).map(|i| 1000.0 * 0.9_f64.powi(i)).collect();
    let gas: Vec<f64> = (0..24).map(|i| 3000.0 * 0.9_f64.powi(i)).collect();
    serde_json::from_value(json!({
        "well_id": "TEST-1",
        "date_dict": {
            "first_production_date": "2020-01-01",
            "as_of_date": "2021-01-01",
            "cf_start_date": "2021-01-01",
            "cf_end_date": "2022-12-31",
        },
        "ownership_model": {
            "initial_ownership": {
                "working_interest": 100,
                "net_profit_interest": "",
                "original_ownership": {"net_revenue_interest": 80, "lease_net_revenue_interest": 80},
            },
            "reversions": [],
        },
        "econ_model": {
            "pricing": {"oil": 50.0, "gas": 3.0},
            "expenses": [
                {"name": "lease operating", "fixed_per_month": 2000.0, "per_unit": 2.0, "phase": "oil"},
            ],
            "production_taxes": {"severance_tax_pct": 5},
            "capex": [
                {"description": "drilling", "date": "2021-01-15", "amount": 100000.0},
            ],
        },
        "production": {
            "monthly": {"start": "2021-01-01", "oil": oil, "gas": gas, "water": vec![500.0; 24]},
        },
    }))
    .unwrap()
}

/// Econ result stub over `time` (month offsets) with the given cash flow
pub fn econ_with_cf(first: NaiveDate, time_start: i64, bfit_cf: &[f64]) -> EconResult {
    let n = bfit_cf.len();
    EconResult {
        time: (0..n as i64).map(|i| time_start + i).collect(),
        dates: (0..n as i64).map(|i| crate::time::add_months(first, i)).collect(),
        wi: vec![1.0; n],
        revenue: bfit_cf.iter().map(|v| v.max(0.0)).collect(),
        expense: vec![0.0; n],
        production_tax: vec![0.0; n],
        net_profit_interest: vec![0.0; n],
        capex: vec![0.0; n],
        bfit_cf: bfit_cf.to_vec(),
        ..Default::default()
    }
}

/// Calculator stub that ignores ownership and returns `result`
pub fn fixed_calc(result: EconResult) -> impl Fn(&WellInput, &WellResult) -> Result<EconResult, EconError> {
    move |_: &WellInput, _: &WellResult| Ok(result.clone())
}
