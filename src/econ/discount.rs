//! Discounting utilities
//!
//! Supports:
//! - Compounding at yearly, quarterly, monthly or daily periods
//! - Mid-month or end-of-month cash accrual
//! - Day-count based multipliers, so partial periods discount smoothly

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::time::days_in_month;

const DAYS_IN_YEAR: f64 = 365.25;

/// Compounding frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountMethod {
    Yearly,
    Quarterly,
    Monthly,
    Daily,
}

/// When within a month the cash is assumed to arrive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashAccrualTime {
    MidMonth,
    EndMonth,
}

/// Discounting conventions from the general options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountTable {
    #[serde(default = "default_method")]
    pub discount_method: DiscountMethod,

    #[serde(default = "default_accrual")]
    pub cash_accrual_time: CashAccrualTime,

    /// Primary discount rate in percent
    #[serde(default)]
    pub first_discount: f64,

    /// Secondary discount rate in percent
    #[serde(default)]
    pub second_discount: f64,
}

fn default_method() -> DiscountMethod {
    DiscountMethod::Yearly
}

fn default_accrual() -> CashAccrualTime {
    CashAccrualTime::MidMonth
}

impl Default for DiscountTable {
    fn default() -> Self {
        Self {
            discount_method: default_method(),
            cash_accrual_time: default_accrual(),
            first_discount: 10.0,
            second_discount: 15.0,
        }
    }
}

/// Compounding periods per year
pub fn num_periods(method: DiscountMethod) -> f64 {
    match method {
        DiscountMethod::Yearly => 1.0,
        DiscountMethod::Quarterly => 4.0,
        DiscountMethod::Monthly => 12.0,
        DiscountMethod::Daily => 365.0,
    }
}

/// Days from `anchor` to the accrual point of each month in `months`
/// (first day of each month).
pub fn cum_days(months: &[NaiveDate], anchor: NaiveDate, accrual: CashAccrualTime) -> Vec<f64> {
    months
        .iter()
        .map(|&month| {
            let to_month = (month - anchor).num_days() as f64;
            let days = days_in_month(month) as f64;
            match accrual {
                CashAccrualTime::MidMonth => to_month + days / 2.0,
                CashAccrualTime::EndMonth => to_month + days,
            }
        })
        .collect()
}

/// Discount multiplier for each entry of `cum_days` at `annual_rate` (decimal)
pub fn discount_multipliers(annual_rate: f64, cum_days: &[f64], method: DiscountMethod) -> Vec<f64> {
    if annual_rate == 0.0 {
        return vec![1.0; cum_days.len()];
    }
    let periods = num_periods(method);
    let periodic = 1.0 + annual_rate / periods;
    cum_days
        .iter()
        .map(|&days| periodic.powf(-periods * days / DAYS_IN_YEAR))
        .collect()
}

/// Multipliers for a monthly axis using the table's conventions
pub fn monthly_multipliers(
    table: &DiscountTable,
    annual_rate: f64,
    months: &[NaiveDate],
    anchor: NaiveDate,
) -> Vec<f64> {
    let days = cum_days(months, anchor, table.cash_accrual_time);
    discount_multipliers(annual_rate, &days, table.discount_method)
}

/// Present value of a monthly stream
pub fn present_value(values: &[f64], multipliers: &[f64]) -> f64 {
    values.iter().zip(multipliers).map(|(v, m)| v * m).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_zero_rate_is_identity() {
        let m = discount_multipliers(0.0, &[15.0, 45.0], DiscountMethod::Yearly);
        assert_eq!(m, vec![1.0, 1.0]);
    }

    #[test]
    fn test_yearly_one_year_out() {
        let m = discount_multipliers(0.10, &[365.25], DiscountMethod::Yearly);
        assert_relative_eq!(m[0], 1.0 / 1.1, epsilon = 1e-12);
    }

    #[test]
    fn test_monthly_compounding_is_stronger() {
        let yearly = discount_multipliers(0.12, &[365.25], DiscountMethod::Yearly)[0];
        let monthly = discount_multipliers(0.12, &[365.25], DiscountMethod::Monthly)[0];
        assert!(monthly < yearly);
    }

    #[test]
    fn test_cum_days_accrual() {
        let months = [d(2021, 1, 1), d(2021, 2, 1)];
        let mid = cum_days(&months, d(2021, 1, 1), CashAccrualTime::MidMonth);
        assert_eq!(mid, vec![15.5, 45.0]);
        let end = cum_days(&months, d(2021, 1, 1), CashAccrualTime::EndMonth);
        assert_eq!(end, vec![31.0, 59.0]);
    }

    #[test]
    fn test_present_value() {
        assert_eq!(present_value(&[100.0, 100.0], &[1.0, 0.5]), 150.0);
    }
}
