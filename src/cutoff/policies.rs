//! Economic-limit policies
//!
//! Each policy turns an econ result (or just the well dates) into the last
//! economic day of the well.

use chrono::{Duration, NaiveDate};

use super::model::{DateCutOff, RatePhase};
use crate::econ::{EconResult, Phase, VolumeSeries};
use crate::error::CutOffError;
use crate::time::{add_fractional_months, days_in_month, month_end, month_offset};
use crate::well::{BoeConversion, DateDict};

/// Date cutoff and its month offset from the FPD month
pub fn apply_date_cutoff(option: &DateCutOff, dates: &DateDict) -> Result<(NaiveDate, i64), CutOffError> {
    let date = match *option {
        DateCutOff::Date(date) => date,
        DateCutOff::YearsFromAsOf(years) => {
            if !years.is_finite() || years < 0.0 {
                return Err(CutOffError::InvalidDateOption(format!("years_from_as_of = {}", years)));
            }
            add_fractional_months(dates.as_of_date, years * 12.0) - Duration::days(1)
        }
    };
    Ok((date, month_offset(date, dates.first_production_date)))
}

fn phase_rate(series: &VolumeSeries, phase: RatePhase, boe: &BoeConversion, idx: usize) -> f64 {
    match phase {
        RatePhase::Oil => series.value(Phase::Oil, idx),
        RatePhase::Gas => series.value(Phase::Gas, idx),
        RatePhase::Water => series.value(Phase::Water, idx),
        RatePhase::Boe => boe.to_boe(series.value(Phase::Oil, idx), series.value(Phase::Gas, idx)),
    }
}

/// First day the well rate drops to `threshold` or below.
///
/// Walks the econ months from the as-of date in order. Days covered by daily
/// volumes use the daily rate; every other day uses its month's volume spread
/// evenly over the month. A month with no daily coverage is judged once as a
/// whole. The cutoff is the day before the failing period. Returns the cutoff
/// and whether the very first searched period already fails.
pub fn apply_rate_cutoff(
    econ: &EconResult,
    phase: RatePhase,
    threshold: f64,
    dates: &DateDict,
    boe: &BoeConversion,
) -> (NaiveDate, bool) {
    let daily = econ.daily.as_ref();
    let mut first_period = true;

    for (idx, &month) in econ.dates.iter().enumerate() {
        let end = month_end(month);
        if end < dates.as_of_date {
            continue;
        }
        let period_start = month.max(dates.as_of_date);
        let monthly_rate = econ
            .well_head
            .as_ref()
            .map(|series| phase_rate(series, phase, boe, idx) / days_in_month(month) as f64);

        let days: Vec<NaiveDate> = period_start.iter_days().take_while(|&day| day <= end).collect();
        let daily_index = |day: NaiveDate| daily.and_then(|series| series.day_index(day).map(|i| (series, i)));

        if days.iter().any(|&day| daily_index(day).is_some()) {
            for day in days {
                let rate = match daily_index(day) {
                    Some((series, i)) => Some(phase_rate(series, phase, boe, i)),
                    None => monthly_rate,
                };
                if let Some(rate) = rate {
                    if rate <= threshold {
                        return (day - Duration::days(1), first_period);
                    }
                    first_period = false;
                }
            }
        } else if let Some(rate) = monthly_rate {
            if rate <= threshold {
                return (period_start - Duration::days(1), first_period);
            }
            first_period = false;
        }
    }

    match econ.dates.last() {
        Some(&last) => (month_end(last), false),
        None => (dates.as_of_date, true),
    }
}

/// First negative cash flow, allowing short negative runs.
///
/// A run of negative months longer than `tolerance`, or one that lasts to the
/// end of the series, ends the well the month before it starts; a run from
/// month 0 makes the well uneconomic. Runs that recover within the tolerance
/// are skipped and the first one is reported. Without a disqualifying run the
/// cutoff is the last month.
pub fn get_first_negative_with_tolerance(cf: &[f64], tolerance: usize) -> (usize, bool, Option<usize>) {
    if cf.is_empty() {
        return (0, true, None);
    }

    let mut first_tolerated = None;
    let mut i = 0;
    while i < cf.len() {
        if cf[i] >= 0.0 {
            i += 1;
            continue;
        }
        let start = i;
        while i < cf.len() && cf[i] < 0.0 {
            i += 1;
        }
        let run = i - start;
        let recovered = i < cf.len();
        if run > tolerance || !recovered {
            return if start == 0 {
                (0, true, first_tolerated)
            } else {
                (start - 1, false, first_tolerated)
            };
        }
        first_tolerated.get_or_insert(start);
    }
    (cf.len() - 1, false, first_tolerated)
}

/// Last month with positive cash flow; none makes the well uneconomic
pub fn get_last_positive_cash_flow(cf: &[f64]) -> (usize, bool) {
    match cf.iter().rposition(|&value| value > 0.0) {
        Some(idx) => (idx, false),
        None => (0, true),
    }
}

/// Month at which cumulative discounted cash flow peaks
pub fn get_max_cum_cash_flow(cf: &[f64], multipliers: &[f64]) -> usize {
    let mut cum = 0.0;
    let mut best: Option<(usize, f64)> = None;
    for (idx, (&value, &multiplier)) in cf.iter().zip(multipliers).enumerate() {
        cum += value * multiplier;
        if cum.is_nan() {
            continue;
        }
        match best {
            Some((_, peak)) if cum <= peak => {}
            _ => best = Some((idx, cum)),
        }
    }
    // All-NaN input has no peak
    best.map(|(idx, _)| idx).unwrap_or(0)
}

/// Cash flow the economic limit is judged on.
///
/// Expenses that do not affect the econ limit are added back to the BFIT cash
/// flow, and so is capex unless `include_capex` is set.
pub fn cf_after_expense_deduction(include_capex: bool, econ: &EconResult) -> Vec<f64> {
    let mut cf = econ.bfit_cf.clone();
    for line in econ.expense_detail.iter().filter(|line| !line.affect_econ_limit) {
        for (value, expense) in cf.iter_mut().zip(&line.values) {
            *value += expense;
        }
    }
    if !include_capex {
        for (value, capex) in cf.iter_mut().zip(&econ.capex) {
            *value += capex;
        }
    }
    cf
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::econ::ExpenseLine;
    use crate::testutil::{d, econ_with_cf, sample_well};

    #[test]
    fn test_date_cutoff_literal() {
        let mut dates = sample_well().date_dict;
        dates.first_production_date = d(1995, 1, 1);
        let result = apply_date_cutoff(&DateCutOff::Date(d(2000, 1, 1)), &dates);
        assert_eq!(result, Ok((d(2000, 1, 1), 60)));
    }

    #[test]
    fn test_date_cutoff_years_from_as_of() {
        let dates = sample_well().date_dict;
        let result = apply_date_cutoff(&DateCutOff::YearsFromAsOf(2.0), &dates);
        assert_eq!(result, Ok((d(2022, 12, 31), 35)));
        assert!(apply_date_cutoff(&DateCutOff::YearsFromAsOf(f64::NAN), &dates).is_err());
    }

    #[test]
    fn test_first_negative_tolerance_exceeded() {
        let cf = [0.0, 0.0, 0.0, 0.0, 0.0, -10.0, -5.0, -3.0, 0.0, 0.0, 0.0];
        assert_eq!(get_first_negative_with_tolerance(&cf, 2), (4, false, None));
    }

    #[test]
    fn test_first_negative_from_start() {
        let cf = [-10.0, -8.0, -6.0, 0.0, 0.0, 0.0];
        assert_eq!(get_first_negative_with_tolerance(&cf, 2), (0, true, None));
    }

    #[test]
    fn test_first_negative_tolerated_run() {
        let cf = [5.0, -1.0, -1.0, 5.0, 5.0, -1.0];
        // The short dip is tolerated; the run to the end is not
        assert_eq!(get_first_negative_with_tolerance(&cf, 2), (4, false, Some(1)));

        let cf = [5.0, -1.0, 5.0, 5.0];
        assert_eq!(get_first_negative_with_tolerance(&cf, 1), (3, false, Some(1)));
        assert_eq!(get_first_negative_with_tolerance(&cf, 0), (0, false, None));
    }

    #[test]
    fn test_last_positive() {
        assert_eq!(get_last_positive_cash_flow(&[5.0, -1.0, 3.0, 0.0, -2.0]), (2, false));
        assert_eq!(get_last_positive_cash_flow(&[-1.0, 0.0]), (0, true));
    }

    #[test]
    fn test_max_cum_cash_flow() {
        let cf = [-100.0, 60.0, 60.0, -10.0, 5.0];
        assert_eq!(get_max_cum_cash_flow(&cf, &[1.0; 5]), 2);
        // Heavy discounting pushes value toward early months
        assert_eq!(get_max_cum_cash_flow(&[10.0, 1.0, -1.0], &[1.0, 0.5, 0.25]), 1);
        assert_eq!(get_max_cum_cash_flow(&[f64::NAN, f64::NAN], &[1.0, 1.0]), 0);
    }

    #[test]
    fn test_cf_after_expense_deduction_adds_capex_back() {
        let mut econ = econ_with_cf(d(2021, 1, 1), 12, &[500.0, 400.0, 300.0, 200.0, 100.0]);
        econ.capex = vec![1000.0, 0.0, 0.0, 0.0, 0.0];
        econ.expense_detail = vec![ExpenseLine {
            name: "lease operating".to_string(),
            values: vec![50.0; 5],
            affect_econ_limit: true,
        }];
        assert_eq!(cf_after_expense_deduction(false, &econ), vec![1500.0, 400.0, 300.0, 200.0, 100.0]);
        assert_eq!(cf_after_expense_deduction(true, &econ), vec![500.0, 400.0, 300.0, 200.0, 100.0]);

        econ.expense_detail[0].affect_econ_limit = false;
        assert_eq!(cf_after_expense_deduction(true, &econ), vec![550.0, 450.0, 350.0, 250.0, 150.0]);
    }

    #[test]
    fn test_rate_cutoff_monthly() {
        let dates = sample_well().date_dict;
        let mut econ = econ_with_cf(d(2021, 1, 1), 12, &[0.0; 4]);
        econ.well_head = Some(VolumeSeries {
            start: d(2021, 1, 1),
            oil: vec![310.0, 280.0, 93.0, 30.0],
            gas: vec![],
            water: vec![],
        });
        // 10, 10, 3, 1 bbl/d against a 5 bbl/d limit
        let (cutoff, unecon) = apply_rate_cutoff(&econ, RatePhase::Oil, 5.0, &dates, &BoeConversion::default());
        assert_eq!(cutoff, d(2021, 2, 28));
        assert!(!unecon);

        let (cutoff, unecon) = apply_rate_cutoff(&econ, RatePhase::Oil, 20.0, &dates, &BoeConversion::default());
        assert_eq!(cutoff, d(2020, 12, 31));
        assert!(unecon);
    }

    #[test]
    fn test_rate_cutoff_prefers_daily() {
        let dates = sample_well().date_dict;
        let mut econ = econ_with_cf(d(2021, 1, 1), 12, &[0.0; 2]);
        econ.well_head = Some(VolumeSeries {
            start: d(2021, 1, 1),
            oil: vec![310.0, 0.0],
            gas: vec![],
            water: vec![],
        });
        let mut daily = VolumeSeries::new(d(2021, 1, 1));
        daily.oil = (0..31).map(|i| 20.0 - i as f64).collect();
        econ.daily = Some(daily);

        let (cutoff, unecon) = apply_rate_cutoff(&econ, RatePhase::Oil, 5.0, &dates, &BoeConversion::default());
        // 20 - 15 = 5 on January 16
        assert_eq!(cutoff, d(2021, 1, 15));
        assert!(!unecon);
    }

    #[test]
    fn test_rate_cutoff_never_reached() {
        let dates = sample_well().date_dict;
        let mut econ = econ_with_cf(d(2021, 1, 1), 12, &[0.0; 2]);
        econ.well_head = Some(VolumeSeries {
            start: d(2021, 1, 1),
            oil: vec![3100.0, 2800.0],
            gas: vec![],
            water: vec![],
        });
        let (cutoff, unecon) = apply_rate_cutoff(&econ, RatePhase::Boe, 5.0, &dates, &BoeConversion::default());
        assert_eq!(cutoff, d(2021, 2, 28));
        assert!(!unecon);
    }

    #[test]
    fn test_rate_cutoff_monthly_gap_before_daily() {
        let dates = sample_well().date_dict;
        let mut econ = econ_with_cf(d(2021, 1, 1), 12, &[0.0; 4]);
        econ.well_head = Some(VolumeSeries {
            start: d(2021, 1, 1),
            oil: vec![310.0, 28.0, 620.0, 600.0],
            gas: vec![],
            water: vec![],
        });
        let mut daily = VolumeSeries::new(d(2021, 3, 1));
        daily.oil = vec![20.0; 61];
        econ.daily = Some(daily);

        // February runs at 1 bbl/d before the daily data starts in March
        let (cutoff, unecon) = apply_rate_cutoff(&econ, RatePhase::Oil, 5.0, &dates, &BoeConversion::default());
        assert_eq!(cutoff, d(2021, 1, 31));
        assert!(!unecon);
    }

    #[test]
    fn test_rate_cutoff_daily_then_monthly() {
        let dates = sample_well().date_dict;
        let mut econ = econ_with_cf(d(2021, 1, 1), 12, &[0.0; 3]);
        econ.well_head = Some(VolumeSeries {
            start: d(2021, 1, 1),
            oil: vec![310.0, 280.0, 31.0],
            gas: vec![],
            water: vec![],
        });
        let mut daily = VolumeSeries::new(d(2021, 1, 1));
        daily.oil = vec![10.0; 31];
        econ.daily = Some(daily);

        // Daily covers January only; March falls to 1 bbl/d
        let (cutoff, unecon) = apply_rate_cutoff(&econ, RatePhase::Oil, 5.0, &dates, &BoeConversion::default());
        assert_eq!(cutoff, d(2021, 2, 28));
        assert!(!unecon);
    }

    #[test]
    fn test_rate_cutoff_mixed_month() {
        let dates = sample_well().date_dict;
        let mut econ = econ_with_cf(d(2021, 1, 1), 12, &[0.0; 2]);
        econ.well_head = Some(VolumeSeries {
            start: d(2021, 1, 1),
            oil: vec![310.0, 280.0],
            gas: vec![],
            water: vec![],
        });
        // Daily data starts mid-January and drops below the limit on the 20th
        let mut daily = VolumeSeries::new(d(2021, 1, 10));
        daily.oil = (0..22).map(|i| if i < 10 { 12.0 } else { 4.0 }).collect();
        econ.daily = Some(daily);

        let (cutoff, unecon) = apply_rate_cutoff(&econ, RatePhase::Oil, 5.0, &dates, &BoeConversion::default());
        assert_eq!(cutoff, d(2021, 1, 19));
        assert!(!unecon);
    }
}
