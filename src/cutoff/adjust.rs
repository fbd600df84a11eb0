//! Reconciling a computed economic limit with the well's dates

use chrono::NaiveDate;

use super::model::MinCutOff;
use crate::econ::CapexEntry;
use crate::error::CutOffError;
use crate::time::{add_fractional_months, month_offset};
use crate::well::DateDict;

/// Whether a cash-flow cutoff still leaves the well uneconomic.
///
/// Uneconomic when cumulative BFIT cash flow through `cut_idx` is not positive,
/// or when after-econ-limit capex scheduled after `t_cut` takes it below zero.
pub fn if_cf_cutoff_unecon(bfit_cf: &[f64], cut_idx: usize, capex_detail: &[CapexEntry], t_cut: i64) -> bool {
    let end = (cut_idx + 1).min(bfit_cf.len());
    let cum: f64 = bfit_cf[..end].iter().sum();
    if cum <= 0.0 {
        return true;
    }

    let after_limit: f64 = capex_detail
        .iter()
        .filter(|entry| entry.after_econ_limit && entry.index > t_cut)
        .map(|entry| entry.total)
        .sum();
    cum - after_limit < 0.0
}

/// Clamp a cutoff to [as-of date, max life] and give its month offset from
/// the FPD month
pub fn adjust_cutoff(real_cut_off: NaiveDate, dates: &DateDict) -> (NaiveDate, i64) {
    let date = real_cut_off.max(dates.as_of_date).min(dates.max_life_date());
    (date, month_offset(date, dates.first_production_date))
}

/// Raise the cutoff to the minimum cutoff, capped at max life.
///
/// A floor that moves the cutoff later also makes the well economic.
pub fn apply_min_cut_off(
    real_cut_off: NaiveDate,
    t_cut_off: i64,
    unecon: bool,
    min_cut_off: &MinCutOff,
    dates: &DateDict,
) -> Result<(NaiveDate, i64, bool), CutOffError> {
    let floor = match min_cut_off {
        MinCutOff::None => return Ok((real_cut_off, t_cut_off, unecon)),
        MinCutOff::Date(date) => *date,
        MinCutOff::AsOf(months) => add_fractional_months(dates.as_of_date, *months),
        MinCutOff::EndHistory => dates
            .end_history_date
            .ok_or_else(|| CutOffError::InvalidMinCutOff("well has no end_history_date".to_string()))?,
    };
    let floor = floor.min(dates.max_life_date());

    if floor > real_cut_off {
        Ok((floor, month_offset(floor, dates.first_production_date), false))
    } else {
        Ok((real_cut_off, t_cut_off, unecon))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::d;

    fn dates() -> DateDict {
        DateDict {
            first_production_date: d(2020, 1, 1),
            as_of_date: d(2021, 1, 1),
            cf_start_date: d(2021, 1, 1),
            cf_end_date: d(2045, 1, 1),
            discount_date: None,
            end_history_date: Some(d(2040, 1, 1)),
            first_segment_date: None,
        }
    }

    #[test]
    fn test_min_cut_off_date_floor() {
        let result = apply_min_cut_off(
            d(2021, 1, 1),
            0,
            false,
            &MinCutOff::Date(d(2030, 1, 1)),
            &dates(),
        );
        assert_eq!(result, Ok((d(2030, 1, 1), 120, false)));
    }

    #[test]
    fn test_min_cut_off_forces_economic() {
        let result = apply_min_cut_off(d(2021, 6, 30), 17, true, &MinCutOff::AsOf(12.0), &dates());
        assert_eq!(result, Ok((d(2022, 1, 1), 24, false)));

        // A floor before the computed cutoff changes nothing
        let result = apply_min_cut_off(d(2041, 6, 30), 257, true, &MinCutOff::EndHistory, &dates());
        assert_eq!(result, Ok((d(2041, 6, 30), 257, true)));
    }

    #[test]
    fn test_min_cut_off_capped_at_max_life() {
        let result = apply_min_cut_off(d(2021, 1, 1), 12, false, &MinCutOff::Date(d(2050, 1, 1)), &dates());
        assert_eq!(result, Ok((d(2045, 1, 1), 300, false)));

        let mut no_history = dates();
        no_history.end_history_date = None;
        assert!(apply_min_cut_off(d(2021, 1, 1), 12, false, &MinCutOff::EndHistory, &no_history).is_err());
    }

    #[test]
    fn test_adjust_cutoff_clamps() {
        let dates = dates();
        for raw in [d(1990, 5, 5), d(2021, 1, 1), d(2033, 7, 9), d(2045, 1, 1), d(2099, 1, 1)] {
            let (date, t) = adjust_cutoff(raw, &dates);
            assert!(date >= dates.as_of_date);
            assert!(date <= dates.max_life_date());
            assert_eq!(t, month_offset(date, dates.first_production_date));
        }
        assert_eq!(adjust_cutoff(d(1990, 5, 5), &dates), (d(2021, 1, 1), 12));
    }

    #[test]
    fn test_cf_cutoff_unecon() {
        let capex = vec![CapexEntry {
            description: "plug and abandon".to_string(),
            total: 250.0,
            index: 20,
            after_econ_limit: true,
        }];
        let cf = [-100.0, 200.0, 100.0, -50.0];
        assert!(!if_cf_cutoff_unecon(&cf, 2, &[], 14));
        assert!(if_cf_cutoff_unecon(&cf, 0, &[], 12));
        // 200 cumulative cannot cover the 250 abandonment after the cutoff
        assert!(if_cf_cutoff_unecon(&cf, 2, &capex, 14));
        // Capex already inside the economic life is not counted again
        assert!(!if_cf_cutoff_unecon(&cf, 2, &capex, 20));
    }
}
