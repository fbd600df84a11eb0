//! Calendar helpers for the well time axis
//!
//! Day offsets (`t`) are counted from the first production date, which is day 0.
//! Monthly axes use month offsets from the FPD month, which is month 0.

use chrono::{Datelike, Duration, Months, NaiveDate};

/// Average month length used to turn fractional month offsets into days
pub const DAYS_IN_GENERIC_MONTH: f64 = 365.25 / 12.0;

/// Days from first production to `date` (FPD itself is 0)
pub fn date_to_t(date: NaiveDate, fpd: NaiveDate) -> i64 {
    (date - fpd).num_days()
}

/// Inverse of [`date_to_t`]
pub fn t_to_date(t: i64, fpd: NaiveDate) -> NaiveDate {
    fpd + Duration::days(t)
}

/// Whole calendar months from the month of `base` to the month of `date`
pub fn month_offset(date: NaiveDate, base: NaiveDate) -> i64 {
    (date.year() as i64 - base.year() as i64) * 12 + date.month() as i64 - base.month() as i64
}

/// First day of the month containing `date`
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.day0() as i64)
}

/// Last day of the month containing `date`
pub fn month_end(date: NaiveDate) -> NaiveDate {
    add_months(month_start(date), 1) - Duration::days(1)
}

/// Number of days in the month containing `date`
pub fn days_in_month(date: NaiveDate) -> u32 {
    month_end(date).day()
}

/// Shift by whole months, clamping the day to the target month's length
pub fn add_months(date: NaiveDate, months: i64) -> NaiveDate {
    if months >= 0 {
        date.checked_add_months(Months::new(months as u32))
            .unwrap_or(NaiveDate::MAX)
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs() as u32))
            .unwrap_or(NaiveDate::MIN)
    }
}

/// Shift by a possibly fractional number of months.
///
/// The whole part moves by calendar months; the fractional part is converted
/// with [`DAYS_IN_GENERIC_MONTH`] and truncated, so 1.5 months is one month
/// plus 15 days.
pub fn add_fractional_months(date: NaiveDate, months: f64) -> NaiveDate {
    let whole = months.trunc();
    let extra_days = ((months - whole) * DAYS_IN_GENERIC_MONTH) as i64;
    add_months(date, whole as i64) + Duration::days(extra_days)
}

/// First day of the month `offset` months after the FPD month
pub fn month_from_offset(offset: i64, fpd: NaiveDate) -> NaiveDate {
    add_months(month_start(fpd), offset)
}

/// Fraction of the month elapsed before `date` (day 1 gives 0)
pub fn fraction_of_month_before(date: NaiveDate) -> f64 {
    date.day0() as f64 / days_in_month(date) as f64
}

/// Parse a date as stored in well documents
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let value = value.split('T').next().unwrap_or(value);
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%m/%d/%Y"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_date_to_t_round_trip() {
        let fpd = d(2020, 1, 15);
        assert_eq!(date_to_t(fpd, fpd), 0);
        assert_eq!(date_to_t(d(2020, 2, 15), fpd), 31);
        assert_eq!(t_to_date(31, fpd), d(2020, 2, 15));
        assert_eq!(t_to_date(-15, fpd), d(2019, 12, 31));
    }

    #[test]
    fn test_month_offset() {
        let fpd = d(1995, 1, 1);
        assert_eq!(month_offset(d(2000, 1, 1), fpd), 60);
        assert_eq!(month_offset(d(1995, 1, 31), fpd), 0);
        assert_eq!(month_offset(d(1994, 12, 1), fpd), -1);
    }

    #[test]
    fn test_days_in_month_leap_year() {
        assert_eq!(days_in_month(d(2020, 2, 10)), 29);
        assert_eq!(days_in_month(d(2021, 2, 10)), 28);
        assert_eq!(days_in_month(d(2021, 12, 1)), 31);
        assert_eq!(month_end(d(2021, 12, 5)), d(2021, 12, 31));
    }

    #[test]
    fn test_add_months_clamps_day() {
        assert_eq!(add_months(d(2021, 1, 31), 1), d(2021, 2, 28));
        assert_eq!(add_months(d(2021, 3, 15), -3), d(2020, 12, 15));
    }

    #[test]
    fn test_fractional_months() {
        // 0.5 * 30.4375 = 15.2 days, truncated to 15
        assert_eq!(add_fractional_months(d(2021, 1, 1), 1.5), d(2021, 2, 16));
        assert_eq!(add_fractional_months(d(2021, 1, 1), 12.0), d(2022, 1, 1));
    }

    #[test]
    fn test_fraction_of_month_before() {
        assert_eq!(fraction_of_month_before(d(2021, 4, 1)), 0.0);
        assert_eq!(fraction_of_month_before(d(2021, 4, 16)), 0.5);
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("2021-03-04"), Some(d(2021, 3, 4)));
        assert_eq!(parse_date("2021-03-04T00:00:00Z"), Some(d(2021, 3, 4)));
        assert_eq!(parse_date("03/04/2021"), Some(d(2021, 3, 4)));
        assert_eq!(parse_date("not a date"), None);
    }
}
