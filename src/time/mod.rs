//! Time-index utilities shared by reversion and cutoff logic

mod dates;
mod align;

pub use dates::{
    date_to_t, t_to_date, month_offset, month_start, month_end, days_in_month,
    add_months, add_fractional_months, month_from_offset, fraction_of_month_before,
    parse_date, DAYS_IN_GENERIC_MONTH,
};
pub use align::{adjust_array_zero, Extend};
