//! Economic limit (cutoff) determination
//!
//! - `model`: the cut-off document and its active criterion
//! - `policies`: date, rate and cash-flow policies
//! - `adjust`: clamping to the well's dates and the minimum cutoff
//! - `orchestrator`: `cutoff_results`, the entry point for one well

mod model;
mod policies;
mod adjust;
mod orchestrator;

pub use model::{get_cut_off_key, CutOffCriterion, CutOffKey, CutOffModel, DateCutOff, MinCutOff, RatePhase};
pub use policies::{
    apply_date_cutoff, apply_rate_cutoff, cf_after_expense_deduction, get_first_negative_with_tolerance,
    get_last_positive_cash_flow, get_max_cum_cash_flow,
};
pub use adjust::{adjust_cutoff, apply_min_cut_off, if_cf_cutoff_unecon};
pub use orchestrator::{cutoff_results, CutoffOutcome};
