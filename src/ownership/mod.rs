//! Ownership interests and contractual reversions
//!
//! - `clause`: ownership documents and reversion clause parsing
//! - `params`: the time-indexed ownership store
//! - `triggers`: when a reversion fires
//! - `transition`: how a fired reversion changes the store
//! - `reversion`: walking a well's clauses in order

mod clause;
mod params;
mod triggers;
mod transition;
mod reversion;

pub use clause::{
    get_reversion_key, parse_reversion, parse_reversions, volume_phase, Balance, DateAnchor, DateTrigger,
    InterestTerms, MoneyMetric, OwnershipModel, OwnershipTerms, ReversionClause, ReversionKey, ReversionTrigger,
    TiedTo, VolumePhase,
};
pub use params::{
    get_initial_ownership_params, get_phase_ownership_value, InterestPair, NpiType, OwnershipParams,
    OwnershipPhase, OwnershipState, OwnershipValues, PhaseOwnership,
};
pub use triggers::{
    apply_date_reversion, apply_money_reversion, apply_volume_reversion, first_crossing, money_reversion_econ_result,
    resolve_reversion_date, volume_reversion_econ_result, TriggerOutcome,
};
pub use transition::{
    apply_multi_reversion, apply_single_reversion, get_new_ownership_outputs, multiple_reversions_in_month,
    same_month_weights, single_reversion_in_month, ReversionDetail,
};
pub use reversion::{earliest_tied_to_date, final_ownership_and_reversion_dates, ReversionOutcome};
