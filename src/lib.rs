//! Well Econ - ownership reversions and economic limits for oil & gas wells
//!
//! This library provides:
//! - Well input documents (dates, ownership, cut-off model, production)
//! - Ownership reversion detection (date, volume and money triggers)
//! - Same-month ownership blending when reversions fire mid-month
//! - Economic limit determination (date, rate and cash-flow policies)
//! - A reference monthly econ engine and parallel batch evaluation

pub mod error;
pub mod time;
pub mod well;
pub mod econ;
pub mod ownership;
pub mod cutoff;
pub mod evaluation;

#[cfg(test)]
mod testutil;

// Re-export commonly used types
pub use error::{CutOffError, EconError, ReversionError};
pub use well::{load_well_input, WellInput};
pub use econ::{EconCalculator, EconEngine, EconResult, WellResult};
pub use ownership::{final_ownership_and_reversion_dates, OwnershipParams, ReversionOutcome};
pub use cutoff::{cutoff_results, CutoffOutcome};
pub use evaluation::{SummaryRow, WellEvaluation, WellEvaluator};
