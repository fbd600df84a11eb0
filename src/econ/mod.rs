//! Monthly econ calculation
//!
//! Reversion triggers and cutoff policies call back into an econ calculator to
//! price a well under a given ownership. [`EconCalculator`] is that seam;
//! [`EconEngine`] is the calculator shipped with the crate, and any closure of
//! the right shape works as a stub in tests.

mod types;
mod engine;
pub mod discount;
pub mod irr;

pub use types::{CapexEntry, EconResult, EconSummary, ExpenseLine, Phase, VolumeSeries, WellResult};
pub use engine::{EconEngine, EngineConfig};
pub use discount::{CashAccrualTime, DiscountMethod, DiscountTable};
pub use irr::calculate_irr;

use crate::error::EconError;
use crate::well::WellInput;

/// Prices a well for the ownership carried in `well_result`
pub trait EconCalculator {
    fn calculate(&self, well_input: &WellInput, well_result: &WellResult) -> Result<EconResult, EconError>;
}

impl<F> EconCalculator for F
where
    F: Fn(&WellInput, &WellResult) -> Result<EconResult, EconError>,
{
    fn calculate(&self, well_input: &WellInput, well_result: &WellResult) -> Result<EconResult, EconError> {
        self(well_input, well_result)
    }
}
