//! Error types for reversion, cutoff and econ evaluation
//!
//! Every variant here describes bad input data rather than a transient failure,
//! so nothing in the crate retries. Callers running many wells log the well id
//! and move on.

use thiserror::Error;

/// Malformed ownership reversion clause
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReversionError {
    #[error("reversion clause has no recognized reversion type key")]
    MissingKey,

    #[error("reversion clause has more than one reversion type key: {0:?}")]
    AmbiguousKey(Vec<String>),

    #[error("cannot identify volume phase from reversion key: {0}")]
    UnknownPhase(String),

    #[error("reversion anchored to {0} but the well has no such date")]
    MissingAnchorDate(&'static str),

    #[error("invalid value for reversion field {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Malformed cut-off model
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CutOffError {
    #[error("cut-off model has no recognized cut-off key")]
    MissingKey,

    #[error("cut-off model has more than one cut-off key: {0:?}")]
    AmbiguousKey(Vec<String>),

    #[error("invalid date cut-off option: {0}")]
    InvalidDateOption(String),

    #[error("invalid minimum cut-off option: {0}")]
    InvalidMinCutOff(String),

    #[error("invalid value for cut-off field {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Top-level error for a well evaluation
#[derive(Error, Debug)]
pub enum EconError {
    #[error(transparent)]
    Reversion(#[from] ReversionError),

    #[error(transparent)]
    CutOff(#[from] CutOffError),

    #[error("econ calculation failed: {0}")]
    Calculation(String),

    #[error("invalid well input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EconError {
    /// Whether this is a data-validation failure to surface to the user
    /// rather than a crash.
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            EconError::Reversion(_) | EconError::CutOff(_) | EconError::InvalidInput(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, EconError>;
