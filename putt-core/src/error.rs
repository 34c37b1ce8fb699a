//! Error type shared by every engine operation.

use thiserror::Error;

use crate::simulation::PuttPhase;

#[derive(Error, Debug)]
pub enum PuttError {
    #[error("invalid input: {field} = {value} ({reason})")]
    InvalidInput {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("invalid hole distance: {0} ft (must be positive)")]
    InvalidDistance(f64),

    #[error("invalid physics configuration: {0}")]
    InvalidConfig(String),

    #[error("{0} table has no entries")]
    EmptyTable(&'static str),

    #[error("{0} table has no catch-all entry")]
    MissingCatchAll(&'static str),

    #[error("cannot start a putt while the session is {0:?}")]
    SessionBusy(PuttPhase),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("preset not found: {0}")]
    PresetNotFound(String),
}

impl PuttError {
    pub(crate) fn invalid(field: &'static str, value: f64, reason: &'static str) -> Self {
        PuttError::InvalidInput {
            field,
            value,
            reason,
        }
    }

    /// True for errors a caller fixes by changing its arguments and calling again.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            PuttError::InvalidInput { .. } | PuttError::InvalidDistance(_)
        )
    }
}
