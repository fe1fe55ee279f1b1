use thiserror::Error;

use crate::{ConfigError, ConvergenceError, FormDataError};

/// Unified error type covering rule loading, I/O, and convergence.
///
/// Returned by convenience methods like [`RuleSet::from_json()`](crate::RuleSet::from_json)
/// and [`RuleSet::from_file()`](crate::RuleSet::from_file).
#[derive(Debug, Error)]
pub enum FormDynamicsError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid rule configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Convergence(#[from] ConvergenceError),

    #[error(transparent)]
    FormData(#[from] FormDataError),
}
