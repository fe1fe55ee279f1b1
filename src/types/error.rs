use thiserror::Error;

use super::hidden::HiddenSet;

/// Errors produced when parsing or resolving a [`Template`](super::Template).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("placeholder {{{index}}} is out of range for a depth path of length {depth}")]
    DepthOutOfRange { index: usize, depth: usize },

    #[error("malformed template '{template}': {message}")]
    Malformed { template: String, message: String },
}

/// Errors produced while building or loading a [`RuleSet`](super::RuleSet).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("duplicate rule key '{key}'")]
    DuplicateRule { key: String },

    #[error("rule '{rule}' does not name a function")]
    MissingFunction { rule: String },

    #[error("rule '{rule}' does not select an action")]
    MissingAction { rule: String },

    #[error("invalid template in rule '{rule}': {source}")]
    Template {
        rule: String,
        #[source]
        source: TemplateError,
    },
}

/// Errors produced when writing into [`FormData`](crate::FormData).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormDataError {
    #[error("index {index} in field '{field}' exceeds the maximum array index {max}")]
    IndexTooLarge {
        field: String,
        index: usize,
        max: usize,
    },
}

/// Errors produced by the fixed-point loop in [`converge`](crate::converge).
#[derive(Debug, Error)]
pub enum ConvergenceError {
    #[error("hidden set did not stabilize after {iterations} passes; check rules for circular dependencies")]
    IterationCapReached { iterations: usize, last: HiddenSet },

    #[error("iteration cap must be at least 1")]
    ZeroIterationCap,
}
