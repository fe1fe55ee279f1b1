use std::fmt;
use std::time::Duration;

use super::error::TemplateError;
use super::hidden::HiddenSet;

/// Why a rule, or one target of a rule, contributed nothing to a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    EmptyKey,
    GroupNotFound { group_id: String },
    NotARepeatingGroup { group_id: String },
    /// The representative of an outer row has no row index, or the nested
    /// group id computed from it does not name a repeating group.
    NestedGroupNotFound { child_id: String },
    HandlerNotFound { function: String },
    /// The rule's action is neither `Show` nor `Hide`, so it never hides.
    UnknownAction { action: String },
    UnresolvedTarget { template: String, error: TemplateError },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::EmptyKey => write!(f, "empty rule key"),
            SkipReason::GroupNotFound { group_id } => {
                write!(f, "group '{group_id}' not found")
            }
            SkipReason::NotARepeatingGroup { group_id } => {
                write!(f, "'{group_id}' is not a repeating group")
            }
            SkipReason::NestedGroupNotFound { child_id } => {
                write!(f, "nested group '{child_id}' not found")
            }
            SkipReason::HandlerNotFound { function } => {
                write!(f, "function '{function}' not found")
            }
            SkipReason::UnknownAction { action } => {
                write!(f, "unknown action '{action}'")
            }
            SkipReason::UnresolvedTarget { template, error } => {
                write!(f, "target '{template}' unresolved: {error}")
            }
        }
    }
}

/// A skipped rule, with the node it was being applied to, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skip {
    pub rule: String,
    pub target: Option<String>,
    pub reason: SkipReason,
}

/// Detailed result of
/// [`RuleSet::evaluate_detailed()`](super::ruleset::RuleSet::evaluate_detailed).
#[derive(Debug, Clone)]
#[must_use]
pub struct EvaluationReport {
    hidden: HiddenSet,
    invocations: usize,
    skipped: Vec<Skip>,
    duration: Duration,
}

impl EvaluationReport {
    pub(crate) fn new(
        hidden: HiddenSet,
        invocations: usize,
        skipped: Vec<Skip>,
        duration: Duration,
    ) -> Self {
        Self {
            hidden,
            invocations,
            skipped,
            duration,
        }
    }

    /// The hidden set, same as [`RuleSet::evaluate()`](super::ruleset::RuleSet::evaluate).
    pub fn hidden(&self) -> &HiddenSet {
        &self.hidden
    }

    pub fn into_hidden(self) -> HiddenSet {
        self.hidden
    }

    /// Number of handler calls made during the pass.
    #[must_use]
    pub fn invocations(&self) -> usize {
        self.invocations
    }

    /// Rules and rule/target pairs that were skipped, in evaluation order.
    #[must_use]
    pub fn skipped(&self) -> &[Skip] {
        &self.skipped
    }

    /// Wall-clock duration of the pass.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hidden: {}", self.hidden)?;
        write!(f, ", invocations: {}", self.invocations)?;
        write!(f, ", skipped: {}", self.skipped.len())?;
        write!(f, ", duration: {:?}", self.duration)?;
        Ok(())
    }
}
