//! Re-evaluation until the hidden set stops changing.
//!
//! Hiding a component can change the data other rules read, so a single pass
//! is not always final. [`converge`] reruns a pass, feeding each result back,
//! until two consecutive passes agree. Rules whose visibility feeds back into
//! their own inputs may never agree; the iteration cap turns that into a
//! [`ConvergenceError`] instead of an endless loop.

use crate::{ConvergenceError, Environment, HiddenSet};

/// Result of a successful fixed-point run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct Converged {
    hidden: HiddenSet,
    iterations: usize,
}

impl Converged {
    /// The stable hidden set.
    pub fn hidden(&self) -> &HiddenSet {
        &self.hidden
    }

    pub fn into_hidden(self) -> HiddenSet {
        self.hidden
    }

    /// Passes run, including the final one that confirmed stability.
    #[must_use]
    pub fn iterations(&self) -> usize {
        self.iterations
    }
}

/// State that reacts to visibility changes and can be evaluated again.
///
/// Used by [`RuleSet::evaluate_until_stable`](crate::RuleSet::evaluate_until_stable).
pub trait VisibilityHost {
    /// Apply the previous pass's result, e.g. clear data behind hidden components.
    /// The first pass receives an empty set.
    fn apply_hidden(&mut self, hidden: &HiddenSet);

    /// Collaborators for the next pass, reflecting the applied state.
    fn environment(&self) -> Environment<'_>;
}

/// Run `step` until it returns the same set it was given.
///
/// `step` receives the previous result (empty on the first call) and returns
/// the next one.
///
/// # Errors
///
/// [`ConvergenceError::ZeroIterationCap`] if `max_iterations` is zero;
/// [`ConvergenceError::IterationCapReached`] with the last result if the set
/// is still changing after `max_iterations` calls.
pub fn converge<F>(max_iterations: usize, mut step: F) -> Result<Converged, ConvergenceError>
where
    F: FnMut(&HiddenSet) -> HiddenSet,
{
    if max_iterations == 0 {
        return Err(ConvergenceError::ZeroIterationCap);
    }

    let mut previous = HiddenSet::new();
    for iteration in 1..=max_iterations {
        let next = step(&previous);
        if next == previous {
            tracing::debug!(iterations = iteration, hidden = next.len(), "hidden set stable");
            return Ok(Converged {
                hidden: next,
                iterations: iteration,
            });
        }
        previous = next;
    }

    tracing::warn!(
        iterations = max_iterations,
        "hidden set did not stabilize, rules may depend on each other in a cycle"
    );
    Err(ConvergenceError::IterationCapReached {
        iterations: max_iterations,
        last: previous,
    })
}
