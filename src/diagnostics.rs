use std::collections::BTreeSet;
use std::sync::{Mutex, PoisonError};

/// Fire-and-forget channel for configuration problems found while evaluating.
pub trait DiagnosticSink {
    fn report(&self, message: &str);
}

/// Logs each distinct message once, as a `tracing` warning.
#[derive(Debug, Default)]
pub struct LogOnce {
    seen: Mutex<BTreeSet<String>>,
}

impl LogOnce {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            seen: Mutex::new(BTreeSet::new()),
        }
    }

    /// Distinct messages reported so far, sorted.
    #[must_use]
    pub fn emitted(&self) -> Vec<String> {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    /// Forget all messages, so each will be logged again on its next report.
    pub fn reset(&self) {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl DiagnosticSink for LogOnce {
    fn report(&self, message: &str) {
        let first = self
            .seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(message.to_owned());
        if first {
            tracing::warn!("{message}");
        }
    }
}

/// Process-wide sink used when an [`Environment`](crate::Environment) is not
/// given one.
pub(crate) static GLOBAL_LOG_ONCE: LogOnce = LogOnce::new();
