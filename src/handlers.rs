//! Rule handlers: the functions conditional rules call by name.
//!
//! A [`HandlerRegistry`] is handed to each evaluation through the
//! [`Environment`](crate::Environment). Evaluating without a registry is the
//! "rules not initialized" state and hides nothing.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::{Inputs, Value};

/// A registered rule function.
pub type Handler = Arc<dyn Fn(&Inputs) -> Value + Send + Sync>;

/// Immutable name -> handler lookup.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Handler>,
}

/// Builder for a [`HandlerRegistry`].
#[derive(Default)]
pub struct HandlerRegistryBuilder {
    handlers: HashMap<String, Handler>,
}

impl HandlerRegistry {
    #[must_use]
    pub fn builder() -> HandlerRegistryBuilder {
        HandlerRegistryBuilder::default()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Handler> {
        self.handlers.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Call a handler by name. `None` if no handler is registered under `name`.
    #[must_use]
    pub fn call(&self, name: &str, inputs: &Inputs) -> Option<Value> {
        self.handlers.get(name).map(|h| h(inputs))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl HandlerRegistryBuilder {
    /// Register `f` under `name`, replacing any earlier handler of that name.
    #[must_use]
    pub fn handler<F, R>(mut self, name: &str, f: F) -> Self
    where
        F: Fn(&Inputs) -> R + Send + Sync + 'static,
        R: Into<Value>,
    {
        let handler: Handler = Arc::new(move |inputs: &Inputs| -> Value { f(inputs).into() });
        self.handlers.insert(name.to_owned(), handler);
        self
    }

    #[must_use]
    pub fn build(self) -> HandlerRegistry {
        HandlerRegistry {
            handlers: self.handlers,
        }
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("handlers", &self.names())
            .finish()
    }
}

impl fmt::Debug for HandlerRegistryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistryBuilder")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
