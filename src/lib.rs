//! Conditional visibility rules for schema-driven forms.
//!
//! A [`RuleSet`] maps rule keys to rules that call a named handler with
//! values read from form data and, depending on the result, hide components.
//! [`RuleSet::evaluate`] runs every rule once against an [`Environment`] and
//! returns the [`HiddenSet`]; [`converge`] reruns that pass until it is stable.

mod compile;
mod config;
mod converge;
mod diagnostics;
mod environment;
mod error;
mod evaluate;
mod form_data;
mod handlers;
mod layout;
mod types;

pub use config::{EvaluatorConfig, DEFAULT_MAX_ITERATIONS};
pub use converge::{converge, Converged, VisibilityHost};
pub use diagnostics::{DiagnosticSink, LogOnce};
pub use environment::Environment;
pub use error::FormDynamicsError;
pub use form_data::{FormData, FormDataSource};
pub use handlers::{Handler, HandlerRegistry, HandlerRegistryBuilder};
pub use layout::{LayoutTree, LayoutTreeBuilder, NoTranspose, NodeTraversal, Transpose};
pub use types::{
    Action, ComponentKey, ConfigError, ConvergenceError, DataReference, EvaluationReport,
    FormDataError, HiddenSet, Inputs, Node, NodeKind, RepeatingGroupScope, Row, RowParent, Rule,
    RuleBuilder, RuleSet, RuleSetBuilder, Segment, Skip, SkipReason, Template, TemplateError,
    Value,
};
