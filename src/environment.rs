use std::fmt;

use crate::diagnostics::{DiagnosticSink, GLOBAL_LOG_ONCE};
use crate::{EvaluatorConfig, FormDataSource, HandlerRegistry, LayoutTree, NodeTraversal, Transpose};

/// Everything one evaluation pass reads: handlers, component tree, form data,
/// the data type input paths refer to, and where diagnostics go.
///
/// # Example
///
/// ```
/// use form_dynamics::{Environment, FormData, HandlerRegistry, LayoutTree, Node};
///
/// let layout = LayoutTree::builder().node(Node::component("title", "Header")).build();
/// let data = FormData::new();
/// let handlers = HandlerRegistry::builder().build();
///
/// let env = Environment::for_layout(&layout, &data)
///     .with_handlers(&handlers)
///     .with_default_data_type("model");
/// assert_eq!(env.default_data_type(), "model");
/// ```
#[derive(Clone, Copy)]
pub struct Environment<'a> {
    handlers: Option<&'a HandlerRegistry>,
    traversal: &'a dyn NodeTraversal,
    transpose: &'a dyn Transpose,
    form_data: &'a dyn FormDataSource,
    diagnostics: &'a dyn DiagnosticSink,
    default_data_type: &'a str,
}

impl<'a> Environment<'a> {
    /// An environment without handlers, reporting to the process-wide
    /// [`LogOnce`](crate::LogOnce) sink.
    #[must_use]
    pub fn new(
        traversal: &'a dyn NodeTraversal,
        transpose: &'a dyn Transpose,
        form_data: &'a dyn FormDataSource,
    ) -> Self {
        Self {
            handlers: None,
            traversal,
            transpose,
            form_data,
            diagnostics: &GLOBAL_LOG_ONCE,
            default_data_type: "",
        }
    }

    /// Use `layout` for both traversal and transposition.
    #[must_use]
    pub fn for_layout(layout: &'a LayoutTree, form_data: &'a dyn FormDataSource) -> Self {
        Self::new(layout, layout, form_data)
    }

    #[must_use]
    pub fn with_handlers(mut self, handlers: &'a HandlerRegistry) -> Self {
        self.handlers = Some(handlers);
        self
    }

    #[must_use]
    pub fn with_default_data_type(mut self, data_type: &'a str) -> Self {
        self.default_data_type = data_type;
        self
    }

    #[must_use]
    pub fn with_diagnostics(mut self, sink: &'a dyn DiagnosticSink) -> Self {
        self.diagnostics = sink;
        self
    }

    /// Apply the settings from an [`EvaluatorConfig`].
    #[must_use]
    pub fn with_config(self, config: &'a EvaluatorConfig) -> Self {
        self.with_default_data_type(&config.default_data_type)
    }

    #[must_use]
    pub fn handlers(&self) -> Option<&'a HandlerRegistry> {
        self.handlers
    }

    #[must_use]
    pub fn traversal(&self) -> &'a dyn NodeTraversal {
        self.traversal
    }

    #[must_use]
    pub fn transposer(&self) -> &'a dyn Transpose {
        self.transpose
    }

    #[must_use]
    pub fn form_data(&self) -> &'a dyn FormDataSource {
        self.form_data
    }

    #[must_use]
    pub fn diagnostics(&self) -> &'a dyn DiagnosticSink {
        self.diagnostics
    }

    #[must_use]
    pub fn default_data_type(&self) -> &'a str {
        self.default_data_type
    }
}

impl fmt::Debug for Environment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("handlers", &self.handlers)
            .field("default_data_type", &self.default_data_type)
            .finish_non_exhaustive()
    }
}
