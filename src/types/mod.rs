mod error;
mod evaluation_report;
mod hidden;
mod key;
mod node;
mod reference;
mod rule;
mod ruleset;
mod template;
mod value;

pub use error::{ConfigError, ConvergenceError, FormDataError, TemplateError};
pub use evaluation_report::{EvaluationReport, Skip, SkipReason};
pub use hidden::HiddenSet;
pub use key::ComponentKey;
pub use node::{Node, NodeKind, Row, RowParent};
pub use reference::DataReference;
pub(crate) use reference::{join_path, split_path};
pub use rule::{Action, RepeatingGroupScope, Rule};
pub use ruleset::{RuleBuilder, RuleSet, RuleSetBuilder};
pub use template::{Segment, Template};
pub use value::{Inputs, Value};
