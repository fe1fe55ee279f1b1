use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::template::Template;

/// What a rule does to its targets when its handler returns a truthy value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Targets are visible only while the handler result is truthy.
    Show,
    /// Targets are hidden while the handler result is truthy.
    Hide,
}

impl Action {
    /// Whether the targets end up hidden for a handler result of the given truthiness.
    #[must_use]
    pub fn hides(self, truthy: bool) -> bool {
        match self {
            Action::Show => !truthy,
            Action::Hide => truthy,
        }
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Show" => Ok(Action::Show),
            "Hide" => Ok(Action::Hide),
            other => Err(other.to_owned()),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Show => write!(f, "Show"),
            Action::Hide => write!(f, "Hide"),
        }
    }
}

/// Restricts a rule to the rows of a repeating group, and optionally to the
/// rows of a group nested one level inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepeatingGroupScope {
    pub group_id: String,
    /// Base id of the nested group; the concrete id per outer row is
    /// `"{child_group_id}-{row_index}"`.
    pub child_group_id: Option<String>,
}

/// A conditional rendering rule.
///
/// Built with [`RuleSetBuilder`](super::RuleSetBuilder) or loaded from JSON via
/// [`RuleSet::from_json()`](super::RuleSet::from_json).
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub(crate) function: String,
    pub(crate) inputs: BTreeMap<String, Template>,
    /// `Err` holds an action name that is neither `Show` nor `Hide`.
    pub(crate) action: Result<Action, String>,
    pub(crate) outputs: BTreeMap<String, Template>,
    pub(crate) scope: Option<RepeatingGroupScope>,
}

impl Rule {
    /// Name of the handler to call.
    #[must_use]
    pub fn function(&self) -> &str {
        &self.function
    }

    /// Handler parameter name -> field path template.
    pub fn inputs(&self) -> impl Iterator<Item = (&str, &Template)> {
        self.inputs.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// `None` if the rule was loaded with an unrecognised action; such a
    /// rule never hides anything.
    #[must_use]
    pub fn action(&self) -> Option<Action> {
        self.action.as_ref().ok().copied()
    }

    /// The action name as loaded, when it was not recognised.
    #[must_use]
    pub fn unknown_action(&self) -> Option<&str> {
        self.action.as_ref().err().map(String::as_str)
    }

    /// Output key -> target component id template.
    pub fn outputs(&self) -> impl Iterator<Item = (&str, &Template)> {
        self.outputs.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn repeating_group(&self) -> Option<&RepeatingGroupScope> {
        self.scope.as_ref()
    }
}
