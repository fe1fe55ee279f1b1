use std::collections::BTreeMap;
use std::fmt;

use super::error::{ConfigError, ConvergenceError};
use super::evaluation_report::EvaluationReport;
use super::hidden::HiddenSet;
use super::rule::{Action, Rule};
use crate::converge::{Converged, VisibilityHost};
use crate::Environment;

/// Builder for constructing a [`RuleSet`].
///
/// Each rule is described in a closure and validated when the set is built.
///
/// # Example
///
/// ```
/// use form_dynamics::RuleSetBuilder;
///
/// let rules = RuleSetBuilder::new()
///     .rule("hide_spouse", |r| {
///         r.function("isMarried")
///             .input("status", "person.maritalStatus")
///             .show()
///             .target("spouse", "spouse-name")
///     })
///     .build()
///     .unwrap();
/// assert_eq!(rules.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct RuleSetBuilder {
    drafts: Vec<(String, RuleBuilder)>,
}

/// Intermediate builder passed to the rule definition closure.
#[derive(Debug, Default)]
pub struct RuleBuilder {
    pub(crate) function: Option<String>,
    pub(crate) action: Option<Action>,
    /// Action name from a loaded configuration that is neither `Show` nor `Hide`.
    pub(crate) unknown_action: Option<String>,
    pub(crate) inputs: Vec<(String, String)>,
    pub(crate) outputs: Vec<(String, String)>,
    pub(crate) group_id: Option<String>,
    pub(crate) child_group_id: Option<String>,
}

impl RuleSetBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a rule under `key`. The closure must name a function and an action.
    #[must_use]
    pub fn rule(mut self, key: &str, f: impl FnOnce(RuleBuilder) -> RuleBuilder) -> Self {
        let draft = f(RuleBuilder::default());
        self.drafts.push((key.to_owned(), draft));
        self
    }

    /// Validate the rules and parse their templates.
    ///
    /// Unlike the JSON loaders, which keep incomplete rules and skip them at
    /// evaluation, every rule built here must name a function and an action.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on duplicate keys, missing function or action,
    /// or an unparseable template.
    pub fn build(self) -> Result<RuleSet, ConfigError> {
        crate::compile::compile(self.drafts, crate::compile::Validation::Strict)
    }
}

impl RuleBuilder {
    /// Name of the handler the rule calls.
    #[must_use]
    pub fn function(mut self, name: &str) -> Self {
        self.function = Some(name.to_owned());
        self
    }

    /// Bind handler parameter `name` to a field path template.
    #[must_use]
    pub fn input(mut self, name: &str, field: &str) -> Self {
        self.inputs.push((name.to_owned(), field.to_owned()));
        self
    }

    #[must_use]
    pub fn action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    #[must_use]
    pub fn show(self) -> Self {
        self.action(Action::Show)
    }

    #[must_use]
    pub fn hide(self) -> Self {
        self.action(Action::Hide)
    }

    /// Add a component id template the rule acts on.
    #[must_use]
    pub fn target(mut self, key: &str, id: &str) -> Self {
        self.outputs.push((key.to_owned(), id.to_owned()));
        self
    }

    /// Apply the rule once per row of a repeating group.
    #[must_use]
    pub fn repeating_group(mut self, group_id: &str) -> Self {
        self.group_id = Some(group_id.to_owned());
        self
    }

    /// Apply the rule once per row of a group nested inside each row of `group_id`.
    #[must_use]
    pub fn nested_group(mut self, group_id: &str, child_group_id: &str) -> Self {
        self.group_id = Some(group_id.to_owned());
        self.child_group_id = Some(child_group_id.to_owned());
        self
    }
}

/// A validated, immutable set of conditional rendering rules keyed by rule key.
///
/// Evaluation takes `&self`, so a set can be shared behind `Arc`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    pub(crate) rules: BTreeMap<String, Rule>,
}

impl RuleSet {
    /// An empty rule set; evaluates to an empty [`HiddenSet`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute the ids to hide for the data and layout in `env`.
    ///
    /// Never fails: missing groups, missing handlers and unresolvable targets
    /// skip the affected rule.
    pub fn evaluate(&self, env: &Environment<'_>) -> HiddenSet {
        crate::evaluate::evaluate(self, env)
    }

    /// Same pass as [`evaluate()`](Self::evaluate), also reporting handler
    /// invocations, skipped rules and timing.
    pub fn evaluate_detailed(&self, env: &Environment<'_>) -> EvaluationReport {
        crate::evaluate::evaluate_detailed(self, env)
    }

    /// Evaluate repeatedly, feeding each pass's result back into `host`,
    /// until the hidden set stops changing.
    ///
    /// # Errors
    ///
    /// Returns [`ConvergenceError`] if `max_iterations` is zero or the set is
    /// still changing after `max_iterations` passes.
    pub fn evaluate_until_stable<H: VisibilityHost>(
        &self,
        host: &mut H,
        max_iterations: usize,
    ) -> Result<Converged, ConvergenceError> {
        crate::converge::converge(max_iterations, |previous| {
            host.apply_hidden(previous);
            self.evaluate(&host.environment())
        })
    }

    /// Parse a JSON object of rules keyed by rule key.
    ///
    /// A rule with an empty or missing function, or an action other than
    /// `Show`/`Hide`, is kept and skipped when evaluated; the other rules load
    /// normally.
    ///
    /// # Errors
    ///
    /// Returns [`FormDynamicsError`](crate::FormDynamicsError) on malformed JSON
    /// or an unparseable template.
    pub fn from_json(input: &str) -> Result<Self, crate::FormDynamicsError> {
        crate::config::rules_from_json(input)
    }

    /// Parse a rule configuration document, reading the rules under
    /// `data.conditionalRendering`. Incomplete rules are handled as in
    /// [`from_json()`](Self::from_json).
    ///
    /// # Errors
    ///
    /// Returns [`FormDynamicsError`](crate::FormDynamicsError) on malformed JSON
    /// or an unparseable template.
    pub fn from_rule_configuration(input: &str) -> Result<Self, crate::FormDynamicsError> {
        crate::config::rules_from_configuration(input)
    }

    /// Read a rule configuration document from disk.
    ///
    /// # Errors
    ///
    /// Returns [`FormDynamicsError`](crate::FormDynamicsError) on I/O failure,
    /// malformed JSON or an unparseable template.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, crate::FormDynamicsError> {
        let input = std::fs::read_to_string(path)?;
        Self::from_rule_configuration(&input)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Rule> {
        self.rules.get(key)
    }

    /// Rules in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Rule)> {
        self.rules.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Names of all handlers referenced by the rules, deduplicated and sorted.
    #[must_use]
    pub fn functions(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.values().map(Rule::function).collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scoped = self
            .rules
            .values()
            .filter(|r| r.repeating_group().is_some())
            .count();
        write!(
            f,
            "RuleSet({} rules, {} in repeating groups, {} functions)",
            self.rules.len(),
            scoped,
            self.functions().len(),
        )
    }
}
