use std::time::Instant;

use crate::types::{ComponentKey, RepeatingGroupScope, Rule, Skip, SkipReason};
use crate::{
    DataReference, Environment, EvaluationReport, HandlerRegistry, HiddenSet, Inputs, Node,
    NodeTraversal, RuleSet, Value,
};

pub(crate) fn evaluate(rules: &RuleSet, env: &Environment<'_>) -> HiddenSet {
    let mut pass = Pass::new(env);
    pass.run(rules);
    pass.hidden
}

pub(crate) fn evaluate_detailed(rules: &RuleSet, env: &Environment<'_>) -> EvaluationReport {
    let start = Instant::now();
    let mut pass = Pass::new(env);
    pass.run(rules);
    EvaluationReport::new(pass.hidden, pass.invocations, pass.skipped, start.elapsed())
}

/// State of one evaluation pass. Nothing here outlives the pass.
struct Pass<'e, 'a> {
    env: &'e Environment<'a>,
    hidden: HiddenSet,
    invocations: usize,
    skipped: Vec<Skip>,
}

impl<'e, 'a> Pass<'e, 'a> {
    fn new(env: &'e Environment<'a>) -> Self {
        Self {
            env,
            hidden: HiddenSet::new(),
            invocations: 0,
            skipped: Vec::new(),
        }
    }

    fn run(&mut self, rules: &RuleSet) {
        let Some(handlers) = self.env.handlers() else {
            tracing::debug!("no handler registry, conditional rules not initialized");
            return;
        };
        if rules.is_empty() {
            return;
        }

        let _span = tracing::debug_span!("evaluate_rules", rules = rules.len()).entered();
        let traversal = self.env.traversal();
        let top_level = traversal.top_level();

        for (key, rule) in rules.iter() {
            if key.is_empty() {
                self.skip(key, None, SkipReason::EmptyKey);
                continue;
            }
            match rule.repeating_group() {
                None => self.run_rule(key, rule, handlers, top_level),
                Some(scope) => self.run_scoped(key, rule, handlers, scope, traversal),
            }
        }

        tracing::debug!(
            hidden = self.hidden.len(),
            invocations = self.invocations,
            skipped = self.skipped.len(),
            "evaluation pass complete"
        );
    }

    fn run_scoped(
        &mut self,
        key: &str,
        rule: &Rule,
        handlers: &HandlerRegistry,
        scope: &RepeatingGroupScope,
        traversal: &'a dyn NodeTraversal,
    ) {
        let group_id = scope.group_id.as_str();
        let Some(group) = traversal.find_by_id(group_id) else {
            self.skip(
                key,
                None,
                SkipReason::GroupNotFound {
                    group_id: group_id.to_owned(),
                },
            );
            return;
        };
        if !group.is_repeating_group() {
            self.skip(
                key,
                None,
                SkipReason::NotARepeatingGroup {
                    group_id: group_id.to_owned(),
                },
            );
            return;
        }

        for first in first_items(traversal, group) {
            let Some(child_group_id) = scope.child_group_id.as_deref() else {
                self.run_rule(key, rule, handlers, Some(first));
                continue;
            };

            // One level of nesting only: the nested group's rows are not
            // searched for further groups.
            let Some(row) = first.row_index() else {
                self.skip(
                    key,
                    Some(first),
                    SkipReason::NestedGroupNotFound {
                        child_id: child_group_id.to_owned(),
                    },
                );
                continue;
            };
            let child_id = format!("{child_group_id}-{row}");
            match traversal.find_by_id(&child_id) {
                Some(child) if child.is_repeating_group() => {
                    for nested in first_items(traversal, child) {
                        self.run_rule(key, rule, handlers, Some(nested));
                    }
                }
                _ => self.skip(
                    key,
                    Some(first),
                    SkipReason::NestedGroupNotFound { child_id },
                ),
            }
        }
    }

    fn run_rule(&mut self, key: &str, rule: &Rule, handlers: &HandlerRegistry, target: Option<&Node>) {
        let Some(action) = rule.action() else {
            let action = rule.unknown_action().unwrap_or_default();
            self.env.diagnostics().report(&format!(
                "Conditional rule '{key}' has unknown action '{action}', it will never hide anything."
            ));
            self.skip(
                key,
                target,
                SkipReason::UnknownAction {
                    action: action.to_owned(),
                },
            );
            return;
        };
        let inputs = self.collect_inputs(rule, target);

        let Some(handler) = handlers.get(rule.function()) else {
            self.env.diagnostics().report(&format!(
                "Conditional rule function '{}' not found, rules referencing this function will not run.",
                rule.function()
            ));
            self.skip(
                key,
                target,
                SkipReason::HandlerNotFound {
                    function: rule.function().to_owned(),
                },
            );
            return;
        };

        self.invocations += 1;
        let result = handler(&inputs);
        let hide = action.hides(result.is_truthy());
        tracing::trace!(
            rule = key,
            target = target.map(Node::id),
            %result,
            hide,
            "rule evaluated"
        );
        if !hide {
            return;
        }

        let component = ComponentKey::parse(target.map_or("", Node::id));
        for (output, template) in rule.outputs() {
            if output.is_empty() {
                continue;
            }
            match template.resolve(component.depth()) {
                Ok(id) => {
                    self.hidden.insert(id);
                }
                Err(error) => {
                    self.env.diagnostics().report(&format!(
                        "Conditional rule '{key}' cannot resolve target '{template}' for component '{component}': {error}"
                    ));
                    self.skip(
                        key,
                        target,
                        SkipReason::UnresolvedTarget {
                            template: template.to_string(),
                            error,
                        },
                    );
                }
            }
        }
    }

    fn collect_inputs(&self, rule: &Rule, target: Option<&Node>) -> Inputs {
        let mut inputs = Inputs::new();
        for (name, template) in rule.inputs() {
            let reference = DataReference::new(self.env.default_data_type(), template.strip());
            let reference = target
                .and_then(|node| self.env.transposer().transpose(node, &reference))
                .unwrap_or(reference);
            let value = self
                .env
                .form_data()
                .select(&reference)
                .map_or(Value::Null, |raw| Value::from_json(&raw));
            inputs.insert(name, value);
        }
        inputs
    }

    fn skip(&mut self, key: &str, target: Option<&Node>, reason: SkipReason) {
        tracing::trace!(rule = key, %reason, "rule skipped");
        self.skipped.push(Skip {
            rule: key.to_owned(),
            target: target.map(|n| n.id().to_owned()),
            reason,
        });
    }
}

/// The first item of every row, skipping empty rows and ids not in the tree.
fn first_items<'t>(traversal: &'t dyn NodeTraversal, group: &Node) -> Vec<&'t Node> {
    group
        .rows()
        .unwrap_or_default()
        .iter()
        .filter_map(|row| row.first_item())
        .filter_map(|id| traversal.find_by_id(id))
        .collect()
}
