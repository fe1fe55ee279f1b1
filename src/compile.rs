use std::collections::{BTreeMap, HashSet};

use crate::types::{RepeatingGroupScope, Rule, RuleBuilder, RuleSet, Template};
use crate::ConfigError;

/// How strictly rule drafts are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Validation {
    /// A missing function or action is an error.
    Strict,
    /// A missing function becomes `""` and a missing or unknown action is
    /// kept as unknown. Both are reported when the rule is evaluated.
    Lenient,
}

pub(crate) fn compile(
    drafts: Vec<(String, RuleBuilder)>,
    validation: Validation,
) -> Result<RuleSet, ConfigError> {
    check_duplicates(&drafts)?;

    let mut rules = BTreeMap::new();
    for (key, draft) in drafts {
        let rule = compile_rule(&key, draft, validation)?;
        rules.insert(key, rule);
    }

    Ok(RuleSet { rules })
}

fn check_duplicates(drafts: &[(String, RuleBuilder)]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for (key, _) in drafts {
        if !seen.insert(key.as_str()) {
            return Err(ConfigError::DuplicateRule { key: key.clone() });
        }
    }
    Ok(())
}

fn compile_rule(
    key: &str,
    draft: RuleBuilder,
    validation: Validation,
) -> Result<Rule, ConfigError> {
    let lenient = validation == Validation::Lenient;
    let function = match draft.function {
        Some(f) if !f.is_empty() => f,
        other if lenient => other.unwrap_or_default(),
        _ => {
            return Err(ConfigError::MissingFunction {
                rule: key.to_owned(),
            })
        }
    };
    let action = match draft.action {
        Some(action) => Ok(action),
        None if lenient => Err(draft.unknown_action.unwrap_or_default()),
        None => {
            return Err(ConfigError::MissingAction {
                rule: key.to_owned(),
            })
        }
    };

    let inputs = compile_templates(key, draft.inputs)?;
    let outputs = compile_templates(key, draft.outputs)?;

    // An empty child group id means "no nested group", same as leaving it out.
    let scope = draft.group_id.map(|group_id| RepeatingGroupScope {
        group_id,
        child_group_id: draft.child_group_id.filter(|c| !c.is_empty()),
    });

    Ok(Rule {
        function,
        inputs,
        action,
        outputs,
        scope,
    })
}

fn compile_templates(
    key: &str,
    pairs: Vec<(String, String)>,
) -> Result<BTreeMap<String, Template>, ConfigError> {
    pairs
        .into_iter()
        .map(|(name, raw)| {
            Template::parse(&raw)
                .map(|template| (name, template))
                .map_err(|source| ConfigError::Template {
                    rule: key.to_owned(),
                    source,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{compile, Validation};
    use crate::types::RuleBuilder;
    use crate::{Action, ConfigError, RuleSetBuilder};

    #[test]
    fn compile_simple_rule() {
        let rules = RuleSetBuilder::new()
            .rule("r1", |r| {
                r.function("isTrue")
                    .input("value", "model.flag")
                    .show()
                    .target("out", "field")
            })
            .build()
            .unwrap();

        let rule = rules.get("r1").unwrap();
        assert_eq!(rule.function(), "isTrue");
        assert_eq!(rule.action(), Some(Action::Show));
        assert_eq!(rule.inputs().count(), 1);
        assert_eq!(rule.outputs().next().unwrap().1.as_str(), "field");
        assert!(rule.repeating_group().is_none());
    }

    #[test]
    fn compile_duplicate_rule() {
        let result = RuleSetBuilder::new()
            .rule("r1", |r| r.function("f").show())
            .rule("r1", |r| r.function("g").hide())
            .build();
        assert!(matches!(result, Err(ConfigError::DuplicateRule { key }) if key == "r1"));
    }

    #[test]
    fn compile_missing_function() {
        let result = RuleSetBuilder::new().rule("r1", |r| r.show()).build();
        assert!(matches!(result, Err(ConfigError::MissingFunction { .. })));

        let result = RuleSetBuilder::new()
            .rule("r1", |r| r.function("").show())
            .build();
        assert!(matches!(result, Err(ConfigError::MissingFunction { .. })));
    }

    #[test]
    fn compile_bad_template() {
        let result = RuleSetBuilder::new()
            .rule("r1", |r| {
                r.function("f")
                    .show()
                    .target("out", "field-{123456789012345678901234567890}")
            })
            .build();
        assert!(matches!(result, Err(ConfigError::Template { rule, .. }) if rule == "r1"));
    }

    #[test]
    fn compile_keeps_empty_key() {
        let rules = RuleSetBuilder::new()
            .rule("", |r| r.function("f").show())
            .build()
            .unwrap();
        assert!(rules.get("").is_some());
    }

    #[test]
    fn empty_child_group_is_dropped() {
        let rules = RuleSetBuilder::new()
            .rule("r1", |r| r.function("f").show().nested_group("outer", ""))
            .build()
            .unwrap();
        let scope = rules.get("r1").unwrap().repeating_group().unwrap();
        assert_eq!(scope.group_id, "outer");
        assert_eq!(scope.child_group_id, None);
    }

    #[test]
    fn lenient_keeps_incomplete_rules() {
        let drafts = vec![
            ("no_function".to_owned(), RuleBuilder::default().show()),
            ("empty_function".to_owned(), RuleBuilder::default().function("").hide()),
            (
                "unknown_action".to_owned(),
                RuleBuilder {
                    unknown_action: Some("show".into()),
                    ..RuleBuilder::default().function("f")
                },
            ),
            ("no_action".to_owned(), RuleBuilder::default().function("f")),
        ];
        let rules = compile(drafts, Validation::Lenient).unwrap();

        assert_eq!(rules.get("no_function").unwrap().function(), "");
        assert_eq!(rules.get("empty_function").unwrap().function(), "");
        let unknown = rules.get("unknown_action").unwrap();
        assert_eq!(unknown.action(), None);
        assert_eq!(unknown.unknown_action(), Some("show"));
        assert_eq!(rules.get("no_action").unwrap().unknown_action(), Some(""));
    }

    #[test]
    fn lenient_still_rejects_bad_templates() {
        let drafts = vec![(
            "r".to_owned(),
            RuleBuilder::default()
                .function("f")
                .show()
                .target("out", "x-{99999999999999999999999}"),
        )];
        assert!(matches!(
            compile(drafts, Validation::Lenient),
            Err(ConfigError::Template { .. })
        ));
    }
}
