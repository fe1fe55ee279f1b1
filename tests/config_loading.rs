use form_dynamics::{
    Action, ConfigError, Environment, EvaluationReport, EvaluatorConfig, FormData,
    FormDynamicsError, HandlerRegistry, Inputs, LayoutTree, LogOnce, Node, Row, RuleSet,
    RuleSetBuilder, SkipReason, TemplateError,
};
use serde_json::json;

const CONFIGURATION: &str = r#"{
  "data": {
    "conditionalRendering": {
      "hideSpouse": {
        "selectedFunction": "isMarried",
        "inputParams": { "status": "maritalStatus" },
        "selectedAction": "Show",
        "selectedFields": { "a": "spouse-name", "b": "spouse-age" }
      },
      "hideMinorJobs": {
        "selectedFunction": "isAdult",
        "inputParams": { "age": "people.age" },
        "selectedAction": "Show",
        "selectedFields": { "a": "job-{0}" },
        "repeatingGroup": { "groupId": "people" }
      }
    }
  }
}"#;

fn layout() -> LayoutTree {
    LayoutTree::builder()
        .node(Node::component("spouse-name", "Input"))
        .node(Node::component("spouse-age", "Input"))
        .node(
            Node::repeating_group(
                "people",
                vec![Row::new(0, ["job-0"]), Row::new(1, ["job-1"])],
            )
            .with_binding("people"),
        )
        .node(Node::component("job-0", "Input"))
        .node(Node::component("job-1", "Input"))
        .build()
}

fn handlers() -> HandlerRegistry {
    HandlerRegistry::builder()
        .handler("isMarried", |i: &Inputs| {
            i.get("status").as_str() == Some("married")
        })
        .handler("isAdult", |i: &Inputs| {
            i.get("age").as_f64().is_some_and(|a| a >= 18.0)
        })
        .build()
}

#[test]
fn load_and_evaluate_configuration() {
    let rules = RuleSet::from_rule_configuration(CONFIGURATION).unwrap();
    assert_eq!(rules.len(), 2);
    assert_eq!(rules.functions(), vec!["isAdult", "isMarried"]);

    let scoped = rules.get("hideMinorJobs").unwrap();
    assert_eq!(scoped.action(), Some(Action::Show));
    assert_eq!(scoped.repeating_group().unwrap().group_id, "people");
    assert_eq!(scoped.repeating_group().unwrap().child_group_id, None);

    let layout = layout();
    let data = FormData::new().with_model(
        "model",
        json!({ "maritalStatus": "single", "people": [{ "age": 30 }, { "age": 9 }] }),
    );
    let handlers = handlers();
    let config = EvaluatorConfig::from_json(r#"{ "defaultDataType": "model" }"#).unwrap();
    let env = Environment::for_layout(&layout, &data)
        .with_handlers(&handlers)
        .with_config(&config);

    assert_eq!(
        rules.evaluate(&env),
        ["spouse-name", "spouse-age", "job-1"].into_iter().collect()
    );
}

#[test]
fn bare_rule_map() {
    let rules = RuleSet::from_json(
        r#"{ "r": { "selectedFunction": "f", "selectedAction": "Hide", "selectedFields": { "a": "x" } } }"#,
    )
    .unwrap();
    assert_eq!(rules.get("r").unwrap().action(), Some(Action::Hide));
    assert_eq!(rules.get("r").unwrap().inputs().count(), 0);
}

#[test]
fn missing_conditional_rendering_is_empty() {
    assert!(RuleSet::from_rule_configuration(r#"{ "data": {} }"#)
        .unwrap()
        .is_empty());
    assert!(RuleSet::from_rule_configuration("{}").unwrap().is_empty());
}

#[test]
fn empty_child_group_id_means_single_level() {
    let rules = RuleSet::from_json(
        r#"{ "r": {
            "selectedFunction": "f",
            "selectedAction": "Show",
            "repeatingGroup": { "groupId": "people", "childGroupId": "" }
        } }"#,
    )
    .unwrap();
    assert_eq!(
        rules.get("r").unwrap().repeating_group().unwrap().child_group_id,
        None
    );
}

/// A valid rule `good` next to `bad`, given as a JSON object.
fn with_bad_rule(bad: &str) -> String {
    format!(
        r#"{{
            "good": {{
                "selectedFunction": "isMarried",
                "inputParams": {{ "status": "maritalStatus" }},
                "selectedAction": "Show",
                "selectedFields": {{ "a": "spouse-name" }}
            }},
            "bad": {bad}
        }}"#
    )
}

fn evaluate_single(rules: &RuleSet, sink: &LogOnce) -> EvaluationReport {
    let layout = layout();
    let data = FormData::new().with_model("model", json!({ "maritalStatus": "single" }));
    let handlers = handlers();
    let env = Environment::for_layout(&layout, &data)
        .with_handlers(&handlers)
        .with_default_data_type("model")
        .with_diagnostics(sink);
    rules.evaluate_detailed(&env)
}

#[test]
fn empty_function_skips_only_that_rule() {
    let input = with_bad_rule(
        r#"{ "selectedFunction": "", "selectedAction": "Show", "selectedFields": { "a": "spouse-age" } }"#,
    );
    let rules = RuleSet::from_json(&input).unwrap();
    assert_eq!(rules.len(), 2);
    assert_eq!(rules.get("bad").unwrap().function(), "");

    let sink = LogOnce::new();
    let report = evaluate_single(&rules, &sink);

    assert_eq!(report.hidden(), &["spouse-name"].into_iter().collect());
    assert_eq!(
        report.skipped()[0].reason,
        SkipReason::HandlerNotFound {
            function: String::new()
        }
    );
    assert_eq!(
        sink.emitted(),
        vec![
            "Conditional rule function '' not found, rules referencing this function will not run."
                .to_owned()
        ]
    );
}

#[test]
fn missing_function_skips_only_that_rule() {
    let input = with_bad_rule(r#"{ "selectedAction": "Show", "selectedFields": { "a": "spouse-age" } }"#);
    let rules = RuleSet::from_json(&input).unwrap();
    let sink = LogOnce::new();
    let report = evaluate_single(&rules, &sink);

    assert_eq!(report.invocations(), 1);
    assert_eq!(report.hidden(), &["spouse-name"].into_iter().collect());
    assert!(matches!(
        report.skipped()[0].reason,
        SkipReason::HandlerNotFound { .. }
    ));
}

#[test]
fn unknown_action_never_hides() {
    let input = with_bad_rule(
        r#"{ "selectedFunction": "isMarried", "selectedAction": "show", "selectedFields": { "a": "spouse-age" } }"#,
    );
    let rules = RuleSet::from_json(&input).unwrap();
    let bad = rules.get("bad").unwrap();
    assert_eq!(bad.action(), None);
    assert_eq!(bad.unknown_action(), Some("show"));

    let sink = LogOnce::new();
    let report = evaluate_single(&rules, &sink);

    assert_eq!(report.hidden(), &["spouse-name"].into_iter().collect());
    assert_eq!(report.invocations(), 1);
    assert_eq!(
        report.skipped()[0].reason,
        SkipReason::UnknownAction {
            action: "show".into()
        }
    );
    assert_eq!(sink.emitted().len(), 1);
    assert!(sink.emitted()[0].contains("unknown action 'show'"));
}

#[test]
fn missing_action_never_hides() {
    let rules = RuleSet::from_rule_configuration(
        r#"{ "data": { "conditionalRendering": {
            "bad": { "selectedFunction": "isMarried", "selectedFields": { "a": "spouse-age" } }
        } } }"#,
    )
    .unwrap();
    let sink = LogOnce::new();
    let report = evaluate_single(&rules, &sink);

    assert!(report.hidden().is_empty());
    assert_eq!(
        report.skipped()[0].reason,
        SkipReason::UnknownAction {
            action: String::new()
        }
    );
}

#[test]
fn builder_stays_strict() {
    let result = RuleSetBuilder::new()
        .rule("bad", |r| r.function("").show())
        .build();
    assert!(matches!(result, Err(ConfigError::MissingFunction { .. })));
}

#[test]
fn malformed_template_rejected() {
    let err = RuleSet::from_json(
        r#"{ "r": { "selectedFunction": "f", "selectedAction": "Show", "selectedFields": { "a": "x-{99999999999999999999999}" } } }"#,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        FormDynamicsError::Config(ConfigError::Template {
            source: TemplateError::Malformed { .. },
            ..
        })
    ));
}

#[test]
fn malformed_json_rejected() {
    assert!(matches!(
        RuleSet::from_json("{ not json"),
        Err(FormDynamicsError::Json(_))
    ));
}

#[test]
fn load_from_file() {
    let path = std::env::temp_dir().join(format!(
        "form-dynamics-config-{}.json",
        std::process::id()
    ));
    std::fs::write(&path, CONFIGURATION).unwrap();
    let rules = RuleSet::from_file(&path);
    std::fs::remove_file(&path).unwrap();
    assert_eq!(rules.unwrap().len(), 2);
}

#[test]
fn missing_file_is_io_error() {
    let path = std::env::temp_dir().join("form-dynamics-does-not-exist.json");
    assert!(matches!(
        RuleSet::from_file(path),
        Err(FormDynamicsError::Io(_))
    ));
}
