use form_dynamics::{
    Environment, EvaluatorConfig, FormData, HandlerRegistry, Inputs, LayoutTree, Node, Row,
    RuleSet,
};
use serde_json::json;
use tracing_subscriber::EnvFilter;

const RULES: &str = r#"{
  "data": {
    "conditionalRendering": {
      "spouseDetails": {
        "selectedFunction": "isMarried",
        "inputParams": { "status": "maritalStatus" },
        "selectedAction": "Show",
        "selectedFields": { "name": "spouse-name" }
      },
      "minorJobs": {
        "selectedFunction": "isAdult",
        "inputParams": { "age": "people.age" },
        "selectedAction": "Show",
        "selectedFields": { "job": "job-{0}" },
        "repeatingGroup": { "groupId": "people" }
      },
      "broken": {
        "selectedFunction": "notRegistered",
        "selectedAction": "Hide",
        "selectedFields": { "x": "spouse-name" }
      }
    }
  }
}"#;

fn main() {
    // RUST_LOG=form_dynamics=debug shows the evaluation pass.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("form_dynamics=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let rules = RuleSet::from_rule_configuration(RULES).expect("failed to load rules");
    println!("{rules}");

    let handlers = HandlerRegistry::builder()
        .handler("isMarried", |i: &Inputs| {
            i.get("status").as_str() == Some("married")
        })
        .handler("isAdult", |i: &Inputs| {
            i.get("age").as_f64().is_some_and(|age| age >= 18.0)
        })
        .build();

    let layout = LayoutTree::builder()
        .node(Node::component("marital-status", "Dropdown"))
        .node(Node::component("spouse-name", "Input"))
        .node(
            Node::repeating_group(
                "people",
                vec![
                    Row::new(0, ["person-0", "job-0"]),
                    Row::new(1, ["person-1", "job-1"]),
                ],
            )
            .with_binding("people"),
        )
        .node(Node::component("person-0", "Input"))
        .node(Node::component("job-0", "Input"))
        .node(Node::component("person-1", "Input"))
        .node(Node::component("job-1", "Input"))
        .build();

    let data = FormData::new().with_model(
        "model",
        json!({
            "maritalStatus": "single",
            "people": [{ "age": 34 }, { "age": 15 }]
        }),
    );
    let config = EvaluatorConfig {
        default_data_type: "model".into(),
        ..EvaluatorConfig::default()
    };

    let env = Environment::for_layout(&layout, &data)
        .with_handlers(&handlers)
        .with_config(&config);
    let report = rules.evaluate_detailed(&env);

    println!("{report}");
    for skip in report.skipped() {
        println!("  skipped {}: {}", skip.rule, skip.reason);
    }
}
