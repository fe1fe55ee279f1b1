use std::sync::Arc;
use std::thread;

use form_dynamics::{
    Environment, FormData, HandlerRegistry, HiddenSet, Inputs, LayoutTree, Node, Row, RuleSetBuilder,
};
use serde_json::json;

#[test]
fn evaluate_across_threads() {
    let rules = Arc::new(
        RuleSetBuilder::new()
            .rule("spouse", |r| {
                r.function("isTrue")
                    .input("value", "married")
                    .show()
                    .target("a", "spouse")
            })
            .rule("minors", |r| {
                r.function("isAdult")
                    .input("age", "people.age")
                    .show()
                    .target("a", "job-{0}")
                    .repeating_group("people")
            })
            .build()
            .unwrap(),
    );
    let handlers = Arc::new(
        HandlerRegistry::builder()
            .handler("isTrue", |i: &Inputs| i.get("value").is_truthy())
            .handler("isAdult", |i: &Inputs| {
                i.get("age").as_f64().is_some_and(|a| a >= 18.0)
            })
            .build(),
    );
    let layout = Arc::new(
        LayoutTree::builder()
            .node(Node::component("spouse", "Input"))
            .node(
                Node::repeating_group(
                    "people",
                    vec![Row::new(0, ["job-0"]), Row::new(1, ["job-1"])],
                )
                .with_binding("people"),
            )
            .node(Node::component("job-0", "Input"))
            .node(Node::component("job-1", "Input"))
            .build(),
    );

    let cases = vec![
        (
            json!({ "married": true, "people": [{ "age": 30 }, { "age": 40 }] }),
            HiddenSet::new(),
        ),
        (
            json!({ "married": false, "people": [{ "age": 30 }, { "age": 4 }] }),
            ["spouse", "job-1"].into_iter().collect(),
        ),
        (
            json!({ "married": true, "people": [{ "age": 3 }, { "age": 4 }] }),
            ["job-0", "job-1"].into_iter().collect(),
        ),
        (json!({}), ["spouse", "job-0", "job-1"].into_iter().collect()),
    ];

    let handles: Vec<_> = cases
        .into_iter()
        .map(|(model, expected)| {
            let rules = Arc::clone(&rules);
            let handlers = Arc::clone(&handlers);
            let layout = Arc::clone(&layout);
            thread::spawn(move || {
                let data = FormData::new().with_model("model", model);
                let env = Environment::for_layout(&layout, &data)
                    .with_handlers(&handlers)
                    .with_default_data_type("model");
                (rules.evaluate(&env), expected)
            })
        })
        .collect();

    for handle in handles {
        let (hidden, expected) = handle.join().unwrap();
        assert_eq!(hidden, expected);
    }
}

#[test]
fn ruleset_and_registry_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<form_dynamics::RuleSet>();
    assert_send_sync::<HandlerRegistry>();
    assert_send_sync::<LayoutTree>();
    assert_send_sync::<FormData>();
}
