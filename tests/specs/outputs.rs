//! Output stringification and publishing.

use crate::prelude::*;
use serde_json::json;
use similar_asserts::assert_eq;
use std::collections::BTreeMap;
use tfsync_core::{parse_state_outputs, MapRef, OutputValue};

fn stringify(value: serde_json::Value, ty: serde_json::Value) -> String {
    let state = json!({ "outputs": { "out": { "value": value, "type": ty } } });
    let outputs = parse_state_outputs(state.to_string().as_bytes()).unwrap();
    outputs["out"].to_output_string()
}

#[test]
fn object_keys_are_sorted() {
    let rendered = stringify(
        json!({ "hello": { "user": "me" }, "goodbye": true }),
        json!(["object", { "hello": ["object", { "user": "string" }], "goodbye": "bool" }]),
    );
    assert_eq!(rendered, r#"{"goodbye":true,"hello":{"user":"me"}}"#);
}

#[test]
fn list_of_strings_is_quoted() {
    let rendered = stringify(json!(["hello", "world"]), json!(["list", "string"]));
    assert_eq!(rendered, r#"["hello","world"]"#);
}

#[test]
fn stringification_is_deterministic() {
    let value = json!({ "b": [1, 2.5, "x"], "a": { "z": null, "y": false } });
    let first = OutputValue::from_json(&value).to_output_string();
    for _ in 0..10 {
        assert_eq!(OutputValue::from_json(&value).to_output_string(), first);
    }
}

#[tokio::test]
async fn applied_run_publishes_outputs_map() {
    let h = Harness::new();
    let key = h.declare(h.workspace().output("endpoint", "url").build());
    h.converge(&key).await;

    let state = json!({
        "outputs": {
            "endpoint": { "value": "https://app.test", "type": "string" },
            "ports": { "value": [80, 443], "type": ["list", "number"] }
        }
    });
    h.platform.set_state(&h.remote(&key).id, &state);
    h.reconcile(&key).await;

    let expected = BTreeMap::from([
        ("endpoint".to_string(), r#""https://app.test""#.to_string()),
        ("ports".to_string(), "[80,443]".to_string()),
    ]);
    assert_eq!(
        h.maps.snapshot(&MapRef::new("default", "app-outputs")),
        Some(expected)
    );
}
