// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use proptest::prelude::*;
use serde_json::json;

fn s(v: &str) -> OutputValue {
    OutputValue::String(v.to_string())
}

fn num(v: Value) -> OutputValue {
    match v {
        Value::Number(n) => OutputValue::Number(n),
        other => panic!("not a number: {other}"),
    }
}

#[test]
fn object_keys_are_sorted() {
    let mut inner = IndexMap::new();
    inner.insert("user".to_string(), s("me"));
    let mut fields = IndexMap::new();
    fields.insert("hello".to_string(), OutputValue::Object(inner));
    fields.insert("goodbye".to_string(), OutputValue::Bool(true));

    assert_eq!(
        OutputValue::Object(fields).to_output_string(),
        r#"{"goodbye":true,"hello":{"user":"me"}}"#
    );
}

#[test]
fn list_of_strings() {
    let list = OutputValue::List(vec![s("hello"), s("world")]);
    assert_eq!(list.to_output_string(), r#"["hello","world"]"#);
}

#[yare::parameterized(
    null         = { OutputValue::Null,                 "" },
    plain_string = { s("hello"),                        "\"hello\"" },
    null_string  = { s("null"),                         "\"null\"" },
    number_str   = { s("42"),                           "\"42\"" },
    bool_true    = { OutputValue::Bool(true),           "true" },
    bool_false   = { OutputValue::Bool(false),          "false" },
    integer      = { num(json!(42)),                    "42" },
    negative     = { num(json!(-7)),                    "-7" },
    fraction     = { num(json!(1.5)),                   "1.5" },
    huge         = { num(json!(1e21)),                  "1000000000000000000000" },
    tiny         = { num(json!(0.0000001)),             "0.0000001" },
    empty_list   = { OutputValue::List(vec![]),         "[]" },
    empty_set    = { OutputValue::Set(vec![]),          "[]" },
    empty_map    = { OutputValue::Map(BTreeMap::new()), "{}" },
)]
fn scalar_and_empty_values(value: OutputValue, expected: &str) {
    assert_eq!(value.to_output_string(), expected);
}

#[test]
fn list_keeps_empty_elements() {
    let list = OutputValue::Tuple(vec![OutputValue::Null, num(json!(1))]);
    assert_eq!(list.to_output_string(), "[,1]");
}

#[test]
fn map_skips_empty_values() {
    let mut entries = BTreeMap::new();
    entries.insert("a".to_string(), s("x"));
    entries.insert("b".to_string(), OutputValue::Null);
    entries.insert(String::new(), s("y"));
    assert_eq!(OutputValue::Map(entries).to_output_string(), r#"{"a":"x"}"#);
}

#[test]
fn json_encoded_collections_inside_strings_are_expanded() {
    assert_eq!(s(r#"{"b":1,"a":[true]}"#).to_output_string(), r#"{"a":[true],"b":1}"#);
    assert_eq!(s(r#"["x", "y"]"#).to_output_string(), r#"["x","y"]"#);
}

#[test]
fn json_encoded_primitives_inside_strings_stay_quoted() {
    assert_eq!(s("true").to_output_string(), "\"true\"");
    assert_eq!(s("\"quoted\"").to_output_string(), "\"\"quoted\"\"");
}

#[test]
fn from_json_implies_tuple_and_object() {
    let value = OutputValue::from_json(&json!({"k": [1, "a"], "n": null}));
    let OutputValue::Object(fields) = &value else {
        panic!("expected object, got {value:?}");
    };
    assert_eq!(
        fields.get("k"),
        Some(&OutputValue::Tuple(vec![num(json!(1)), s("a")]))
    );
    assert_eq!(fields.get("n"), Some(&OutputValue::Null));
    assert_eq!(value.to_output_string(), r#"{"k":[1,"a"]}"#);
}

fn arb_value() -> impl Strategy<Value = OutputValue> {
    let leaf = prop_oneof![
        Just(OutputValue::Null),
        any::<bool>().prop_map(OutputValue::Bool),
        any::<i64>().prop_map(|i| OutputValue::Number(i.into())),
        "[a-z]{0,6}".prop_map(OutputValue::String),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(OutputValue::List),
            prop::collection::btree_map("[a-z]{1,4}", inner.clone(), 0..4)
                .prop_map(OutputValue::Map),
            prop::collection::vec(("[a-z]{1,4}", inner), 0..4)
                .prop_map(|pairs| OutputValue::Object(pairs.into_iter().collect())),
        ]
    })
}

proptest! {
    #[test]
    fn stringification_is_deterministic(value in arb_value()) {
        let copy = value.clone();
        prop_assert_eq!(value.to_output_string(), copy.to_output_string());
    }

    #[test]
    fn object_string_ignores_insertion_order(pairs in prop::collection::vec(("[a-z]{1,4}", any::<bool>()), 0..6)) {
        let forward: IndexMap<String, OutputValue> = pairs
            .iter()
            .map(|(k, v)| (k.clone(), OutputValue::Bool(*v)))
            .collect();
        let mut reversed: IndexMap<String, OutputValue> = IndexMap::new();
        for (k, v) in forward.iter().rev() {
            reversed.insert(k.clone(), v.clone());
        }
        prop_assert_eq!(
            OutputValue::Object(forward).to_output_string(),
            OutputValue::Object(reversed).to_output_string()
        );
    }
}
