// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed output values and their deterministic string form.
//!
//! Outputs read from a state document carry a type alongside their JSON
//! value. [`OutputValue::to_output_string`] flattens a typed value into the
//! text published to the downstream output store. The function is pure:
//! equal values always produce byte-identical strings.

use indexmap::IndexMap;
use serde_json::{Number, Value};
use std::collections::BTreeMap;

/// Type of an output value, as declared in the state document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputType {
    String,
    Number,
    Bool,
    /// Type decided by the value itself.
    Dynamic,
    List(Box<OutputType>),
    Set(Box<OutputType>),
    Map(Box<OutputType>),
    Tuple(Vec<OutputType>),
    Object(IndexMap<String, OutputType>),
}

/// A typed output value.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputValue {
    Null,
    String(String),
    Bool(bool),
    Number(Number),
    List(Vec<OutputValue>),
    Set(Vec<OutputValue>),
    Tuple(Vec<OutputValue>),
    Map(BTreeMap<String, OutputValue>),
    /// Attributes in document order; stringification sorts them.
    Object(IndexMap<String, OutputValue>),
}

impl OutputValue {
    /// Build a value from untyped JSON, implying tuple and object types for
    /// arrays and objects.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => OutputValue::Null,
            Value::Bool(b) => OutputValue::Bool(*b),
            Value::Number(n) => OutputValue::Number(n.clone()),
            Value::String(s) => OutputValue::String(s.clone()),
            Value::Array(items) => OutputValue::Tuple(items.iter().map(Self::from_json).collect()),
            Value::Object(fields) => OutputValue::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), Self::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Stringify the value.
    ///
    /// - null is the empty string
    /// - strings are quoted, unless they hold JSON for a list or object, in
    ///   which case the decoded value is stringified instead
    /// - bools are `true`/`false`, numbers are plain decimals
    /// - lists, sets and tuples are `[a,b]`, keeping empty elements
    /// - maps and objects are `{"k":v}`, skipping empty entries; object keys
    ///   are sorted first
    pub fn to_output_string(&self) -> String {
        match self {
            OutputValue::Null => String::new(),
            OutputValue::String(s) => string_to_output(s),
            OutputValue::Bool(b) => b.to_string(),
            OutputValue::Number(n) => number_to_decimal(n),
            OutputValue::List(items) | OutputValue::Set(items) | OutputValue::Tuple(items) => {
                let parts: Vec<String> = items.iter().map(Self::to_output_string).collect();
                format!("[{}]", parts.join(","))
            }
            OutputValue::Map(entries) => join_entries(entries.iter()),
            OutputValue::Object(fields) => {
                let mut sorted: Vec<(&String, &OutputValue)> = fields.iter().collect();
                sorted.sort_by(|a, b| a.0.cmp(b.0));
                join_entries(sorted.into_iter())
            }
        }
    }
}

fn string_to_output(s: &str) -> String {
    if s != "null" {
        if let Ok(parsed @ (Value::Array(_) | Value::Object(_))) = serde_json::from_str::<Value>(s)
        {
            return OutputValue::from_json(&parsed).to_output_string();
        }
    }
    format!("\"{}\"", s)
}

fn join_entries<'a>(entries: impl Iterator<Item = (&'a String, &'a OutputValue)>) -> String {
    let parts: Vec<String> = entries
        .filter(|(key, _)| !key.is_empty())
        .filter_map(|(key, value)| {
            let value = value.to_output_string();
            if value.is_empty() {
                None
            } else {
                Some(format!("\"{}\":{}", key, value))
            }
        })
        .collect();
    format!("{{{}}}", parts.join(","))
}

/// Fixed-point decimal text; `f64` display never uses exponent notation.
fn number_to_decimal(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        i.to_string()
    } else if let Some(u) = n.as_u64() {
        u.to_string()
    } else {
        n.as_f64().map(|f| f.to_string()).unwrap_or_default()
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
