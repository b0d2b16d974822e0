// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output extraction from a raw state document.
//!
//! Only the top-level `outputs` object is read. Each output carries a JSON
//! `value` and a JSON-encoded `type`:
//!
//! ```text
//! "string" | "number" | "bool" | "dynamic"
//! ["list", T] | ["set", T] | ["map", T]
//! ["tuple", [T, ...]] | ["object", {"attr": T, ...}]
//! ```

use crate::output::{OutputType, OutputValue};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors from parsing a state document
#[derive(Debug, Error)]
pub enum StateParseError {
    #[error("invalid state document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("output {output}: unsupported type expression {found}")]
    InvalidType { output: String, found: String },
    #[error("output {output}: expected {expected}, found {found}")]
    TypeMismatch {
        output: String,
        expected: String,
        found: String,
    },
}

#[derive(Deserialize)]
struct StateDocument {
    #[serde(default)]
    outputs: BTreeMap<String, StateOutput>,
}

#[derive(Deserialize)]
struct StateOutput {
    #[serde(default)]
    value: Value,
    #[serde(rename = "type", default)]
    ty: Option<Value>,
}

/// Parse the outputs of a state document into typed values, keyed by name.
pub fn parse_state_outputs(raw: &[u8]) -> Result<BTreeMap<String, OutputValue>, StateParseError> {
    let doc: StateDocument = serde_json::from_slice(raw)?;
    let mut outputs = BTreeMap::new();
    for (name, output) in doc.outputs {
        let ty = match &output.ty {
            Some(ty) => parse_type(ty).ok_or_else(|| StateParseError::InvalidType {
                output: name.clone(),
                found: ty.to_string(),
            })?,
            None => OutputType::Dynamic,
        };
        let value = typed_value(&output.value, &ty).map_err(|(expected, found)| {
            StateParseError::TypeMismatch {
                output: name.clone(),
                expected,
                found,
            }
        })?;
        outputs.insert(name, value);
    }
    Ok(outputs)
}

/// Decode a JSON type expression.
pub fn parse_type(ty: &Value) -> Option<OutputType> {
    match ty {
        Value::String(s) => match s.as_str() {
            "string" => Some(OutputType::String),
            "number" => Some(OutputType::Number),
            "bool" => Some(OutputType::Bool),
            "dynamic" => Some(OutputType::Dynamic),
            _ => None,
        },
        Value::Array(parts) => {
            let kind = parts.first()?.as_str()?;
            let arg = parts.get(1)?;
            match kind {
                "list" => Some(OutputType::List(Box::new(parse_type(arg)?))),
                "set" => Some(OutputType::Set(Box::new(parse_type(arg)?))),
                "map" => Some(OutputType::Map(Box::new(parse_type(arg)?))),
                "tuple" => {
                    let elems = arg.as_array()?;
                    let types = elems.iter().map(parse_type).collect::<Option<Vec<_>>>()?;
                    Some(OutputType::Tuple(types))
                }
                "object" => {
                    let attrs = arg.as_object()?;
                    let mut fields = IndexMap::new();
                    for (name, attr_ty) in attrs {
                        fields.insert(name.clone(), parse_type(attr_ty)?);
                    }
                    Some(OutputType::Object(fields))
                }
                _ => None,
            }
        }
        _ => None,
    }
}

type Mismatch = (String, String);

fn mismatch(expected: &str, found: &Value) -> Mismatch {
    let found = match found {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    (expected.to_string(), found.to_string())
}

fn typed_value(value: &Value, ty: &OutputType) -> Result<OutputValue, Mismatch> {
    if value.is_null() {
        return Ok(OutputValue::Null);
    }
    match ty {
        OutputType::Dynamic => Ok(OutputValue::from_json(value)),
        OutputType::String => value
            .as_str()
            .map(|s| OutputValue::String(s.to_string()))
            .ok_or_else(|| mismatch("string", value)),
        OutputType::Bool => value
            .as_bool()
            .map(OutputValue::Bool)
            .ok_or_else(|| mismatch("bool", value)),
        OutputType::Number => match value {
            Value::Number(n) => Ok(OutputValue::Number(n.clone())),
            _ => Err(mismatch("number", value)),
        },
        OutputType::List(elem) => typed_items(value, elem, "list").map(OutputValue::List),
        OutputType::Set(elem) => typed_items(value, elem, "set").map(OutputValue::Set),
        OutputType::Tuple(types) => {
            let items = value.as_array().ok_or_else(|| mismatch("tuple", value))?;
            items
                .iter()
                .enumerate()
                .map(|(i, item)| typed_value(item, types.get(i).unwrap_or(&OutputType::Dynamic)))
                .collect::<Result<Vec<_>, _>>()
                .map(OutputValue::Tuple)
        }
        OutputType::Map(elem) => {
            let fields = value.as_object().ok_or_else(|| mismatch("map", value))?;
            fields
                .iter()
                .map(|(k, v)| Ok((k.clone(), typed_value(v, elem)?)))
                .collect::<Result<BTreeMap<_, _>, _>>()
                .map(OutputValue::Map)
        }
        OutputType::Object(attrs) => {
            let fields = value.as_object().ok_or_else(|| mismatch("object", value))?;
            fields
                .iter()
                .map(|(k, v)| {
                    let attr_ty = attrs.get(k).unwrap_or(&OutputType::Dynamic);
                    Ok((k.clone(), typed_value(v, attr_ty)?))
                })
                .collect::<Result<IndexMap<_, _>, _>>()
                .map(OutputValue::Object)
        }
    }
}

fn typed_items(value: &Value, elem: &OutputType, kind: &str) -> Result<Vec<OutputValue>, Mismatch> {
    let items = value.as_array().ok_or_else(|| mismatch(kind, value))?;
    items.iter().map(|item| typed_value(item, elem)).collect()
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
