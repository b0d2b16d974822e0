// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn var(key: &str, value: &str, sensitive: bool) -> Variable {
    Variable {
        key: key.to_string(),
        value: value.to_string(),
        sensitive,
        ..Default::default()
    }
}

#[test]
fn category_follows_environment_flag() {
    let mut v = var("region", "us-east-1", false);
    assert_eq!(v.category(), VariableCategory::Terraform);
    v.environment_variable = true;
    assert_eq!(v.category(), VariableCategory::Env);
    assert_eq!(v.category().to_string(), "env");
}

#[test]
fn only_empty_sensitive_variables_are_mounted() {
    assert!(var("token", "", true).is_mounted());
    assert!(!var("token", "inline", true).is_mounted());
    assert!(!var("region", "", false).is_mounted());
}

#[test]
fn debug_output_redacts_sensitive_values() {
    let secret = var("token", "hunter2", true);
    let rendered = format!("{:?}", secret);
    assert!(!rendered.contains("hunter2"), "{rendered}");
    assert!(rendered.contains("<sensitive>"));

    let request = VariableRequest::new(&secret, "hunter2".to_string());
    let rendered = format!("{:?}", request);
    assert!(!rendered.contains("hunter2"), "{rendered}");
}

#[test]
fn debug_output_keeps_plain_values() {
    let plain = var("region", "eu-west-1", false);
    assert!(format!("{:?}", plain).contains("eu-west-1"));
}

#[test]
fn request_copies_flags_from_variable() {
    let v = Variable {
        key: "tags".to_string(),
        value: "{a = 1}".to_string(),
        hcl: true,
        environment_variable: true,
        ..Default::default()
    };
    let request = VariableRequest::new(&v, v.value.clone());
    assert_eq!(request.key, "tags");
    assert!(request.hcl);
    assert!(!request.sensitive);
    assert_eq!(request.category, VariableCategory::Env);
}
