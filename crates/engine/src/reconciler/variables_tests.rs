// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tfsync_core::{VariableCategory, VariableId, WorkspaceId};
use yare::parameterized;

fn desired(key: &str, value: &str) -> Variable {
    Variable {
        key: key.to_string(),
        value: value.to_string(),
        ..Default::default()
    }
}

fn remote(key: &str, value: Option<&str>, sensitive: bool) -> RemoteVariable {
    RemoteVariable {
        id: VariableId::new(format!("var-{key}")),
        workspace_id: WorkspaceId::new("ws-1"),
        key: key.to_string(),
        value: value.map(str::to_string),
        sensitive,
        hcl: false,
        category: VariableCategory::Terraform,
    }
}

fn keys<'a>(vars: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    let mut keys: Vec<_> = vars.into_iter().collect();
    keys.sort();
    keys
}

#[test]
fn plans_delete_create_and_sensitive_overwrite() {
    let wanted = vec![
        desired("A", "1"),
        Variable {
            key: "B".to_string(),
            sensitive: true,
            ..Default::default()
        },
    ];
    let current = vec![remote("B", None, true), remote("C", Some("x"), false)];

    let plan = plan_variables(&wanted, &current);

    assert_eq!(keys(plan.deletes.iter().map(|r| r.key.as_str())), vec!["C"]);
    assert_eq!(keys(plan.creates.iter().map(|v| v.key.as_str())), vec!["A"]);
    assert_eq!(keys(plan.updates.iter().map(|(v, _)| v.key.as_str())), vec!["B"]);
    assert!(plan.changes_values());
}

#[test]
fn matching_variables_produce_empty_plan() {
    let wanted = vec![desired("region", "eu-west-1")];
    let current = vec![remote("region", Some("eu-west-1"), false)];

    let plan = plan_variables(&wanted, &current);

    assert_eq!(plan, VariablePlan::default());
    assert!(!plan.changes_values());
}

#[test]
fn deletes_alone_do_not_change_values() {
    let current = vec![remote("old", Some("1"), false)];

    let plan = plan_variables(&[], &current);

    assert_eq!(plan.deletes.len(), 1);
    assert!(!plan.changes_values());
}

#[parameterized(
    value = { Variable { value: "2".to_string(), ..desired("k", "") } },
    hcl = { Variable { hcl: true, ..desired("k", "1") } },
    sensitive = { Variable { sensitive: true, ..desired("k", "1") } },
    category = { Variable { environment_variable: true, ..desired("k", "1") } },
)]
fn attribute_difference_triggers_update(wanted: Variable) {
    let wanted = [wanted];
    let current = [remote("k", Some("1"), false)];

    let plan = plan_variables(&wanted, &current);

    assert_eq!(plan.updates.len(), 1);
    assert!(plan.creates.is_empty());
    assert!(plan.deletes.is_empty());
}

#[test]
fn remote_sensitive_is_always_overwritten() {
    let wanted = [Variable {
        sensitive: true,
        ..desired("k", "same")
    }];
    let current = [remote("k", None, true)];

    assert_eq!(plan_variables(&wanted, &current).updates.len(), 1);
}
