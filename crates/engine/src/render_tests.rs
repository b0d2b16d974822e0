// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tfsync_core::test_support::WorkspaceBuilder;

fn render(workspace: &Workspace) -> String {
    let module = workspace.spec.module.clone().unwrap();
    render_configuration(workspace, &module).unwrap()
}

#[test]
fn backend_names_organization_and_workspace() {
    let text = render(&WorkspaceBuilder::new().named("team-a", "network").build());

    assert!(text.contains("terraform {"), "{text}");
    assert!(text.contains("backend \"remote\""), "{text}");
    assert!(text.contains("organization = \"acme\""), "{text}");
    assert!(text.contains("name = \"team-a-network\""), "{text}");
}

#[test]
fn module_block_carries_source_version_and_inputs() {
    let text = render(
        &WorkspaceBuilder::new()
            .variable("region", "eu-west-1")
            .variable("size", "3")
            .build(),
    );

    assert!(text.contains("module \"operator\""), "{text}");
    assert!(text.contains("source = \"app.terraform.io/acme/app/aws\""), "{text}");
    assert!(text.contains("version = \"1.0.0\""), "{text}");
    assert!(text.contains("variable \"region\""), "{text}");
    assert!(text.contains("region = var.region"), "{text}");
    assert!(text.contains("size = var.size"), "{text}");
}

#[test]
fn environment_variables_are_not_module_inputs() {
    let text = render(
        &WorkspaceBuilder::new()
            .variable("region", "eu-west-1")
            .env_variable("AWS_REGION", "eu-west-1")
            .build(),
    );

    assert!(!text.contains("AWS_REGION"), "{text}");
    assert!(text.contains("region = var.region"), "{text}");
}

#[test]
fn outputs_reference_module_attributes() {
    let text = render(&WorkspaceBuilder::new().output("vpc", "vpc_id").build());

    assert!(text.contains("output \"vpc\""), "{text}");
    assert!(text.contains("value = module.operator.vpc_id"), "{text}");
}

#[test]
fn unversioned_module_omits_version() {
    let mut workspace = WorkspaceBuilder::new().build();
    if let Some(module) = workspace.spec.module.as_mut() {
        module.version = None;
    }
    let text = render(&workspace);

    assert!(!text.contains("version"), "{text}");
}

#[test]
fn rendering_is_deterministic() {
    let workspace = WorkspaceBuilder::new()
        .variable("b", "2")
        .variable("a", "1")
        .output("out", "attr")
        .build();

    assert_eq!(render(&workspace), render(&workspace.clone()));
}

#[test]
fn variable_changes_change_the_text() {
    let before = render(&WorkspaceBuilder::new().variable("a", "1").build());
    let after = render(&WorkspaceBuilder::new().variable("a", "1").variable("b", "2").build());
    assert_ne!(before, after);
}
