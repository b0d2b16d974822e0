// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rendering of the provisioning configuration for module-backed workspaces.
//!
//! The text is compared byte-for-byte against the last stored copy to detect
//! configuration drift, so output must be stable for equal inputs.

use hcl::expr::{Traversal, Variable as HclVariable};
use hcl::{Block, Body};
use tfsync_core::{ModuleSource, Workspace};

/// Name of the module block wrapping the registry module.
pub const MODULE_NAME: &str = "operator";

/// File name the configuration is uploaded as.
pub const CONFIG_FILE: &str = "main.tf";

/// Render `main.tf` for a workspace backed by `module`.
pub fn render_configuration(
    workspace: &Workspace,
    module: &ModuleSource,
) -> Result<String, hcl::Error> {
    let spec = &workspace.spec;

    let backend = Block::builder("backend")
        .add_label("remote")
        .add_attribute(("organization", spec.organization.as_str()))
        .add_block(
            Block::builder("workspaces")
                .add_attribute(("name", workspace.meta.remote_workspace_name()))
                .build(),
        )
        .build();
    let mut body = Body::builder().add_block(Block::builder("terraform").add_block(backend).build());

    // Environment variables reach the run through the process, not the module
    let inputs: Vec<&str> = spec
        .variables
        .iter()
        .filter(|v| !v.environment_variable)
        .map(|v| v.key.as_str())
        .collect();

    for key in &inputs {
        body = body.add_block(Block::builder("variable").add_label(*key).build());
    }

    for output in &spec.outputs {
        let value = Traversal::builder(HclVariable::new("module")?)
            .attr(MODULE_NAME)
            .attr(output.module_output_name.as_str())
            .build();
        body = body.add_block(
            Block::builder("output")
                .add_label(output.key.as_str())
                .add_attribute(("value", value))
                .build(),
        );
    }

    let mut module_block = Block::builder("module")
        .add_label(MODULE_NAME)
        .add_attribute(("source", module.source.as_str()));
    if let Some(version) = &module.version {
        module_block = module_block.add_attribute(("version", version.as_str()));
    }
    for key in &inputs {
        let value = Traversal::builder(HclVariable::new("var")?)
            .attr(*key)
            .build();
        module_block = module_block.add_attribute((*key, value));
    }
    body = body.add_block(module_block.build());

    hcl::to_string(&body.build())
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;
