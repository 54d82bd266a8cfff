//! List the resource types the controller client understands.

use anyhow::Result;
use colored::Colorize;
use contrailkit::{Registry, ResourceKind};
use std::process::ExitCode;

use crate::Context;

pub fn run(ctx: &Context) -> Result<ExitCode> {
    let registry = Registry::builtin();

    if ctx.quiet {
        for name in registry.type_names() {
            println!("{name}");
        }
        return Ok(ExitCode::SUCCESS);
    }

    for (name, kind) in registry.entries() {
        println!("{}", describe(name, kind));
    }
    Ok(ExitCode::SUCCESS)
}

/// One display line per registered name
fn describe(name: &str, kind: ResourceKind) -> String {
    let descriptor = kind.descriptor();
    if name != descriptor.type_name {
        return format!(
            "{} {}",
            format!("{name:<28}").bold(),
            format!("alias of {}", descriptor.type_name).dimmed()
        );
    }

    let mut line = format!(
        "{} {} /{}  {} /{}/<uuid>  {} {}",
        format!("{name:<28}").bold(),
        "create".dimmed(),
        descriptor.path_post,
        "update".dimmed(),
        descriptor.path_put,
        "parent".dimmed(),
        descriptor.parent_type
    );
    for (field, target) in descriptor.subresources {
        line.push_str(&format!("  {} {field} → {target}", "refs".dimmed()));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_type_and_alias() {
        colored::control::set_override(false);

        let line = describe("virtual-network", ResourceKind::VirtualNetwork);
        assert!(line.contains("/virtual-networks"));
        assert!(line.contains("parent project"));

        let line = describe("virtual-port", ResourceKind::VirtualMachineInterface);
        assert!(line.contains("alias of virtual-machine-interface"));
    }

    #[test]
    fn test_describe_subresources() {
        colored::control::set_override(false);
        let line = describe("virtual-port-group", ResourceKind::VirtualPortGroup);
        assert!(line.contains("parent fabric"));
        assert!(line.contains("virtual_machine_interface_refs → virtual-machine-interface"));
    }
}
