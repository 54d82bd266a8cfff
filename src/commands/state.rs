//! Single-resource commands: query, present, absent.

use anyhow::{Context as _, Result, bail};
use contrailkit::{Definition, Request, State};
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::ExitCode;

use super::{exit_code, reconcile};
use crate::Context;
use crate::cli::{AbsentArgs, ControllerArgs, PresentArgs, TargetArgs};
use crate::{config, ui};

pub fn query(ctx: &Context, controller: &ControllerArgs, args: TargetArgs) -> Result<ExitCode> {
    execute(ctx, controller, &args.into_request(State::Query), false, false)
}

pub fn present(ctx: &Context, controller: &ControllerArgs, args: PresentArgs) -> Result<ExitCode> {
    let definition = load_definition(args.definition.as_deref(), args.definition_file.as_deref())?;
    let request = args.target.into_request(State::Present).definition(definition);
    execute(ctx, controller, &request, args.check, args.diff)
}

pub fn absent(ctx: &Context, controller: &ControllerArgs, args: AbsentArgs) -> Result<ExitCode> {
    let request = args.target.into_request(State::Absent);
    execute(ctx, controller, &request, args.check, false)
}

fn execute(
    ctx: &Context,
    controller: &ControllerArgs,
    request: &Request,
    check: bool,
    diff: bool,
) -> Result<ExitCode> {
    let dispatcher = config::connect(controller)?;
    if ctx.verbose > 0 && !ctx.quiet {
        ui::info(&format!("{} {}", request.state, ui::target(request)));
    }

    let outcome = reconcile(&dispatcher, request, check, diff && !ctx.quiet);
    ui::emit(&outcome)?;
    if !ctx.quiet {
        ui::summary(request, &outcome);
    }
    Ok(exit_code([&outcome]))
}

/// Read the desired definition from an inline JSON string or a file
fn load_definition(inline: Option<&str>, file: Option<&Path>) -> Result<Definition> {
    let (text, origin) = match (inline, file) {
        (Some(text), _) => (text.to_string(), "--definition".to_string()),
        (None, Some(path)) => (
            fs::read_to_string(path).with_context(|| format!("Could not read {}", path.display()))?,
            path.display().to_string(),
        ),
        (None, None) => return Ok(Definition::new()),
    };
    parse_definition(&text).with_context(|| format!("Invalid definition in {origin}"))
}

fn parse_definition(text: &str) -> Result<Definition> {
    match serde_json::from_str::<Value>(text)? {
        Value::Object(map) => Ok(map),
        other => bail!("Expected a JSON object, got {other}"),
    }
}
