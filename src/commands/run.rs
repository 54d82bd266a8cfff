//! Task files: reconcile a list of requests in order.

use anyhow::Result;
use contrailkit::{Dispatcher, Outcome, Request};
use std::process::ExitCode;

use super::{exit_code, reconcile};
use crate::Context;
use crate::cli::{ControllerArgs, RunArgs};
use crate::{config, tasks, ui};

pub fn run(ctx: &Context, controller: &ControllerArgs, args: RunArgs) -> Result<ExitCode> {
    let requests = tasks::load(&args.file)?;
    let dispatcher = config::connect(controller)?;

    if !ctx.quiet {
        ui::info(&format!(
            "{} {} task(s) from {}",
            if args.check { "Checking" } else { "Running" },
            requests.len(),
            args.file.display()
        ));
    }

    let outcomes = run_all(ctx, &dispatcher, &requests, args.check, args.diff);
    ui::emit(&outcomes)?;

    if !ctx.quiet {
        let changed = outcomes.iter().filter(|o| o.is_changed()).count();
        let skipped = requests.len() - outcomes.len();
        let mut line = format!("{} done, {changed} changed", outcomes.len());
        if skipped > 0 {
            line.push_str(&format!(", {skipped} skipped"));
        }
        ui::dim(&line);
    }
    Ok(exit_code(&outcomes))
}

/// Reconcile requests in order, stopping after the first failure
fn run_all(
    ctx: &Context,
    dispatcher: &Dispatcher,
    requests: &[Request],
    check: bool,
    diff: bool,
) -> Vec<Outcome> {
    let total = requests.len();
    let mut outcomes = Vec::with_capacity(total);

    for (i, request) in requests.iter().enumerate() {
        if !ctx.quiet {
            ui::step(i + 1, total, &format!("{} {}", request.state, ui::target(request)));
        }

        let outcome = reconcile(dispatcher, request, check, diff && !ctx.quiet);
        if !ctx.quiet {
            ui::summary(request, &outcome);
        }

        let failed = outcome.is_failed();
        outcomes.push(outcome);
        if failed {
            log::warn!("Stopping after failed task {}", i + 1);
            break;
        }
    }
    outcomes
}
