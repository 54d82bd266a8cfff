mod cli;
mod commands;
mod config;
mod tasks;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use std::io;
use std::process::ExitCode;

/// Global context for the application
pub struct Context {
    pub verbose: u8,
    pub quiet: bool,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let ctx = Context {
        verbose: cli.verbose,
        quiet: cli.quiet,
    };
    let controller = &cli.controller;

    match cli.command {
        Command::Query(args) => commands::state::query(&ctx, controller, args),
        Command::Present(args) => commands::state::present(&ctx, controller, args),
        Command::Absent(args) => commands::state::absent(&ctx, controller, args),
        Command::Run(args) => commands::run::run(&ctx, controller, args),
        Command::Types => commands::types::run(&ctx),
        Command::Completions { shell } => {
            generate(shell, &mut Cli::command(), "contrail", &mut io::stdout());
            Ok(ExitCode::SUCCESS)
        }
    }
}
