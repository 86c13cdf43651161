mod app;
mod cli;
mod error;
mod flow;
mod gitignore;
mod locator;
mod models;
mod parser;
mod system;
mod ui;

use std::env;
use std::process::ExitCode;

use clap::Parser;
use tracing::Level;

use crate::app::TerminalHost;
use crate::cli::Cli;
use crate::flow::{Host, Options, Outcome};
use crate::models::Severity;

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let root = match cli.root {
        Some(root) => root,
        None => match env::current_dir() {
            Ok(root) => root,
            Err(err) => {
                eprintln!("error: no workspace folder: {err}");
                return ExitCode::FAILURE;
            }
        },
    };
    let options = Options {
        interactive: !cli.plain,
    };

    let mut host = TerminalHost::new();
    let result = flow::run(&root, &options, &mut host);
    let failed = match result {
        Ok(Outcome::Cancelled) => {
            tracing::debug!("cancelled");
            false
        }
        Ok(outcome) => {
            tracing::debug!(?outcome, "done");
            false
        }
        Err(err) => {
            host.notify(Severity::Error, &err.to_string());
            true
        }
    };

    for (severity, message) in host.finish() {
        match severity {
            Severity::Info => println!("{message}"),
            Severity::Warning => eprintln!("warning: {message}"),
            Severity::Error => eprintln!("error: {message}"),
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
