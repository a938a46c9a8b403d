//! Packlet CLI - Command-line utility for packaging deployment bundles into
//! ZIP archives.

mod cli;
mod commands;
mod error;
mod install;
mod output;
mod progress;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use cli::Commands;
use output::OutputFormatter;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let formatter = output::create_formatter(cli.json, cli.verbose, cli.quiet);

    match run(&cli, &*formatter) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            formatter.format_error(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, formatter: &dyn OutputFormatter) -> Result<()> {
    match &cli.command {
        Commands::Create(args) => {
            let mut progress = progress::for_output(cli.json, cli.quiet, cli.verbose);
            commands::create::execute(args, formatter, &mut *progress)
        }
        Commands::Lambda(args) => {
            let mut progress = progress::for_output(cli.json, cli.quiet, cli.verbose);
            commands::lambda::execute(args, formatter, &mut *progress)
        }
        Commands::Completion(args) => {
            commands::completion::execute(args.shell);
            Ok(())
        }
    }
}
