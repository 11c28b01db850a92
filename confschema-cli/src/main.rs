//! Main entry point for the confschema CLI.
//!
//! - `template`: Print a sample configuration for a schema
//! - `check`: Validate a configuration file and print the converted settings
//! - `completions`: Generate shell completion scripts

use clap::Parser;
use confschema_cli::cli::{Cli, Command};
use confschema_cli::utils::{format_error_message, GlobalOptions, PAD, WIDTH};

fn main() {
    let cli = Cli::parse();

    let logger = confschema::init_logger(cli.verbose, cli.quiet);

    let global = GlobalOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
        schema: cli.schema,
        log_level: logger.level(),
    };

    let result = match cli.command {
        Command::Template(cmd) => cmd.execute(&global),
        Command::Check(cmd) => cmd.execute(&global),
        Command::Completions(cmd) => cmd.execute(&global),
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("{}", format_error_message(&e.to_string(), WIDTH, PAD));
            if e.wants_usage() {
                eprintln!("{}", "=".repeat(WIDTH));
                eprintln!("Run 'confschema --help' for usage.");
            }
            std::process::exit(e.exit_code());
        }
    }
}
