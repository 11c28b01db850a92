//! Build script for confschema-cli.
//!
//! Renders the man page into OUT_DIR with clap_mangen. Build scripts cannot
//! depend on the crate being built, so the command tree is restated here.

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::fs;
use std::path::PathBuf;

/// Keep in step with src/cli.rs and src/commands/.
fn build_cli() -> Command {
    Command::new("confschema")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Validate YAML configuration files against a schema")
        .long_about(
            "Validate YAML configuration files against a schema, convert their values \
             and print commented sample configurations",
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Suppress non-essential output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("schema")
                .long("schema")
                .help("Schema specification file")
                .value_name("PATH")
                .global(true)
                .env("CONFSCHEMA_SCHEMA"),
        )
        .subcommands(vec![
            Command::new("template")
                .about("Print a sample configuration for the schema")
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("FILE")
                        .help("Write the template to a file instead of stdout"),
                ),
            Command::new("check")
                .about("Validate a configuration file and print the converted settings")
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .value_name("CONFIGFILE")
                        .required(true)
                        .help("Configuration file to validate"),
                )
                .arg(
                    Arg::new("override")
                        .short('o')
                        .long("override")
                        .value_name("OVERRIDE_SETTINGS")
                        .action(ArgAction::Append)
                        .help("Override settings in the config file"),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .value_parser(["yaml", "json"])
                        .default_value("yaml")
                        .help("Output format"),
                ),
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(Arg::new("shell").required(true).help("Shell to generate completions for")),
        ])
}

fn main() -> std::io::Result<()> {
    let out_dir = PathBuf::from(std::env::var_os("OUT_DIR").ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::NotFound, "OUT_DIR is not set")
    })?);
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir)?;

    let mut buffer = Vec::new();
    Man::new(build_cli()).render(&mut buffer)?;
    fs::write(man_dir.join("confschema.1"), buffer)?;

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=src/commands/");
    Ok(())
}
