//! Command to validate a configuration file.

use crate::error::CliError;
use crate::utils::{banner, load_schema, GlobalOptions, WIDTH};
use clap::{Args, ValueEnum};
use confschema::{apply_overrides, parse_override, read_settings, Configuration, Logger};
use std::path::PathBuf;

/// Program name shown in the banner.
const PROGRAM: &str = "confschema";

/// Output format for the converted configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// YAML mapping
    #[default]
    Yaml,
    /// Pretty-printed JSON object
    Json,
}

/// Validate a configuration file and print the converted settings.
#[derive(Args)]
pub struct CheckCommand {
    /// Configuration file to validate
    #[arg(short, long, value_name = "CONFIGFILE")]
    pub config: PathBuf,

    /// Override settings in the config file (a YAML mapping; braces optional)
    #[arg(short = 'o', long = "override", value_name = "OVERRIDE_SETTINGS")]
    pub overrides: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub format: OutputFormat,
}

impl CheckCommand {
    /// Execute the check command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let logger = Logger::new(global.log_level);
        let schema = load_schema(global)?;

        logger.raw(&banner(PROGRAM, env!("CARGO_PKG_VERSION"), WIDTH));

        let mut settings = read_settings(&self.config)?;
        for text in &self.overrides {
            apply_overrides(&schema, &mut settings, parse_override(text)?)?;
        }
        let config = schema.validate_config(&settings)?;

        for (key, value) in &config {
            logger.info(&format!("{key} = {value}"));
        }

        println!("{}", render(&config, self.format)?);
        Ok(())
    }
}

/// Renders the converted settings in `format`.
pub fn render(config: &Configuration, format: OutputFormat) -> Result<String, CliError> {
    match format {
        OutputFormat::Yaml => {
            let yaml = config.to_yaml()?;
            Ok(yaml.trim_end().to_string())
        }
        OutputFormat::Json => {
            serde_json::to_string_pretty(config).map_err(|e| CliError::Output(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use confschema::{load_config, load_schema};

    fn config() -> Configuration {
        let schema = load_schema(
            "count : [int, 1, null]\nratio : [float, 0.5, null]\nname : [str, x, null]\n",
            None,
        )
        .unwrap();
        schema
            .validate_config(&load_config("count : '3'\nratio : 2\nname : abc").unwrap())
            .unwrap()
    }

    #[test]
    fn test_render_yaml() {
        assert_eq!(
            render(&config(), OutputFormat::Yaml).unwrap(),
            "count: 3\nratio: 2.0\nname: abc"
        );
    }

    #[test]
    fn test_render_json() {
        let json: serde_json::Value =
            serde_json::from_str(&render(&config(), OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(json["count"], 3);
        assert_eq!(json["ratio"], 2.0);
        assert_eq!(json["name"], "abc");
    }
}
