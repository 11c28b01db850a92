//! Command to print a sample configuration.

use crate::error::CliError;
use crate::utils::{load_schema, GlobalOptions};
use clap::Args;
use confschema::Logger;
use std::fs;
use std::path::PathBuf;

/// Print a sample configuration for the schema.
#[derive(Args)]
pub struct TemplateCommand {
    /// Write the template to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl TemplateCommand {
    /// Execute the template command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let logger = Logger::new(global.log_level);
        let schema = load_schema(global)?;
        let template = schema.sample_config();

        match self.output {
            Some(path) => {
                fs::write(&path, format!("{template}\n"))?;
                logger.info(&format!("Wrote template to {}", path.display()));
            }
            None => println!("{template}"),
        }
        Ok(())
    }
}
