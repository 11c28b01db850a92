//! Shell completion generation command.

use crate::cli::Cli;
use crate::error::CliError;
use crate::utils::GlobalOptions;
use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use confschema::Logger;
use std::io;

/// Name of the installed binary.
const BIN_NAME: &str = "confschema";

/// Generate shell completion scripts
#[derive(Parser)]
pub struct CompletionsCommand {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsCommand {
    /// Execute the completions command.
    pub fn execute(&self, global: &GlobalOptions) -> Result<(), CliError> {
        let logger = Logger::new(global.log_level);
        let mut cmd = Cli::command();

        let hint = match self.shell {
            Shell::Bash => Some("eval \"$(confschema completions bash)\"   # in ~/.bashrc"),
            Shell::Zsh => Some("confschema completions zsh > ~/.zsh/completions/_confschema"),
            Shell::Fish => {
                Some("confschema completions fish > ~/.config/fish/completions/confschema.fish")
            }
            Shell::PowerShell => {
                Some("confschema completions powershell | Out-String | Invoke-Expression")
            }
            _ => None,
        };
        if let Some(hint) = hint {
            logger.raw(&format!("# Enable with:\n#   {hint}\n"));
        }

        generate(self.shell, &mut cmd, BIN_NAME, &mut io::stdout());
        Ok(())
    }
}
