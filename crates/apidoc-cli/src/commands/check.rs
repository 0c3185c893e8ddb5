//! `apidoc check` command implementation.

use std::path::PathBuf;

use apidoc::{Config, DocError, Documenter};
use clap::Args;

use crate::error::CliError;
use crate::exchange_file::ExchangeFile;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    /// Exchange files to check.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Path to configuration file (default: auto-discover apidoc.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// Every file is checked; contract violations are reported per file and
    /// fail the command once all files have been processed.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration or loading fails, or if any
    /// exchange violates its declared fields.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = Config::load(self.config.as_deref(), None)?;
        let documenter = Documenter::new(&config)?;

        let mut failed = 0;
        for path in &self.files {
            let file = ExchangeFile::load(path)?;
            match documenter.check(&file.identifier, &file.exchange, file.registrations) {
                Ok(()) => output.success(&format!("ok    {}", file.identifier)),
                Err(DocError::Validation(error)) => {
                    failed += 1;
                    output.error(&format!("FAIL  {}", file.identifier));
                    for violation in error.errors() {
                        output.detail(&violation.to_string());
                    }
                }
                Err(e) => return Err(e.into()),
            }
        }

        if failed > 0 {
            return Err(CliError::Validation(format!(
                "{failed} of {} exchanges violate their declared fields",
                self.files.len()
            )));
        }
        output.info(&format!("{} exchanges checked", self.files.len()));
        Ok(())
    }
}
