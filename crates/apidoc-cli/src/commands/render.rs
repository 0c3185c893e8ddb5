//! `apidoc render` command implementation.

use std::path::PathBuf;

use apidoc::{Config, DirectoryStructure, Documenter, Overrides};
use clap::Args;

use crate::error::CliError;
use crate::exchange_file::ExchangeFile;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Exchange files to render.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Path to configuration file (default: auto-discover apidoc.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Documentation format such as "adoc" or "md" (overrides config).
    #[arg(short, long)]
    format: Option<String>,

    /// Template override directory (overrides config).
    #[arg(long)]
    templates_dir: Option<PathBuf>,

    /// Write artifacts into one directory per exchange.
    #[arg(long)]
    nested: bool,

    /// Fail on contract mismatches instead of warning.
    #[arg(long, env = "APIDOC_STRICT")]
    strict: bool,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, loading, validation in strict mode
    /// or writing fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let overrides = Overrides {
            output_dir: self.output_dir,
            format: self.format,
            strict: self.strict.then_some(true),
            directory_structure: self.nested.then_some(DirectoryStructure::Nested),
            templates_dir: self.templates_dir,
        };
        let config = Config::load(self.config.as_deref(), Some(&overrides))?;
        let documenter = Documenter::new(&config)?;

        output.info(&format!(
            "Output: {}",
            config.output_resolved.dir.display()
        ));

        let mut total = 0;
        for path in &self.files {
            let file = ExchangeFile::load(path)?;
            let written =
                documenter.document(&file.identifier, &file.exchange, file.registrations)?;
            output.detail(&format!(
                "{}: {} artifacts from {}",
                file.identifier,
                written.len(),
                file.path.display()
            ));
            total += written.len();
        }

        output.success(&format!(
            "Rendered {total} artifacts for {} exchanges",
            self.files.len()
        ));
        Ok(())
    }
}
