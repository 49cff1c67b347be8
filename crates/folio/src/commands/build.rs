//! `folio build` command implementation.

use std::path::PathBuf;

use clap::Args;
use folio_config::{CliSettings, Config};
use folio_site::Site;

use super::CommonArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Posts source directory (overrides config).
    #[arg(short, long)]
    pub source_dir: Option<PathBuf>,

    /// Output directory (overrides config).
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Kroki server URL for diagram rendering (overrides config).
    #[arg(long)]
    pub kroki_url: Option<String>,
}

impl BuildArgs {
    /// Execute the build command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the site cannot be built.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            output_dir: self.output_dir,
            kroki_url: self.kroki_url,
            ..CliSettings::default()
        };
        let config = Config::load(self.common.config.as_deref(), Some(&cli_settings))?;

        output.field(
            "Source directory",
            &config.site_resolved.source_dir.display().to_string(),
        );
        if config.diagrams_resolved.is_none() {
            output.info("Diagram rendering: disabled (no [diagrams] in config)");
        }

        let site = Site::from_config(&config).await?;
        let report = site.build().await?;

        output.success(&format!(
            "Built {} pages and copied {} assets to {}",
            report.pages,
            report.assets,
            report.output_dir.display()
        ));
        if report.warnings > 0 {
            output.warning(&format!(
                "{} components failed to render; run with --verbose for details",
                report.warnings
            ));
        }

        Ok(())
    }
}
