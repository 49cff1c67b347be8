//! `folio serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use folio_config::{CliSettings, Config, SiteConfig};
use folio_server::{ServerConfig, SiteContent, run_server};
use folio_site::{BuiltPage, Site};

use super::CommonArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Posts source directory (overrides config).
    #[arg(short, long)]
    pub source_dir: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Kroki server URL for diagram rendering (overrides config).
    #[arg(long)]
    pub kroki_url: Option<String>,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the site cannot be rendered or
    /// the server fails to start.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            source_dir: self.source_dir,
            kroki_url: self.kroki_url,
            ..CliSettings::default()
        };
        let config = Config::load(self.common.config.as_deref(), Some(&cli_settings))?;

        output.info(&format!(
            "Starting server on {}:{}",
            config.server.host, config.server.port
        ));
        output.field(
            "Source directory",
            &config.site_resolved.source_dir.display().to_string(),
        );
        match &config.diagrams_resolved {
            Some(diagrams) => output.field("Diagram engine", &format!("{:?}", diagrams.engine)),
            None => output.info("Diagram rendering: disabled (no [diagrams] in config)"),
        }

        let site = Site::from_config(&config).await?;
        let pages = site.render().await?;
        let warnings: usize = pages.iter().map(|page| page.warnings.len()).sum();
        tracing::debug!(pages = pages.len(), warnings, "site rendered");
        if warnings > 0 {
            output.warning(&format!(
                "{warnings} components failed to render; run with --verbose for details"
            ));
        }

        let server_config = ServerConfig {
            host: config.server.host.clone(),
            port: config.server.port,
        };
        run_server(&server_config, site_content(site.config(), pages)).await?;

        Ok(())
    }
}

/// Collect rendered pages and routing rules for the server.
fn site_content(config: &SiteConfig, pages: Vec<BuiltPage>) -> SiteContent {
    SiteContent {
        pages: pages
            .into_iter()
            .map(|page| (page.slug, page.html))
            .collect(),
        top_level: config.pages.clone(),
        not_found: config.not_found.clone(),
        redirects: config.redirects.clone(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_site_content() {
        let config = SiteConfig {
            redirects: vec!["/orphan-rules".to_owned()],
            ..SiteConfig::default()
        };
        let pages = vec![
            BuiltPage {
                slug: "home".to_owned(),
                title: "Home".to_owned(),
                html: "<h1>Home</h1>".to_owned(),
                warnings: Vec::new(),
            },
            BuiltPage {
                slug: "orphan-rules".to_owned(),
                title: "Orphan Rules".to_owned(),
                html: "<h1>Orphan Rules</h1>".to_owned(),
                warnings: vec!["CodeBlock: unknown language".to_owned()],
            },
        ];

        let content = site_content(&config, pages);

        assert_eq!(content.pages.len(), 2);
        assert_eq!(content.pages["orphan-rules"], "<h1>Orphan Rules</h1>");
        assert_eq!(content.top_level, vec!["home", "about", "contact"]);
        assert_eq!(content.not_found, "page-404");
        assert_eq!(content.redirects, vec!["/orphan-rules"]);
    }
}
