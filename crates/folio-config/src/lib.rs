//! Configuration management for folio.
//!
//! Parses `folio.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `server.host`
//! - `site.title`
//! - `site.footer`
//! - `diagrams.kroki_url`

mod expand;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override posts source directory.
    pub source_dir: Option<PathBuf>,
    /// Override build output directory.
    pub output_dir: Option<PathBuf>,
    /// Override Kroki URL. Enables Kroki diagram rendering.
    pub kroki_url: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "folio.toml";

/// Default Kroki server.
const DEFAULT_KROKI_URL: &str = "https://kroki.io";

/// Default diagram engine timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Site configuration (paths are relative strings from TOML).
    site: SiteConfigRaw,
    /// Syntax highlighting configuration.
    pub highlight: HighlightConfig,
    /// Diagram rendering configuration (optional section).
    /// When absent, diagrams are disabled.
    diagrams: Option<DiagramsConfigRaw>,

    /// Resolved site configuration (set after loading).
    #[serde(skip)]
    pub site_resolved: SiteConfig,
    /// Resolved diagrams configuration (set after loading).
    #[serde(skip)]
    pub diagrams_resolved: Option<DiagramsConfig>,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 3000,
        }
    }
}

/// Raw site configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SiteConfigRaw {
    title: Option<String>,
    source_dir: Option<String>,
    output_dir: Option<String>,
    pages: Option<Vec<String>>,
    not_found: Option<String>,
    redirects: Option<Vec<String>>,
    footer: Option<String>,
    stylesheet: Option<String>,
}

/// Resolved site configuration with absolute paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    /// Site name shown in the navigation bar.
    pub title: String,
    /// Directory holding the markdown posts.
    pub source_dir: PathBuf,
    /// Directory the built site is written to.
    pub output_dir: PathBuf,
    /// Top-level page slugs, in navigation order. `home` is served at `/`.
    pub pages: Vec<String>,
    /// Slug of the page served for unknown paths.
    pub not_found: String,
    /// Legacy paths permanently redirected to `/posts{path}`.
    pub redirects: Vec<String>,
    /// Footer text.
    pub footer: Option<String>,
    /// Stylesheet inlined into every page.
    pub stylesheet: Option<PathBuf>,
}

impl SiteConfig {
    fn with_base(base: &Path) -> Self {
        Self {
            title: "folio".to_owned(),
            source_dir: base.join("posts"),
            output_dir: base.join("dist"),
            pages: default_pages(),
            not_found: "page-404".to_owned(),
            redirects: Vec::new(),
            footer: None,
            stylesheet: None,
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self::with_base(Path::new("."))
    }
}

fn default_pages() -> Vec<String> {
    ["home", "about", "contact"]
        .into_iter()
        .map(str::to_owned)
        .collect()
}

/// Syntax highlighting configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// syntect theme the stylesheet is generated from.
    pub theme: String,
    /// Extra language tags mapped to grammar names (e.g. `toml = "Rust"`).
    pub aliases: BTreeMap<String, String>,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_owned(),
            aliases: BTreeMap::new(),
        }
    }
}

/// Diagram engine selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// Kroki HTTP server.
    #[default]
    Kroki,
    /// mermaid-cli subprocess.
    Mmdc,
}

/// Raw diagrams configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DiagramsConfigRaw {
    engine: Option<EngineKind>,
    kroki_url: Option<String>,
    timeout_secs: Option<u64>,
}

/// Resolved diagram rendering configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramsConfig {
    /// Engine rendering the diagrams.
    pub engine: EngineKind,
    /// Kroki server URL, used by the Kroki engine.
    pub kroki_url: String,
    /// Time allowed for one diagram render.
    pub timeout: Duration,
}

impl Default for DiagramsConfig {
    fn default() -> Self {
        Self {
            engine: EngineKind::Kroki,
            kroki_url: DEFAULT_KROKI_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`server.host`").
        field: String,
        /// Error message (e.g., "${`FOLIO_HOST`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

/// Require a page slug to be a single non-empty path segment.
fn require_slug(slug: &str, field: &str) -> Result<(), ConfigError> {
    require_non_empty(slug, field)?;
    if slug.contains('/') || slug == "." || slug == ".." {
        return Err(ConfigError::Validation(format!(
            "{field} must be a single path segment, got {slug:?}"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `folio.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails, or
    /// the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(source_dir) = &settings.source_dir {
            self.site_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(output_dir) = &settings.output_dir {
            self.site_resolved.output_dir.clone_from(output_dir);
        }
        if let Some(kroki_url) = &settings.kroki_url {
            let diagrams = self.diagrams_resolved.get_or_insert_with(DiagramsConfig::default);
            diagrams.engine = EngineKind::Kroki;
            diagrams.kroki_url.clone_from(kroki_url);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            server: ServerConfig::default(),
            site: SiteConfigRaw::default(),
            highlight: HighlightConfig::default(),
            diagrams: None,
            site_resolved: SiteConfig::with_base(base),
            diagrams_resolved: None,
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_site()?;
        self.validate_diagrams()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        Ok(())
    }

    fn validate_site(&self) -> Result<(), ConfigError> {
        let site = &self.site_resolved;
        require_non_empty(&site.title, "site.title")?;
        require_slug(&site.not_found, "site.not_found")?;

        if site.pages.is_empty() {
            return Err(ConfigError::Validation(
                "site.pages must list at least one page".to_owned(),
            ));
        }
        for page in &site.pages {
            require_slug(page, "site.pages")?;
        }

        for redirect in &site.redirects {
            if !redirect.starts_with('/') || redirect.len() < 2 {
                return Err(ConfigError::Validation(format!(
                    "site.redirects entries must be absolute paths, got {redirect:?}"
                )));
            }
            if redirect.contains(['{', '}', '*', '?', '#']) {
                return Err(ConfigError::Validation(format!(
                    "site.redirects entries must be literal paths, got {redirect:?}"
                )));
            }
        }

        Ok(())
    }

    fn validate_diagrams(&self) -> Result<(), ConfigError> {
        let Some(diagrams) = &self.diagrams_resolved else {
            return Ok(());
        };

        if diagrams.engine == EngineKind::Kroki {
            require_non_empty(&diagrams.kroki_url, "diagrams.kroki_url")?;
            require_http_url(&diagrams.kroki_url, "diagrams.kroki_url")?;
        }
        if diagrams.timeout.is_zero() {
            return Err(ConfigError::Validation(
                "diagrams.timeout_secs must be greater than 0".to_owned(),
            ));
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;
        expand::expand_opt(&mut self.site.title, "site.title")?;
        expand::expand_opt(&mut self.site.footer, "site.footer")?;

        if let Some(diagrams) = &mut self.diagrams {
            expand::expand_opt(&mut diagrams.kroki_url, "diagrams.kroki_url")?;
        }

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));
        let site = std::mem::take(&mut self.site);
        let defaults = SiteConfig::with_base(config_dir);

        self.site_resolved = SiteConfig {
            title: site.title.unwrap_or(defaults.title),
            source_dir: resolve(site.source_dir.as_deref(), "posts"),
            output_dir: resolve(site.output_dir.as_deref(), "dist"),
            pages: site.pages.unwrap_or(defaults.pages),
            not_found: site.not_found.unwrap_or(defaults.not_found),
            redirects: site.redirects.unwrap_or_default(),
            footer: site.footer,
            stylesheet: site.stylesheet.map(|path| config_dir.join(path)),
        };

        self.diagrams_resolved = self.diagrams.as_ref().map(|diagrams| DiagramsConfig {
            engine: diagrams.engine.unwrap_or_default(),
            kroki_url: diagrams
                .kroki_url
                .clone()
                .unwrap_or_else(|| DEFAULT_KROKI_URL.to_owned()),
            timeout: Duration::from_secs(diagrams.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        });
    }
}
