//! Site rendering and building.

use std::path::PathBuf;
use std::sync::Arc;

use folio_config::{Config, DiagramsConfig, EngineKind, HighlightConfig, SiteConfig};
use folio_diagrams::{ConfiguredEngine, KrokiEngine, MermaidCliEngine};
use folio_highlight::{GrammarRegistry, SyntectHighlighter, theme_css};
use folio_renderer::{Layout, NavLink, PageRenderer};

use crate::BuildError;
use crate::source::{self, PostSource};

/// Name of the generated highlighting stylesheet in the output directory.
pub const SYNTAX_CSS: &str = "syntax.css";

/// A post rendered into a complete HTML document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuiltPage {
    /// Slug the page is served and written under.
    pub slug: String,
    /// Page title.
    pub title: String,
    /// Complete HTML document.
    pub html: String,
    /// Component failures caught while rendering.
    pub warnings: Vec<String>,
}

/// Summary of a finished build.
#[derive(Debug, PartialEq, Eq)]
pub struct BuildReport {
    /// Directory the site was written to.
    pub output_dir: PathBuf,
    /// Number of pages written.
    pub pages: usize,
    /// Number of SVG assets copied.
    pub assets: usize,
    /// Number of component failures across all pages.
    pub warnings: usize,
}

/// Build the diagram engine selected by configuration.
#[must_use]
pub fn diagram_engine(config: &DiagramsConfig) -> ConfiguredEngine {
    match config.engine {
        EngineKind::Kroki => ConfiguredEngine::Kroki(KrokiEngine::with_timeout(
            config.kroki_url.as_str(),
            config.timeout,
        )),
        EngineKind::Mmdc => {
            ConfiguredEngine::MermaidCli(MermaidCliEngine::new().with_timeout(config.timeout))
        }
    }
}

/// A site ready to render: configured renderer, layout and stylesheet.
pub struct Site {
    config: SiteConfig,
    renderer: PageRenderer<SyntectHighlighter, ConfiguredEngine>,
    layout: Layout,
    syntax_css: String,
}

impl Site {
    /// Create a site from loaded configuration, reading the stylesheet if set.
    ///
    /// # Errors
    ///
    /// Returns an error if the stylesheet cannot be read, the highlight theme
    /// is unknown or an alias names a missing grammar.
    pub async fn from_config(config: &Config) -> Result<Self, BuildError> {
        let site = &config.site_resolved;
        let stylesheet = match &site.stylesheet {
            Some(path) => tokio::fs::read_to_string(path)
                .await
                .map_err(BuildError::io(path))?,
            None => String::new(),
        };
        Self::new(
            site.clone(),
            &config.highlight,
            config.diagrams_resolved.as_ref(),
            stylesheet,
        )
    }

    /// Create a site from its parts.
    ///
    /// # Errors
    ///
    /// Returns an error if the highlight theme is unknown or an alias names a
    /// missing grammar.
    pub fn new(
        config: SiteConfig,
        highlight: &HighlightConfig,
        diagrams: Option<&DiagramsConfig>,
        stylesheet: String,
    ) -> Result<Self, BuildError> {
        let mut registry = GrammarRegistry::with_defaults();
        for (tag, grammar) in &highlight.aliases {
            registry.register_alias(tag, grammar)?;
        }

        let mut renderer = PageRenderer::new(SyntectHighlighter::with_registry(registry));
        if let Some(diagrams) = diagrams {
            renderer = renderer.with_diagrams(Arc::new(diagram_engine(diagrams)));
        }

        let syntax_css = theme_css(&highlight.theme)?;
        let mut styles = stylesheet;
        if !styles.is_empty() && !styles.ends_with('\n') {
            styles.push('\n');
        }
        styles.push_str(&syntax_css);

        let layout = Layout {
            site_title: config.title.clone(),
            nav: config.pages.iter().map(|page| NavLink::for_page(page)).collect(),
            footer: config.footer.clone(),
            styles,
        };

        Ok(Self {
            config,
            renderer,
            layout,
            syntax_css,
        })
    }

    /// Site configuration.
    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Render every post in the source directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the source directory cannot be read or a post
    /// cannot be rendered.
    pub async fn render(&self) -> Result<Vec<BuiltPage>, BuildError> {
        let files = source::scan(&self.config.source_dir).await?;
        let mut pages = Vec::with_capacity(files.posts.len());
        for post in &files.posts {
            pages.push(self.render_post(post).await?);
        }
        Ok(pages)
    }

    async fn render_post(&self, post: &PostSource) -> Result<BuiltPage, BuildError> {
        let markdown = tokio::fs::read_to_string(&post.path)
            .await
            .map_err(BuildError::io(&post.path))?;
        let page = self
            .renderer
            .render(&markdown)
            .await
            .map_err(|source| BuildError::Page {
                path: post.path.clone(),
                source,
            })?;

        for warning in &page.warnings {
            tracing::warn!(post = %post.slug, warning = %warning, "page rendered with errors");
        }
        tracing::debug!(post = %post.slug, title = %page.title, "rendered post");

        Ok(BuiltPage {
            slug: post.slug.clone(),
            title: page.title.clone(),
            html: self.layout.render(&page),
            warnings: page.warnings,
        })
    }

    /// Render the site and write it to the output directory.
    ///
    /// Writes `{slug}.html` per post, the highlighting stylesheet as
    /// [`SYNTAX_CSS`] and copies of the SVG files found next to the posts.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails or the output cannot be written.
    pub async fn build(&self) -> Result<BuildReport, BuildError> {
        let output_dir = &self.config.output_dir;
        let files = source::scan(&self.config.source_dir).await?;

        tokio::fs::create_dir_all(output_dir)
            .await
            .map_err(BuildError::io(output_dir))?;

        let mut warnings = 0;
        for post in &files.posts {
            let page = self.render_post(post).await?;
            warnings += page.warnings.len();
            let target = output_dir.join(format!("{}.html", page.slug));
            tokio::fs::write(&target, page.html)
                .await
                .map_err(BuildError::io(&target))?;
        }

        let css_path = output_dir.join(SYNTAX_CSS);
        tokio::fs::write(&css_path, &self.syntax_css)
            .await
            .map_err(BuildError::io(&css_path))?;

        for asset in &files.assets {
            if let Some(name) = asset.file_name() {
                let target = output_dir.join(name);
                tokio::fs::copy(asset, &target)
                    .await
                    .map_err(BuildError::io(&target))?;
            }
        }

        tracing::info!(
            pages = files.posts.len(),
            assets = files.assets.len(),
            output = %output_dir.display(),
            "site built"
        );

        Ok(BuildReport {
            output_dir: output_dir.clone(),
            pages: files.posts.len(),
            assets: files.assets.len(),
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use folio_renderer::PageError;
    use pretty_assertions::assert_eq;

    use super::*;

    fn site_config(root: &Path) -> SiteConfig {
        SiteConfig {
            title: "RATSM".to_owned(),
            source_dir: root.join("posts"),
            output_dir: root.join("dist"),
            pages: vec!["home".to_owned(), "about".to_owned()],
            not_found: "page-404".to_owned(),
            redirects: Vec::new(),
            footer: Some("Made with coffee".to_owned()),
            stylesheet: None,
        }
    }

    fn write_post(root: &Path, name: &str, content: &str) {
        let posts = root.join("posts");
        std::fs::create_dir_all(&posts).unwrap();
        std::fs::write(posts.join(name), content).unwrap();
    }

    #[tokio::test]
    async fn test_render_posts() {
        let dir = tempfile::tempdir().unwrap();
        write_post(dir.path(), "home.md", "# Welcome\n\nHi.");
        write_post(
            dir.path(),
            "orphan-rules.md",
            "# Orphan Rules\n\n```toml\n[package]\n```\n",
        );

        let mut highlight = HighlightConfig::default();
        highlight
            .aliases
            .insert("toml".to_owned(), "Rust".to_owned());
        let site = Site::new(site_config(dir.path()), &highlight, None, String::new()).unwrap();
        let pages = site.render().await.unwrap();

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].slug, "home");
        assert_eq!(pages[0].title, "Welcome");
        assert!(pages[0].html.contains("<title>Welcome</title>"));
        assert!(pages[0].html.contains(r#"<a href="/about">About</a>"#));
        assert!(pages[0].html.contains("<footer>Made with coffee</footer>"));
        assert!(pages[1].html.contains(r#"<code class="language-toml">"#));
        assert!(pages[1].warnings.is_empty());
    }

    #[tokio::test]
    async fn test_build_writes_output() {
        let dir = tempfile::tempdir().unwrap();
        write_post(dir.path(), "the-edge.md", "# The Edge\n\n```cobol\nx\n```\n");
        write_post(dir.path(), "flow.svg", "<svg id=\"flow\"/>");

        let config = site_config(dir.path());
        let site = Site::new(config, &HighlightConfig::default(), None, "body{}".to_owned())
            .unwrap();
        let report = site.build().await.unwrap();

        let dist = dir.path().join("dist");
        assert_eq!(
            report,
            BuildReport {
                output_dir: dist.clone(),
                pages: 1,
                assets: 1,
                warnings: 1,
            }
        );

        let html = std::fs::read_to_string(dist.join("the-edge.html")).unwrap();
        assert!(html.contains("<style>body{}\n"));
        assert!(html.contains(r#"<figure class="render-error">"#));

        let css = std::fs::read_to_string(dist.join(SYNTAX_CSS)).unwrap();
        assert!(css.contains(".syntect-"));
        assert_eq!(
            std::fs::read_to_string(dist.join("flow.svg")).unwrap(),
            "<svg id=\"flow\"/>"
        );
    }

    #[tokio::test]
    async fn test_missing_title_names_post() {
        let dir = tempfile::tempdir().unwrap();
        write_post(dir.path(), "untitled.md", "no heading here");

        let site = Site::new(
            site_config(dir.path()),
            &HighlightConfig::default(),
            None,
            String::new(),
        )
        .unwrap();
        let err = site.build().await.unwrap_err();

        let BuildError::Page { path, source } = err else {
            panic!("expected page error, got {err:?}");
        };
        assert_eq!(path, dir.path().join("posts/untitled.md"));
        assert!(matches!(source, PageError::MissingTitle));
    }

    #[test]
    fn test_unknown_theme_is_error() {
        let highlight = HighlightConfig {
            theme: "no-such-theme".to_owned(),
            ..HighlightConfig::default()
        };
        let result = Site::new(site_config(Path::new("/x")), &highlight, None, String::new());
        assert!(matches!(result, Err(BuildError::Highlight(_))));
    }

    #[test]
    fn test_diagram_engine_selection() {
        let kroki = diagram_engine(&DiagramsConfig::default());
        assert!(matches!(kroki, ConfiguredEngine::Kroki(ref e) if e.kroki_url() == "https://kroki.io"));

        let mmdc = diagram_engine(&DiagramsConfig {
            engine: EngineKind::Mmdc,
            ..DiagramsConfig::default()
        });
        assert!(matches!(mmdc, ConfiguredEngine::MermaidCli(_)));
    }
}
