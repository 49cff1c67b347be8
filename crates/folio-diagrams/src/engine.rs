//! Diagram engine seam.

use std::future::Future;

use crate::{AnchorId, DiagramConfig, DiagramError, KrokiEngine, MermaidCliEngine};

/// Output of one engine render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedDiagram {
    /// SVG document rendered by the engine.
    pub svg: String,
}

/// An asynchronous diagram renderer.
///
/// [`initialize`](Self::initialize) is called with the fixed
/// [`DIAGRAM_CONFIG`](crate::DIAGRAM_CONFIG) before every render;
/// [`render`](Self::render) turns diagram text into SVG whose root element is
/// identified by `id`.
pub trait DiagramEngine: Send + Sync {
    /// Apply engine configuration for subsequent renders.
    fn initialize(&self, config: &DiagramConfig) -> Result<(), DiagramError>;

    /// Render diagram source text.
    fn render(
        &self,
        id: &AnchorId,
        source: &str,
    ) -> impl Future<Output = Result<RenderedDiagram, DiagramError>> + Send;
}

/// Engine chosen at runtime from configuration.
pub enum ConfiguredEngine {
    /// Render through a Kroki server.
    Kroki(KrokiEngine),
    /// Render through the mermaid-cli subprocess.
    MermaidCli(MermaidCliEngine),
}

impl DiagramEngine for ConfiguredEngine {
    fn initialize(&self, config: &DiagramConfig) -> Result<(), DiagramError> {
        match self {
            Self::Kroki(engine) => engine.initialize(config),
            Self::MermaidCli(engine) => engine.initialize(config),
        }
    }

    async fn render(&self, id: &AnchorId, source: &str) -> Result<RenderedDiagram, DiagramError> {
        match self {
            Self::Kroki(engine) => engine.render(id, source).await,
            Self::MermaidCli(engine) => engine.render(id, source).await,
        }
    }
}
