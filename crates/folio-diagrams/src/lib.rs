//! Mermaid diagram rendering for folio.
//!
//! This crate provides the [`Diagram`] component: given an optional title and
//! diagram definition text, it renders an SVG once on mount and exposes it as
//! raw markup.
//!
//! # Architecture
//!
//! The crate is organized into modules:
//! - [`source`]: front-matter assembly and child text flattening
//! - [`engine`]: the async [`DiagramEngine`] seam and the configured-engine enum
//! - [`kroki`]: rendering via a Kroki server over HTTP
//! - [`mmdc`]: rendering via the mermaid-cli (`mmdc`) subprocess
//! - [`component`]: the render-once [`Diagram`] component
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use folio_diagrams::{Diagram, DiagramProps, KrokiEngine};
//!
//! # async fn demo() -> Result<(), folio_diagrams::DiagramError> {
//! let engine = Arc::new(KrokiEngine::new("https://kroki.io"));
//! let diagram = Diagram::mount(DiagramProps::text("graph TD; A-->B;").with_title("Flow"), engine);
//! diagram.on_mount().await?;
//! println!("{}", diagram.view());
//! # Ok(())
//! # }
//! ```

mod anchor;
mod component;
mod config;
mod consts;
mod engine;
mod error;
mod kroki;
mod mmdc;
mod source;

pub use anchor::AnchorId;
pub use component::{Diagram, DiagramProps, RenderOutcome, render};
pub use config::{DIAGRAM_CONFIG, DiagramConfig, DiagramTheme};
pub use consts::DEFAULT_TIMEOUT;
pub use engine::{ConfiguredEngine, DiagramEngine, RenderedDiagram};
pub use error::DiagramError;
pub use kroki::KrokiEngine;
pub use mmdc::MermaidCliEngine;
pub use source::{DiagramChild, assemble_source, children_text};
