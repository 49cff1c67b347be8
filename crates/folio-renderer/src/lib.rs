//! Markdown page rendering for folio.
//!
//! [`PageRenderer`] turns one markdown post into body HTML. Fenced code blocks
//! are mounted as components: `mermaid` fences as
//! [`Diagram`](folio_diagrams::Diagram)s, everything else with a language tag
//! as [`CodeBlock`](folio_highlight::CodeBlock)s. A failing component is
//! replaced by an error figure and reported in [`RenderedPage::warnings`].
//!
//! [`Layout`] wraps a rendered page into a complete document with the site
//! navigation, inline styles and footer.
//!
//! # Example
//!
//! ```
//! use folio_diagrams::ConfiguredEngine;
//! use folio_highlight::SyntectHighlighter;
//! use folio_renderer::PageRenderer;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), folio_renderer::PageError> {
//! let renderer = PageRenderer::<_, ConfiguredEngine>::new(SyntectHighlighter::new());
//! let page = renderer.render("# Hello\n\n```rust\nfn main() {}\n```\n").await?;
//! assert_eq!(page.title, "Hello");
//! # Ok(())
//! # }
//! ```

mod error;
mod fence;
mod layout;
mod page;

pub use error::PageError;
pub use fence::{FenceInfo, parse_fence_info};
pub use layout::{Layout, NavLink};
pub use page::{MERMAID, PageRenderer, RenderedPage};
