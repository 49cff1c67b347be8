//! Syntax-highlighted code blocks for folio.
//!
//! This crate provides the [`CodeBlock`] component: given source text and a
//! language tag, it highlights the text once on mount and exposes the result
//! inside a `<pre><code class="language-…">` block.
//!
//! Highlighting itself is delegated to an engine behind the [`Highlighter`]
//! trait. [`SyntectHighlighter`] is the production engine; it emits classed
//! HTML (`<span class="syntect-…">`) so that colors come from a stylesheet
//! generated by [`theme_css`].
//!
//! # Example
//!
//! ```
//! use folio_highlight::{CodeBlock, CodeBlockProps, SyntectHighlighter};
//!
//! let highlighter = SyntectHighlighter::new();
//! let block = CodeBlock::mount(CodeBlockProps::new("let x = 1;", "rust"));
//! block.on_mount(&highlighter)?;
//!
//! assert!(block.view().contains(r#"<code class="language-rust">"#));
//! # Ok::<(), folio_highlight::HighlightError>(())
//! ```

mod component;
mod engine;
mod error;
mod grammar;
mod theme;

pub use component::{CodeBlock, CodeBlockProps};
pub use engine::{Highlighter, SyntectHighlighter, render};
pub use error::HighlightError;
pub use grammar::{Grammar, GrammarRegistry};
pub use theme::{CSS_PREFIX, DEFAULT_THEME, theme_css};
