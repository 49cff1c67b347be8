//! Highlighting engine seam and the syntect implementation.

use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::util::LinesWithEndings;

use folio_markup::TrustedMarkup;

use crate::theme::CSS_PREFIX;
use crate::{Grammar, GrammarRegistry, HighlightError};

/// A syntax-highlighting engine.
///
/// Mirrors the two calls a highlighter exposes: look up the grammar for a
/// language tag, then tokenize source text with it into markup.
pub trait Highlighter {
    /// Resolve the grammar registered for `tag`.
    fn grammar(&self, tag: &str) -> Result<Grammar<'_>, HighlightError>;

    /// Highlight `source` with `grammar`, returning markup.
    fn highlight(
        &self,
        source: &str,
        grammar: &Grammar<'_>,
        tag: &str,
    ) -> Result<String, HighlightError>;
}

/// Resolve the grammar for `tag` and highlight `source` with it.
pub fn render<H: Highlighter + ?Sized>(
    highlighter: &H,
    source: &str,
    tag: &str,
) -> Result<TrustedMarkup, HighlightError> {
    let grammar = highlighter.grammar(tag)?;
    highlighter
        .highlight(source, &grammar, tag)
        .map(TrustedMarkup::trusted)
}

/// Highlighter producing syntect classed HTML.
///
/// Spans carry space-separated classes prefixed with [`CSS_PREFIX`], styled
/// by the sheet from [`theme_css`](crate::theme_css).
#[derive(Default)]
pub struct SyntectHighlighter {
    registry: GrammarRegistry,
}

impl SyntectHighlighter {
    /// Highlighter over the default grammar registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Highlighter over a custom registry.
    #[must_use]
    pub fn with_registry(registry: GrammarRegistry) -> Self {
        Self { registry }
    }

    /// The grammar registry in use.
    #[must_use]
    pub fn registry(&self) -> &GrammarRegistry {
        &self.registry
    }
}

impl Highlighter for SyntectHighlighter {
    fn grammar(&self, tag: &str) -> Result<Grammar<'_>, HighlightError> {
        self.registry.grammar(tag)
    }

    fn highlight(
        &self,
        source: &str,
        grammar: &Grammar<'_>,
        tag: &str,
    ) -> Result<String, HighlightError> {
        tracing::debug!(tag, grammar = grammar.name(), "highlighting code block");
        let mut generator = ClassedHTMLGenerator::new_with_class_style(
            grammar.syntax,
            self.registry.syntaxes(),
            ClassStyle::SpacedPrefixed { prefix: CSS_PREFIX },
        );
        for line in LinesWithEndings::from(source) {
            generator
                .parse_html_for_line_which_includes_newline(line)
                .map_err(|e| HighlightError::Engine(e.to_string()))?;
        }
        Ok(generator.finalize())
    }
}
