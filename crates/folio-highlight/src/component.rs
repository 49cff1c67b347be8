//! The `CodeBlock` component.

use std::fmt::Write;

use folio_markup::{Begin, RenderSlot, RenderState, TrustedMarkup, escape_html};

use crate::{HighlightError, Highlighter, render};

/// Inputs of a [`CodeBlock`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeBlockProps {
    /// Source text to highlight.
    pub code: String,
    /// Language tag selecting the grammar (`"rust"`, `"jsx"`, ...).
    pub language: String,
}

impl CodeBlockProps {
    /// Create props from source text and a language tag.
    pub fn new(code: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            language: language.into(),
        }
    }
}

/// A mounted, highlighted code block.
///
/// Highlighting runs synchronously in [`on_mount`](Self::on_mount), at most
/// once per mounted instance. Calling it again returns the stored markup (or
/// the stored failure) without touching the engine. Replacing props with
/// [`set_props`](Self::set_props) does not re-highlight; call
/// [`invalidate`](Self::invalidate) to force one more render.
///
/// Engine errors are returned to the caller unchanged. Wrap the result in an
/// [`ErrorBoundary`](folio_markup::ErrorBoundary) to keep a page rendering
/// when a block fails.
#[derive(Debug)]
pub struct CodeBlock {
    props: CodeBlockProps,
    slot: RenderSlot<HighlightError>,
}

impl CodeBlock {
    /// Mount a code block. Nothing is highlighted until the mount effect runs.
    #[must_use]
    pub fn mount(props: CodeBlockProps) -> Self {
        Self {
            props,
            slot: RenderSlot::new(),
        }
    }

    /// Run the mount effect: highlight on first evaluation, reuse afterwards.
    pub fn on_mount<H: Highlighter + ?Sized>(
        &self,
        highlighter: &H,
    ) -> Result<TrustedMarkup, HighlightError> {
        match self.slot.begin() {
            Begin::Start(ticket) => {
                let result = render(highlighter, &self.props.code, &self.props.language);
                self.slot.finish(ticket, result.clone());
                result
            }
            Begin::Ready(markup) => Ok(markup),
            Begin::Failed(err) => Err(err),
            // Another thread holds the render; nothing to show yet.
            Begin::InFlight => Ok(TrustedMarkup::default()),
        }
    }

    /// Replace the props.
    ///
    /// The displayed markup keeps reflecting the props the block was first
    /// rendered with until [`invalidate`](Self::invalidate) is called.
    pub fn set_props(&mut self, props: CodeBlockProps) {
        self.props = props;
    }

    /// Discard the stored markup; the next [`on_mount`](Self::on_mount) highlights again.
    pub fn invalidate(&self) {
        self.slot.invalidate();
    }

    /// Current props.
    #[must_use]
    pub fn props(&self) -> &CodeBlockProps {
        &self.props
    }

    /// Current render state.
    #[must_use]
    pub fn state(&self) -> RenderState<HighlightError> {
        self.slot.state()
    }

    /// Embeddable markup for the block.
    ///
    /// The highlighted markup is injected raw into the `<code>` element; it is
    /// empty until the mount effect has succeeded.
    #[must_use]
    pub fn view(&self) -> String {
        let markup = self.slot.markup().unwrap_or_default();
        let mut out = String::with_capacity(markup.as_str().len() + 64);
        write!(
            out,
            r#"<div class="Code"><pre><code class="language-{}">{}</code></pre></div>"#,
            escape_html(&self.props.language),
            markup
        )
        .unwrap();
        out
    }

    /// Tear the instance down.
    pub fn unmount(self) {
        self.slot.retire();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use folio_markup::ErrorBoundary;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{Grammar, SyntectHighlighter};

    /// Syntect highlighter that counts engine calls.
    struct CountingHighlighter {
        inner: SyntectHighlighter,
        calls: AtomicUsize,
    }

    impl CountingHighlighter {
        fn new() -> Self {
            Self {
                inner: SyntectHighlighter::new(),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Highlighter for CountingHighlighter {
        fn grammar(&self, tag: &str) -> Result<Grammar<'_>, HighlightError> {
            self.inner.grammar(tag)
        }

        fn highlight(
            &self,
            source: &str,
            grammar: &Grammar<'_>,
            tag: &str,
        ) -> Result<String, HighlightError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.highlight(source, grammar, tag)
        }
    }

    #[test]
    fn test_view_before_mount_effect_is_empty() {
        let block = CodeBlock::mount(CodeBlockProps::new("let x = 1;", "rust"));
        assert_eq!(
            block.view(),
            r#"<div class="Code"><pre><code class="language-rust"></code></pre></div>"#
        );
        assert_eq!(block.state(), RenderState::Uncomputed);
    }

    #[test]
    fn test_rust_block_contains_engine_output() {
        let highlighter = SyntectHighlighter::new();
        let block = CodeBlock::mount(CodeBlockProps::new("let x = 1;", "rust"));
        block.on_mount(&highlighter).unwrap();

        let expected = render(&highlighter, "let x = 1;", "rust").unwrap();
        assert_eq!(
            block.view(),
            format!(
                r#"<div class="Code"><pre><code class="language-rust">{expected}</code></pre></div>"#
            )
        );
    }

    #[test]
    fn test_highlights_at_most_once_per_mount() {
        let highlighter = CountingHighlighter::new();
        let block = CodeBlock::mount(CodeBlockProps::new("print('hi')\n", "python"));

        let first = block.on_mount(&highlighter).unwrap();
        let view = block.view();
        for _ in 0..3 {
            assert_eq!(block.on_mount(&highlighter).unwrap(), first);
            assert_eq!(block.view(), view);
        }
        assert_eq!(highlighter.calls(), 1);
    }

    #[test]
    fn test_set_props_keeps_first_render() {
        let highlighter = CountingHighlighter::new();
        let mut block = CodeBlock::mount(CodeBlockProps::new("let a = 1;", "rust"));
        block.on_mount(&highlighter).unwrap();
        let view = block.view();

        block.set_props(CodeBlockProps::new("let zebra = 2;", "rust"));
        block.on_mount(&highlighter).unwrap();
        assert_eq!(block.view(), view);
        assert!(!block.view().contains("zebra"));
        assert_eq!(highlighter.calls(), 1);
    }

    #[test]
    fn test_invalidate_rehighlights_new_props() {
        let highlighter = CountingHighlighter::new();
        let mut block = CodeBlock::mount(CodeBlockProps::new("let a = 1;", "rust"));
        block.on_mount(&highlighter).unwrap();

        block.set_props(CodeBlockProps::new("let zebra = 2;", "rust"));
        block.invalidate();
        block.on_mount(&highlighter).unwrap();

        assert!(block.view().contains("zebra"));
        assert_eq!(highlighter.calls(), 2);
    }

    #[test]
    fn test_unknown_language_propagates() {
        let highlighter = CountingHighlighter::new();
        let block = CodeBlock::mount(CodeBlockProps::new("IDENTIFICATION DIVISION.", "cobol-85"));

        let err = block.on_mount(&highlighter).unwrap_err();
        assert_eq!(err, HighlightError::UnknownLanguage("cobol-85".to_owned()));
        // Failure is sticky and the engine is not called again
        assert_eq!(block.on_mount(&highlighter).unwrap_err(), err);
        assert_eq!(highlighter.calls(), 0);
        assert!(matches!(block.state(), RenderState::Failed(_)));
    }

    #[test]
    fn test_unknown_language_reaches_error_boundary() {
        let highlighter = SyntectHighlighter::new();
        let mut boundary = ErrorBoundary::new();

        let good = CodeBlock::mount(CodeBlockProps::new("x = 1\n", "python"));
        let bad = CodeBlock::mount(CodeBlockProps::new("x", "no-such-lang"));

        let good_markup = boundary.catch("code", good.on_mount(&highlighter));
        let bad_markup = boundary.catch("code", bad.on_mount(&highlighter));

        assert!(!good_markup.is_empty());
        assert!(bad_markup.as_str().contains("render-error"));
        assert!(bad_markup.as_str().contains("unknown language: no-such-lang"));
        assert_eq!(boundary.warnings().len(), 1);
    }

    #[test]
    fn test_language_class_is_escaped() {
        let block = CodeBlock::mount(CodeBlockProps::new("x", r#"a"b"#));
        assert!(block.view().contains(r#"class="language-a&quot;b""#));
    }

    #[test]
    fn test_unmount() {
        let highlighter = SyntectHighlighter::new();
        let block = CodeBlock::mount(CodeBlockProps::new("let x = 1;", "rust"));
        block.on_mount(&highlighter).unwrap();
        block.unmount();
    }
}
