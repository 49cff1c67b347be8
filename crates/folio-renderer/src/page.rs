//! Markdown page rendering.

use std::sync::Arc;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use tokio::task::JoinSet;

use folio_diagrams::{Diagram, DiagramEngine, DiagramProps};
use folio_highlight::{CodeBlock, CodeBlockProps, Highlighter};
use folio_markup::{ErrorBoundary, TrustedMarkup, escape_html};

use crate::{FenceInfo, PageError, parse_fence_info};

/// Fence language routed to the diagram component.
pub const MERMAID: &str = "mermaid";

/// A rendered page body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedPage {
    /// Text of the leading H1.
    pub title: String,
    /// Body HTML, including the title heading.
    pub html: String,
    /// Component failures caught while rendering.
    pub warnings: Vec<String>,
}

/// Renders markdown pages, mounting a component per fenced block.
///
/// Fences tagged `mermaid` become [`Diagram`]s when a diagram engine is
/// configured; every other tagged fence becomes a [`CodeBlock`]. Component
/// failures are caught by an [`ErrorBoundary`] and rendered in place.
pub struct PageRenderer<H, E> {
    highlighter: H,
    engine: Option<Arc<E>>,
}

impl<H: Highlighter, E: DiagramEngine + 'static> PageRenderer<H, E> {
    /// Create a renderer without diagram support.
    ///
    /// `mermaid` fences are emitted as plain code blocks.
    #[must_use]
    pub fn new(highlighter: H) -> Self {
        Self {
            highlighter,
            engine: None,
        }
    }

    /// Render `mermaid` fences with `engine`.
    #[must_use]
    pub fn with_diagrams(mut self, engine: Arc<E>) -> Self {
        self.engine = Some(engine);
        self
    }

    /// The highlighter used for code blocks.
    #[must_use]
    pub fn highlighter(&self) -> &H {
        &self.highlighter
    }

    /// Render a markdown page.
    ///
    /// Diagrams are rendered concurrently once the document has been walked,
    /// then spliced back into their placeholders.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::MissingTitle`] if the page does not open with a
    /// level-1 heading.
    pub async fn render(&self, markdown: &str) -> Result<RenderedPage, PageError> {
        let title = page_title(markdown)?;
        let placeholders = Placeholders::for_source(markdown);
        let mut boundary = ErrorBoundary::new();
        let mut diagrams = Vec::new();
        let mut fence: Option<(FenceInfo, String)> = None;
        let mut events = Vec::new();

        for event in Parser::new_ext(markdown, options()) {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let info = match kind {
                        CodeBlockKind::Fenced(info) => parse_fence_info(&info),
                        CodeBlockKind::Indented => FenceInfo::default(),
                    };
                    fence = Some((info, String::new()));
                }
                Event::Text(text) if fence.is_some() => {
                    if let Some((_, code)) = fence.as_mut() {
                        code.push_str(&text);
                    }
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((info, code)) = fence.take() {
                        let html = self.code_block(
                            &info,
                            code,
                            &placeholders,
                            &mut diagrams,
                            &mut boundary,
                        );
                        events.push(Event::Html(html.into()));
                    }
                }
                other => events.push(other),
            }
        }

        let mut html = String::with_capacity(markdown.len() * 2);
        pulldown_cmark::html::push_html(&mut html, events.into_iter());

        if !diagrams.is_empty() {
            tracing::debug!(count = diagrams.len(), "rendering diagrams");
            let mut tasks = JoinSet::new();
            for (index, diagram) in diagrams.iter().enumerate() {
                let effect = diagram.effect();
                tasks.spawn(async move { (index, effect.await) });
            }

            let mut outcomes = Vec::with_capacity(diagrams.len());
            while let Some(joined) = tasks.join_next().await {
                outcomes.push(joined?);
            }
            outcomes.sort_by_key(|(index, _)| *index);

            let mut markups = Vec::with_capacity(diagrams.len());
            for ((_, outcome), diagram) in outcomes.into_iter().zip(diagrams) {
                markups.push(boundary.catch(
                    "Diagram",
                    outcome.map(|_| TrustedMarkup::trusted(diagram.view())),
                ));
                diagram.unmount();
            }
            html = placeholders.splice(&html, &markups);
        }

        Ok(RenderedPage {
            title,
            html,
            warnings: boundary.into_warnings(),
        })
    }

    fn code_block(
        &self,
        info: &FenceInfo,
        code: String,
        placeholders: &Placeholders,
        diagrams: &mut Vec<Diagram<E>>,
        boundary: &mut ErrorBoundary,
    ) -> String {
        match (info.language.as_deref(), &self.engine) {
            (Some(MERMAID), Some(engine)) => {
                let mut props = DiagramProps::text(code);
                if let Some(title) = info.attrs.get("title") {
                    props = props.with_title(title);
                }
                let placeholder = placeholders.marker(diagrams.len());
                diagrams.push(Diagram::mount(props, Arc::clone(engine)));
                format!("{placeholder}\n")
            }
            (Some(language), _) if language != MERMAID => {
                let block = CodeBlock::mount(CodeBlockProps::new(code, language));
                let result = block
                    .on_mount(&self.highlighter)
                    .map(|_| TrustedMarkup::trusted(block.view()));
                let mut html = boundary.catch("CodeBlock", result).into_string();
                html.push('\n');
                html
            }
            (language, _) => plain_code_block(language, &code),
        }
    }
}

fn options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES
}

/// Markers standing in for diagrams until their markup is ready.
///
/// A marker is an HTML comment. The writer escapes `<` in text, attributes
/// and highlighted code, so only raw HTML from the source could spell one
/// out; the tag is chosen so that it never occurs in the source.
struct Placeholders {
    tag: String,
}

impl Placeholders {
    fn for_source(markdown: &str) -> Self {
        let mut nonce = 0_u64;
        let mut tag = format!("folio-diagram-{nonce}");
        while markdown.contains(&tag) {
            nonce += 1;
            tag = format!("folio-diagram-{nonce}");
        }
        Self { tag }
    }

    fn marker(&self, index: usize) -> String {
        format!("<!--{}:{index}-->", self.tag)
    }

    /// Replace each marker, in document order, with its markup.
    fn splice(&self, html: &str, markups: &[TrustedMarkup]) -> String {
        let extra: usize = markups.iter().map(|markup| markup.as_str().len()).sum();
        let mut out = String::with_capacity(html.len() + extra);
        let mut rest = html;
        for (index, markup) in markups.iter().enumerate() {
            let marker = self.marker(index);
            if let Some(pos) = rest.find(&marker) {
                out.push_str(&rest[..pos]);
                out.push_str(markup.as_str());
                rest = &rest[pos + marker.len()..];
            }
        }
        out.push_str(rest);
        out
    }
}

fn plain_code_block(language: Option<&str>, code: &str) -> String {
    match language {
        Some(language) => format!(
            "<pre><code class=\"language-{}\">{}</code></pre>\n",
            escape_html(language),
            escape_html(code)
        ),
        None => format!("<pre><code>{}</code></pre>\n", escape_html(code)),
    }
}

/// Text of the heading the page opens with.
fn page_title(markdown: &str) -> Result<String, PageError> {
    let mut events = Parser::new_ext(markdown, options());
    if !matches!(
        events.next(),
        Some(Event::Start(Tag::Heading {
            level: HeadingLevel::H1,
            ..
        }))
    ) {
        return Err(PageError::MissingTitle);
    }

    let mut title = String::new();
    for event in events {
        match event {
            Event::Text(text) | Event::Code(text) => title.push_str(&text),
            Event::End(TagEnd::Heading(_)) => break,
            _ => {}
        }
    }

    let title = title.trim();
    if title.is_empty() {
        return Err(PageError::MissingTitle);
    }
    Ok(title.to_owned())
}
