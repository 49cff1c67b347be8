//! The `Diagram` component.

use std::future::Future;
use std::sync::Arc;

use folio_markup::{Begin, RenderSlot, RenderState, TrustedMarkup};

use crate::{
    AnchorId, DIAGRAM_CONFIG, DiagramChild, DiagramEngine, DiagramError, assemble_source,
    children_text,
};

/// Inputs of a [`Diagram`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiagramProps {
    /// Optional diagram title, emitted as front matter.
    pub title: Option<String>,
    /// Child content; only its text is used as the definition.
    pub children: Vec<DiagramChild>,
}

impl DiagramProps {
    /// Props from child content.
    #[must_use]
    pub fn new(children: Vec<DiagramChild>) -> Self {
        Self {
            title: None,
            children,
        }
    }

    /// Props whose only child is `definition`.
    pub fn text(definition: impl Into<String>) -> Self {
        Self::new(vec![DiagramChild::Text(definition.into())])
    }

    /// Set the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Diagram source assembled from title and child text.
    #[must_use]
    pub fn source(&self) -> String {
        assemble_source(self.title.as_deref(), &children_text(&self.children))
    }
}

/// What a mount effect produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Markup is stored and visible.
    Ready(TrustedMarkup),
    /// Another effect of the same instance is rendering.
    InFlight,
    /// The instance was unmounted or invalidated before the render resolved;
    /// the result was dropped.
    Discarded,
}

/// Render one diagram: configure the engine, allocate an anchor id and ask the
/// engine for SVG.
pub async fn render<E: DiagramEngine + ?Sized>(
    engine: &E,
    title: Option<&str>,
    definition: &str,
) -> Result<TrustedMarkup, DiagramError> {
    engine.initialize(&DIAGRAM_CONFIG)?;
    let id = AnchorId::next();
    let source = assemble_source(title, definition);
    let rendered = engine.render(&id, &source).await?;
    Ok(TrustedMarkup::trusted(rendered.svg))
}

/// A mounted Mermaid diagram.
///
/// The mount effect renders at most once per instance; until it resolves the
/// view is an empty `<div>`. Late results of an unmounted instance are
/// dropped. Prop changes are not observed until [`invalidate`](Self::invalidate).
///
/// Dropping an effect future mid-render leaves the instance computing;
/// [`invalidate`](Self::invalidate) recovers it.
pub struct Diagram<E> {
    props: DiagramProps,
    engine: Arc<E>,
    slot: Arc<RenderSlot<DiagramError>>,
}

impl<E: DiagramEngine + 'static> Diagram<E> {
    /// Mount a diagram rendered by `engine`.
    #[must_use]
    pub fn mount(props: DiagramProps, engine: Arc<E>) -> Self {
        Self {
            props,
            engine,
            slot: Arc::new(RenderSlot::new()),
        }
    }

    /// The mount effect as a detached future.
    ///
    /// The future owns everything it needs, so it can be spawned and may
    /// outlive the instance.
    pub fn effect(
        &self,
    ) -> impl Future<Output = Result<RenderOutcome, DiagramError>> + Send + 'static {
        let engine = Arc::clone(&self.engine);
        let slot = Arc::clone(&self.slot);
        let title = self.props.title.clone();
        let definition = children_text(&self.props.children);

        async move {
            let ticket = match slot.begin() {
                Begin::Start(ticket) => ticket,
                Begin::Ready(markup) => return Ok(RenderOutcome::Ready(markup)),
                Begin::Failed(err) => return Err(err),
                Begin::InFlight if slot.is_retired() => return Ok(RenderOutcome::Discarded),
                Begin::InFlight => return Ok(RenderOutcome::InFlight),
            };

            let result = render(engine.as_ref(), title.as_deref(), &definition).await;
            if !slot.finish(ticket, result.clone()) {
                tracing::debug!("dropping diagram render for stale instance");
                return Ok(RenderOutcome::Discarded);
            }
            result.map(RenderOutcome::Ready)
        }
    }

    /// Run the mount effect in place.
    pub async fn on_mount(&self) -> Result<RenderOutcome, DiagramError> {
        self.effect().await
    }

    /// Replace the props without re-rendering.
    pub fn set_props(&mut self, props: DiagramProps) {
        self.props = props;
    }

    /// Drop the stored SVG so the next effect renders the current props.
    pub fn invalidate(&self) {
        self.slot.invalidate();
    }

    /// Current props.
    #[must_use]
    pub fn props(&self) -> &DiagramProps {
        &self.props
    }

    /// Current render state.
    #[must_use]
    pub fn state(&self) -> RenderState<DiagramError> {
        self.slot.state()
    }

    /// Embeddable markup: the SVG injected raw into a `<div>`.
    #[must_use]
    pub fn view(&self) -> String {
        let markup = self.slot.markup().unwrap_or_default();
        format!("<div>{markup}</div>")
    }

    /// Tear the instance down. Pending effects resolve as [`RenderOutcome::Discarded`].
    pub fn unmount(self) {
        self.slot.retire();
    }
}
