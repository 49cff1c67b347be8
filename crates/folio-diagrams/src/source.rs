//! Diagram source assembly.

/// A node of a diagram's child content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiagramChild {
    /// Plain text.
    Text(String),
    /// A nested element; only the text it contains is kept.
    Element {
        /// Element name, ignored for rendering.
        tag: String,
        /// Child nodes.
        children: Vec<DiagramChild>,
    },
}

/// Flatten child content to its text, dropping element structure.
#[must_use]
pub fn children_text(children: &[DiagramChild]) -> String {
    fn collect(children: &[DiagramChild], out: &mut String) {
        for child in children {
            match child {
                DiagramChild::Text(text) => out.push_str(text),
                DiagramChild::Element { children, .. } => collect(children, out),
            }
        }
    }

    let mut out = String::new();
    collect(children, &mut out);
    out
}

/// Build the text handed to the engine.
///
/// With a title, a front-matter block carrying it is prepended:
///
/// ```text
/// ---
/// title: <title>
/// ---
/// <definition>
/// ```
///
/// Without one, the definition is returned unchanged.
#[must_use]
pub fn assemble_source(title: Option<&str>, definition: &str) -> String {
    match title {
        Some(title) => format!("---\ntitle: {title}\n---\n{definition}"),
        None => definition.to_owned(),
    }
}
