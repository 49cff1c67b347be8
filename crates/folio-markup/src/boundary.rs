//! Error boundary for component failures.

use std::fmt::Display;

use crate::{TrustedMarkup, escape_html};

/// Catches component render failures and renders them visibly.
///
/// Components never isolate their own failures: they return the engine's
/// error to whoever mounted them. The enclosing renderer wraps each result in
/// [`catch`](Self::catch), which passes successful markup through and replaces
/// a failure with a `<figure class="render-error">` block. The error is also
/// logged and kept as a warning, so it stays loud without aborting the page.
#[derive(Debug, Default)]
pub struct ErrorBoundary {
    warnings: Vec<String>,
}

impl ErrorBoundary {
    /// Create an empty boundary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pass markup through, or render `err` in place of the component.
    pub fn catch<E: Display>(
        &mut self,
        component: &str,
        result: Result<TrustedMarkup, E>,
    ) -> TrustedMarkup {
        match result {
            Ok(markup) => markup,
            Err(err) => {
                tracing::warn!(component, error = %err, "component render failed");
                let message = format!("{component}: {err}");
                let html = format!(
                    r#"<figure class="render-error"><pre>{}</pre></figure>"#,
                    escape_html(&message)
                );
                self.warnings.push(message);
                TrustedMarkup::trusted(html)
            }
        }
    }

    /// Warnings recorded so far.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Consume the boundary, returning its warnings.
    #[must_use]
    pub fn into_warnings(self) -> Vec<String> {
        self.warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ok_passes_through() {
        let mut boundary = ErrorBoundary::new();
        let markup = boundary.catch::<String>("code", Ok(TrustedMarkup::trusted("<b>x</b>")));
        assert_eq!(markup.as_str(), "<b>x</b>");
        assert!(boundary.warnings().is_empty());
    }

    #[test]
    fn test_err_is_rendered_and_recorded() {
        let mut boundary = ErrorBoundary::new();
        let markup = boundary.catch("code", Err::<TrustedMarkup, _>("unknown language: <cobol>"));
        assert_eq!(
            markup.as_str(),
            r#"<figure class="render-error"><pre>code: unknown language: &lt;cobol&gt;</pre></figure>"#
        );
        assert_eq!(
            boundary.into_warnings(),
            vec!["code: unknown language: <cobol>".to_owned()]
        );
    }
}
