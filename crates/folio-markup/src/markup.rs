//! Trusted markup type and HTML escaping.

use std::fmt;

/// Markup that is inserted into the page verbatim.
///
/// Values of this type are never escaped again. Construct one with
/// [`TrustedMarkup::trusted`] only for strings produced by a rendering engine
/// (syntax highlighter, diagram renderer) from input the caller controls.
/// No sanitization happens anywhere in folio: feeding attacker-controlled
/// source text into a component and then into the page is an injection.
///
/// Use [`TrustedMarkup::escaped`] for arbitrary text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrustedMarkup(String);

impl TrustedMarkup {
    /// Wrap engine output that is trusted as-is.
    #[must_use]
    pub fn trusted(markup: impl Into<String>) -> Self {
        Self(markup.into())
    }

    /// Escape plain text into markup.
    #[must_use]
    pub fn escaped(text: &str) -> Self {
        Self(escape_html(text))
    }

    /// Borrow the markup string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the markup is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume into the underlying string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for TrustedMarkup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#x27;Jerry&#x27;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_trusted_is_verbatim() {
        let markup = TrustedMarkup::trusted("<svg></svg>");
        assert_eq!(markup.as_str(), "<svg></svg>");
        assert_eq!(markup.to_string(), "<svg></svg>");
    }

    #[test]
    fn test_escaped_text() {
        let markup = TrustedMarkup::escaped("a < b");
        assert_eq!(markup.into_string(), "a &lt; b");
    }

    #[test]
    fn test_default_is_empty() {
        assert!(TrustedMarkup::default().is_empty());
    }
}
