//! Stylesheet generation for highlighted code.

use syntect::highlighting::ThemeSet;
use syntect::html::{ClassStyle, css_for_theme_with_class_style};

use crate::HighlightError;

/// Class prefix used on every highlighted span.
pub const CSS_PREFIX: &str = "syntect";

/// Theme used when none is configured.
pub const DEFAULT_THEME: &str = "base16-ocean.dark";

/// Generate the CSS that colors [`CSS_PREFIX`]-classed spans with a bundled theme.
pub fn theme_css(theme: &str) -> Result<String, HighlightError> {
    let themes = ThemeSet::load_defaults();
    let theme = themes
        .themes
        .get(theme)
        .ok_or_else(|| HighlightError::UnknownTheme(theme.to_owned()))?;
    css_for_theme_with_class_style(theme, ClassStyle::SpacedPrefixed { prefix: CSS_PREFIX })
        .map_err(|e| HighlightError::Engine(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme_css() {
        let css = theme_css(DEFAULT_THEME).unwrap();
        assert!(css.contains(".syntect-"));
    }

    #[test]
    fn test_unknown_theme() {
        assert_eq!(
            theme_css("no-such-theme").unwrap_err(),
            HighlightError::UnknownTheme("no-such-theme".to_owned())
        );
    }
}
