//! Engine configuration applied before every render.

/// Visual theme passed to the diagram engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DiagramTheme {
    /// Engine default theme.
    #[default]
    Default,
    /// Light text on dark background.
    Dark,
}

impl DiagramTheme {
    /// Theme name as understood by Mermaid.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Dark => "dark",
        }
    }
}

/// Engine configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DiagramConfig {
    /// Theme to render with.
    pub theme: DiagramTheme,
}

/// The configuration every diagram is rendered with.
///
/// Fixed to the dark theme; callers cannot override it.
pub const DIAGRAM_CONFIG: DiagramConfig = DiagramConfig {
    theme: DiagramTheme::Dark,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_config_is_dark() {
        assert_eq!(DIAGRAM_CONFIG.theme, DiagramTheme::Dark);
        assert_eq!(DIAGRAM_CONFIG.theme.as_str(), "dark");
    }

    #[test]
    fn test_theme_names() {
        assert_eq!(DiagramTheme::Default.as_str(), "default");
    }
}
