//! Highlighting errors.

/// Error from the highlighting engine or its grammar registry.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum HighlightError {
    /// No grammar is registered for the language tag.
    #[error("unknown language: {0}")]
    UnknownLanguage(String),
    /// An alias points at a grammar that is not loaded.
    #[error("grammar not loaded: {0}")]
    UnknownGrammar(String),
    /// The stylesheet theme does not exist.
    #[error("unknown theme: {0}")]
    UnknownTheme(String),
    /// The engine failed while tokenizing.
    #[error("highlighting failed: {0}")]
    Engine(String),
}
