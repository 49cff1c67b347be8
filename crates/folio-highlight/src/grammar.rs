//! Registry of loaded language grammars.

use std::collections::HashMap;

use syntect::parsing::{SyntaxReference, SyntaxSet};

use crate::HighlightError;

/// Language tags bundled with every registry, mapped to syntect grammar names.
///
/// Covers one systems language, one UI-markup language and one scripting
/// language, plus shell for install snippets.
const BUNDLED: &[(&str, &str)] = &[
    ("rust", "Rust"),
    ("rs", "Rust"),
    ("jsx", "JavaScript"),
    ("javascript", "JavaScript"),
    ("js", "JavaScript"),
    ("html", "HTML"),
    ("python", "Python"),
    ("py", "Python"),
    ("bash", "Bourne Again Shell (bash)"),
    ("sh", "Bourne Again Shell (bash)"),
    ("shell", "Bourne Again Shell (bash)"),
];

/// A resolved grammar for one language tag.
#[derive(Clone, Copy, Debug)]
pub struct Grammar<'a> {
    pub(crate) syntax: &'a SyntaxReference,
}

impl Grammar<'_> {
    /// Grammar name as known to the engine (e.g. `"Rust"`).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.syntax.name
    }
}

/// Loaded grammars plus the tag aliases that select them.
///
/// Lookup normalizes the tag to lowercase, checks the alias table first and
/// falls back to syntect's own token matching (file extensions and names).
pub struct GrammarRegistry {
    syntaxes: SyntaxSet,
    aliases: HashMap<String, String>,
}

impl GrammarRegistry {
    /// Registry with syntect's default grammars and the bundled aliases.
    #[must_use]
    pub fn with_defaults() -> Self {
        let aliases = BUNDLED
            .iter()
            .map(|(tag, name)| ((*tag).to_owned(), (*name).to_owned()))
            .collect();
        Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
            aliases,
        }
    }

    /// Map `tag` onto an already loaded grammar.
    ///
    /// Used for languages without a grammar of their own, e.g. highlighting
    /// `toml` fences with the `Rust` grammar.
    pub fn register_alias(&mut self, tag: &str, grammar: &str) -> Result<(), HighlightError> {
        if self.syntaxes.find_syntax_by_name(grammar).is_none() {
            return Err(HighlightError::UnknownGrammar(grammar.to_owned()));
        }
        self.aliases
            .insert(tag.to_ascii_lowercase(), grammar.to_owned());
        Ok(())
    }

    /// Resolve the grammar for a language tag.
    pub fn grammar(&self, tag: &str) -> Result<Grammar<'_>, HighlightError> {
        let tag = tag.to_ascii_lowercase();
        let syntax = match self.aliases.get(&tag) {
            Some(name) => self
                .syntaxes
                .find_syntax_by_name(name)
                .ok_or_else(|| HighlightError::UnknownGrammar(name.clone()))?,
            None => self
                .syntaxes
                .find_syntax_by_token(&tag)
                .ok_or(HighlightError::UnknownLanguage(tag))?,
        };
        Ok(Grammar { syntax })
    }

    /// Whether a grammar is available for `tag`.
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.grammar(tag).is_ok()
    }

    pub(crate) fn syntaxes(&self) -> &SyntaxSet {
        &self.syntaxes
    }
}

impl Default for GrammarRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
