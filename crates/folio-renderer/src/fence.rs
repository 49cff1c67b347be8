//! Fenced code block info strings.

use std::collections::HashMap;

/// Language and attributes of a fenced code block.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FenceInfo {
    /// First word of the info string, if any.
    pub language: Option<String>,
    /// `key=value` pairs following the language.
    pub attrs: HashMap<String, String>,
}

/// Parse fence info string into language and attributes.
///
/// Format: `language [key=value ...]`. Values may be quoted with `"` or `'`
/// to include whitespace: `mermaid title="Request flow"`.
#[must_use]
pub fn parse_fence_info(info: &str) -> FenceInfo {
    let mut words = split_words(info).into_iter();
    let language = words.next();

    let attrs = words
        .filter_map(|word| {
            word.split_once('=')
                .map(|(key, value)| (key.to_owned(), value.to_owned()))
        })
        .collect();

    FenceInfo { language, attrs }
}

/// Split on whitespace, keeping quoted runs together and dropping the quotes.
fn split_words(info: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut quote = None;

    for c in info.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c.is_whitespace() => {
                if !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
            }
            None => current.push(c),
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}
