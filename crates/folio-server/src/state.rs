//! Application state.
//!
//! Shared state for all request handlers.

use std::collections::{BTreeSet, HashMap, HashSet};

use axum::body::Bytes;

/// Slug of the page served at `/`.
pub(crate) const HOME: &str = "home";

/// Rendered site served by the server.
#[derive(Clone, Debug, Default)]
pub struct SiteContent {
    /// Complete HTML documents keyed by page slug.
    pub pages: HashMap<String, String>,
    /// Slugs served at `/{slug}` instead of under `/posts`. `home` is served at `/`.
    pub top_level: Vec<String>,
    /// Slug of the page served with status 404.
    pub not_found: String,
    /// Legacy paths permanently redirected to `/posts{path}`.
    pub redirects: Vec<String>,
}

/// Application state shared across all handlers.
pub(crate) struct AppState {
    pages: HashMap<String, Bytes>,
    top_level: HashSet<String>,
    not_found: String,
    /// Redirect sources, deduplicated.
    pub(crate) redirects: BTreeSet<String>,
}

impl AppState {
    pub(crate) fn new(content: SiteContent) -> Self {
        Self {
            pages: content
                .pages
                .into_iter()
                .map(|(slug, html)| (slug, Bytes::from(html)))
                .collect(),
            top_level: content.top_level.into_iter().collect(),
            not_found: content.not_found,
            redirects: content.redirects.into_iter().collect(),
        }
    }

    /// Document for a top-level page slug.
    pub(crate) fn top_level_page(&self, slug: &str) -> Option<Bytes> {
        if self.top_level.contains(slug) {
            self.pages.get(slug).cloned()
        } else {
            None
        }
    }

    /// Document for a post slug. Top-level pages and the 404 page are not posts.
    pub(crate) fn post(&self, slug: &str) -> Option<Bytes> {
        if self.top_level.contains(slug) || slug == self.not_found {
            return None;
        }
        self.pages.get(slug).cloned()
    }

    /// Document served for unknown paths, if one was built.
    pub(crate) fn not_found_page(&self) -> Option<Bytes> {
        self.pages.get(&self.not_found).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        let pages = ["home", "about", "the-edge", "page-404"]
            .into_iter()
            .map(|slug| (slug.to_owned(), format!("<h1>{slug}</h1>")))
            .collect();
        AppState::new(SiteContent {
            pages,
            top_level: vec!["home".to_owned(), "about".to_owned(), "contact".to_owned()],
            not_found: "page-404".to_owned(),
            redirects: vec!["/old".to_owned(), "/old".to_owned()],
        })
    }

    #[test]
    fn test_top_level_lookup() {
        let state = state();
        assert_eq!(state.top_level_page("about"), Some(Bytes::from("<h1>about</h1>")));
        // Configured but not built
        assert_eq!(state.top_level_page("contact"), None);
        assert_eq!(state.top_level_page("the-edge"), None);
    }

    #[test]
    fn test_post_lookup() {
        let state = state();
        assert!(state.post("the-edge").is_some());
        assert!(state.post("about").is_none());
        assert!(state.post("page-404").is_none());
        assert!(state.post("missing").is_none());
    }

    #[test]
    fn test_redirects_deduplicated() {
        assert_eq!(state().redirects.len(), 1);
    }
}
