//! Per-render anchor identifiers.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::consts::ANCHOR_PREFIX;

static NEXT_ANCHOR: AtomicU64 = AtomicU64::new(1);

/// Identifier naming the target element of one render call.
///
/// Drawn from a process-wide monotonic counter, so no two renders in the
/// same process share an id. Formatted as `id` followed by lowercase hex.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AnchorId(String);

impl AnchorId {
    /// Allocate the next identifier.
    #[must_use]
    pub fn next() -> Self {
        let n = NEXT_ANCHOR.fetch_add(1, Ordering::Relaxed);
        Self(format!("{ANCHOR_PREFIX}{n:x}"))
    }

    /// Identifier as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnchorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_anchor_format() {
        let id = AnchorId::next();
        let hex = id.as_str().strip_prefix("id").unwrap();
        assert!(!hex.is_empty());
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_anchors_are_unique() {
        let ids: HashSet<_> = (0..1000).map(|_| AnchorId::next()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_anchors_across_threads_are_unique() {
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| (0..250).map(|_| AnchorId::next()).collect::<Vec<_>>()))
            .collect();
        let ids: HashSet<_> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        assert_eq!(ids.len(), 1000);
    }
}
