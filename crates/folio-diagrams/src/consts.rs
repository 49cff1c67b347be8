//! Internal constants for diagram rendering.

use std::time::Duration;

/// Default HTTP timeout for Kroki requests (30 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Kroki endpoint for Mermaid diagrams.
pub const MERMAID_ENDPOINT: &str = "mermaid";

/// Prefix of generated anchor ids. Engines require ids to start with a letter.
pub const ANCHOR_PREFIX: &str = "id";
