//! Page rendering errors.

/// Error rendering a markdown page.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    /// The page does not open with a non-empty level-1 heading.
    #[error("page has no title: expected a leading `# Title` heading")]
    MissingTitle,
    /// A diagram task panicked or was cancelled.
    #[error("diagram task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
