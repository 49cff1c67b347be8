//! Site build errors.

use std::path::PathBuf;

use folio_highlight::HighlightError;
use folio_renderer::PageError;

/// Error building the site.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The posts directory does not exist.
    #[error("Source directory not found: {}", .0.display())]
    SourceDirMissing(PathBuf),
    /// Reading or writing a file failed.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// A post could not be rendered.
    #[error("Failed to render {}: {source}", path.display())]
    Page {
        /// Markdown source of the post.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: PageError,
    },
    /// Highlighting setup failed (unknown theme or alias target).
    #[error(transparent)]
    Highlight(#[from] HighlightError),
}

impl BuildError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}
