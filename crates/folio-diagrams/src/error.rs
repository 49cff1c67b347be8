//! Diagram rendering errors.

/// Error from a diagram engine.
///
/// Variants carry messages rather than source errors so that a failed render
/// can be stored in the component's slot and handed out again.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DiagramError {
    /// Transport failure or HTTP error status from the engine service.
    #[error("HTTP error: {0}")]
    Http(String),
    /// Reading or writing engine input/output failed.
    #[error("I/O error: {0}")]
    Io(String),
    /// The engine rejected the diagram definition.
    #[error("diagram engine failed: {0}")]
    Engine(String),
    /// The engine answered with something that is not SVG.
    #[error("engine returned invalid SVG: {0}")]
    InvalidSvg(String),
    /// The blocking render task panicked or was cancelled.
    #[error("render task failed: {0}")]
    Task(String),
}

impl From<std::io::Error> for DiagramError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<tokio::task::JoinError> for DiagramError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Task(err.to_string())
    }
}
