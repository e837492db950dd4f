//! Typed errors for form construction, persistence, and export

use thiserror::Error;

/// Errors surfaced by the form engine
#[derive(Debug, Error)]
pub enum FormError {
    /// A construction call received an unusable descriptor or argument.
    /// Fatal to that single call; existing form state is untouched.
    #[error("invalid descriptor: {0}")]
    InvalidDescriptor(String),

    /// The persistent store failed to read or write. Always recovered
    /// locally: logged as a warning, never propagated to the caller.
    #[error("persistence failure: {0}")]
    Persistence(String),

    /// The export pipeline failed; the pipeline halts at the failing step.
    #[error("export failure: {0}")]
    Export(String),
}
