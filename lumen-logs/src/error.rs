//! Error types reported by processors and exporters.

/// Errors that can occur while processing or exporting log records.
///
/// These never propagate into the emitting caller's control flow; they are
/// visible through the [`Completion`] handles returned by flush/shutdown,
/// or as diagnostics for process-time failures.
///
/// [`Completion`]: crate::Completion
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The backend failed to deliver or accept records.
    #[error("export failed: {0}")]
    Export(String),

    /// The component was asked to do work after it was shut down.
    #[error("already shut down")]
    AlreadyShutdown,
}
