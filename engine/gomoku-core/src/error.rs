//! Board error type.

/// Errors raised by board construction, move application and coordinate
/// conversion. All of them are caller bugs; none are retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("Invalid action {action}: {reason}")]
    InvalidAction { action: usize, reason: &'static str },

    #[error("Out of range: {0}")]
    OutOfRange(String),

    #[error("Invalid board dimensions: {0}")]
    Construction(String),
}
