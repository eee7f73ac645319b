// ~/classic-menu/src/error.rs

use thiserror::Error;

/// Failures of the registry, shell and notification operations.
///
/// `Read` never leaves `menu::probe`; an unreadable marker is simply the
/// modern menu.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MenuError {
    #[error("failed to read the context menu marker: {0}")]
    Read(String),

    #[error("failed to write the context menu marker: {0}")]
    Write(String),

    #[error("failed to restart Explorer: {0}")]
    Restart(String),

    #[error("failed to show notification: {0}")]
    Notify(String),

    #[error("this operation is only supported on Windows")]
    Unsupported,
}

pub type Result<T> = std::result::Result<T, MenuError>;
