//! Core error types

use thiserror::Error;

/// Core platform-window errors
#[derive(Error, Debug, Clone)]
pub enum CoreError {
    #[error("Transport error: {0}")]
    TransportError(String),

    #[error("State error: {0}")]
    StateError(String),

    #[error("Invalid window handle: {0}")]
    InvalidWindowHandle(u32),

    #[error("Cursor file unreadable: {0}")]
    CursorRead(String),

    #[error("Cursor image undecodable: {0}")]
    CursorDecode(String),
}

impl CoreError {
    pub fn transport_error(msg: impl Into<String>) -> Self {
        Self::TransportError(msg.into())
    }

    pub fn state_error(msg: impl Into<String>) -> Self {
        Self::StateError(msg.into())
    }
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
