//! # Error Types
//!
//! Custom error types for ROV Bridge using `thiserror`.

use thiserror::Error;

/// Main error type for ROV Bridge
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Command packet decoding errors
    #[error("Packet error: {0}")]
    Packet(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// Controller I/O errors
    #[error("Controller error: {0}")]
    Controller(String),

    /// No DualSense controller found on the system
    #[error("No PS5 DualSense controller found")]
    ControllerNotFound,

    /// UDP transport errors
    #[error("Transport error: {0}")]
    Transport(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for ROV Bridge
pub type Result<T> = std::result::Result<T, BridgeError>;
