//! Error types for tlc-client.
//!
//! [`ControllerError`] is only returned from setup paths (connecting, loading
//! settings). Everything that goes wrong once a connection is running is
//! reported as an [`Event::Error`](crate::event::Event::Error) instead.

use thiserror::Error;

/// Main error type for client setup and I/O plumbing.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// I/O error during socket operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error while loading settings.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The button-list payload could not be decoded as XML.
    #[error("XML error: {0}")]
    Xml(String),

    /// The configured controller address could not be resolved.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Connection closed (writer task gone or peer hung up).
    #[error("Connection closed")]
    ConnectionClosed,
}

impl From<quick_xml::Error> for ControllerError {
    fn from(err: quick_xml::Error) -> Self {
        ControllerError::Xml(err.to_string())
    }
}

/// Local validation failure for an outbound command.
///
/// The `Display` text is the fixed detail message carried by the
/// `CLIENT ERROR` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("invalid bpm value")]
    InvalidBpm,

    #[error("invalid cue name")]
    InvalidCueName,

    #[error("invalid button name")]
    InvalidButtonName,

    #[error("invalid fader name")]
    InvalidFaderName,

    #[error("invalid fader value")]
    InvalidFaderValue,
}

/// Result type alias using ControllerError.
pub type Result<T> = std::result::Result<T, ControllerError>;
