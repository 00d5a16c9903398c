//! Error types for Hyprland IPC operations

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::event_types::EventType;

/// Errors that can occur when communicating with the Hyprland compositor
#[derive(Debug, Error)]
pub enum IpcError {
    /// The HYPRLAND_INSTANCE_SIGNATURE environment variable is not set
    #[error("HYPRLAND_INSTANCE_SIGNATURE environment variable not set - is Hyprland running?")]
    InstanceNotSet,

    /// The socket path does not exist
    #[error("Hyprland socket not found at {path}")]
    SocketNotFound { path: PathBuf },

    /// Failed to connect to a Hyprland socket
    #[error("Failed to connect to Hyprland socket at {path}: {source}")]
    ConnectionFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a request frame
    #[error("Failed to send request to Hyprland: {0}")]
    SendFailed(#[source] std::io::Error),

    /// Failed to read a response or an event chunk
    #[error("Failed to receive from Hyprland: {0}")]
    ReceiveFailed(#[source] std::io::Error),

    /// Failed to shut the connection down
    #[error("Failed to close Hyprland socket: {0}")]
    CloseFailed(#[source] std::io::Error),

    /// The peer closed the connection
    #[error("Connection to Hyprland closed unexpectedly")]
    ConnectionClosed,

    /// The request exchange did not finish within the configured timeout
    #[error("Request to Hyprland timed out after {after:?}")]
    Timeout { after: Duration },

    /// Attempted to send a zero-length frame
    #[error("Refusing to send an empty request")]
    EmptyRequest,

    /// The frame exceeds what Hyprland reads in one go
    #[error("Request too large: {size} bytes exceeds the {max} byte limit")]
    RequestTooLarge { size: usize, max: usize },

    /// The response carried fewer success markers than commands sent
    #[error("Hyprland rejected the command: expected {expected} 'ok' marker(s), found {found} in {response:?}")]
    CommandRejected {
        expected: usize,
        found: usize,
        response: String,
    },

    /// An event payload has fewer fields than its type requires
    #[error("Malformed {kind} event payload {payload:?}: expected {expected} field(s)")]
    MalformedEvent {
        kind: EventType,
        payload: String,
        expected: usize,
    },

    /// Failed to deserialize a JSON response
    #[error("Failed to deserialize response: {0}")]
    DeserializeFailed(#[source] serde_json::Error),

    /// The event subscription was cancelled by its shutdown signal
    #[error("Event subscription cancelled")]
    Cancelled,
}
