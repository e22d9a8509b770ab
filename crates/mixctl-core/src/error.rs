//! Error types for mixctl core.

use thiserror::Error;

/// Failure reported by a mixer bridge (the native audio subsystem).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    #[error("Mixer device '{device}' unavailable: {reason}")]
    DeviceUnavailable { device: String, reason: String },

    #[error("Mixer control not found: {0}")]
    ControlNotFound(String),

    #[error("Channel not found: {0}")]
    ChannelNotFound(u32),

    #[error("Mixer backend error: {0}")]
    Backend(String),
}

/// Result type for bridge operations.
pub type BridgeResult<T> = std::result::Result<T, BridgeError>;

/// Session error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("No channels detected. Is the mixer connected?")]
    NotConnected,

    #[error("Already connected to mixer, disconnect first")]
    AlreadyConnected,

    #[error("Mixer reported no playback channels")]
    NoChannels,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to restore channels after mute: {failed:?}")]
    RestoreFailed { failed: Vec<u32> },

    #[error(transparent)]
    Bridge(#[from] BridgeError),
}

/// Result type alias for mixctl session operations.
pub type Result<T> = std::result::Result<T, Error>;
