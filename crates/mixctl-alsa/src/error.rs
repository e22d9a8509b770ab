//! ALSA error types.

use mixctl_core::BridgeError;
use thiserror::Error;

/// ALSA bridge error type.
#[derive(Debug, Error)]
pub enum AlsaError {
    #[error("Failed to open mixer '{device}': {source}")]
    Open {
        device: String,
        #[source]
        source: alsa::Error,
    },

    #[error("Simple mixer control '{0}' not found")]
    ControlNotFound(String),

    #[error("Control '{0}' has no playback volume")]
    NoPlaybackVolume(String),

    #[error("Channel {0} not present on control")]
    ChannelNotFound(u32),

    #[error("ALSA error: {0}")]
    Alsa(#[from] alsa::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for ALSA operations.
pub type AlsaResult<T> = Result<T, AlsaError>;

impl From<AlsaError> for BridgeError {
    fn from(err: AlsaError) -> Self {
        match err {
            AlsaError::Open { device, source } => {
                BridgeError::DeviceUnavailable { device, reason: source.to_string() }
            }
            AlsaError::ControlNotFound(control) | AlsaError::NoPlaybackVolume(control) => {
                BridgeError::ControlNotFound(control)
            }
            AlsaError::ChannelNotFound(id) => BridgeError::ChannelNotFound(id),
            AlsaError::Alsa(e) => BridgeError::Backend(e.to_string()),
            AlsaError::IoError(e) => BridgeError::Backend(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn test_maps_to_bridge_errors() {
        assert_matches!(
            BridgeError::from(AlsaError::ControlNotFound("Master".into())),
            BridgeError::ControlNotFound(name) if name == "Master"
        );
        assert_matches!(
            BridgeError::from(AlsaError::NoPlaybackVolume("Capture".into())),
            BridgeError::ControlNotFound(_)
        );
        assert_matches!(BridgeError::from(AlsaError::ChannelNotFound(3)), BridgeError::ChannelNotFound(3));
    }
}
