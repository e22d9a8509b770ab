//! mixctl core - volume arithmetic and mixer session orchestration.
//!
//! This crate holds everything that does not touch sound hardware directly:
//! the percentage-to-raw-volume arithmetic, the bridge traits a native mixer
//! binding implements, and the session that sequences connect, query,
//! adjust, mute and unmute calls against that binding.

pub mod bridge;
pub mod channel;
pub mod error;
pub mod mock;
pub mod mute;
pub mod session;
pub mod volume;

pub use bridge::{MixerBridge, MixerHandle};
pub use channel::{ChannelInfo, VolumeReading};
pub use error::{BridgeError, BridgeResult, Error, Result};
pub use mute::MuteSnapshot;
pub use session::{ConnectionState, DEFAULT_CONTROL, DEFAULT_DEVICE, MixerSession};
pub use volume::Direction;
