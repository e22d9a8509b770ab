//! mixctl ALSA - libasound mixer bridge.
//!
//! Implements [`mixctl_core::MixerBridge`] on top of ALSA simple mixer
//! elements, and lists the sound cards a mixer can be opened on.

pub mod cards;
pub mod error;
pub mod mixer;

pub use cards::{SoundCard, list_cards};
pub use error::{AlsaError, AlsaResult};
pub use mixer::{AlsaBridge, AlsaHandle};
