//! Boundary to the native mixer driver.
//!
//! A [`MixerBridge`] opens a named control on a named mixer device and hands
//! back a [`MixerHandle`] that owns the native resource. All volume values
//! crossing this boundary are raw hardware values; percentage arithmetic lives
//! in [`crate::volume`].

use crate::channel::{ChannelInfo, VolumeReading};
use crate::error::BridgeResult;

/// Opens mixer controls.
pub trait MixerBridge {
    /// Live connection to one mixer control.
    type Handle: MixerHandle;

    /// Open `control` (e.g. "Master") on mixer `device` (e.g. "default").
    ///
    /// # Errors
    /// Returns an error if the device cannot be opened or the control does
    /// not exist on it.
    fn open(&self, device: &str, control: &str) -> BridgeResult<Self::Handle>;
}

/// An open mixer control.
///
/// Dropping a handle releases the native resource; [`MixerHandle::close`]
/// does the same but reports failures.
pub trait MixerHandle {
    /// Enumerate the control's channels in hardware order.
    ///
    /// # Errors
    /// Returns an error if the control can no longer be queried.
    fn channels(&self) -> BridgeResult<Vec<ChannelInfo>>;

    /// Read the raw volume of one channel.
    ///
    /// # Errors
    /// Returns an error if the channel does not exist or the read fails.
    fn volume(&self, id: u32) -> BridgeResult<VolumeReading>;

    /// Write a raw volume to one channel and return the resulting reading.
    ///
    /// # Errors
    /// Returns an error if the channel does not exist or the write fails.
    fn set_volume(&mut self, id: u32, value: i64) -> BridgeResult<VolumeReading>;

    /// Write one raw volume to every channel of the control.
    ///
    /// # Errors
    /// Returns an error if the write fails.
    fn set_all_volumes(&mut self, value: i64) -> BridgeResult<()>;

    /// Release the control.
    ///
    /// # Errors
    /// Returns an error if the native close call fails. The handle is gone
    /// either way.
    fn close(self) -> BridgeResult<()>;
}
