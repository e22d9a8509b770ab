//! In-memory mixer bridge for testing without sound hardware.
//!
//! [`MockMixer`] behaves like an ALSA simple element: every channel has its
//! own raw range, writes are clamped to that range, and the set-all
//! primitive applies one raw value to every channel. Clones share state, so a
//! test can keep one clone to inspect "hardware" values while a session owns
//! another.
//!
//! # Usage
//!
//! ```
//! use mixctl_core::mock::MockMixer;
//! use mixctl_core::{Direction, MixerSession};
//!
//! let mock = MockMixer::stereo();
//! let mut session = MixerSession::new(mock.clone());
//! session.connect().unwrap();
//! session.set_all_volumes(25, Direction::Absolute).unwrap();
//! assert_eq!(mock.raw_volume(0), Some(16384));
//! ```

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::bridge::{MixerBridge, MixerHandle};
use crate::channel::{ChannelInfo, VolumeReading, channel_name};
use crate::error::{BridgeError, BridgeResult};
use crate::session::DEFAULT_CONTROL;
use crate::volume;

/// A simulated mixer channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockChannel {
    pub id: u32,
    pub name: String,
    pub min: i64,
    pub max: i64,
    pub current: i64,
}

impl MockChannel {
    /// Channel named after its standard position.
    #[must_use]
    pub fn new(id: u32, min: i64, max: i64, current: i64) -> Self {
        Self { id, name: channel_name(id).to_string(), min, max, current }
    }

    fn reading(&self) -> VolumeReading {
        VolumeReading::new(self.name.clone(), self.min, self.max, self.current)
    }
}

#[derive(Debug, Default)]
struct MockState {
    channels: Vec<MockChannel>,
    open_handles: usize,
    closes: usize,
    open_error: Option<BridgeError>,
    enumerate_error: Option<BridgeError>,
    failing_channels: Vec<u32>,
    fail_close: bool,
}

impl MockState {
    fn check_channel(&self, id: u32) -> BridgeResult<()> {
        if self.failing_channels.contains(&id) {
            return Err(BridgeError::Backend(format!("I/O error on channel {id}")));
        }
        Ok(())
    }

    fn channel_mut(&mut self, id: u32) -> BridgeResult<&mut MockChannel> {
        self.channels.iter_mut().find(|c| c.id == id).ok_or(BridgeError::ChannelNotFound(id))
    }
}

/// Mock mixer bridge exposing one control.
#[derive(Debug, Clone)]
pub struct MockMixer {
    control: String,
    state: Arc<Mutex<MockState>>,
}

impl MockMixer {
    /// Create a mock "Master" control with the given channels.
    #[must_use]
    pub fn new(channels: Vec<MockChannel>) -> Self {
        Self {
            control: DEFAULT_CONTROL.to_string(),
            state: Arc::new(Mutex::new(MockState { channels, ..MockState::default() })),
        }
    }

    /// Two channels at half volume on a 0 - 65536 range.
    #[must_use]
    pub fn stereo() -> Self {
        Self::new(vec![MockChannel::new(0, 0, 65536, 32768), MockChannel::new(1, 0, 65536, 32768)])
    }

    /// Answer to `control` instead of "Master".
    #[must_use]
    pub fn with_control(mut self, control: impl Into<String>) -> Self {
        self.control = control.into();
        self
    }

    /// Name of the control this mock answers to.
    #[must_use]
    pub fn control(&self) -> &str {
        &self.control
    }

    /// Make the next opens fail with `error` until [`MockMixer::recover`].
    pub fn fail_open(&self, error: BridgeError) {
        self.state.lock().open_error = Some(error);
    }

    /// Make channel enumeration fail with `error` until [`MockMixer::recover`].
    pub fn fail_enumerate(&self, error: BridgeError) {
        self.state.lock().enumerate_error = Some(error);
    }

    /// Make reads and writes on channel `id` fail until [`MockMixer::recover`].
    pub fn fail_channel(&self, id: u32) {
        self.state.lock().failing_channels.push(id);
    }

    /// Make closing handles report an error. The handle is still released.
    pub fn fail_close(&self, fail: bool) {
        self.state.lock().fail_close = fail;
    }

    /// Clear every injected failure.
    pub fn recover(&self) {
        let mut state = self.state.lock();
        state.open_error = None;
        state.enumerate_error = None;
        state.failing_channels.clear();
        state.fail_close = false;
    }

    /// Plug in another channel, visible on the next enumeration.
    pub fn add_channel(&self, channel: MockChannel) {
        self.state.lock().channels.push(channel);
    }

    /// Remove every channel.
    pub fn clear_channels(&self) {
        self.state.lock().channels.clear();
    }

    /// Current raw value of a channel.
    #[must_use]
    pub fn raw_volume(&self, id: u32) -> Option<i64> {
        self.state.lock().channels.iter().find(|c| c.id == id).map(|c| c.current)
    }

    /// Number of handles currently open.
    #[must_use]
    pub fn open_handles(&self) -> usize {
        self.state.lock().open_handles
    }

    /// Number of explicit closes.
    #[must_use]
    pub fn closes(&self) -> usize {
        self.state.lock().closes
    }
}

impl Default for MockMixer {
    fn default() -> Self {
        Self::stereo()
    }
}

impl MixerBridge for MockMixer {
    type Handle = MockHandle;

    fn open(&self, device: &str, control: &str) -> BridgeResult<MockHandle> {
        let mut state = self.state.lock();
        if let Some(error) = state.open_error.clone() {
            return Err(error);
        }
        if control != self.control {
            return Err(BridgeError::ControlNotFound(control.to_string()));
        }

        state.open_handles += 1;
        debug!(device, control, "Opened mock mixer");
        Ok(MockHandle { state: Arc::clone(&self.state), released: false })
    }
}

/// Handle onto a [`MockMixer`].
#[derive(Debug)]
pub struct MockHandle {
    state: Arc<Mutex<MockState>>,
    released: bool,
}

impl MockHandle {
    fn release(&mut self) {
        if !self.released {
            self.released = true;
            let mut state = self.state.lock();
            state.open_handles = state.open_handles.saturating_sub(1);
        }
    }
}

impl MixerHandle for MockHandle {
    fn channels(&self) -> BridgeResult<Vec<ChannelInfo>> {
        let state = self.state.lock();
        if let Some(error) = state.enumerate_error.clone() {
            return Err(error);
        }
        Ok(state.channels.iter().map(|c| ChannelInfo::new(c.id, c.name.clone())).collect())
    }

    fn volume(&self, id: u32) -> BridgeResult<VolumeReading> {
        let mut state = self.state.lock();
        state.check_channel(id)?;
        Ok(state.channel_mut(id)?.reading())
    }

    fn set_volume(&mut self, id: u32, value: i64) -> BridgeResult<VolumeReading> {
        let mut state = self.state.lock();
        state.check_channel(id)?;
        let channel = state.channel_mut(id)?;
        channel.current = volume::clamp(channel.min, channel.max, value);
        Ok(channel.reading())
    }

    fn set_all_volumes(&mut self, value: i64) -> BridgeResult<()> {
        let mut state = self.state.lock();
        if let Some(id) = state.failing_channels.first() {
            return Err(BridgeError::Backend(format!("I/O error on channel {id}")));
        }
        for channel in &mut state.channels {
            channel.current = volume::clamp(channel.min, channel.max, value);
        }
        Ok(())
    }

    fn close(mut self) -> BridgeResult<()> {
        self.release();
        let mut state = self.state.lock();
        state.closes += 1;
        if state.fail_close {
            return Err(BridgeError::Backend("close failed".to_string()));
        }
        Ok(())
    }
}

impl Drop for MockHandle {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_all_clamps_per_channel() {
        let mock = MockMixer::new(vec![MockChannel::new(0, 0, 100, 50), MockChannel::new(1, 10, 60, 20)]);
        let mut handle = mock.open("default", "Master").unwrap();

        handle.set_all_volumes(80).unwrap();
        assert_eq!(mock.raw_volume(0), Some(80));
        assert_eq!(mock.raw_volume(1), Some(60));

        handle.set_all_volumes(0).unwrap();
        assert_eq!(mock.raw_volume(1), Some(10));
    }

    #[test]
    fn test_handles_are_counted() {
        let mock = MockMixer::stereo();
        let first = mock.open("default", "Master").unwrap();
        let second = mock.open("hw:0", "Master").unwrap();
        assert_eq!(mock.open_handles(), 2);

        first.close().unwrap();
        drop(second);
        assert_eq!(mock.open_handles(), 0);
        assert_eq!(mock.closes(), 1);
    }

    #[test]
    fn test_failing_channel() {
        let mock = MockMixer::stereo();
        let handle = mock.open("default", "Master").unwrap();
        mock.fail_channel(0);

        assert!(matches!(handle.volume(0), Err(BridgeError::Backend(_))));
        assert!(handle.volume(1).is_ok());
        mock.recover();
        assert_eq!(handle.volume(0).unwrap().percent, 50);
    }
}
