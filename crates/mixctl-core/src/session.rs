//! Mixer session: connect, query, adjust, mute and restore.
//!
//! A [`MixerSession`] owns at most one open [`MixerHandle`]. While
//! disconnected every volume operation fails with [`Error::NotConnected`].

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::bridge::{MixerBridge, MixerHandle};
use crate::channel::{ChannelInfo, VolumeReading};
use crate::error::{BridgeResult, Error, Result};
use crate::mute::MuteSnapshot;
use crate::volume::{self, Direction};

/// Mixer device opened by default.
pub const DEFAULT_DEVICE: &str = "default";
/// Mixer control opened by default.
pub const DEFAULT_CONTROL: &str = "Master";

/// Observable connection state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    /// No mixer handle held
    Disconnected,
    /// Mixer open and channels enumerated
    Connected,
}

/// Live connection data, present only while connected.
struct Connection<H> {
    handle: H,
    channels: Vec<ChannelInfo>,
    snapshot: Option<MuteSnapshot>,
}

enum State<H> {
    Disconnected,
    Connected(Connection<H>),
}

/// A session against one mixer control.
pub struct MixerSession<B: MixerBridge> {
    bridge: B,
    device: String,
    control: String,
    state: State<B::Handle>,
}

impl<B: MixerBridge> MixerSession<B> {
    /// Create a disconnected session for the default device's "Master" control.
    #[must_use]
    pub fn new(bridge: B) -> Self {
        Self::with_target(bridge, DEFAULT_DEVICE, DEFAULT_CONTROL)
    }

    /// Create a disconnected session for a specific device and control.
    #[must_use]
    pub fn with_target(bridge: B, device: impl Into<String>, control: impl Into<String>) -> Self {
        Self { bridge, device: device.into(), control: control.into(), state: State::Disconnected }
    }

    #[must_use]
    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    #[must_use]
    pub fn device(&self) -> &str {
        &self.device
    }

    #[must_use]
    pub fn control(&self) -> &str {
        &self.control
    }

    #[must_use]
    pub fn state(&self) -> ConnectionState {
        match self.state {
            State::Disconnected => ConnectionState::Disconnected,
            State::Connected(_) => ConnectionState::Connected,
        }
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// Open the mixer and enumerate its channels.
    ///
    /// # Errors
    /// Returns [`Error::AlreadyConnected`] if a handle is already open,
    /// [`Error::NoChannels`] if the control reports no channels, or the
    /// bridge error if opening or enumeration fails. On failure the session
    /// stays disconnected and no handle is kept.
    pub fn connect(&mut self) -> Result<()> {
        if self.is_connected() {
            return Err(Error::AlreadyConnected);
        }

        debug!(device = %self.device, control = %self.control, "Opening mixer");
        let handle = self.bridge.open(&self.device, &self.control)?;
        let (channels, handle) = enumerate_or_release(handle.channels(), handle)?;

        info!(
            device = %self.device,
            control = %self.control,
            count = channels.len(),
            "Connected to mixer"
        );
        self.state = State::Connected(Connection { handle, channels, snapshot: None });
        Ok(())
    }

    /// Release the mixer and forget channels and any mute snapshot.
    ///
    /// Calling this on a disconnected session is a no-op.
    ///
    /// # Errors
    /// Returns the bridge error if the native close fails. The session is
    /// disconnected regardless.
    pub fn disconnect(&mut self) -> Result<()> {
        match std::mem::replace(&mut self.state, State::Disconnected) {
            State::Disconnected => {
                debug!("Mixer already disconnected");
                Ok(())
            }
            State::Connected(connection) => {
                connection.handle.close()?;
                info!(device = %self.device, "Disconnected from mixer");
                Ok(())
            }
        }
    }

    /// Alias for [`MixerSession::disconnect`].
    ///
    /// # Errors
    /// See [`MixerSession::disconnect`].
    pub fn close(&mut self) -> Result<()> {
        self.disconnect()
    }

    /// Re-enumerate channels on the open mixer, dropping any mute snapshot.
    ///
    /// # Errors
    /// Returns [`Error::NotConnected`] when disconnected. If enumeration fails
    /// or yields no channels the handle is released and the session becomes
    /// disconnected.
    pub fn enumerate(&mut self) -> Result<&[ChannelInfo]> {
        let State::Connected(connection) = std::mem::replace(&mut self.state, State::Disconnected)
        else {
            return Err(Error::NotConnected);
        };

        let (channels, handle) =
            enumerate_or_release(connection.handle.channels(), connection.handle)?;
        debug!(count = channels.len(), "Re-enumerated mixer channels");

        self.state = State::Connected(Connection { handle, channels, snapshot: None });
        self.channels()
    }

    /// Channels enumerated on connect.
    ///
    /// # Errors
    /// Returns [`Error::NotConnected`] when disconnected.
    pub fn channels(&self) -> Result<&[ChannelInfo]> {
        Ok(&self.connection()?.channels)
    }

    /// Snapshot captured by the last [`MixerSession::mute`], if any.
    #[must_use]
    pub fn mute_snapshot(&self) -> Option<&MuteSnapshot> {
        match &self.state {
            State::Connected(connection) => connection.snapshot.as_ref(),
            State::Disconnected => None,
        }
    }

    /// Read one channel's volume.
    ///
    /// # Errors
    /// Returns [`Error::NotConnected`] when disconnected, or the bridge error.
    pub fn channel_volume(&self, id: u32) -> Result<VolumeReading> {
        let reading = self.connection()?.handle.volume(id)?;
        debug!(channel = id, current = reading.current, percent = reading.percent, "Read volume");
        Ok(reading)
    }

    /// Read every channel's volume, in enumeration order.
    ///
    /// # Errors
    /// Returns [`Error::NotConnected`] when disconnected, or the first bridge
    /// error encountered.
    pub fn volumes(&self) -> Result<Vec<(u32, VolumeReading)>> {
        let connection = self.connection()?;
        connection
            .channels
            .iter()
            .map(|channel| -> Result<(u32, VolumeReading)> {
                Ok((channel.id, connection.handle.volume(channel.id)?))
            })
            .collect()
    }

    /// Adjust one channel by a percentage of its maximum.
    ///
    /// Returns the channel's reading after the write.
    ///
    /// # Errors
    /// Returns [`Error::NotConnected`] when disconnected,
    /// [`Error::InvalidArgument`] for a negative percentage, or the bridge
    /// error.
    pub fn set_channel_volume(
        &mut self,
        id: u32,
        percent_change: i64,
        direction: Direction,
    ) -> Result<VolumeReading> {
        self.connection()?;
        validate_percent(percent_change)?;
        let current = self.channel_volume(id)?;
        let target =
            volume::compute(current.min, current.max, current.current, percent_change, direction);

        let reading = self.connection_mut()?.handle.set_volume(id, target)?;
        debug!(channel = id, %direction, percent_change, target, "Set channel volume");
        Ok(reading)
    }

    /// Adjust every channel to one value computed from the base channel.
    ///
    /// The base channel is channel 0, or the first enumerated channel when
    /// the control has no channel 0. Only the base channel's range is
    /// consulted; the bridge's set-all primitive applies the value to every
    /// channel.
    ///
    /// # Errors
    /// Returns [`Error::NotConnected`] when disconnected,
    /// [`Error::InvalidArgument`] for a negative percentage, or the bridge
    /// error.
    pub fn set_all_volumes(&mut self, percent_change: i64, direction: Direction) -> Result<()> {
        self.connection()?;
        validate_percent(percent_change)?;
        let base = self.base_channel()?;
        let current = self.channel_volume(base)?;
        let target =
            volume::compute(current.min, current.max, current.current, percent_change, direction);

        self.connection_mut()?.handle.set_all_volumes(target)?;
        debug!(base, %direction, percent_change, target, "Set all channel volumes");
        Ok(())
    }

    /// Silence every channel, remembering each channel's percentage.
    ///
    /// A previous snapshot is replaced.
    ///
    /// # Errors
    /// Returns [`Error::NotConnected`] when disconnected, or the bridge error.
    pub fn mute(&mut self) -> Result<()> {
        let snapshot: MuteSnapshot =
            self.volumes()?.into_iter().map(|(id, reading)| (id, reading.percent)).collect();
        let count = snapshot.len();
        self.connection_mut()?.snapshot = Some(snapshot);

        self.set_all_volumes(0, Direction::Absolute)?;
        info!(channels = count, "Mixer muted");
        Ok(())
    }

    /// Restore the percentages captured by [`MixerSession::mute`].
    ///
    /// The snapshot is cleared whether or not restoration succeeds. Without a
    /// snapshot this does nothing, including on a disconnected session, which
    /// never holds one.
    ///
    /// # Errors
    /// Returns [`Error::RestoreFailed`] naming the channels that could not be
    /// set.
    pub fn unmute(&mut self) -> Result<()> {
        let snapshot = match &mut self.state {
            State::Connected(connection) => connection.snapshot.take(),
            State::Disconnected => None,
        };
        let Some(snapshot) = snapshot else {
            debug!("No mute snapshot to restore");
            return Ok(());
        };

        let mut failed = Vec::new();
        for (id, percent) in snapshot.iter() {
            if let Err(e) = self.set_channel_volume(id, i64::from(percent), Direction::Absolute) {
                warn!(channel = id, error = %e, "Failed to restore channel volume");
                failed.push(id);
            }
        }

        if failed.is_empty() {
            info!(channels = snapshot.len(), "Mixer unmuted");
            Ok(())
        } else {
            Err(Error::RestoreFailed { failed })
        }
    }

    fn connection(&self) -> Result<&Connection<B::Handle>> {
        match &self.state {
            State::Connected(connection) => Ok(connection),
            State::Disconnected => Err(Error::NotConnected),
        }
    }

    fn connection_mut(&mut self) -> Result<&mut Connection<B::Handle>> {
        match &mut self.state {
            State::Connected(connection) => Ok(connection),
            State::Disconnected => Err(Error::NotConnected),
        }
    }

    fn base_channel(&self) -> Result<u32> {
        let channels = &self.connection()?.channels;
        channels
            .iter()
            .find(|channel| channel.id == 0)
            .or_else(|| channels.first())
            .map(|channel| channel.id)
            .ok_or(Error::NoChannels)
    }
}

/// Keep the handle only if enumeration produced channels; otherwise close it.
fn enumerate_or_release<H: MixerHandle>(
    enumerated: BridgeResult<Vec<ChannelInfo>>,
    handle: H,
) -> Result<(Vec<ChannelInfo>, H)> {
    let error = match enumerated {
        Ok(channels) if !channels.is_empty() => return Ok((channels, handle)),
        Ok(_) => Error::NoChannels,
        Err(e) => Error::Bridge(e),
    };

    if let Err(e) = handle.close() {
        warn!(error = %e, "Failed to release mixer after enumeration failure");
    }
    Err(error)
}

fn validate_percent(percent_change: i64) -> Result<()> {
    if percent_change < 0 {
        return Err(Error::InvalidArgument(format!(
            "percentage must not be negative, got {percent_change}"
        )));
    }
    Ok(())
}
