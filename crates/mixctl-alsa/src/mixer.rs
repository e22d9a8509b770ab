//! ALSA simple-element mixer bridge.
//!
//! Opens a mixer device through libasound and drives one simple element
//! (e.g. "Master") as a [`MixerBridge`]. Channel ids are ALSA's channel
//! positions: 0 is front left, 1 front right, and so on up to 8.

use alsa::mixer::{Mixer, Selem, SelemChannelId, SelemId};
use mixctl_core::channel::channel_name;
use mixctl_core::volume;
use mixctl_core::{BridgeResult, ChannelInfo, MixerBridge, MixerHandle, VolumeReading};
use tracing::{debug, warn};

use crate::error::{AlsaError, AlsaResult};

/// ALSA channel positions in channel-id order.
const CHANNEL_POSITIONS: [SelemChannelId; 9] = [
    SelemChannelId::FrontLeft,
    SelemChannelId::FrontRight,
    SelemChannelId::RearLeft,
    SelemChannelId::RearRight,
    SelemChannelId::FrontCenter,
    SelemChannelId::Woofer,
    SelemChannelId::SideLeft,
    SelemChannelId::SideRight,
    SelemChannelId::RearCenter,
];

/// ALSA position for a channel id.
fn position(id: u32) -> Option<SelemChannelId> {
    usize::try_from(id).ok().and_then(|idx| CHANNEL_POSITIONS.get(idx)).copied()
}

/// Opens ALSA simple mixer elements.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlsaBridge;

impl AlsaBridge {
    /// Create a new ALSA bridge.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn open_handle(device: &str, control: &str) -> AlsaResult<AlsaHandle> {
        let mixer = Mixer::new(device, false)
            .map_err(|source| AlsaError::Open { device: device.to_string(), source })?;
        let selem_id = SelemId::new(control, 0);

        {
            let selem = mixer
                .find_selem(&selem_id)
                .ok_or_else(|| AlsaError::ControlNotFound(control.to_string()))?;
            if !selem.has_playback_volume() {
                return Err(AlsaError::NoPlaybackVolume(control.to_string()));
            }
        }

        debug!(device, control, "Opened ALSA mixer element");
        Ok(AlsaHandle { mixer, selem_id, control: control.to_string() })
    }
}

impl MixerBridge for AlsaBridge {
    type Handle = AlsaHandle;

    fn open(&self, device: &str, control: &str) -> BridgeResult<AlsaHandle> {
        Ok(Self::open_handle(device, control)?)
    }
}

/// An open ALSA mixer with one simple element selected.
///
/// The element is looked up again on every call since it borrows the mixer.
/// Dropping the handle closes the mixer.
pub struct AlsaHandle {
    mixer: Mixer,
    selem_id: SelemId,
    control: String,
}

impl AlsaHandle {
    /// Name of the selected element.
    #[must_use]
    pub fn control(&self) -> &str {
        &self.control
    }

    fn selem(&self) -> AlsaResult<Selem<'_>> {
        self.mixer
            .find_selem(&self.selem_id)
            .ok_or_else(|| AlsaError::ControlNotFound(self.control.clone()))
    }

    /// Pull pending hardware changes so reads are current.
    fn refresh(&self) {
        if let Err(e) = self.mixer.handle_events() {
            warn!(error = %e, "Failed to process ALSA mixer events");
        }
    }

    fn playback_position(selem: &Selem<'_>, id: u32) -> AlsaResult<SelemChannelId> {
        position(id)
            .filter(|&channel| selem.has_playback_channel(channel))
            .ok_or(AlsaError::ChannelNotFound(id))
    }

    fn read(&self, id: u32) -> AlsaResult<VolumeReading> {
        self.refresh();
        let selem = self.selem()?;
        let channel = Self::playback_position(&selem, id)?;
        let (min, max) = selem.get_playback_volume_range();
        let current = selem.get_playback_volume(channel)?;
        Ok(VolumeReading::new(channel_name(id), min, max, current))
    }

    fn write(&self, id: u32, value: i64) -> AlsaResult<VolumeReading> {
        let selem = self.selem()?;
        let channel = Self::playback_position(&selem, id)?;
        let (min, max) = selem.get_playback_volume_range();
        // libasound ignores out-of-range writes instead of clamping
        selem.set_playback_volume(channel, volume::clamp(min, max, value))?;
        self.read(id)
    }

    fn write_all(&self, value: i64) -> AlsaResult<()> {
        let selem = self.selem()?;
        let (min, max) = selem.get_playback_volume_range();
        selem.set_playback_volume_all(volume::clamp(min, max, value))?;
        Ok(())
    }
}

impl MixerHandle for AlsaHandle {
    fn channels(&self) -> BridgeResult<Vec<ChannelInfo>> {
        self.refresh();
        let selem = self.selem()?;
        let channels = (0u32..)
            .zip(CHANNEL_POSITIONS)
            .filter(|(_, channel)| selem.has_playback_channel(*channel))
            .map(|(id, _)| ChannelInfo::positional(id))
            .collect();
        Ok(channels)
    }

    fn volume(&self, id: u32) -> BridgeResult<VolumeReading> {
        Ok(self.read(id)?)
    }

    fn set_volume(&mut self, id: u32, value: i64) -> BridgeResult<VolumeReading> {
        debug!(channel = id, value, "Writing ALSA channel volume");
        Ok(self.write(id, value)?)
    }

    fn set_all_volumes(&mut self, value: i64) -> BridgeResult<()> {
        debug!(value, "Writing ALSA volume to all channels");
        Ok(self.write_all(value)?)
    }

    fn close(self) -> BridgeResult<()> {
        debug!(control = %self.control, "Closing ALSA mixer");
        drop(self);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions_match_channel_names() {
        assert_eq!(position(0), Some(SelemChannelId::FrontLeft));
        assert_eq!(position(1), Some(SelemChannelId::FrontRight));
        assert_eq!(position(8), Some(SelemChannelId::RearCenter));
        assert_eq!(position(9), None);
        assert_eq!(channel_name(5), "Woofer");
    }
}
