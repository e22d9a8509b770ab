//! Mixer channel identity and volume readings.

use serde::{Deserialize, Serialize};

/// Position names for ALSA simple-element channels, indexed by channel id.
pub const CHANNEL_NAMES: [&str; 9] = [
    "Front Left",
    "Front Right",
    "Rear Left",
    "Rear Right",
    "Front Center",
    "Woofer",
    "Side Left",
    "Side Right",
    "Rear Center",
];

/// Human-readable name for a channel id, `"Unknown"` past the known positions.
#[must_use]
pub fn channel_name(id: u32) -> &'static str {
    usize::try_from(id)
        .ok()
        .and_then(|idx| CHANNEL_NAMES.get(idx))
        .copied()
        .unwrap_or("Unknown")
}

/// A channel exposed by a mixer control.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelInfo {
    /// Channel id, stable for the life of a connection
    pub id: u32,
    /// Display name (e.g. "Front Left")
    pub name: String,
}

impl ChannelInfo {
    /// Create channel info with an explicit name.
    #[must_use]
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }

    /// Create channel info named after its standard position.
    #[must_use]
    pub fn positional(id: u32) -> Self {
        Self::new(id, channel_name(id))
    }
}

/// Raw volume of one channel as reported by the mixer.
///
/// Produced fresh on every query; never cached by the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeReading {
    /// Channel name
    pub name: String,
    /// Lowest raw volume the hardware accepts
    pub min: i64,
    /// Highest raw volume the hardware accepts
    pub max: i64,
    /// Current raw volume, within `[min, max]`
    pub current: i64,
    /// Current volume as a percentage of `max` (0 - 100)
    pub percent: u8,
}

impl VolumeReading {
    /// Build a reading, deriving `percent` from `current` and `max`.
    #[must_use]
    pub fn new(name: impl Into<String>, min: i64, max: i64, current: i64) -> Self {
        Self {
            name: name.into(),
            min,
            max,
            current,
            percent: percent_of_max(current, max),
        }
    }
}

/// `current` as a rounded percentage of `max`, clamped to 0..=100.
///
/// Measured against `max` rather than the range width so that it inverts
/// [`crate::volume::compute`] in absolute mode.
#[must_use]
pub fn percent_of_max(current: i64, max: i64) -> u8 {
    if max <= 0 {
        return 0;
    }
    let scaled = i128::from(current) * 100;
    let max = i128::from(max);
    // Round half away from zero
    let rounded = if scaled >= 0 {
        (scaled * 2 + max) / (max * 2)
    } else {
        (scaled * 2 - max) / (max * 2)
    };
    u8::try_from(rounded.clamp(0, 100)).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_names_follow_alsa_positions() {
        assert_eq!(channel_name(0), "Front Left");
        assert_eq!(channel_name(1), "Front Right");
        assert_eq!(channel_name(8), "Rear Center");
        assert_eq!(channel_name(9), "Unknown");
        assert_eq!(ChannelInfo::positional(4).name, "Front Center");
    }

    #[test]
    fn test_percent_of_max() {
        assert_eq!(percent_of_max(32768, 65536), 50);
        assert_eq!(percent_of_max(65536, 65536), 100);
        assert_eq!(percent_of_max(0, 65536), 0);
        // 1/3 and 2/3 of 87
        assert_eq!(percent_of_max(29, 87), 33);
        assert_eq!(percent_of_max(58, 87), 67);
    }

    #[test]
    fn test_percent_rounds_half_up() {
        // 1 of 200 is exactly 0.5%
        assert_eq!(percent_of_max(1, 200), 1);
        assert_eq!(percent_of_max(3, 200), 2);
    }

    #[test]
    fn test_percent_degenerate_ranges() {
        assert_eq!(percent_of_max(0, 0), 0);
        assert_eq!(percent_of_max(-10, -5), 0);
        assert_eq!(percent_of_max(-10, 100), 0);
    }

    #[test]
    fn test_reading_serializes_as_record() {
        let reading = VolumeReading::new("Front Left", 0, 65536, 32768);
        let json = serde_json::to_value(&reading).unwrap();
        assert_eq!(json["name"], "Front Left");
        assert_eq!(json["max"], 65536);
        assert_eq!(json["current"], 32768);
        assert_eq!(json["percent"], 50);
    }
}
