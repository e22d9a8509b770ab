//! Mute snapshot held by a session between `mute` and `unmute`.

use serde::{Deserialize, Serialize};

/// Per-channel volume percentages captured when a session was muted.
///
/// Entries keep the order they were captured in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MuteSnapshot {
    entries: Vec<(u32, u8)>,
}

impl MuteSnapshot {
    /// Create an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a channel's percentage, replacing an earlier entry for the same id.
    pub fn record(&mut self, id: u32, percent: u8) {
        if let Some(entry) = self.entries.iter_mut().find(|(existing, _)| *existing == id) {
            entry.1 = percent;
        } else {
            self.entries.push((id, percent));
        }
    }

    /// Saved percentage for a channel.
    #[must_use]
    pub fn get(&self, id: u32) -> Option<u8> {
        self.entries.iter().find(|(existing, _)| *existing == id).map(|(_, percent)| *percent)
    }

    /// Iterate `(id, percent)` pairs in capture order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u8)> + '_ {
        self.entries.iter().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(u32, u8)> for MuteSnapshot {
    fn from_iter<I: IntoIterator<Item = (u32, u8)>>(iter: I) -> Self {
        let mut snapshot = Self::new();
        for (id, percent) in iter {
            snapshot.record(id, percent);
        }
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_keeps_capture_order() {
        let snapshot: MuteSnapshot = [(3, 10), (0, 50), (1, 75)].into_iter().collect();
        let ids: Vec<_> = snapshot.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![3, 0, 1]);
        assert_eq!(snapshot.len(), 3);
    }

    #[test]
    fn test_record_overwrites_same_channel() {
        let mut snapshot = MuteSnapshot::new();
        snapshot.record(0, 40);
        snapshot.record(0, 60);
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.get(0), Some(60));
        assert_eq!(snapshot.get(1), None);
    }
}
