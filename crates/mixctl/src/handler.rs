//! Command handling against a mixer session.

use std::fmt::Write as _;

use mixctl_core::{ChannelInfo, MixerBridge, MixerSession, MuteSnapshot, VolumeReading};
use serde_json::{Value, json};
use tracing::debug;

use crate::command::{Command, HELP};

/// Outcome of a handled command, printable as text or JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Channels(Vec<ChannelInfo>),
    Volume { channel: u32, reading: VolumeReading },
    Volumes(Vec<(u32, VolumeReading)>),
    Muted(MuteSnapshot),
    Status { connected: bool, device: String, control: String, muted: bool },
    Message(String),
}

impl Reply {
    /// JSON form of the reply.
    ///
    /// Multi-channel replies are arrays in enumeration order.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Channels(channels) => json!(channels),
            Self::Volume { channel, reading } => json!({ "channel": channel, "volume": reading }),
            Self::Volumes(volumes) => volumes
                .iter()
                .map(|(id, reading)| json!({ "channel": id, "volume": reading }))
                .collect(),
            Self::Muted(snapshot) => snapshot
                .iter()
                .map(|(id, percent)| json!({ "channel": id, "percent": percent }))
                .collect(),
            Self::Status { connected, device, control, muted } => json!({
                "connected": connected,
                "device": device,
                "control": control,
                "muted": muted,
            }),
            Self::Message(message) => json!({ "message": message }),
        }
    }

    /// Human-readable form of the reply.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        match self {
            Self::Channels(channels) => {
                for channel in channels {
                    let _ = writeln!(out, "{:>2}  {}", channel.id, channel.name);
                }
            }
            Self::Volume { channel, reading } => {
                let _ = writeln!(out, "{}", volume_line(*channel, reading));
            }
            Self::Volumes(volumes) => {
                for (id, reading) in volumes {
                    let _ = writeln!(out, "{}", volume_line(*id, reading));
                }
            }
            Self::Muted(snapshot) => {
                let _ = writeln!(out, "Muted {} channel(s)", snapshot.len());
            }
            Self::Status { connected, device, control, muted } => {
                let state = if *connected { "connected" } else { "disconnected" };
                let _ = writeln!(out, "{device}/{control}: {state}{}", if *muted { ", muted" } else { "" });
            }
            Self::Message(message) => {
                let _ = writeln!(out, "{message}");
            }
        }
        out.trim_end().to_string()
    }
}

fn volume_line(id: u32, reading: &VolumeReading) -> String {
    format!(
        "{id:>2}  {:<13} {:>3}%  ({} in {}..{})",
        reading.name, reading.percent, reading.current, reading.min, reading.max
    )
}

/// Run one command against the session.
///
/// [`Command::Quit`] is the caller's concern and answers with a message.
///
/// # Errors
/// Returns the session error for the failed operation.
pub fn handle_command<B: MixerBridge>(
    command: &Command,
    session: &mut MixerSession<B>,
) -> mixctl_core::Result<Reply> {
    debug!(?command, "Handling command");
    match command {
        Command::Connect => {
            session.connect()?;
            Ok(Reply::Channels(session.channels()?.to_vec()))
        }

        Command::Disconnect => {
            session.disconnect()?;
            Ok(Reply::Message("Disconnected".to_string()))
        }

        Command::List => Ok(Reply::Channels(session.channels()?.to_vec())),

        Command::Get { channel: Some(channel) } => {
            Ok(Reply::Volume { channel: *channel, reading: session.channel_volume(*channel)? })
        }

        Command::Get { channel: None } => Ok(Reply::Volumes(session.volumes()?)),

        Command::Set { percent, direction } => {
            session.set_all_volumes(*percent, *direction)?;
            Ok(Reply::Volumes(session.volumes()?))
        }

        Command::SetChannel { channel, percent, direction } => {
            let reading = session.set_channel_volume(*channel, *percent, *direction)?;
            Ok(Reply::Volume { channel: *channel, reading })
        }

        Command::Mute => {
            session.mute()?;
            Ok(Reply::Muted(session.mute_snapshot().cloned().unwrap_or_default()))
        }

        Command::Unmute => {
            session.unmute()?;
            Ok(Reply::Volumes(session.volumes()?))
        }

        Command::Status => Ok(Reply::Status {
            connected: session.is_connected(),
            device: session.device().to_string(),
            control: session.control().to_string(),
            muted: session.mute_snapshot().is_some(),
        }),

        Command::Help => Ok(Reply::Message(HELP.to_string())),

        Command::Quit => Ok(Reply::Message("Bye".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use mixctl_core::mock::{MockChannel, MockMixer};
    use mixctl_core::{Direction, Error};

    use super::*;

    fn session() -> (MockMixer, MixerSession<MockMixer>) {
        let mock = MockMixer::stereo();
        (mock.clone(), MixerSession::new(mock))
    }

    #[test]
    fn test_connect_lists_channels() {
        let (_, mut session) = session();
        let reply = handle_command(&Command::Connect, &mut session).unwrap();
        assert_matches!(reply, Reply::Channels(channels) if channels.len() == 2);
    }

    #[test]
    fn test_commands_before_connect_fail() {
        let (_, mut session) = session();
        assert_matches!(handle_command(&Command::List, &mut session), Err(Error::NotConnected));
        assert_matches!(
            handle_command(&Command::Get { channel: None }, &mut session),
            Err(Error::NotConnected)
        );

        // Status works without a connection
        let reply = handle_command(&Command::Status, &mut session).unwrap();
        assert_eq!(reply.to_json()["connected"], false);
    }

    #[test]
    fn test_set_reports_all_volumes() {
        let (mock, mut session) = session();
        handle_command(&Command::Connect, &mut session).unwrap();

        let reply = handle_command(
            &Command::Set { percent: 25, direction: Direction::Absolute },
            &mut session,
        )
        .unwrap();
        let json = reply.to_json();
        assert_eq!(json[0]["volume"]["percent"], 25);
        assert_eq!(json[1]["volume"]["current"], 16384);
        assert_eq!(mock.raw_volume(1), Some(16384));
    }

    #[test]
    fn test_mute_and_unmute_round_trip() {
        let (mock, mut session) = session();
        handle_command(&Command::Connect, &mut session).unwrap();

        let reply = handle_command(&Command::Mute, &mut session).unwrap();
        assert_eq!(reply.to_text(), "Muted 2 channel(s)");
        assert_eq!(mock.raw_volume(0), Some(0));

        let status = handle_command(&Command::Status, &mut session).unwrap();
        assert_eq!(status.to_json()["muted"], true);

        handle_command(&Command::Unmute, &mut session).unwrap();
        assert_eq!(mock.raw_volume(0), Some(32768));
    }

    #[test]
    fn test_volume_text() {
        let reply = Reply::Volume {
            channel: 0,
            reading: VolumeReading::new("Front Left", 0, 65536, 32768),
        };
        assert_eq!(reply.to_text(), " 0  Front Left     50%  (32768 in 0..65536)");
    }

    #[test]
    fn test_json_keeps_enumeration_order() {
        let mock = MockMixer::new(vec![
            MockChannel::new(2, 0, 100, 40),
            MockChannel::new(0, 0, 100, 60),
            MockChannel::new(10, 0, 100, 80),
        ]);
        let mut session = MixerSession::new(mock);
        handle_command(&Command::Connect, &mut session).unwrap();

        let reply = handle_command(&Command::Get { channel: None }, &mut session).unwrap();
        let json = reply.to_json();
        let ids: Vec<_> =
            json.as_array().unwrap().iter().map(|entry| entry["channel"].as_u64().unwrap()).collect();
        assert_eq!(ids, vec![2, 0, 10]);
        assert_eq!(json[0]["volume"]["percent"], 40);

        let reply = handle_command(&Command::Mute, &mut session).unwrap();
        assert_eq!(
            reply.to_json(),
            json!([
                { "channel": 2, "percent": 40 },
                { "channel": 0, "percent": 60 },
                { "channel": 10, "percent": 80 }
            ])
        );
    }
}
