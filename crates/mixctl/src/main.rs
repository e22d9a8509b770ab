//! mixctl - ALSA mixer volume control.
//!
//! One-shot subcommands open the mixer, run a single command and release it.
//! `mixctl shell` keeps one session open so that `mute` and `unmute` can
//! restore volumes across commands.

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod command;
mod config;
mod handler;
mod shell;

use command::Command;
use mixctl_alsa::{AlsaBridge, SoundCard};
use mixctl_core::mock::MockMixer;
use mixctl_core::{Direction, MixerBridge, MixerSession};
use shell::ShellOptions;

#[derive(Debug, Parser)]
#[command(name = "mixctl", version, about = "Control ALSA mixer channel volumes")]
struct Cli {
    /// Mixer device (e.g. "default", "hw:1")
    #[arg(short, long, global = true)]
    device: Option<String>,

    /// Simple mixer control (e.g. "Master", "PCM")
    #[arg(short, long, global = true)]
    control: Option<String>,

    /// Use an in-memory stereo mixer instead of ALSA
    #[arg(long, global = true)]
    mock: bool,

    /// Print output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Configuration file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// List sound cards
    Cards,
    /// List the control's channels
    List,
    /// Show channel volumes (the default)
    Get {
        /// Channel id; every channel when omitted
        channel: Option<u32>,
    },
    /// Set volumes by a percentage of the channel maximum
    Set {
        /// Percentage of the channel maximum
        #[arg(allow_negative_numbers = true)]
        percent: i64,
        /// raise|up|increase, lower|down|decrease; absolute when omitted
        direction: Option<Direction>,
        /// Adjust only this channel
        #[arg(long)]
        channel: Option<u32>,
    },
    /// Silence every channel
    Mute,
    /// Read commands from stdin against one open mixer
    Shell,
}

impl CliCommand {
    /// Session command for a one-shot subcommand.
    fn to_command(&self) -> Option<Command> {
        match self {
            Self::List => Some(Command::List),
            Self::Get { channel } => Some(Command::Get { channel: *channel }),
            Self::Set { percent, direction, channel: None } => {
                Some(Command::Set { percent: *percent, direction: direction.unwrap_or_default() })
            }
            Self::Set { percent, direction, channel: Some(channel) } => Some(Command::SetChannel {
                channel: *channel,
                percent: *percent,
                direction: direction.unwrap_or_default(),
            }),
            Self::Mute => Some(Command::Mute),
            Self::Cards | Self::Shell => None,
        }
    }
}

fn init_logging(level: &str) -> Result<()> {
    let mut filter = EnvFilter::from_default_env();
    for target in ["mixctl", "mixctl_core", "mixctl_alsa"] {
        filter = filter.add_directive(
            format!("{target}={level}")
                .parse()
                .with_context(|| format!("Invalid log level: {level}"))?,
        );
    }

    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
    Ok(())
}

fn print_cards(cards: &[SoundCard], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(cards)?);
        return Ok(());
    }

    for card in cards {
        println!("{:>2}  {:<6} {:<12} {}", card.index, card.device(), card.id, card.name);
    }
    Ok(())
}

fn run<B: MixerBridge>(
    mut session: MixerSession<B>,
    command: Option<&CliCommand>,
    json: bool,
) -> Result<()> {
    if let Some(CliCommand::Shell) = command {
        let stdin = io::stdin();
        let options = ShellOptions { json, prompt: stdin.is_terminal() };
        shell::run_shell(&mut session, stdin.lock(), &mut io::stdout().lock(), options)
            .context("Shell I/O failed")?;
        return Ok(());
    }

    let command =
        command.and_then(CliCommand::to_command).unwrap_or(Command::Get { channel: None });

    session.connect().with_context(|| {
        format!("Failed to open mixer control {} on {}", session.control(), session.device())
    })?;
    let result = handler::handle_command(&command, &mut session);
    let released = session.disconnect();

    let reply = result?;
    released.context("Failed to release mixer")?;

    if json {
        println!("{}", reply.to_json());
    } else {
        println!("{}", reply.to_text());
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = config::load_config(cli.config.as_deref())?;
    init_logging(&config.logging.level)?;
    debug!(?config, "Configuration loaded");

    let json = cli.json || config.output.json;
    if let Some(CliCommand::Cards) = cli.command {
        let cards = mixctl_alsa::list_cards().context("Failed to list sound cards")?;
        return print_cards(&cards, json);
    }

    let device = cli.device.unwrap_or(config.mixer.device);
    let control = cli.control.unwrap_or(config.mixer.control);

    if cli.mock || config.mixer.mock {
        info!(%device, %control, "Using mock mixer");
        let bridge = MockMixer::stereo().with_control(control.clone());
        run(MixerSession::with_target(bridge, device, control), cli.command.as_ref(), json)
    } else {
        run(MixerSession::with_target(AlsaBridge::new(), device, control), cli.command.as_ref(), json)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use clap::CommandFactory;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("mixctl").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = parse(&["get", "1", "--device", "hw:1", "--json"]);
        assert_eq!(cli.device.as_deref(), Some("hw:1"));
        assert!(cli.json);
        assert_matches!(cli.command, Some(CliCommand::Get { channel: Some(1) }));
    }

    #[test]
    fn test_set_maps_to_session_command() {
        let cli = parse(&["set", "10", "up"]);
        assert_eq!(
            cli.command.as_ref().and_then(CliCommand::to_command),
            Some(Command::Set { percent: 10, direction: Direction::Increase })
        );

        let cli = parse(&["set", "30", "--channel", "1"]);
        assert_eq!(
            cli.command.as_ref().and_then(CliCommand::to_command),
            Some(Command::SetChannel { channel: 1, percent: 30, direction: Direction::Absolute })
        );
    }

    #[test]
    fn test_negative_percent_reaches_session() {
        let cli = parse(&["set", "-5"]);
        assert_matches!(cli.command, Some(CliCommand::Set { percent: -5, .. }));
    }

    #[test]
    fn test_shell_and_cards_are_not_session_commands() {
        assert_eq!(CliCommand::Shell.to_command(), None);
        assert_eq!(CliCommand::Cards.to_command(), None);
    }

    #[test]
    fn test_one_shot_against_mock() {
        let mock = MockMixer::stereo();
        let cli = parse(&["set", "75"]);
        run(MixerSession::new(mock.clone()), cli.command.as_ref(), false).unwrap();

        assert_eq!(mock.raw_volume(0), Some(49152));
        assert_eq!(mock.raw_volume(1), Some(49152));
        assert_eq!(mock.open_handles(), 0);
    }

    #[test]
    fn test_one_shot_releases_mixer_on_error() {
        let mock = MockMixer::stereo();
        let cli = parse(&["get", "7"]);
        assert!(run(MixerSession::new(mock.clone()), cli.command.as_ref(), false).is_err());
        assert_eq!(mock.open_handles(), 0);
    }
}
