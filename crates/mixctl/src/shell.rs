//! Interactive shell keeping one mixer session open across commands.

use std::io::{self, BufRead, Write};

use mixctl_core::{MixerBridge, MixerSession};
use serde_json::json;
use tracing::{debug, info};

use crate::command::Command;
use crate::handler::{Reply, handle_command};

/// Shell output options.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellOptions {
    /// Print replies as JSON lines
    pub json: bool,
    /// Print a prompt before each command
    pub prompt: bool,
}

fn print_reply<W: Write>(out: &mut W, reply: &Reply, json: bool) -> io::Result<()> {
    if json {
        writeln!(out, "{}", reply.to_json())
    } else {
        writeln!(out, "{}", reply.to_text())
    }
}

fn print_error<W: Write>(out: &mut W, error: &dyn std::error::Error, json: bool) -> io::Result<()> {
    if json {
        writeln!(out, "{}", json!({ "error": error.to_string() }))
    } else {
        writeln!(out, "error: {error}")
    }
}

/// Run commands read from `input` until end of input or `quit`.
///
/// The session is connected on entry and disconnected on exit. Command
/// failures are reported and the shell carries on.
pub fn run_shell<B, R, W>(
    session: &mut MixerSession<B>,
    input: R,
    out: &mut W,
    options: ShellOptions,
) -> io::Result<()>
where
    B: MixerBridge,
    R: BufRead,
    W: Write,
{
    info!(device = session.device(), control = session.control(), "Starting mixer shell");
    match handle_command(&Command::Connect, session) {
        Ok(reply) => print_reply(out, &reply, options.json)?,
        Err(e) => print_error(out, &e, options.json)?,
    }

    let mut lines = input.lines();
    loop {
        if options.prompt {
            write!(out, "mixctl> ")?;
            out.flush()?;
        }
        let Some(line) = lines.next().transpose()? else {
            break;
        };

        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(Command::Quit) => break,
            Ok(command) => command,
            Err(e) => {
                print_error(out, &e, options.json)?;
                continue;
            }
        };

        match handle_command(&command, session) {
            Ok(reply) => print_reply(out, &reply, options.json)?,
            Err(e) => print_error(out, &e, options.json)?,
        }
    }

    if let Err(e) = session.disconnect() {
        print_error(out, &e, options.json)?;
    }
    debug!("Mixer shell finished");
    Ok(())
}
