//! Sound card discovery.

use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::error::{AlsaError, AlsaResult};

/// Kernel listing of registered sound cards.
pub const CARDS_PATH: &str = "/proc/asound/cards";

/// A sound card registered with ALSA.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SoundCard {
    /// Card number
    pub index: u32,
    /// Short card id (e.g. "PCH")
    pub id: String,
    /// Kernel driver (e.g. "HDA-Intel")
    pub driver: String,
    /// Card name
    pub name: String,
    /// Long description from the continuation line
    pub description: Option<String>,
}

impl SoundCard {
    /// Mixer device name addressing this card directly.
    #[must_use]
    pub fn device(&self) -> String {
        format!("hw:{}", self.index)
    }
}

/// List the sound cards known to the kernel.
///
/// # Errors
/// Returns an error if the card listing cannot be read.
pub fn list_cards() -> AlsaResult<Vec<SoundCard>> {
    list_cards_from(Path::new(CARDS_PATH))
}

/// List sound cards from a `/proc/asound/cards` style file.
///
/// # Errors
/// Returns an error if the file cannot be read.
pub fn list_cards_from(path: &Path) -> AlsaResult<Vec<SoundCard>> {
    let contents = std::fs::read_to_string(path).map_err(AlsaError::IoError)?;
    let cards = parse_cards(&contents);
    debug!(count = cards.len(), "Found sound cards");
    Ok(cards)
}

/// Parse the card listing.
///
/// Header lines look like ` 0 [PCH            ]: HDA-Intel - HDA Intel PCH`
/// and are followed by an indented description line.
#[must_use]
pub fn parse_cards(contents: &str) -> Vec<SoundCard> {
    let mut cards: Vec<SoundCard> = Vec::new();

    for line in contents.lines() {
        if let Some(card) = parse_header(line) {
            cards.push(card);
        } else if let Some(card) = cards.last_mut()
            && card.description.is_none()
        {
            let description = line.trim();
            if !description.is_empty() {
                card.description = Some(description.to_string());
            }
        }
    }

    cards
}

fn parse_header(line: &str) -> Option<SoundCard> {
    let (index, rest) = line.trim_start().split_once(' ')?;
    let index = index.parse::<u32>().ok()?;

    let open = rest.find('[')?;
    let close = rest.find(']')?;
    let id = rest.get(open + 1..close)?.trim();

    let (driver, name) = rest.get(close + 1..)?.trim_start_matches(':').split_once(" - ")?;

    Some(SoundCard {
        index,
        id: id.to_string(),
        driver: driver.trim().to_string(),
        name: name.trim().to_string(),
        description: None,
    })
}
