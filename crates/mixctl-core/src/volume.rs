//! Volume arithmetic: mapping a percentage change onto a raw hardware range.
//!
//! These are free functions with no state. The session reads a channel's
//! `[min, max]` range and current value from the bridge, runs [`compute`],
//! and writes the result back.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Direction of a volume adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Raise the current volume by the given percentage of max
    Increase,
    /// Lower the current volume by the given percentage of max
    Decrease,
    /// Set the volume to the given percentage of max
    #[default]
    Absolute,
}

impl Direction {
    /// Normalize a direction tag.
    ///
    /// `raise`, `up` and `increase` mean [`Direction::Increase`]; `lower`,
    /// `down` and `decrease` mean [`Direction::Decrease`]. Anything else,
    /// including an empty tag, is [`Direction::Absolute`].
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "raise" | "up" | "increase" => Self::Increase,
            "lower" | "down" | "decrease" => Self::Decrease,
            _ => Self::Absolute,
        }
    }

    /// Canonical spelling of this direction.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Increase => "increase",
            Self::Decrease => "decrease",
            Self::Absolute => "absolute",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_tag(s))
    }
}

/// Bound `value` to `[min, max]`.
///
/// Values above `max` become `max`, values below `min` become `min`. The
/// caller guarantees `min <= max`.
#[must_use]
pub fn clamp<T: PartialOrd>(min: T, max: T, value: T) -> T {
    if value > max {
        max
    } else if value < min {
        min
    } else {
        value
    }
}

/// Raw step for `percent_change` percent of `max`, rounded half away from zero.
#[must_use]
pub fn percent_step(max: i64, percent_change: i64) -> i128 {
    let scaled = i128::from(max) * i128::from(percent_change);
    let quotient = scaled / 100;
    let remainder = scaled % 100;
    if remainder.abs() * 2 >= 100 {
        quotient + scaled.signum()
    } else {
        quotient
    }
}

/// Compute the new raw volume for a channel.
///
/// The step is proportional to the channel's `max`, not to `current` or to
/// the width of the range, so it is the same wherever `current` sits. In
/// absolute mode the result ignores `current` entirely.
///
/// The result always lies in `[min, max]`.
#[must_use]
pub fn compute(min: i64, max: i64, current: i64, percent_change: i64, direction: Direction) -> i64 {
    let delta = percent_step(max, percent_change);
    let current = i128::from(current);
    let target = match direction {
        Direction::Increase => current + delta,
        Direction::Decrease => current - delta,
        Direction::Absolute => delta,
    };

    let bounded = clamp(i128::from(min), i128::from(max), target);
    i64::try_from(bounded).unwrap_or(min)
}
