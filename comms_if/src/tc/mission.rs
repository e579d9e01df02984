//! # Mission vocabulary
//!
//! Types describing the golf ball stand and the teams, as reported by the operator.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt, str::FromStr};
use thiserror::Error;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Number of ball locations on the stand.
pub const NUM_STAND_SLOTS: usize = 3;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Index of a location on the ball stand, always in `1..=NUM_STAND_SLOTS`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "u8", into = "u8")]
pub struct SlotId(u8);

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Colour of a golf ball.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BallColor {
    None,
    Blue,
    Red,
    Yellow,
    Green,
    Black,
    White,
}

impl Default for BallColor {
    fn default() -> Self {
        BallColor::None
    }
}

/// The team the robot is playing for.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Team {
    Red,
    Blue,
}

impl Default for Team {
    fn default() -> Self {
        Team::Blue
    }
}

/// Simple spoken commands which drive a fixed distance without changing mission state.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceKeyword {
    Forward,
    Left,
    Right,
    Back,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MissionParseError {
    #[error("Stand slot must be between 1 and {}, found {0}", NUM_STAND_SLOTS)]
    InvalidSlot(u8),

    #[error("\"{0}\" is not a recognised ball colour")]
    InvalidColor(String),

    #[error("\"{0}\" is not a recognised team")]
    InvalidTeam(String),

    #[error("\"{0}\" is not a recognised voice keyword")]
    InvalidKeyword(String),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SlotId {
    /// Create a slot index, returning `None` if outside `1..=NUM_STAND_SLOTS`.
    pub fn new(slot: u8) -> Option<Self> {
        if slot >= 1 && slot as usize <= NUM_STAND_SLOTS {
            Some(Self(slot))
        } else {
            None
        }
    }

    /// Slot from a zero-based array index.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::new((index + 1) as u8)
    }

    /// The zero-based array index of this slot.
    pub fn index(&self) -> usize {
        (self.0 - 1) as usize
    }

    pub fn get(&self) -> u8 {
        self.0
    }

    /// All slots in increasing order.
    pub fn all() -> impl Iterator<Item = SlotId> {
        (1..=NUM_STAND_SLOTS as u8).map(SlotId)
    }
}

impl TryFrom<u8> for SlotId {
    type Error = MissionParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        SlotId::new(value).ok_or(MissionParseError::InvalidSlot(value))
    }
}

impl From<SlotId> for u8 {
    fn from(slot: SlotId) -> Self {
        slot.0
    }
}

impl FromStr for SlotId {
    type Err = MissionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u8 = s.trim().parse().map_err(|_| MissionParseError::InvalidSlot(0))?;
        SlotId::try_from(value)
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BallColor {
    type Err = MissionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(BallColor::None),
            "blue" => Ok(BallColor::Blue),
            "red" => Ok(BallColor::Red),
            "yellow" => Ok(BallColor::Yellow),
            "green" => Ok(BallColor::Green),
            "black" => Ok(BallColor::Black),
            "white" => Ok(BallColor::White),
            _ => Err(MissionParseError::InvalidColor(s.to_string())),
        }
    }
}

impl FromStr for Team {
    type Err = MissionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "red" => Ok(Team::Red),
            "blue" => Ok(Team::Blue),
            _ => Err(MissionParseError::InvalidTeam(s.to_string())),
        }
    }
}

impl FromStr for VoiceKeyword {
    type Err = MissionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "forward" => Ok(VoiceKeyword::Forward),
            "left" => Ok(VoiceKeyword::Left),
            "right" => Ok(VoiceKeyword::Right),
            "back" => Ok(VoiceKeyword::Back),
            _ => Err(MissionParseError::InvalidKeyword(s.to_string())),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_slot_range() {
        assert!(SlotId::new(0).is_none());
        assert!(SlotId::new(4).is_none());
        assert_eq!(SlotId::new(3).map(|s| s.index()), Some(2));
        assert_eq!(SlotId::all().map(|s| s.get()).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!("2".parse::<SlotId>(), Ok(SlotId(2)));
        assert_eq!("5".parse::<SlotId>(), Err(MissionParseError::InvalidSlot(5)));
    }

    #[test]
    fn test_parse_vocabulary() {
        assert_eq!("White".parse::<BallColor>(), Ok(BallColor::White));
        assert_eq!("RED".parse::<Team>(), Ok(Team::Red));
        assert_eq!("back".parse::<VoiceKeyword>(), Ok(VoiceKeyword::Back));
        assert!("purple".parse::<BallColor>().is_err());
    }
}
