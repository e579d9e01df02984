//! # Telecommand module
//!
//! This module provides the inputs that drive the mission controller. Operator requests, sensor
//! samples and recognised voice commands are all carried as a [`Tc`] so that they can be queued
//! onto the controller's single input stream, whether they come from a script, a terminal or the
//! sensor drivers.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod mission;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};
use structopt::{clap::AppSettings, StructOpt};
use thiserror::Error;

// Internal
pub use mission::{BallColor, MissionParseError, SlotId, Team, VoiceKeyword, NUM_STAND_SLOTS};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// A telecommand, i.e. an input delivered to the mission controller.
///
/// On the command line each variant is a subcommand, for example `pose 230 40 35`,
/// `color 1 red` or `start`. In scripts and on the wire they are JSON, for example
/// `{"Pose": {"x_ft": 230.0, "y_ft": 40.0, "heading_deg": 35.0}}` or `"StartMission"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, StructOpt)]
#[structopt(name = "tc")]
pub enum Tc {
    /// A position sample from the field GPS.
    ///
    /// Headings are in degrees, valid in (-180, 180]. A missing or out of range heading means
    /// the heading is not known for this sample.
    #[structopt(name = "pose", setting = AppSettings::AllowNegativeNumbers)]
    Pose {
        x_ft: f64,
        y_ft: f64,
        #[serde(default)]
        heading_deg: Option<f64>,
    },

    /// A reading from the field orientation (compass) sensor, in degrees.
    #[structopt(name = "field", setting = AppSettings::AllowNegativeNumbers)]
    FieldHeading { heading_deg: f64 },

    /// Reset the field orientation sensor so that it currently reads zero.
    #[structopt(name = "zero")]
    ZeroFieldHeading,

    /// A recognised "angle + distance" voice command.
    ///
    /// Positive distances drive an arc, zero or negative distances reverse in a straight line.
    #[structopt(name = "voice", setting = AppSettings::AllowNegativeNumbers)]
    Voice { angle_deg: i32, distance_ft: f64 },

    /// A recognised single word voice command.
    #[structopt(name = "say")]
    VoiceKeyword { keyword: VoiceKeyword },

    /// Report the colour of the ball observed at a stand slot.
    #[structopt(name = "color")]
    ReportColor { slot: SlotId, color: BallColor },

    /// Change team, which also clears all reported colours.
    #[structopt(name = "team")]
    SetTeam { team: Team },

    /// Calibrate the duty cycles used to drive in a straight line.
    #[structopt(name = "straight")]
    SetStraightDuty { left: i32, right: i32 },

    /// Drive straight for a short time to check the straight duty cycles.
    #[structopt(name = "test-straight")]
    TestStraightDrive,

    /// Begin the mission ("Go!").
    #[structopt(name = "start")]
    StartMission,

    /// End the mission and return to ReadyForMission ("Mission Complete!").
    #[structopt(name = "abort")]
    AbortMission,
}

/// Possible parsing errors.
#[derive(Debug, Error)]
pub enum TcParseError {
    #[error("TC contains invalid JSON: {0}")]
    InvalidJson(serde_json::Error),

    #[error("TC is not a valid command: {0}")]
    InvalidCommand(String),

    #[error("TC is empty")]
    Empty,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Tc {
    /// Parse a new TC from a JSON packet
    pub fn from_json(json_str: &str) -> Result<Self, TcParseError> {
        serde_json::from_str(json_str).map_err(TcParseError::InvalidJson)
    }

    /// Parse a TC from a single line of input.
    ///
    /// Lines starting with `{` or `"` are treated as JSON, anything else as a command line such
    /// as `pose 230 40 35`.
    pub fn from_line(line: &str) -> Result<Self, TcParseError> {
        let line = line.trim();

        if line.is_empty() {
            return Err(TcParseError::Empty);
        }

        if line.starts_with('{') || line.starts_with('"') {
            return Self::from_json(line);
        }

        // The first item is taken as the binary name by clap
        Tc::from_iter_safe(std::iter::once("tc").chain(line.split_whitespace()))
            .map_err(|e| TcParseError::InvalidCommand(e.message))
    }
}
