//! # Mechanisms Equipment Commands

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use std::fmt;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Maximum absolute duty cycle that can be demanded of a wheel.
pub const MAX_DUTY_CYCLE: i32 = 255;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Duty cycle demands for the left and right drive motors.
///
/// Positive values drive forwards, negative values drive in reverse. Both values are kept within
/// `[-MAX_DUTY_CYCLE, MAX_DUTY_CYCLE]` by [`WheelDems::new`].
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WheelDems {
    pub left: i32,
    pub right: i32,
}

/// A command for the robot arm.
///
/// The arm speaks a plain text protocol, for example `POSITION 83 90 0 -90 90`, `GRIPPER 45` or
/// `ATTACH 111111`. The text is forwarded as-is, no acknowledgement is expected.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ArmCmd(String);

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl WheelDems {
    /// Create a new demand, clamping both sides to the signed duty cycle range.
    pub fn new(left: i32, right: i32) -> Self {
        Self {
            left: left.clamp(-MAX_DUTY_CYCLE, MAX_DUTY_CYCLE),
            right: right.clamp(-MAX_DUTY_CYCLE, MAX_DUTY_CYCLE),
        }
    }

    /// Create a forward-only demand, clamping both sides to `[0, MAX_DUTY_CYCLE]`.
    pub fn forward(left: i32, right: i32) -> Self {
        Self {
            left: left.clamp(0, MAX_DUTY_CYCLE),
            right: right.clamp(0, MAX_DUTY_CYCLE),
        }
    }

    /// Zero demand on both wheels.
    pub fn stop() -> Self {
        Self::default()
    }

    /// The same demand with both sides driving the other way.
    pub fn reversed(&self) -> Self {
        Self::new(-self.left, -self.right)
    }
}

impl fmt::Display for WheelDems {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Left {} / {} Right", self.left, self.right)
    }
}

impl ArmCmd {
    /// Move the arm joints to the given position.
    pub fn position(x: i32, y: i32, z: i32, pitch: i32, roll: i32) -> Self {
        Self(format!("POSITION {} {} {} {} {}", x, y, z, pitch, roll))
    }

    /// Set the gripper opening.
    pub fn gripper(value: i32) -> Self {
        Self(format!("GRIPPER {}", value))
    }

    /// Attach (power) the servos selected by the mask, e.g. `111111`.
    pub fn attach(mask: &str) -> Self {
        Self(format!("ATTACH {}", mask))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArmCmd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
