//! # Mechanisms Client
//!
//! This module provides the interface through which wheel and arm demands leave the mission
//! controller. The physical link to the robot is not part of this software, so [`MechClient`]
//! only logs the demands it is given.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::eqpt::mech::{ArmCmd, WheelDems};
use log::debug;

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A destination for actuator demands.
pub trait MechSink {
    /// Send new duty cycles to the drive wheels.
    fn send_wheel_speed(&mut self, dems: WheelDems);

    /// Send a text command to the arm.
    fn send_arm_cmd(&mut self, cmd: &ArmCmd);
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Client which logs every demand sent to it.
#[derive(Debug, Default)]
pub struct MechClient {
    num_wheel_dems: u64,
    num_arm_cmds: u64,
}

/// Sink which records every demand, used to inspect the controller's output.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub sent: Vec<SentCmd>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A demand recorded by [`RecordingSink`].
#[derive(Debug, Clone, PartialEq)]
pub enum SentCmd {
    Wheel(WheelDems),
    Arm(ArmCmd),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl MechClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_num_wheel_dems(&self) -> u64 {
        self.num_wheel_dems
    }

    pub fn get_num_arm_cmds(&self) -> u64 {
        self.num_arm_cmds
    }
}

impl MechSink for MechClient {
    fn send_wheel_speed(&mut self, dems: WheelDems) {
        self.num_wheel_dems += 1;
        debug!("Wheel demands: {}", dems);
    }

    fn send_arm_cmd(&mut self, cmd: &ArmCmd) {
        self.num_arm_cmds += 1;
        debug!("Arm command: {}", cmd);
    }
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All wheel demands sent, in order.
    pub fn wheel_dems(&self) -> Vec<WheelDems> {
        self.sent
            .iter()
            .filter_map(|c| match c {
                SentCmd::Wheel(w) => Some(*w),
                _ => None,
            })
            .collect()
    }

    /// All arm commands sent, in order.
    pub fn arm_cmds(&self) -> Vec<String> {
        self.sent
            .iter()
            .filter_map(|c| match c {
                SentCmd::Arm(a) => Some(a.to_string()),
                _ => None,
            })
            .collect()
    }

    pub fn last_wheel_dems(&self) -> Option<WheelDems> {
        self.wheel_dems().last().copied()
    }

    pub fn clear(&mut self) {
        self.sent.clear();
    }
}

impl MechSink for RecordingSink {
    fn send_wheel_speed(&mut self, dems: WheelDems) {
        self.sent.push(SentCmd::Wheel(dems));
    }

    fn send_arm_cmd(&mut self, cmd: &ArmCmd) {
        self.sent.push(SentCmd::Arm(cmd.clone()));
    }
}
