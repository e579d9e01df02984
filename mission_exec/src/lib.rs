//! # Mission library.
//!
//! This library allows other crates in the workspace, and the tests and benchmarks, to access
//! items defined inside the mission crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Choreography - timed, cancellable sequences of actuator commands
pub mod chor;

/// Localisation module - provides the robot with an idea of where it is on the field
pub mod loc;

/// Locomotion control module - converts a pose and a target into wheel demands
pub mod loco_ctrl;

/// Mechanisms client - sends actuator demands to the robot
pub mod mech_client;

/// Mission manager - the mission state machine
pub mod mission_mgr;

/// Strategy - decides which balls to retrieve and where to take them
pub mod strategy;
