//! # Communications interface crate.
//!
//! Provides all common communications interfaces for the software: the inputs delivered to the
//! mission controller (telecommands and sensor samples) and the demands it sends to the robot.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

pub mod tc;

/// Command definitions for equipment (wheels and arm)
pub mod eqpt;
