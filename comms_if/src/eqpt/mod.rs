//! # Equipment Interface
//!
//! This module defines the interface structures which will be sent to the robot's equipment.

pub mod mech;
