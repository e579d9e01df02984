//! Locomotion control module
//!
//! Converts the robot's pose and a target point into differential duty cycle demands for the two
//! drive wheels. Two kinds of manouvre are supported:
//!
//! - Seeking ([`LocoCtrl::seek_target`]): continuous proportional correction while driving
//!   nominally straight, recalculated on every cycle.
//! - Arcs ([`LocoCtrl::plan_arc`]): a single open-loop turn calculated once, driven at a fixed
//!   duty cycle pair for a fixed duration.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod arc;
mod params;
mod seek;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::info;

// Internal
pub use arc::*;
pub use params::*;
use comms_if::eqpt::mech::WheelDems;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Locomotion control module state
#[derive(Debug, Clone)]
pub struct LocoCtrl {
    pub(crate) seek_params: SeekParams,

    pub(crate) arc_params: ArcParams,

    /// Calibrated duty cycles that drive the robot in a straight line.
    straight: WheelDems,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl LocoCtrl {
    pub fn new(seek_params: SeekParams, arc_params: ArcParams) -> Self {
        let straight =
            WheelDems::forward(seek_params.straight_left_duty, seek_params.straight_right_duty);

        Self {
            seek_params,
            arc_params,
            straight,
        }
    }

    /// Demands which drive the robot in a straight line.
    pub fn straight_dems(&self) -> WheelDems {
        self.straight
    }

    /// Calibrate the straight line duty cycles, clamping each to `[0, 255]`.
    pub fn set_straight_duty(&mut self, left: i32, right: i32) -> WheelDems {
        self.straight = WheelDems::forward(left, right);
        info!("Straight drive duty cycles set to {}", self.straight);
        self.straight
    }

    /// Time taken to drive the given distance at the nominal speed.
    ///
    /// Units: milliseconds
    pub fn drive_time_ms(&self, distance_ft: f64) -> u64 {
        (distance_ft.abs() / self.arc_params.nominal_speed_ft_per_s * 1000.0) as u64
    }
}

impl Default for LocoCtrl {
    fn default() -> Self {
        Self::new(SeekParams::default(), ArcParams::default())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_straight_calibration() {
        let mut loco = LocoCtrl::default();
        assert_eq!(loco.straight_dems(), WheelDems::new(255, 255));

        assert_eq!(loco.set_straight_duty(240, 300), WheelDems::new(240, 255));
        assert_eq!(loco.set_straight_duty(-5, 200), WheelDems::new(0, 200));
    }

    #[test]
    fn test_drive_time() {
        let loco = LocoCtrl::default();
        assert_eq!(loco.drive_time_ms(5.0), 1515);
        assert_eq!(loco.drive_time_ms(-5.0), 1515);
        assert_eq!(loco.drive_time_ms(8.0), 2424);
    }
}
