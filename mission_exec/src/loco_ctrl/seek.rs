//! Seek calculations

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use log::trace;

// Internal imports
use super::LocoCtrl;
use crate::loc::Pose;
use comms_if::eqpt::mech::WheelDems;
use util::maths::{left_turn_delta_deg, right_turn_delta_deg};

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl LocoCtrl {
    /// Calculate the wheel demands which steer the robot towards the target point.
    ///
    /// The wheel on the inside of the shorter turn is slowed in proportion to the turn delta,
    /// never below the minimum seek duty cycle, while the outside wheel stays at its straight
    /// line duty cycle. When both turns are equal the right wheel is slowed.
    ///
    /// A known heading is required, callers must skip seeking on samples without one.
    pub fn seek_target(
        &self,
        pose: &Pose,
        heading_deg: f64,
        target_x_ft: f64,
        target_y_ft: f64,
    ) -> WheelDems {
        let target_heading_deg = pose.heading_to(target_x_ft, target_y_ft);
        let left_delta_deg = left_turn_delta_deg(heading_deg, target_heading_deg);
        let right_delta_deg = right_turn_delta_deg(heading_deg, target_heading_deg);

        let mut left = self.straight.left;
        let mut right = self.straight.right;

        if left_delta_deg < right_delta_deg {
            left = self.slowed_duty(self.straight.left, left_delta_deg);
        } else {
            right = self.slowed_duty(self.straight.right, right_delta_deg);
        }

        let dems = WheelDems::forward(left, right);

        trace!(
            "Seek ({:.1}, {:.1}) from ({:.1}, {:.1}) @ {:.1}: L {:.1} R {:.1} => {}",
            target_x_ft,
            target_y_ft,
            pose.x(),
            pose.y(),
            heading_deg,
            left_delta_deg,
            right_delta_deg,
            dems
        );

        dems
    }

    fn slowed_duty(&self, straight_duty: i32, delta_deg: f64) -> i32 {
        let reduction = (delta_deg * self.seek_params.gain_duty_per_deg) as i32;

        // The floor may not raise a wheel calibrated below it
        (straight_duty - reduction).max(self.seek_params.min_duty.min(straight_duty))
    }
}
