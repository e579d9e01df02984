//! Arc manouvre calculations

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use log::debug;
use serde::Serialize;

// Internal imports
use super::LocoCtrl;
use crate::loc::Pose;
use comms_if::eqpt::mech::{WheelDems, MAX_DUTY_CYCLE};
use util::maths::{left_turn_delta_deg, poly_val, right_turn_delta_deg};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An arc which takes the robot from its current pose to a target point.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct ArcPlan {
    /// Radius of the circle the robot drives along. Negative radii are left turns, an infinite
    /// radius is a straight line.
    ///
    /// Units: feet
    pub turn_radius_ft: f64,

    /// Length of the arc along the circle.
    ///
    /// Units: feet
    pub arc_length_ft: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ArcPlan {
    pub fn is_straight(&self) -> bool {
        self.turn_radius_ft.is_infinite()
    }
}

impl LocoCtrl {
    /// Plan the arc which is tangent to the robot's heading and passes through the target.
    ///
    /// For a turn angle `theta` between the heading and the target bearing, and a chord of length
    /// `d` to the target, the radius is `d / (2 sin(theta))` and the arc subtends `2 theta`.
    pub fn plan_arc(
        &self,
        pose: &Pose,
        heading_deg: f64,
        target_x_ft: f64,
        target_y_ft: f64,
    ) -> ArcPlan {
        let target_heading_deg = pose.heading_to(target_x_ft, target_y_ft);
        let left_delta_deg = left_turn_delta_deg(heading_deg, target_heading_deg);
        let right_delta_deg = right_turn_delta_deg(heading_deg, target_heading_deg);

        // Signed turn, left positive
        let turn_rad = if left_delta_deg < right_delta_deg {
            left_delta_deg.to_radians()
        } else {
            -right_delta_deg.to_radians()
        };

        let chord_ft = pose.distance_to(target_x_ft, target_y_ft);
        let sin_turn = turn_rad.abs().sin();

        let plan = if sin_turn < self.arc_params.straight_threshold {
            ArcPlan {
                turn_radius_ft: std::f64::INFINITY,
                arc_length_ft: chord_ft,
            }
        } else {
            let radius_ft = chord_ft / (2.0 * sin_turn);

            ArcPlan {
                turn_radius_ft: if turn_rad > 0.0 { -radius_ft } else { radius_ft },
                arc_length_ft: radius_ft * 2.0 * turn_rad.abs(),
            }
        };

        debug!(
            "Arc planned to ({:.1}, {:.1}): radius {:.2} ft, length {:.2} ft",
            target_x_ft, target_y_ft, plan.turn_radius_ft, plan.arc_length_ft
        );

        plan
    }

    /// Wheel demands which drive an arc of the given radius.
    ///
    /// The outside wheel runs at full duty cycle while the inside wheel's duty cycle comes from
    /// the calibration polynomial for that direction.
    pub fn arc_dems(&self, turn_radius_ft: f64) -> WheelDems {
        if turn_radius_ft.is_infinite() || turn_radius_ft.is_nan() {
            return WheelDems::forward(MAX_DUTY_CYCLE, MAX_DUTY_CYCLE);
        }

        if turn_radius_ft < 0.0 {
            let left = poly_val(turn_radius_ft.abs(), &self.arc_params.left_turn_coeffs);
            WheelDems::forward(saturate(left), MAX_DUTY_CYCLE)
        } else {
            let right = poly_val(turn_radius_ft, &self.arc_params.right_turn_coeffs);
            WheelDems::forward(MAX_DUTY_CYCLE, saturate(right))
        }
    }
}

/// Truncate a polynomial output to a duty cycle.
fn saturate(value: f64) -> i32 {
    if value >= MAX_DUTY_CYCLE as f64 {
        MAX_DUTY_CYCLE
    } else if value <= 0.0 || value.is_nan() {
        0
    } else {
        value as i32
    }
}
