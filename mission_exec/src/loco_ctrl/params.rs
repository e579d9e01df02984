//! Parameters structures for LocoCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for seeking (continuous steering towards a target).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SeekParams {
    /// Duty cycle of the left wheel that drives the robot in a straight line.
    pub straight_left_duty: i32,

    /// Duty cycle of the right wheel that drives the robot in a straight line.
    pub straight_right_duty: i32,

    /// Proportional gain applied to the turn delta.
    ///
    /// Units: duty cycle/degree
    pub gain_duty_per_deg: f64,

    /// Lowest duty cycle the slowed wheel may be given while seeking.
    pub min_duty: i32,
}

/// Parameters for arc manouvres.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ArcParams {
    /// Nominal speed of the robot when driving at full duty cycle.
    ///
    /// Units: feet/second
    pub nominal_speed_ft_per_s: f64,

    /// Polynomial giving the left wheel's duty cycle for a left turn of a given radius, highest
    /// order first.
    pub left_turn_coeffs: Vec<f64>,

    /// Polynomial giving the right wheel's duty cycle for a right turn of a given radius,
    /// highest order first.
    pub right_turn_coeffs: Vec<f64>,

    /// Value of `|sin(turn angle)|` below which the target is considered dead ahead and the arc
    /// becomes a straight line.
    pub straight_threshold: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for SeekParams {
    fn default() -> Self {
        Self {
            straight_left_duty: 255,
            straight_right_duty: 255,
            gain_duty_per_deg: 3.0,
            min_duty: 50,
        }
    }
}

impl Default for ArcParams {
    fn default() -> Self {
        Self {
            nominal_speed_ft_per_s: 3.3,
            left_turn_coeffs: vec![-0.00004, 0.0076, -0.5034, 16.051, 0.0],
            right_turn_coeffs: vec![-0.0002, 0.0206, -0.9359, 21.819, 9.2765],
            straight_threshold: 1e-6,
        }
    }
}
