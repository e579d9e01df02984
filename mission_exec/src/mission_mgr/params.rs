//! # MissionMgr Parameters

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;

use crate::{
    chor::ChorParams,
    loco_ctrl::{ArcParams, SeekParams},
    strategy::StrategyParams,
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MissionMgrParams {
    // ---- MATCH ----
    /// Length of a match, after which the robot is returned to ReadyForMission.
    pub match_length_ms: u64,

    // ---- DRIVING TOWARDS A TARGET ----
    /// Distance from the target within which an arc may be started.
    pub arc_trigger_distance_ft: f64,

    /// The turn to the target must be smaller than this, on either side, to start an arc.
    pub arc_trigger_max_turn_deg: f64,

    /// X position beyond which a pending white ball is retrieved.
    pub white_ball_min_x_ft: f64,

    // ---- PICKUP ----
    /// Time spent stationary in WaitingForPickup before seeking home again.
    pub waiting_for_pickup_ms: u64,

    /// Time spent seeking home before stopping to wait again.
    pub seeking_home_ms: u64,

    /// Number of consecutive samples moving away from home after which the field heading is
    /// realigned to the course over ground.
    pub drift_count_limit: u32,

    // ---- SCRIPTS ----
    /// Start point of the straight leg driven to the near ball.
    pub near_ball_start_ft: [f64; 2],

    /// End point of the straight leg driven to the near ball.
    pub near_ball_end_ft: [f64; 2],

    /// Wheel demands of the turn made after retrieving the far ball.
    pub far_ball_turn_dems: [i32; 2],

    /// Start of the turn after retrieving the far ball, from the start of FarBallScript.
    pub far_ball_turn_at_ms: u64,

    /// End of the turn, when straight driving resumes.
    pub far_ball_straight_at_ms: u64,

    /// Time at which FarBallScript hands over to DriveTowardsHome.
    pub far_ball_done_at_ms: u64,

    // ---- MANUAL DRIVING ----
    /// Distance driven by a voice keyword.
    pub keyword_distance_ft: f64,

    /// Duty cycle of the inside wheel when turning on a voice keyword.
    pub keyword_turn_duty: i32,

    /// Duration of the straight drive test.
    pub straight_test_ms: u64,

    // ---- MODULES ----
    pub seek: SeekParams,

    pub arc: ArcParams,

    pub chor: ChorParams,

    pub strategy: StrategyParams,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for MissionMgrParams {
    fn default() -> Self {
        Self {
            match_length_ms: 180_000,
            arc_trigger_distance_ft: 30.0,
            arc_trigger_max_turn_deg: 70.0,
            white_ball_min_x_ft: 200.0,
            waiting_for_pickup_ms: 8000,
            seeking_home_ms: 8000,
            drift_count_limit: 5,
            near_ball_start_ft: [15.0, 0.0],
            near_ball_end_ft: [90.0, 50.0],
            far_ball_turn_dems: [50, 255],
            far_ball_turn_at_ms: 15000,
            far_ball_straight_at_ms: 17000,
            far_ball_done_at_ms: 23000,
            keyword_distance_ft: 8.0,
            keyword_turn_duty: 180,
            straight_test_ms: 4000,
            seek: SeekParams::default(),
            arc: ArcParams::default(),
            chor: ChorParams::default(),
            strategy: StrategyParams::default(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_params_file_matches_defaults() {
        let params: MissionMgrParams =
            util::params::from_str(include_str!("../../../params/mission_mgr.toml")).unwrap();
        let default = MissionMgrParams::default();

        assert_eq!(params.match_length_ms, default.match_length_ms);
        assert_eq!(params.near_ball_end_ft, default.near_ball_end_ft);
        assert_eq!(params.far_ball_turn_dems, default.far_ball_turn_dems);
        assert_eq!(params.keyword_turn_duty, default.keyword_turn_duty);
        assert_eq!(params.seek.min_duty, default.seek.min_duty);
        assert_eq!(params.arc.right_turn_coeffs, default.arc.right_turn_coeffs);
        assert_eq!(params.chor.stand_poses, default.chor.stand_poses);
        assert_eq!(params.chor.offsets.home_ms, default.chor.offsets.home_ms);
        assert_eq!(params.strategy.far_second_y_ft, default.strategy.far_second_y_ft);
    }

    #[test]
    fn test_missing_values_take_defaults() {
        let params: MissionMgrParams =
            util::params::from_str("match_length_ms = 1000\n[seek]\nmin_duty = 80\n").unwrap();

        assert_eq!(params.match_length_ms, 1000);
        assert_eq!(params.seek.min_duty, 80);
        assert_eq!(params.seek.gain_duty_per_deg, 3.0);
        assert_eq!(params.chor.retrieval_time_ms, 15000);
    }
}
