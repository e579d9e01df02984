//! # Defines Telemetry Pack for the mission

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use serde::Serialize;

use super::MissionState;
use crate::{
    chor::Epoch,
    loc::Pose,
    strategy::{StandSlots, TargetPoint},
};
use comms_if::{
    eqpt::mech::WheelDems,
    tc::mission::{SlotId, Team},
};

// -----------------------------------------------------------------------------------------------
// STRUCTS
// -----------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct MissionTm {
    pub state: MissionState,
    pub state_time_ms: u64,
    pub match_time_remaining_ms: u64,
    pub epoch: Epoch,
    pub go_armed: bool,

    pub pose: Option<Pose>,
    pub heading_deg: Option<f64>,
    pub field_heading_deg: Option<f64>,
    pub wheel_dems: WheelDems,

    pub team: Team,
    pub slots: StandSlots,
    pub far_target: TargetPoint,
    pub white_slot: Option<SlotId>,

    pub num_pending_actions: usize,
}
