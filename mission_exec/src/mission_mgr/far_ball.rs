//! # FarBallScript implementation

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::eqpt::mech::WheelDems;
use log::warn;

use super::{MissionAction, MissionMgr, MissionState};
use crate::{chor::Scope, mech_client::MechSink};

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl<S: MechSink> MissionMgr<S> {
    /// Stop on the far ball delivery point, retrieve the far ball, then turn around and head for
    /// home.
    pub(super) fn enter_far_ball_script(&mut self, now_ms: u64) {
        self.send_wheels(WheelDems::stop());

        match self.ctx.far_slot {
            Some(slot) => self.retrieve_ball(now_ms, slot, Scope::State),
            None => warn!("No far ball on the stand, nothing to retrieve"),
        }

        let [turn_left, turn_right] = self.params.far_ball_turn_dems;
        let straight = self.loco_ctrl.straight_dems();

        self.schedule(
            now_ms,
            self.params.far_ball_turn_at_ms,
            MissionAction::Wheel(WheelDems::new(turn_left, turn_right)),
        );
        self.schedule(
            now_ms,
            self.params.far_ball_straight_at_ms,
            MissionAction::Wheel(straight),
        );
        self.schedule(
            now_ms,
            self.params.far_ball_done_at_ms,
            MissionAction::SetState(MissionState::DriveTowardsHome),
        );
    }
}
