//! # Choreographies shared between states

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::{eqpt::mech::WheelDems, tc::mission::SlotId};
use log::info;

use super::{MissionAction, MissionMgr, MissionState};
use crate::{
    chor::{retrieval_steps, Scope},
    mech_client::MechSink,
};

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl<S: MechSink> MissionMgr<S> {
    /// Retrieve the ball from `slot` with the arm, starting now.
    ///
    /// Schedules the whole arm timeline at once, and clears the slot once the retrieval time has
    /// passed. Nothing checks that the arm actually reached each pose.
    pub fn retrieve_ball(&mut self, now_ms: u64, slot: SlotId, scope: Scope) {
        self.schedule_retrieval(now_ms, 0, slot, scope);
    }

    /// Schedule a retrieval starting `delay_ms` after `now_ms`.
    pub(super) fn schedule_retrieval(
        &mut self,
        now_ms: u64,
        delay_ms: u64,
        slot: SlotId,
        scope: Scope,
    ) {
        info!(
            "Retrieving ball from slot {} in {} ms ({:?} scope)",
            slot, delay_ms, scope
        );

        let start_ms = now_ms + delay_ms;

        for step in retrieval_steps(&self.params.chor, slot) {
            self.scheduler
                .schedule(start_ms, step.offset_ms, scope, MissionAction::Arm(step.cmd));
        }

        self.scheduler.schedule(
            start_ms,
            self.params.chor.retrieval_time_ms,
            scope,
            MissionAction::ClearSlot(slot),
        );
    }

    /// Drive an arc of the given radius and length, then stop and request `next_state`.
    ///
    /// Negative radii are left turns. The wheel demands are sent immediately.
    pub fn drive_arc(
        &mut self,
        now_ms: u64,
        turn_radius_ft: f64,
        arc_length_ft: f64,
        next_state: MissionState,
    ) {
        let dems = self.loco_ctrl.arc_dems(turn_radius_ft);
        let stop_ms = self.loco_ctrl.drive_time_ms(arc_length_ft);

        info!(
            "Arc of radius {:.1} ft for {:.1} ft: {} for {} ms, then {}",
            turn_radius_ft, arc_length_ft, dems, stop_ms, next_state
        );

        self.send_wheels(dems);
        self.schedule(now_ms, stop_ms, MissionAction::Wheel(WheelDems::stop()));
        self.schedule(now_ms, stop_ms, MissionAction::SetState(next_state));
    }
}
