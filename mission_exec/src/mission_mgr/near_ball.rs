//! # NearBallScript implementation

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::eqpt::mech::WheelDems;
use log::{info, warn};
use util::maths::distance;

use super::{MissionAction, MissionMgr, MissionState, Notification};
use crate::{
    chor::Scope,
    mech_client::MechSink,
    strategy::{near_slot, resolve_target},
};

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl<S: MechSink> MissionMgr<S> {
    /// Work out the mission targets, then drive to the stand and pick up the near ball.
    pub(super) fn enter_near_ball_script(&mut self, now_ms: u64) {
        self.resolve_strategy();

        let [sx, sy] = self.params.near_ball_start_ft;
        let [ex, ey] = self.params.near_ball_end_ft;
        let drive_ms = self.loco_ctrl.drive_time_ms(distance(sx, sy, ex, ey));
        let done_ms = drive_ms + self.params.chor.retrieval_time_ms;
        let straight = self.loco_ctrl.straight_dems();

        self.send_wheels(straight);
        self.schedule(now_ms, drive_ms, MissionAction::Wheel(WheelDems::stop()));

        // Retrieval is scheduled first so the slot is cleared before the state changes
        match self.ctx.near_slot {
            Some(slot) => self.schedule_retrieval(now_ms, drive_ms, slot, Scope::State),
            None => warn!("No near ball on the stand, nothing to retrieve"),
        }

        self.schedule(now_ms, done_ms, MissionAction::Wheel(straight));
        self.schedule(
            now_ms,
            done_ms,
            MissionAction::SetState(MissionState::DriveTowardsFarBall),
        );
    }

    fn resolve_strategy(&mut self) {
        let res = resolve_target(self.ctx.team, &self.ctx.slots, &self.params.strategy);

        match res.far_target {
            Some(target) => {
                info!(
                    "Far ball in slot {:?}, target ({:.0}, {:.0})",
                    res.far_slot, target.x_ft, target.y_ft
                );
                self.ctx.far_target = target;
            }
            None => {
                warn!(
                    "No far ball for team {:?}, keeping target ({:.0}, {:.0})",
                    self.ctx.team, self.ctx.far_target.x_ft, self.ctx.far_target.y_ft
                );
                self.notify(Notification::Message(String::from("No far ball found")));
            }
        }

        self.ctx.far_slot = res.far_slot;
        self.ctx.white_slot = res.white_slot;
        self.ctx.near_slot = near_slot(self.ctx.team, &self.ctx.slots);
    }
}

#[cfg(test)]
mod test {
    use super::super::*;
    use crate::mech_client::RecordingSink;

    #[test]
    fn test_near_ball_script() {
        let mut mgr = MissionMgr::new(MissionMgrParams::default(), RecordingSink::new(), 0);
        mgr.set_team(Team::Red);
        mgr.report_color(SlotId::new(1).unwrap(), BallColor::Yellow);
        mgr.report_color(SlotId::new(2).unwrap(), BallColor::Green);
        mgr.report_color(SlotId::new(3).unwrap(), BallColor::White);
        mgr.sink_mut().clear();

        mgr.request_mission_start(1000).unwrap();

        let ctx = mgr.get_context();
        assert_eq!(ctx.far_target, TargetPoint::new(240.0, -50.0));
        assert_eq!(ctx.far_slot, SlotId::new(1));
        assert_eq!(ctx.near_slot, SlotId::new(2));
        assert_eq!(ctx.white_slot, SlotId::new(3));
        assert_eq!(mgr.sink().wheel_dems(), vec![WheelDems::new(255, 255)]);

        // (15, 0) to (90, 50) is 90.14 ft, 27314 ms at 3.3 ft/s
        let stop_ms = 1000 + 27314;
        mgr.tick(stop_ms - 1);
        assert_eq!(mgr.get_wheel_dems(), WheelDems::new(255, 255));
        assert!(mgr.sink().arm_cmds().is_empty());

        mgr.tick(stop_ms);
        assert_eq!(mgr.get_wheel_dems(), WheelDems::stop());
        assert_eq!(mgr.sink().arm_cmds(), vec!["ATTACH 111111".to_string()]);

        mgr.tick(stop_ms + 14_999);
        assert_eq!(mgr.sink().arm_cmds().len(), 11);
        assert_eq!(mgr.get_slot_color(SlotId::new(2).unwrap()), BallColor::Green);
        assert_eq!(mgr.get_state(), MissionState::NearBallScript);

        mgr.tick(stop_ms + 15_000);
        assert_eq!(mgr.get_slot_color(SlotId::new(2).unwrap()), BallColor::None);
        assert_eq!(mgr.get_state(), MissionState::DriveTowardsFarBall);
        assert_eq!(mgr.get_wheel_dems(), WheelDems::new(255, 255));
    }
}
