//! # ArcToFarBall and ArcToHome implementation

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::eqpt::mech::WheelDems;
use log::warn;

use super::{MissionAction, MissionMgr, MissionState};
use crate::{mech_client::MechSink, strategy::TargetPoint};

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl<S: MechSink> MissionMgr<S> {
    pub(super) fn enter_arc_to_far_ball(&mut self, now_ms: u64) {
        let target = self.ctx.far_target;
        self.arc_to(now_ms, target, MissionState::FarBallScript);
    }

    pub(super) fn enter_arc_to_home(&mut self, now_ms: u64) {
        self.arc_to(now_ms, TargetPoint::home(), MissionState::WaitingForPickup);
    }

    /// Plan and drive an arc from the latest pose to the target.
    fn arc_to(&mut self, now_ms: u64, target: TargetPoint, next_state: MissionState) {
        let pose = self.loc_mgr.get_pose();
        let heading_deg = self
            .loc_mgr
            .get_heading()
            .or_else(|| self.loc_mgr.get_last_valid_heading());

        match (pose, heading_deg) {
            (Some(pose), Some(heading_deg)) => {
                let plan = self
                    .loco_ctrl
                    .plan_arc(&pose, heading_deg, target.x_ft, target.y_ft);
                self.drive_arc(now_ms, plan.turn_radius_ft, plan.arc_length_ft, next_state);
            }
            _ => {
                warn!("No pose to plan an arc from, moving straight on to {}", next_state);
                self.send_wheels(WheelDems::stop());
                self.schedule(now_ms, 0, MissionAction::SetState(next_state));
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::super::*;
    use crate::mech_client::RecordingSink;

    #[test]
    fn test_arc_to_home() {
        let mut mgr = MissionMgr::new(MissionMgrParams::default(), RecordingSink::new(), 0);
        mgr.request_mission_start(0).unwrap();
        mgr.request_transition(10, MissionState::DriveTowardsHome)
            .unwrap();

        // 20 ft out, heading straight home
        mgr.on_pose(100, 20.0, 0.0, Some(180.0));
        assert_eq!(mgr.get_state(), MissionState::ArcToHome);
        assert_eq!(mgr.get_wheel_dems(), WheelDems::new(255, 255));

        // 20 ft at 3.3 ft/s
        mgr.tick(100 + 6060);
        assert_eq!(mgr.get_state(), MissionState::WaitingForPickup);
        assert_eq!(mgr.get_wheel_dems(), WheelDems::stop());
    }

    #[test]
    fn test_arc_without_pose() {
        let mut mgr = MissionMgr::new(MissionMgrParams::default(), RecordingSink::new(), 0);
        mgr.request_mission_start(0).unwrap();

        mgr.request_transition(10, MissionState::ArcToHome).unwrap();
        assert_eq!(mgr.get_state(), MissionState::WaitingForPickup);
    }
}
