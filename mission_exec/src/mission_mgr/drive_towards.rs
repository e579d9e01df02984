//! # DriveTowardsFarBall and DriveTowardsHome implementation
//!
//! Both states seek towards their target on every tick, and hand over to an arc once a pose sample
//! shows the robot close to the target and roughly pointing at it.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{debug, trace};
use util::maths::{left_turn_delta_deg, right_turn_delta_deg};

use super::{MissionMgr, MissionState};
use crate::{loc::PoseEvent, mech_client::MechSink, strategy::TargetPoint};

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl<S: MechSink> MissionMgr<S> {
    /// Steer towards the target using the latest pose.
    ///
    /// If the latest sample had no heading the current wheel demands are kept.
    pub(super) fn seek(&mut self, target: TargetPoint) {
        let (pose, heading_deg) = match (self.loc_mgr.get_pose(), self.loc_mgr.get_heading()) {
            (Some(p), Some(h)) => (p, h),
            _ => {
                trace!("No heading available, seeking skipped");
                return;
            }
        };

        let dems = self
            .loco_ctrl
            .seek_target(&pose, heading_deg, target.x_ft, target.y_ft);
        self.send_wheels(dems);
    }

    /// Switch to `arc_state` if the robot is close to the target and pointing roughly at it.
    pub(super) fn check_arc_trigger(
        &mut self,
        now_ms: u64,
        event: &PoseEvent,
        target: TargetPoint,
        arc_state: MissionState,
    ) {
        let (pose, heading_deg) = match event {
            PoseEvent::Located { pose, heading_deg } => (*pose, *heading_deg),
            PoseEvent::HeadingUnknown { .. } => return,
        };

        let distance_ft = pose.distance_to(target.x_ft, target.y_ft);
        if distance_ft >= self.params.arc_trigger_distance_ft {
            return;
        }

        let target_heading_deg = pose.heading_to(target.x_ft, target.y_ft);
        let left_deg = left_turn_delta_deg(heading_deg, target_heading_deg);
        let right_deg = right_turn_delta_deg(heading_deg, target_heading_deg);
        let max_deg = self.params.arc_trigger_max_turn_deg;

        if left_deg < max_deg || right_deg < max_deg {
            debug!(
                "{:.1} ft from target, turn L {:.1} R {:.1}, starting arc",
                distance_ft, left_deg, right_deg
            );
            self.transition(now_ms, arc_state).ok();
        } else {
            trace!(
                "{:.1} ft from target but turn L {:.1} R {:.1} too large for an arc",
                distance_ft,
                left_deg,
                right_deg
            );
        }
    }
}

#[cfg(test)]
mod test {
    use super::super::*;
    use crate::mech_client::RecordingSink;

    fn mgr_driving_to_far_ball() -> MissionMgr<RecordingSink> {
        let mut mgr = MissionMgr::new(MissionMgrParams::default(), RecordingSink::new(), 0);
        mgr.report_color(SlotId::new(1).unwrap(), BallColor::Red);
        mgr.request_mission_start(0).unwrap();
        mgr.request_transition(100, MissionState::DriveTowardsFarBall)
            .unwrap();
        mgr
    }

    #[test]
    fn test_seek_on_tick() {
        let mut mgr = mgr_driving_to_far_ball();

        mgr.on_pose(200, 100.0, 0.0, Some(0.0));
        mgr.sink_mut().clear();

        // Target at (240, 50) is to the left
        mgr.tick(300);
        let dems = mgr.sink().last_wheel_dems().unwrap();
        assert!(dems.left < 255);
        assert_eq!(dems.right, 255);

        // Unknown heading, nothing is sent
        mgr.on_pose(400, 110.0, 0.0, None);
        mgr.sink_mut().clear();
        mgr.tick(500);
        assert!(mgr.sink().wheel_dems().is_empty());
        assert_eq!(mgr.get_wheel_dems(), dems);
    }

    #[test]
    fn test_unknown_heading_never_triggers_arc() {
        let mut mgr = mgr_driving_to_far_ball();

        mgr.on_pose(200, 230.0, 40.0, None);
        mgr.on_pose(300, 230.0, 40.0, Some(-180.0));
        assert_eq!(mgr.get_state(), MissionState::DriveTowardsFarBall);
    }

    #[test]
    fn test_far_from_target_no_arc() {
        let mut mgr = mgr_driving_to_far_ball();

        mgr.on_pose(200, 200.0, 50.0, Some(0.0));
        assert_eq!(mgr.get_state(), MissionState::DriveTowardsFarBall);
    }
}
