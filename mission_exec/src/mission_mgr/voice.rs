//! # RunningVoiceCommand implementation and voice keywords

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::{eqpt::mech::WheelDems, tc::mission::VoiceKeyword};
use log::{info, warn};

use super::{MissionAction, MissionMgr, MissionMgrError, MissionState, VoiceCmd};
use crate::{loc::Pose, mech_client::MechSink};

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl<S: MechSink> MissionMgr<S> {
    /// Execute an "angle + distance" voice command.
    ///
    /// Positive angles are to the left. A positive distance drives an arc ending at that angle
    /// and distance from the robot, otherwise the robot reverses in a straight line for the given
    /// distance. Either way the robot then waits for pickup.
    pub fn on_voice_command(
        &mut self,
        now_ms: u64,
        angle_deg: i32,
        distance_ft: f64,
    ) -> Result<(), MissionMgrError> {
        info!("Voice command: {} deg, {} ft", angle_deg, distance_ft);

        self.pending_voice = Some(VoiceCmd {
            angle_deg,
            distance_ft,
        });

        let result = self.request_transition(now_ms, MissionState::RunningVoiceCommand);

        // Never left for a later transition to pick up
        self.pending_voice = None;

        result
    }

    pub(super) fn enter_running_voice_command(&mut self, now_ms: u64) {
        let cmd = match self.pending_voice.take() {
            Some(c) => c,
            None => {
                warn!("No voice command to run");
                self.schedule(
                    now_ms,
                    0,
                    MissionAction::SetState(MissionState::WaitingForPickup),
                );
                return;
            }
        };

        if cmd.distance_ft > 0.0 {
            // Relative to the robot, which is taken to be at the origin facing along X
            let angle_rad = (cmd.angle_deg as f64).to_radians();
            let target_x_ft = cmd.distance_ft * angle_rad.cos();
            let target_y_ft = cmd.distance_ft * angle_rad.sin();

            let plan = self
                .loco_ctrl
                .plan_arc(&Pose::new(0.0, 0.0), 0.0, target_x_ft, target_y_ft);
            self.drive_arc(
                now_ms,
                plan.turn_radius_ft,
                plan.arc_length_ft,
                MissionState::WaitingForPickup,
            );
        } else {
            let reverse = self.loco_ctrl.straight_dems().reversed();
            let drive_ms = self.loco_ctrl.drive_time_ms(cmd.distance_ft);

            self.send_wheels(reverse);
            self.schedule(
                now_ms,
                drive_ms,
                MissionAction::SetState(MissionState::WaitingForPickup),
            );
        }
    }

    /// Drive a short fixed distance on a spoken keyword. The mission state is not changed.
    pub fn on_voice_keyword(&mut self, now_ms: u64, keyword: VoiceKeyword) {
        let straight = self.loco_ctrl.straight_dems();
        let slow = self.params.keyword_turn_duty;

        let dems = match keyword {
            VoiceKeyword::Forward => straight,
            VoiceKeyword::Left => WheelDems::forward(slow, 255),
            VoiceKeyword::Right => WheelDems::forward(255, slow),
            VoiceKeyword::Back => WheelDems::new(-255, -255),
        };
        let drive_ms = self.loco_ctrl.drive_time_ms(self.params.keyword_distance_ft);

        info!("Voice keyword {:?}: {} for {} ms", keyword, dems, drive_ms);

        self.start_manual_drive(now_ms, dems, drive_ms);
    }
}

#[cfg(test)]
mod test {
    use super::super::*;
    use crate::mech_client::RecordingSink;
    use comms_if::tc::mission::VoiceKeyword;

    fn mgr_running() -> MissionMgr<RecordingSink> {
        let mut mgr = MissionMgr::new(MissionMgrParams::default(), RecordingSink::new(), 0);
        mgr.request_mission_start(0).unwrap();
        mgr
    }

    #[test]
    fn test_voice_rejected_when_ready() {
        let mut mgr = MissionMgr::new(MissionMgrParams::default(), RecordingSink::new(), 0);

        assert!(matches!(
            mgr.on_voice_command(10, 30, 10.0),
            Err(MissionMgrError::IllegalTransition { .. })
        ));
        assert_eq!(mgr.get_state(), MissionState::ReadyForMission);
        assert_eq!(mgr.get_wheel_dems(), WheelDems::stop());
    }

    #[test]
    fn test_voice_arc_left() {
        let mut mgr = mgr_running();

        mgr.on_voice_command(100, 30, 10.0).unwrap();
        assert_eq!(mgr.get_state(), MissionState::RunningVoiceCommand);

        let dems = mgr.get_wheel_dems();
        assert_eq!(dems.right, 255);
        assert!(dems.left < 255);

        // Radius 10 ft, 60 degrees of arc
        let stop_ms = 100 + ((10.0 * 60f64.to_radians()) / 3.3 * 1000.0) as u64;
        mgr.tick(stop_ms);
        assert_eq!(mgr.get_state(), MissionState::WaitingForPickup);
    }

    #[test]
    fn test_voice_reverse() {
        let mut mgr = mgr_running();
        mgr.set_straight_duty(240, 250);

        mgr.on_voice_command(100, 0, -5.0).unwrap();
        assert_eq!(mgr.get_wheel_dems(), WheelDems::new(-240, -250));

        mgr.tick(100 + 1514);
        assert_eq!(mgr.get_state(), MissionState::RunningVoiceCommand);
        mgr.tick(100 + 1515);
        assert_eq!(mgr.get_state(), MissionState::WaitingForPickup);
        assert_eq!(mgr.get_wheel_dems(), WheelDems::stop());
    }

    #[test]
    fn test_voice_keywords() {
        let mut mgr = MissionMgr::new(MissionMgrParams::default(), RecordingSink::new(), 0);

        mgr.on_voice_keyword(0, VoiceKeyword::Left);
        assert_eq!(mgr.get_wheel_dems(), WheelDems::new(180, 255));
        assert_eq!(mgr.get_state(), MissionState::ReadyForMission);

        mgr.tick(2424);
        assert_eq!(mgr.get_wheel_dems(), WheelDems::stop());

        mgr.on_voice_keyword(3000, VoiceKeyword::Back);
        assert_eq!(mgr.get_wheel_dems(), WheelDems::new(-255, -255));
        mgr.on_voice_keyword(3100, VoiceKeyword::Right);
        assert_eq!(mgr.get_wheel_dems(), WheelDems::new(255, 180));
    }

    #[test]
    fn test_keyword_stopped_by_state_change() {
        let mut mgr = mgr_running();
        mgr.request_transition(1000, MissionState::WaitingForPickup)
            .unwrap();

        mgr.on_voice_keyword(8500, VoiceKeyword::Left);
        assert_eq!(mgr.get_wheel_dems(), WheelDems::new(180, 255));

        // Waiting times out into SeekingHome before the keyword drive is over
        mgr.tick(9001);
        assert_eq!(mgr.get_state(), MissionState::SeekingHome);
        assert_eq!(mgr.get_wheel_dems(), WheelDems::stop());

        // No heading is known so seeking sends nothing, the robot must stay stopped
        mgr.tick(11_924);
        assert_eq!(mgr.get_wheel_dems(), WheelDems::stop());
        assert_eq!(mgr.sink().last_wheel_dems(), Some(WheelDems::stop()));
    }

    #[test]
    fn test_later_keyword_not_cut_short() {
        let mut mgr = MissionMgr::new(MissionMgrParams::default(), RecordingSink::new(), 0);

        mgr.on_voice_keyword(0, VoiceKeyword::Left);
        mgr.on_voice_keyword(2000, VoiceKeyword::Right);

        // The first keyword's stop is due but the second drive carries on
        mgr.tick(2424);
        assert_eq!(mgr.get_wheel_dems(), WheelDems::new(255, 180));

        mgr.tick(4423);
        assert_eq!(mgr.get_wheel_dems(), WheelDems::new(255, 180));
        mgr.tick(4424);
        assert_eq!(mgr.get_wheel_dems(), WheelDems::stop());
    }
}
