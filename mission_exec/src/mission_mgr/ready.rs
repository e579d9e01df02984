//! # ReadyForMission implementation, mission start, abort and match timer

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::eqpt::mech::WheelDems;
use log::{info, warn};

use super::{MissionMgr, MissionMgrError, MissionState, Notification};
use crate::mech_client::MechSink;

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl<S: MechSink> MissionMgr<S> {
    pub(super) fn enter_ready(&mut self, _now_ms: u64) {
        self.send_wheels(WheelDems::stop());
        self.pending_voice = None;
        self.go_armed = true;
        self.notify(Notification::GoArmed);
    }

    /// Start a new mission. Only possible from ReadyForMission.
    pub fn request_mission_start(&mut self, now_ms: u64) -> Result<(), MissionMgrError> {
        if self.state != MissionState::ReadyForMission {
            warn!("Cannot start a mission while in {}", self.state);
            return Err(MissionMgrError::AlreadyRunning(self.state));
        }

        self.transition(now_ms, MissionState::NearBallScript)?;
        self.run_due(now_ms);

        Ok(())
    }

    /// End the current mission, returning to ReadyForMission.
    pub fn request_mission_abort(&mut self, now_ms: u64) -> Result<(), MissionMgrError> {
        if self.state == MissionState::ReadyForMission {
            warn!("Cannot abort, no mission is running");
            return Err(MissionMgrError::NotRunning);
        }

        info!("Mission aborted");
        self.transition(now_ms, MissionState::ReadyForMission)?;
        self.run_due(now_ms);

        Ok(())
    }

    /// Force a return to ReadyForMission once the match is over, whatever the current state.
    pub(super) fn check_match_timer(&mut self, now_ms: u64) {
        if self.state == MissionState::ReadyForMission {
            return;
        }

        let match_time_ms = self.get_match_time_ms(now_ms);
        if match_time_ms > self.params.match_length_ms {
            info!("Match over after {} ms in {}", match_time_ms, self.state);
            self.notify(Notification::Message(String::from("Match over")));
            self.enter_state(now_ms, MissionState::ReadyForMission);
        }
    }
}

#[cfg(test)]
mod test {
    use super::super::*;
    use crate::mech_client::RecordingSink;

    fn mgr() -> MissionMgr<RecordingSink> {
        MissionMgr::new(MissionMgrParams::default(), RecordingSink::new(), 0)
    }

    #[test]
    fn test_initial_state() {
        let mut mgr = mgr();

        assert_eq!(mgr.get_state(), MissionState::ReadyForMission);
        assert!(mgr.is_go_armed());
        assert_eq!(mgr.sink().wheel_dems(), vec![WheelDems::stop()]);
        assert_eq!(mgr.take_notifications(), vec![Notification::GoArmed]);
    }

    #[test]
    fn test_start_and_abort() {
        let mut mgr = mgr();

        assert!(matches!(
            mgr.request_mission_abort(10),
            Err(MissionMgrError::NotRunning)
        ));

        mgr.request_mission_start(100).unwrap();
        assert_eq!(mgr.get_state(), MissionState::NearBallScript);
        assert!(!mgr.is_go_armed());

        assert!(matches!(
            mgr.request_mission_start(200),
            Err(MissionMgrError::AlreadyRunning(MissionState::NearBallScript))
        ));

        mgr.request_mission_abort(300).unwrap();
        assert_eq!(mgr.get_state(), MissionState::ReadyForMission);
        assert!(mgr.is_go_armed());
        assert_eq!(mgr.get_wheel_dems(), WheelDems::stop());
        assert!(mgr.get_scheduler().is_empty());
    }

    #[test]
    fn test_match_timer() {
        let mut mgr = mgr();
        let length = mgr.params.match_length_ms;

        mgr.request_mission_start(1000).unwrap();
        mgr.request_transition(1000, MissionState::WaitingForPickup).unwrap();

        // Exactly at the match length the match is not over yet
        mgr.tick(1000 + length);
        assert_ne!(mgr.get_state(), MissionState::ReadyForMission);

        mgr.tick(1001 + length);
        assert_eq!(mgr.get_state(), MissionState::ReadyForMission);
        assert_eq!(mgr.get_wheel_dems(), WheelDems::stop());
    }

    #[test]
    fn test_match_timer_starts_on_leaving_ready() {
        let mut mgr = mgr();

        // Started through a plain transition, long after the manager was created
        mgr.request_transition(500_000, MissionState::NearBallScript)
            .unwrap();
        mgr.tick(500_100);
        assert_eq!(mgr.get_state(), MissionState::NearBallScript);
        assert_eq!(mgr.get_match_time_ms(500_100), 100);

        // A second mission is timed from its own start
        mgr.request_mission_abort(600_000).unwrap();
        mgr.request_mission_start(900_000).unwrap();
        mgr.tick(900_100);
        assert_eq!(mgr.get_state(), MissionState::NearBallScript);
        assert_eq!(mgr.get_match_time_ms(900_100), 100);
    }
}
