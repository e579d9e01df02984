//! # WaitingForPickup and SeekingHome implementation
//!
//! Once home the robot alternates between waiting to be picked up and creeping back towards home,
//! in case the arc left it short.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::eqpt::mech::WheelDems;
use log::{debug, info};

use super::{DriftMonitor, MissionMgr, MissionState};
use crate::{loc::PoseEvent, mech_client::MechSink, strategy::TargetPoint};

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl<S: MechSink> MissionMgr<S> {
    pub(super) fn enter_waiting_for_pickup(&mut self, _now_ms: u64) {
        self.send_wheels(WheelDems::stop());
    }

    pub(super) fn tick_waiting_for_pickup(&mut self, now_ms: u64) {
        if self.get_state_time_ms(now_ms) > self.params.waiting_for_pickup_ms {
            self.transition(now_ms, MissionState::SeekingHome).ok();
        }
    }

    pub(super) fn enter_seeking_home(&mut self, _now_ms: u64) {
        self.drift = DriftMonitor::default();
    }

    pub(super) fn tick_seeking_home(&mut self, now_ms: u64) {
        if self.get_state_time_ms(now_ms) > self.params.seeking_home_ms {
            self.transition(now_ms, MissionState::WaitingForPickup).ok();
            return;
        }

        self.seek(TargetPoint::home());
    }

    /// Count consecutive samples moving away from home. Too many means the field heading has
    /// drifted, so it is realigned to the direction the robot is actually moving in.
    pub(super) fn check_drift(&mut self, event: &PoseEvent) {
        let distance_ft = event.pose().distance_to(0.0, 0.0);

        self.drift.count = match self.drift.last_distance_ft {
            Some(last) if distance_ft > last => self.drift.count + 1,
            _ => 0,
        };
        self.drift.last_distance_ft = Some(distance_ft);

        if self.drift.count <= self.params.drift_count_limit {
            return;
        }

        match self.loc_mgr.get_course_heading() {
            Some(course_deg) => {
                info!(
                    "Moving away from home, field heading realigned to course {:.1}",
                    course_deg
                );
                self.loc_mgr.set_field_heading(course_deg);
            }
            None => debug!("Moving away from home but no course heading available"),
        }

        self.drift.count = 0;
    }
}
