//! # Choreography module
//!
//! Choreographies are fixed timelines of actuator commands issued without any feedback from the
//! robot. This module provides the [`Scheduler`] used to sequence them and the timeline of the
//! ball retrieval performed by the arm.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod scheduler;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use params::*;
pub use scheduler::*;

use comms_if::{eqpt::mech::ArmCmd, tc::mission::SlotId};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// One arm command of a choreography.
#[derive(Debug, Clone, PartialEq)]
pub struct ChorStep {
    /// Time from the start of the choreography.
    ///
    /// Units: milliseconds
    pub offset_ms: u64,

    pub cmd: ArmCmd,
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// The arm commands which pick the ball out of `slot` and drop it into the robot.
///
/// Steps are returned in the order they must be sent.
pub fn retrieval_steps(params: &ChorParams, slot: SlotId) -> Vec<ChorStep> {
    let o = &params.offsets;
    let stand_up = params.stand_up_poses[slot.index()];
    let stand = params.stand_poses[slot.index()];

    vec![
        step(o.attach_ms, ArmCmd::attach(&params.attach_mask)),
        step(o.home_side_ms, position(params.home_side_pose)),
        step(o.side_up_ms, position(params.side_up_pose)),
        step(o.open_ms, ArmCmd::gripper(params.gripper_open)),
        step(o.stand_up_ms, position(stand_up)),
        step(o.stand_ms, position(stand)),
        step(o.close_ms, ArmCmd::gripper(params.gripper_closed)),
        step(o.raise_ms, position(stand_up)),
        step(o.drop_ms, position(params.drop_pose)),
        step(o.release_ms, ArmCmd::gripper(params.gripper_open)),
        step(o.home_ms, position(params.home_pose)),
    ]
}

fn step(offset_ms: u64, cmd: ArmCmd) -> ChorStep {
    ChorStep { offset_ms, cmd }
}

fn position(pose: ArmPose) -> ArmCmd {
    ArmCmd::position(pose[0], pose[1], pose[2], pose[3], pose[4])
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_retrieval_timeline() {
        let params = ChorParams::default();
        let slot = SlotId::new(2).unwrap();
        let steps = retrieval_steps(&params, slot);

        assert_eq!(steps.len(), 11);
        assert_eq!(steps[0].cmd.as_str(), "ATTACH 111111");
        assert_eq!(steps[1].cmd.as_str(), "POSITION 83 90 0 -90 90");
        assert_eq!(steps[4].cmd.as_str(), "POSITION 24 141 -60 -180 169");
        assert_eq!(steps[5].cmd.as_str(), "POSITION 24 151 -90 -180 174");
        assert_eq!(steps[6].cmd.as_str(), "GRIPPER 0");
        assert_eq!(steps[10].cmd.as_str(), "POSITION 0 90 0 -90 90");

        // Never runs past the slot being cleared
        assert!(steps.windows(2).all(|w| w[0].offset_ms <= w[1].offset_ms));
        assert!(steps.iter().all(|s| s.offset_ms < params.retrieval_time_ms));
    }

    #[test]
    fn test_slot_poses() {
        let params = ChorParams::default();

        let steps = retrieval_steps(&params, SlotId::new(3).unwrap());
        assert_eq!(steps[5].cmd.as_str(), "POSITION -8 148 -88 -180 173");
        assert_eq!(steps[7].cmd.as_str(), "POSITION -3 141 -60 -180 169");
    }
}
