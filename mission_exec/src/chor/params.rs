//! Parameters for the arm choreographies

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use comms_if::tc::mission::NUM_STAND_SLOTS;
use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Joint targets of an arm position, in the order `[x, y, z, pitch, roll]`.
pub type ArmPose = [i32; 5];

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChorParams {
    // ---- ARM POSES ----
    /// Mask of the servos to attach at the start of a retrieval.
    pub attach_mask: String,

    /// Stowed pose.
    pub home_pose: ArmPose,

    /// Stowed pose, rotated towards the stand.
    pub home_side_pose: ArmPose,

    /// Raised over the side of the robot, clear of the stand.
    pub side_up_pose: ArmPose,

    /// Pose over the bucket the balls are dropped into.
    pub drop_pose: ArmPose,

    /// Raised above each stand slot.
    pub stand_up_poses: [ArmPose; NUM_STAND_SLOTS],

    /// Lowered onto the ball in each stand slot.
    pub stand_poses: [ArmPose; NUM_STAND_SLOTS],

    // ---- GRIPPER ----
    pub gripper_open: i32,

    pub gripper_closed: i32,

    // ---- TIMELINE ----
    /// Offsets of each step of the retrieval from its start.
    pub offsets: RetrievalOffsets,

    /// Total time of a retrieval, after which the slot is cleared.
    ///
    /// Units: milliseconds
    pub retrieval_time_ms: u64,
}

/// Offsets of the retrieval steps, in milliseconds from the start of the retrieval.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetrievalOffsets {
    pub attach_ms: u64,
    pub home_side_ms: u64,
    pub side_up_ms: u64,
    pub open_ms: u64,
    pub stand_up_ms: u64,
    pub stand_ms: u64,
    pub close_ms: u64,
    pub raise_ms: u64,
    pub drop_ms: u64,
    pub release_ms: u64,
    pub home_ms: u64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for ChorParams {
    fn default() -> Self {
        Self {
            attach_mask: String::from("111111"),
            home_pose: [0, 90, 0, -90, 90],
            home_side_pose: [83, 90, 0, -90, 90],
            side_up_pose: [90, 141, -60, -180, 169],
            drop_pose: [90, 56, -50, -103, 169],
            stand_up_poses: [
                [48, 141, -60, -180, 169],
                [24, 141, -60, -180, 169],
                [-3, 141, -60, -180, 169],
            ],
            stand_poses: [
                [48, 141, -82, -180, 169],
                [24, 151, -90, -180, 174],
                [-8, 148, -88, -180, 173],
            ],
            gripper_open: 45,
            gripper_closed: 0,
            offsets: RetrievalOffsets::default(),
            retrieval_time_ms: 15000,
        }
    }
}

impl Default for RetrievalOffsets {
    fn default() -> Self {
        Self {
            attach_ms: 0,
            home_side_ms: 10,
            side_up_ms: 2000,
            open_ms: 4000,
            stand_up_ms: 4000,
            stand_ms: 6000,
            close_ms: 7000,
            raise_ms: 9000,
            drop_ms: 11000,
            release_ms: 13000,
            home_ms: 14000,
        }
    }
}
