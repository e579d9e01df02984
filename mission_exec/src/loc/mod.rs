//! # Localisation module
//!
//! This module holds the robot's latest position and heading as reported by the field GPS, and
//! the reading of the field orientation (compass) sensor.
//!
//! GPS samples do not always carry a heading. A sample whose heading is missing or outside of
//! (-180, 180] still updates the position, but the heading is reported as unknown for that
//! sample rather than being replaced by some number. The localisation manager only classifies
//! samples, it never decides what the mission should do with them.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::trace;
use nalgebra::Vector2;
use serde::Serialize;
use util::maths::{is_valid_heading_deg, normalise_heading_deg, target_heading_deg};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The position of the robot on the field.
///
/// Units: feet, Frame: field (origin at home, X towards the far end of the field)
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Pose {
    pub position_ft: Vector2<f64>,
}

/// Provides an interface for the localisation of the robot.
#[derive(Debug, Clone, Default)]
pub struct LocMgr {
    pose: Option<Pose>,

    /// Heading of the most recent sample, `None` if that sample had no valid heading.
    heading_deg: Option<f64>,

    /// Most recent valid heading, regardless of the samples since.
    last_valid_heading_deg: Option<f64>,

    /// Heading calculated from the displacement between the last two samples.
    course_deg: Option<f64>,

    /// Raw reading from the field orientation sensor.
    field_heading_raw_deg: Option<f64>,

    /// Offset subtracted from the raw field orientation reading.
    field_heading_offset_deg: f64,

    num_samples: u64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Classification of a single GPS sample.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PoseEvent {
    /// Both position and heading are known.
    Located { pose: Pose, heading_deg: f64 },

    /// Only the position is known for this sample.
    HeadingUnknown { pose: Pose },
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Pose {
    pub fn new(x_ft: f64, y_ft: f64) -> Self {
        Self {
            position_ft: Vector2::new(x_ft, y_ft),
        }
    }

    pub fn x(&self) -> f64 {
        self.position_ft.x
    }

    pub fn y(&self) -> f64 {
        self.position_ft.y
    }

    /// Distance in feet to the given point.
    pub fn distance_to(&self, x_ft: f64, y_ft: f64) -> f64 {
        (Vector2::new(x_ft, y_ft) - self.position_ft).norm()
    }

    /// Heading in degrees of the line from this pose to the given point.
    pub fn heading_to(&self, x_ft: f64, y_ft: f64) -> f64 {
        target_heading_deg(self.x(), self.y(), x_ft, y_ft)
    }
}

impl PoseEvent {
    pub fn pose(&self) -> Pose {
        match self {
            PoseEvent::Located { pose, .. } => *pose,
            PoseEvent::HeadingUnknown { pose } => *pose,
        }
    }

    pub fn heading_deg(&self) -> Option<f64> {
        match self {
            PoseEvent::Located { heading_deg, .. } => Some(*heading_deg),
            PoseEvent::HeadingUnknown { .. } => None,
        }
    }
}

impl LocMgr {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new GPS sample and classify it.
    pub fn on_pose_sample(&mut self, x_ft: f64, y_ft: f64, heading_deg: Option<f64>) -> PoseEvent {
        let pose = Pose::new(x_ft, y_ft);

        // Course over ground from the previous position
        if let Some(prev) = self.pose {
            if (pose.position_ft - prev.position_ft).norm() > f64::EPSILON {
                self.course_deg = Some(prev.heading_to(x_ft, y_ft));
            }
        }

        self.pose = Some(pose);
        self.num_samples += 1;

        let heading_deg = heading_deg.filter(|h| is_valid_heading_deg(*h));
        self.heading_deg = heading_deg;

        trace!(
            "GPS sample {}: ({:.1}, {:.1}) heading {:?}",
            self.num_samples,
            x_ft,
            y_ft,
            heading_deg
        );

        match heading_deg {
            Some(h) => {
                self.last_valid_heading_deg = Some(h);
                PoseEvent::Located {
                    pose,
                    heading_deg: h,
                }
            }
            None => PoseEvent::HeadingUnknown { pose },
        }
    }

    /// Latest known position, if any sample has been received.
    pub fn get_pose(&self) -> Option<Pose> {
        self.pose
    }

    /// Heading of the latest sample, `None` if it was unknown.
    pub fn get_heading(&self) -> Option<f64> {
        self.heading_deg
    }

    pub fn get_last_valid_heading(&self) -> Option<f64> {
        self.last_valid_heading_deg
    }

    /// Heading calculated from the robot's movement between the last two samples.
    pub fn get_course_heading(&self) -> Option<f64> {
        self.course_deg
    }

    pub fn get_num_samples(&self) -> u64 {
        self.num_samples
    }

    /// Store a new reading from the field orientation sensor.
    pub fn on_field_heading(&mut self, raw_heading_deg: f64) {
        self.field_heading_raw_deg = Some(raw_heading_deg);
    }

    /// Field heading, i.e. the orientation sensor reading corrected by the current offset.
    pub fn get_field_heading(&self) -> Option<f64> {
        self.field_heading_raw_deg
            .map(|raw| normalise_heading_deg(raw - self.field_heading_offset_deg))
    }

    /// Adjust the field heading offset so that the field heading currently reads `heading_deg`.
    pub fn set_field_heading(&mut self, heading_deg: f64) {
        let raw = self.field_heading_raw_deg.unwrap_or(0.0);
        self.field_heading_offset_deg = normalise_heading_deg(raw - heading_deg);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_unknown_heading_is_not_defaulted() {
        let mut loc = LocMgr::new();

        let event = loc.on_pose_sample(10.0, 5.0, Some(45.0));
        assert_eq!(event.heading_deg(), Some(45.0));

        // Out of range headings are unknown, but the position is still stored
        let event = loc.on_pose_sample(12.0, 5.0, Some(-180.0));
        assert_eq!(event, PoseEvent::HeadingUnknown { pose: Pose::new(12.0, 5.0) });
        assert_eq!(loc.get_heading(), None);
        assert_eq!(loc.get_last_valid_heading(), Some(45.0));
        assert_eq!(loc.get_pose(), Some(Pose::new(12.0, 5.0)));

        let event = loc.on_pose_sample(12.0, 9.0, None);
        assert!(event.heading_deg().is_none());
        assert_eq!(loc.get_num_samples(), 3);
    }

    #[test]
    fn test_course_heading() {
        let mut loc = LocMgr::new();
        assert_eq!(loc.get_course_heading(), None);

        loc.on_pose_sample(0.0, 0.0, None);
        loc.on_pose_sample(0.0, 10.0, None);
        assert!((loc.get_course_heading().unwrap() - 90.0).abs() < 1e-9);

        // No movement keeps the previous course
        loc.on_pose_sample(0.0, 10.0, None);
        assert!((loc.get_course_heading().unwrap() - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_field_heading_offset() {
        let mut loc = LocMgr::new();
        assert_eq!(loc.get_field_heading(), None);

        loc.on_field_heading(100.0);
        assert_eq!(loc.get_field_heading(), Some(100.0));

        loc.set_field_heading(-170.0);
        assert_eq!(loc.get_field_heading(), Some(-170.0));

        loc.on_field_heading(120.0);
        assert_eq!(loc.get_field_heading(), Some(-150.0));
    }
}
