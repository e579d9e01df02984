//! # Mission strategy
//!
//! Works out which stand slots hold the balls the robot must retrieve, and where the far ball has
//! to be delivered, from the team colour and the colours reported by the operator.
//!
//! | Team | Near ball colours | Far ball colours (y = +50, y = -50) |
//! |------|-------------------|-------------------------------------|
//! | Blue | Blue, Yellow      | Red, Green                          |
//! | Red  | Red, Green        | Blue, Yellow                        |
//!
//! White balls are picked up opportunistically whatever the team.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use comms_if::tc::mission::{BallColor, SlotId, Team, NUM_STAND_SLOTS};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Colours of the balls in each of the stand slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StandSlots([BallColor; NUM_STAND_SLOTS]);

/// A point on the field.
///
/// Units: feet
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TargetPoint {
    pub x_ft: f64,
    pub y_ft: f64,
}

/// Locations of the far ball delivery points.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StrategyParams {
    /// X position shared by both far ball delivery points.
    pub far_x_ft: f64,

    /// Y position of the delivery point for the first colour of the far pair.
    pub far_first_y_ft: f64,

    /// Y position of the delivery point for the second colour of the far pair.
    pub far_second_y_ft: f64,
}

/// Outcome of resolving the strategy for a mission.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Resolution {
    /// Where the far ball must be taken, `None` if no slot holds a far ball colour.
    pub far_target: Option<TargetPoint>,

    /// Slot holding the far ball.
    pub far_slot: Option<SlotId>,

    /// Slot holding a white ball, to be retrieved on the way.
    pub white_slot: Option<SlotId>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl StandSlots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: SlotId) -> BallColor {
        self.0[slot.index()]
    }

    pub fn set(&mut self, slot: SlotId, color: BallColor) {
        self.0[slot.index()] = color;
    }

    /// Set all slots to [`BallColor::None`].
    pub fn reset(&mut self) {
        self.0 = [BallColor::None; NUM_STAND_SLOTS];
    }

    /// Iterate over the slots in increasing order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, BallColor)> + '_ {
        SlotId::all().map(move |s| (s, self.get(s)))
    }
}

impl TargetPoint {
    pub fn new(x_ft: f64, y_ft: f64) -> Self {
        Self { x_ft, y_ft }
    }

    pub fn home() -> Self {
        Self::default()
    }
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self {
            far_x_ft: 240.0,
            far_first_y_ft: 50.0,
            far_second_y_ft: -50.0,
        }
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Resolve the far ball target and the pending white ball for a mission.
///
/// If more than one slot holds a far ball colour the lowest numbered slot wins. If more than one
/// slot holds a white ball the highest numbered slot wins.
pub fn resolve_target(team: Team, slots: &StandSlots, params: &StrategyParams) -> Resolution {
    let (first, second) = far_colors(team);
    let mut res = Resolution::default();

    for (slot, color) in slots.iter() {
        if res.far_target.is_none() {
            let y_ft = if color == first {
                Some(params.far_first_y_ft)
            } else if color == second {
                Some(params.far_second_y_ft)
            } else {
                None
            };

            if let Some(y_ft) = y_ft {
                res.far_target = Some(TargetPoint::new(params.far_x_ft, y_ft));
                res.far_slot = Some(slot);
            }
        }

        if color == BallColor::White {
            res.white_slot = Some(slot);
        }
    }

    res
}

/// The lowest numbered slot holding one of the team's own colours.
pub fn near_slot(team: Team, slots: &StandSlots) -> Option<SlotId> {
    let (first, second) = near_colors(team);

    slots
        .iter()
        .find(|(_, c)| *c == first || *c == second)
        .map(|(s, _)| s)
}

fn far_colors(team: Team) -> (BallColor, BallColor) {
    match team {
        Team::Blue => (BallColor::Red, BallColor::Green),
        Team::Red => (BallColor::Blue, BallColor::Yellow),
    }
}

fn near_colors(team: Team) -> (BallColor, BallColor) {
    match team {
        Team::Blue => (BallColor::Blue, BallColor::Yellow),
        Team::Red => (BallColor::Red, BallColor::Green),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn slots(colors: [BallColor; 3]) -> StandSlots {
        let mut s = StandSlots::new();
        for (i, c) in colors.iter().enumerate() {
            s.set(SlotId::from_index(i).unwrap(), *c);
        }
        s
    }

    #[test]
    fn test_blue_team_red_ball() {
        let s = slots([BallColor::Red, BallColor::None, BallColor::None]);
        let res = resolve_target(Team::Blue, &s, &StrategyParams::default());

        assert_eq!(res.far_target, Some(TargetPoint::new(240.0, 50.0)));
        assert_eq!(res.far_slot, SlotId::new(1));
        assert_eq!(res.white_slot, None);
    }

    #[test]
    fn test_blue_team_yellow_ball_is_near() {
        let s = slots([BallColor::None, BallColor::Yellow, BallColor::None]);
        let res = resolve_target(Team::Blue, &s, &StrategyParams::default());

        assert_eq!(res.far_target, None);
        assert_eq!(res.far_slot, None);
        assert_eq!(near_slot(Team::Blue, &s), SlotId::new(2));

        // The same ball is a far ball for the red team
        let res = resolve_target(Team::Red, &s, &StrategyParams::default());
        assert_eq!(res.far_target, Some(TargetPoint::new(240.0, -50.0)));
    }

    #[test]
    fn test_tie_breaks() {
        let s = slots([BallColor::White, BallColor::Green, BallColor::Red]);
        let res = resolve_target(Team::Blue, &s, &StrategyParams::default());

        // First far match wins
        assert_eq!(res.far_target, Some(TargetPoint::new(240.0, -50.0)));
        assert_eq!(res.far_slot, SlotId::new(2));
        assert_eq!(res.white_slot, SlotId::new(1));

        // Last white wins
        let s = slots([BallColor::White, BallColor::Black, BallColor::White]);
        let res = resolve_target(Team::Red, &s, &StrategyParams::default());
        assert_eq!(res.white_slot, SlotId::new(3));
        assert_eq!(near_slot(Team::Red, &s), None);
    }

    #[test]
    fn test_slot_access() {
        let mut s = StandSlots::new();
        let slot = SlotId::new(3).unwrap();

        s.set(slot, BallColor::Black);
        assert_eq!(s.get(slot), BallColor::Black);

        s.reset();
        assert!(s.iter().all(|(_, c)| c == BallColor::None));
    }
}
