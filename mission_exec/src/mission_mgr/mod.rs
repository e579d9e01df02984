//! # MissionMgr module
//!
//! This module implements the [`MissionMgr`] state machine, which is responsible for running the
//! golf ball delivery mission. The mission is broken down into a number of states:
//!
//! - `ReadyForMission` - The robot is stopped, waiting for a mission to be started.
//! - `NearBallScript` - Drive to the stand and retrieve the team's own ball.
//! - `DriveTowardsFarBall` - Seek towards the far ball delivery point.
//! - `ArcToFarBall` - Drive a single arc onto the far ball delivery point.
//! - `FarBallScript` - Retrieve the far ball, turn around and start heading home.
//! - `DriveTowardsHome` - Seek towards home.
//! - `ArcToHome` - Drive a single arc home.
//! - `WaitingForPickup` - Stopped, waiting to be picked up.
//! - `SeekingHome` - Creep back towards home after waiting for too long.
//! - `RunningVoiceCommand` - Execute an "angle + distance" voice command.
//!
//! All state changes go through a single transition, which advances the choreography epoch. Any
//! action scheduled by the previous state is therefore dropped, even if it is already due.
//!
//! The manager never reads a clock. Every input is given the current time in milliseconds, and
//! each input finishes by performing any scheduled actions which are due.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod arc_to;
mod drive_towards;
mod far_ball;
mod near_ball;
mod params;
mod pickup;
mod ready;
mod scripts;
pub mod tm;
mod voice;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::fmt::{self, Display};

use comms_if::{
    eqpt::mech::{ArmCmd, WheelDems},
    tc::{
        mission::{BallColor, SlotId, Team},
        Tc,
    },
};
use log::{debug, info, trace, warn};
use serde::{Deserialize, Serialize};

pub use self::{params::MissionMgrParams, tm::MissionTm};
use crate::{
    chor::{Advance, Scheduler, Scope},
    loc::{LocMgr, PoseEvent},
    loco_ctrl::LocoCtrl,
    mech_client::MechSink,
    strategy::{StandSlots, TargetPoint},
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Mission Manager
///
/// Owns the mission state and everything that state depends on. Actuator demands are sent to the
/// sink `S`.
pub struct MissionMgr<S: MechSink> {
    /// Parameters for the MissionMgr and all its states.
    pub params: MissionMgrParams,

    /// Destination of all wheel and arm demands.
    sink: S,

    state: MissionState,

    /// Time at which the current state was entered.
    state_start_ms: u64,

    /// Time at which the current mission was started.
    match_start_ms: u64,

    /// Mission bookkeeping, see [`MissionContext`].
    ctx: MissionContext,

    loc_mgr: LocMgr,

    loco_ctrl: LocoCtrl,

    scheduler: Scheduler<MissionAction>,

    /// The last wheel demands sent to the sink.
    wheel_dems: WheelDems,

    /// Voice command waiting for RunningVoiceCommand to be entered.
    pending_voice: Option<VoiceCmd>,

    /// Detects the robot moving away from home while seeking it.
    drift: DriftMonitor,

    /// Id of the keyword or straight test drive still waiting for its stop.
    manual_drive: Option<u32>,
    num_manual_drives: u32,

    /// True while the mission may be started.
    go_armed: bool,

    notifications: Vec<Notification>,
}

/// Data which is valid over a whole mission.
#[derive(Debug, Clone, Default)]
pub struct MissionContext {
    pub team: Team,

    pub slots: StandSlots,

    /// Where the far ball is delivered. Kept from the previous mission if the strategy finds no
    /// far ball.
    pub far_target: TargetPoint,

    pub far_slot: Option<SlotId>,

    pub near_slot: Option<SlotId>,

    /// White ball still to be retrieved on the way to the far ball.
    pub white_slot: Option<SlotId>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct VoiceCmd {
    angle_deg: i32,
    distance_ft: f64,
}

#[derive(Debug, Clone, Copy, Default)]
struct DriftMonitor {
    count: u32,
    last_distance_ft: Option<f64>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Errors that can occur in the mission manager.
#[derive(Debug, thiserror::Error)]
pub enum MissionMgrError {
    #[error("Failed to load MissionMgrParams: {0}")]
    ParamLoadError(util::params::LoadError),

    #[error("Illegal state transition out of {from} to {to}")]
    IllegalTransition { from: MissionState, to: MissionState },

    #[error("A mission is already running (currently in {0})")]
    AlreadyRunning(MissionState),

    #[error("No mission is running")]
    NotRunning,
}

/// The states of the mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MissionState {
    ReadyForMission,
    NearBallScript,
    DriveTowardsFarBall,
    ArcToFarBall,
    FarBallScript,
    DriveTowardsHome,
    ArcToHome,
    WaitingForPickup,
    SeekingHome,
    RunningVoiceCommand,
}

/// Actions which can be scheduled to happen later.
#[derive(Debug, Clone, PartialEq)]
pub enum MissionAction {
    /// Send wheel demands.
    Wheel(WheelDems),

    /// Send an arm command.
    Arm(ArmCmd),

    /// Request a state change.
    SetState(MissionState),

    /// Mark a stand slot as empty.
    ClearSlot(SlotId),

    /// Stop the given manual drive, unless another has replaced it.
    EndManualDrive(u32),
}

/// Events for a presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Notification {
    StateChanged { from: MissionState, to: MissionState },
    TransitionRejected { from: MissionState, to: MissionState },

    /// The mission may be started.
    GoArmed,

    Message(String),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl<S: MechSink> MissionMgr<S> {
    /// Create a new manager, loading the parameters from the given file in the params directory.
    pub fn init(params_path: &str, sink: S, now_ms: u64) -> Result<Self, MissionMgrError> {
        let params: MissionMgrParams =
            util::params::load(params_path).map_err(MissionMgrError::ParamLoadError)?;

        Ok(Self::new(params, sink, now_ms))
    }

    /// Create a new manager in ReadyForMission.
    pub fn new(params: MissionMgrParams, sink: S, now_ms: u64) -> Self {
        let loco_ctrl = LocoCtrl::new(params.seek.clone(), params.arc.clone());

        let mut mgr = Self {
            params,
            sink,
            state: MissionState::ReadyForMission,
            state_start_ms: now_ms,
            match_start_ms: now_ms,
            ctx: MissionContext::default(),
            loc_mgr: LocMgr::new(),
            loco_ctrl,
            scheduler: Scheduler::new(),
            wheel_dems: WheelDems::stop(),
            pending_voice: None,
            drift: DriftMonitor::default(),
            manual_drive: None,
            num_manual_drives: 0,
            go_armed: false,
            notifications: Vec::new(),
        };

        mgr.enter_ready(now_ms);
        mgr.run_due(now_ms);

        mgr
    }

    // ---- TRANSITIONS ----

    /// Request a change to `new_state`.
    ///
    /// While ReadyForMission the only legal transition is to NearBallScript, any other request is
    /// rejected and the state is left unchanged.
    pub fn request_transition(
        &mut self,
        now_ms: u64,
        new_state: MissionState,
    ) -> Result<(), MissionMgrError> {
        self.transition(now_ms, new_state)?;
        self.run_due(now_ms);

        Ok(())
    }

    /// Guarded transition, used by both external requests and scheduled actions.
    fn transition(&mut self, now_ms: u64, new_state: MissionState) -> Result<(), MissionMgrError> {
        if self.state == MissionState::ReadyForMission
            && new_state != MissionState::NearBallScript
        {
            warn!("Illegal state transition out of {} to {}", self.state, new_state);
            self.notify(Notification::TransitionRejected {
                from: self.state,
                to: new_state,
            });
            return Err(MissionMgrError::IllegalTransition {
                from: self.state,
                to: new_state,
            });
        }

        self.enter_state(now_ms, new_state);

        Ok(())
    }

    /// Unconditionally enter `new_state`, advancing the epoch and running the state's entry.
    fn enter_state(&mut self, now_ms: u64, new_state: MissionState) {
        let from = self.state;

        // Returning to ReadyForMission ends the mission, so mission scoped actions go too
        let advance = if new_state == MissionState::ReadyForMission {
            Advance::Mission
        } else {
            Advance::State
        };
        let epoch = self.scheduler.advance(advance);

        if from == MissionState::ReadyForMission && new_state != MissionState::ReadyForMission {
            self.match_start_ms = now_ms;
        }

        self.state = new_state;
        self.state_start_ms = now_ms;
        self.go_armed = false;

        // The stop for a manual drive was scheduled in the old state, so it is sent now
        if let Some(id) = self.manual_drive.take() {
            debug!("Manual drive {} stopped by the state change", id);
            self.send_wheels(WheelDems::stop());
        }

        info!("MissionMgr state change: {} -> {} (epoch {})", from, new_state, epoch);
        self.notify(Notification::StateChanged {
            from,
            to: new_state,
        });

        match new_state {
            MissionState::ReadyForMission => self.enter_ready(now_ms),
            MissionState::NearBallScript => self.enter_near_ball_script(now_ms),
            MissionState::DriveTowardsFarBall | MissionState::DriveTowardsHome => (),
            MissionState::ArcToFarBall => self.enter_arc_to_far_ball(now_ms),
            MissionState::FarBallScript => self.enter_far_ball_script(now_ms),
            MissionState::ArcToHome => self.enter_arc_to_home(now_ms),
            MissionState::WaitingForPickup => self.enter_waiting_for_pickup(now_ms),
            MissionState::SeekingHome => self.enter_seeking_home(now_ms),
            MissionState::RunningVoiceCommand => self.enter_running_voice_command(now_ms),
        }
    }

    // ---- INPUTS ----

    /// Process a telecommand.
    pub fn handle_tc(&mut self, now_ms: u64, tc: Tc) -> Result<(), MissionMgrError> {
        trace!("Handling TC {:?}", tc);

        match tc {
            Tc::Pose {
                x_ft,
                y_ft,
                heading_deg,
            } => self.on_pose(now_ms, x_ft, y_ft, heading_deg),
            Tc::FieldHeading { heading_deg } => self.on_field_heading(now_ms, heading_deg),
            Tc::ZeroFieldHeading => self.zero_field_heading(now_ms),
            Tc::Voice {
                angle_deg,
                distance_ft,
            } => return self.on_voice_command(now_ms, angle_deg, distance_ft),
            Tc::VoiceKeyword { keyword } => self.on_voice_keyword(now_ms, keyword),
            Tc::ReportColor { slot, color } => self.report_color(slot, color),
            Tc::SetTeam { team } => self.set_team(team),
            Tc::SetStraightDuty { left, right } => {
                self.set_straight_duty(left, right);
            }
            Tc::TestStraightDrive => self.test_straight_drive(now_ms),
            Tc::StartMission => return self.request_mission_start(now_ms),
            Tc::AbortMission => return self.request_mission_abort(now_ms),
        }

        Ok(())
    }

    /// Process a GPS sample.
    ///
    /// The heading is `None` (or out of range) if it is not known for this sample, in which case
    /// only the position is used.
    pub fn on_pose(&mut self, now_ms: u64, x_ft: f64, y_ft: f64, heading_deg: Option<f64>) {
        self.run_due(now_ms);

        let event = self.loc_mgr.on_pose_sample(x_ft, y_ft, heading_deg);

        self.check_white_ball(now_ms, &event);

        match self.state {
            MissionState::DriveTowardsFarBall => {
                let target = self.ctx.far_target;
                self.check_arc_trigger(now_ms, &event, target, MissionState::ArcToFarBall);
            }
            MissionState::DriveTowardsHome => {
                self.check_arc_trigger(
                    now_ms,
                    &event,
                    TargetPoint::home(),
                    MissionState::ArcToHome,
                );
            }
            MissionState::SeekingHome => self.check_drift(&event),
            _ => (),
        }

        self.run_due(now_ms);
    }

    /// Process a reading from the field orientation sensor.
    pub fn on_field_heading(&mut self, now_ms: u64, heading_deg: f64) {
        self.loc_mgr.on_field_heading(heading_deg);
        self.run_due(now_ms);
    }

    /// Offset the field heading so that it currently reads zero.
    pub fn zero_field_heading(&mut self, now_ms: u64) {
        self.loc_mgr.set_field_heading(0.0);
        info!("Field heading zeroed");
        self.run_due(now_ms);
    }

    /// Periodic processing, expected at around 10 Hz.
    pub fn tick(&mut self, now_ms: u64) {
        self.run_due(now_ms);

        self.check_match_timer(now_ms);

        match self.state {
            MissionState::DriveTowardsFarBall => {
                let target = self.ctx.far_target;
                self.seek(target);
            }
            MissionState::DriveTowardsHome => self.seek(TargetPoint::home()),
            MissionState::WaitingForPickup => self.tick_waiting_for_pickup(now_ms),
            MissionState::SeekingHome => self.tick_seeking_home(now_ms),
            _ => (),
        }

        self.run_due(now_ms);
    }

    // ---- OPERATOR ----

    /// Record the colour of the ball in a stand slot.
    pub fn report_color(&mut self, slot: SlotId, color: BallColor) {
        self.ctx.slots.set(slot, color);
        info!("Slot {} holds {:?}", slot, color);
    }

    pub fn get_slot_color(&self, slot: SlotId) -> BallColor {
        self.ctx.slots.get(slot)
    }

    /// Set the team, which also forgets all reported ball colours.
    pub fn set_team(&mut self, team: Team) {
        self.ctx.team = team;
        self.ctx.slots.reset();
        info!("Team set to {:?}, all slots cleared", team);
    }

    /// Calibrate the straight line duty cycles.
    pub fn set_straight_duty(&mut self, left: i32, right: i32) -> WheelDems {
        self.loco_ctrl.set_straight_duty(left, right)
    }

    /// Drive straight for a fixed time so that the straight line calibration can be checked.
    pub fn test_straight_drive(&mut self, now_ms: u64) {
        let straight = self.loco_ctrl.straight_dems();
        info!("Straight drive test at {}", straight);

        self.start_manual_drive(now_ms, straight, self.params.straight_test_ms);
    }

    /// Drive with `dems` for `drive_ms` without changing state. A state change ends the drive
    /// early.
    fn start_manual_drive(&mut self, now_ms: u64, dems: WheelDems, drive_ms: u64) {
        self.num_manual_drives += 1;
        let id = self.num_manual_drives;
        self.manual_drive = Some(id);

        self.send_wheels(dems);
        self.schedule(now_ms, drive_ms, MissionAction::EndManualDrive(id));

        self.run_due(now_ms);
    }

    // ---- SCHEDULED ACTIONS ----

    /// Perform every scheduled action which is due at `now_ms`.
    pub fn run_due(&mut self, now_ms: u64) {
        while let Some(action) = self.scheduler.pop_due(now_ms) {
            self.perform(now_ms, action);
        }
    }

    /// Time at which the next scheduled action is due.
    pub fn next_fire_ms(&self) -> Option<u64> {
        self.scheduler.next_fire_ms()
    }

    fn perform(&mut self, now_ms: u64, action: MissionAction) {
        trace!("Performing {:?}", action);

        match action {
            MissionAction::Wheel(dems) => self.send_wheels(dems),
            MissionAction::Arm(cmd) => self.sink.send_arm_cmd(&cmd),
            MissionAction::SetState(state) => {
                // Rejections are logged and notified by the transition itself
                self.transition(now_ms, state).ok();
            }
            MissionAction::ClearSlot(slot) => {
                self.ctx.slots.set(slot, BallColor::None);
                info!("Slot {} retrieved", slot);
            }
            MissionAction::EndManualDrive(id) => {
                if self.manual_drive == Some(id) {
                    self.manual_drive = None;
                    self.send_wheels(WheelDems::stop());
                }
            }
        }
    }

    /// Schedule a state scoped action.
    fn schedule(&mut self, now_ms: u64, offset_ms: u64, action: MissionAction) {
        self.scheduler.schedule(now_ms, offset_ms, Scope::State, action);
    }

    // ---- OUTPUTS ----

    fn send_wheels(&mut self, dems: WheelDems) {
        self.wheel_dems = dems;
        self.sink.send_wheel_speed(dems);
    }

    fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    /// Remove and return all notifications raised since the last call.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    // ---- ACCESSORS ----

    pub fn get_state(&self) -> MissionState {
        self.state
    }

    /// Time spent in the current state.
    pub fn get_state_time_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.state_start_ms)
    }

    /// Time since the current mission started, zero when no mission is running.
    pub fn get_match_time_ms(&self, now_ms: u64) -> u64 {
        if self.state == MissionState::ReadyForMission {
            0
        } else {
            now_ms.saturating_sub(self.match_start_ms)
        }
    }

    pub fn get_context(&self) -> &MissionContext {
        &self.ctx
    }

    pub fn get_loc_mgr(&self) -> &LocMgr {
        &self.loc_mgr
    }

    pub fn get_wheel_dems(&self) -> WheelDems {
        self.wheel_dems
    }

    pub fn get_scheduler(&self) -> &Scheduler<MissionAction> {
        &self.scheduler
    }

    pub fn is_go_armed(&self) -> bool {
        self.go_armed
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn get_tm(&self, now_ms: u64) -> MissionTm {
        MissionTm {
            state: self.state,
            state_time_ms: self.get_state_time_ms(now_ms),
            match_time_remaining_ms: self
                .params
                .match_length_ms
                .saturating_sub(self.get_match_time_ms(now_ms)),
            epoch: self.scheduler.current_epoch(),
            go_armed: self.go_armed,
            pose: self.loc_mgr.get_pose(),
            heading_deg: self.loc_mgr.get_heading(),
            field_heading_deg: self.loc_mgr.get_field_heading(),
            wheel_dems: self.wheel_dems,
            team: self.ctx.team,
            slots: self.ctx.slots,
            far_target: self.ctx.far_target,
            white_slot: self.ctx.white_slot,
            num_pending_actions: self.scheduler.len(),
        }
    }

    // ---- SHARED STATE BEHAVIOUR ----

    /// Retrieve a pending white ball once the robot is far enough up the field.
    fn check_white_ball(&mut self, now_ms: u64, event: &PoseEvent) {
        if self.state == MissionState::ReadyForMission {
            return;
        }

        let slot = match self.ctx.white_slot {
            Some(s) => s,
            None => return,
        };

        if event.pose().x() > self.params.white_ball_min_x_ft {
            info!("Retrieving white ball from slot {}", slot);
            self.ctx.white_slot = None;
            self.retrieve_ball(now_ms, slot, Scope::Mission);
        }
    }
}

impl Display for MissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MissionState::ReadyForMission => "ReadyForMission",
            MissionState::NearBallScript => "NearBallScript",
            MissionState::DriveTowardsFarBall => "DriveTowardsFarBall",
            MissionState::ArcToFarBall => "ArcToFarBall",
            MissionState::FarBallScript => "FarBallScript",
            MissionState::DriveTowardsHome => "DriveTowardsHome",
            MissionState::ArcToHome => "ArcToHome",
            MissionState::WaitingForPickup => "WaitingForPickup",
            MissionState::SeekingHome => "SeekingHome",
            MissionState::RunningVoiceCommand => "RunningVoiceCommand",
        };

        write!(f, "{}", s)
    }
}

impl Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notification::StateChanged { from, to } => write!(f, "State: {} -> {}", from, to),
            Notification::TransitionRejected { from, to } => {
                write!(f, "Illegal state transition out of {} to {}", from, to)
            }
            Notification::GoArmed => write!(f, "Ready, press go to start the mission"),
            Notification::Message(m) => write!(f, "{}", m),
        }
    }
}
