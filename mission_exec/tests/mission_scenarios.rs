//! # Mission scenarios
//!
//! Whole-mission behaviour of the [`MissionMgr`], driven the same way the executable drives it.

use comms_if::{
    eqpt::mech::WheelDems,
    tc::{
        mission::{BallColor, SlotId, Team},
        Tc,
    },
};
use mission_lib::{
    chor::{Scheduler, Scope},
    mech_client::RecordingSink,
    mission_mgr::{
        MissionAction, MissionMgr, MissionMgrError, MissionMgrParams, MissionState, Notification,
    },
    strategy::{resolve_target, StandSlots, StrategyParams, TargetPoint},
};
use util::script_interpreter::{PendingTcs, ScriptInterpreter};

fn slot(n: u8) -> SlotId {
    SlotId::new(n).unwrap()
}

fn new_mgr() -> MissionMgr<RecordingSink> {
    MissionMgr::new(MissionMgrParams::default(), RecordingSink::new(), 0)
}

/// Run a mission up to DriveTowardsFarBall, the far ball being red in slot 1 for the blue team.
fn mgr_driving_to_far_ball() -> MissionMgr<RecordingSink> {
    let mut mgr = new_mgr();
    mgr.set_team(Team::Blue);
    mgr.report_color(slot(1), BallColor::Red);
    mgr.request_mission_start(0).unwrap();
    mgr.request_transition(100, MissionState::DriveTowardsFarBall)
        .unwrap();
    mgr
}

#[test]
fn test_blue_team_red_ball_target() {
    let mut slots = StandSlots::new();
    slots.set(slot(1), BallColor::Red);

    let res = resolve_target(Team::Blue, &slots, &StrategyParams::default());
    assert_eq!(res.far_target, Some(TargetPoint::new(240.0, 50.0)));
}

#[test]
fn test_blue_team_yellow_ball_keeps_default_target() {
    let mut mgr = new_mgr();
    mgr.set_team(Team::Blue);
    mgr.report_color(slot(2), BallColor::Yellow);

    mgr.request_mission_start(0).unwrap();

    assert_eq!(mgr.get_context().far_target, TargetPoint::new(0.0, 0.0));
    assert_eq!(mgr.get_context().far_slot, None);
    assert!(mgr
        .take_notifications()
        .contains(&Notification::Message(String::from("No far ball found"))));
}

#[test]
fn test_misaligned_robot_keeps_seeking() {
    let mut mgr = mgr_driving_to_far_ball();

    mgr.on_pose(200, 220.0, 50.0, Some(135.0));
    assert_eq!(mgr.get_state(), MissionState::DriveTowardsFarBall);
}

#[test]
fn test_aligned_robot_arcs_to_far_ball() {
    let mut mgr = mgr_driving_to_far_ball();

    mgr.on_pose(200, 230.0, 40.0, Some(35.0));
    assert_eq!(mgr.get_state(), MissionState::ArcToFarBall);

    // Target is 10 degrees to the left, so the left wheel is the slow one
    let dems = mgr.get_wheel_dems();
    assert!(dems.left < 255);
    assert_eq!(dems.right, 255);

    // Arc of 14.2 ft, 4307 ms at 3.3 ft/s, then the far ball script
    mgr.tick(200 + 4306);
    assert_eq!(mgr.get_state(), MissionState::ArcToFarBall);
    mgr.tick(200 + 4307);
    assert_eq!(mgr.get_state(), MissionState::FarBallScript);
    assert_eq!(mgr.get_wheel_dems(), WheelDems::stop());
}

#[test]
fn test_drive_arc_left() {
    let mut mgr = new_mgr();
    mgr.request_mission_start(0).unwrap();
    mgr.sink_mut().clear();

    mgr.drive_arc(1000, -10.0, 5.0, MissionState::WaitingForPickup);

    // Wheels are commanded straight away, before anything is scheduled to happen
    assert_eq!(mgr.sink().wheel_dems(), vec![WheelDems::new(117, 255)]);

    let pending: Vec<_> = mgr
        .get_scheduler()
        .iter()
        .filter(|a| a.fire_at_ms == 1000 + 1515)
        .map(|a| a.action.clone())
        .collect();
    assert!(pending.contains(&MissionAction::Wheel(WheelDems::stop())));
    assert!(pending.contains(&MissionAction::SetState(MissionState::WaitingForPickup)));

    mgr.tick(1000 + 1514);
    assert_eq!(mgr.get_state(), MissionState::NearBallScript);

    mgr.tick(1000 + 1515);
    assert_eq!(mgr.get_state(), MissionState::WaitingForPickup);
    assert_eq!(mgr.sink().last_wheel_dems(), Some(WheelDems::stop()));
}

#[test]
fn test_straight_drive_stopped_by_state_change() {
    let mut mgr = new_mgr();
    mgr.request_mission_start(0).unwrap();
    mgr.request_transition(1000, MissionState::WaitingForPickup)
        .unwrap();
    mgr.set_straight_duty(240, 250);

    mgr.test_straight_drive(7000);
    assert_eq!(mgr.get_wheel_dems(), WheelDems::new(240, 250));

    mgr.tick(9001);
    assert_eq!(mgr.get_state(), MissionState::SeekingHome);
    assert_eq!(mgr.get_wheel_dems(), WheelDems::stop());

    mgr.tick(11_001);
    assert_eq!(mgr.get_wheel_dems(), WheelDems::stop());
}

#[test]
fn test_straight_drive_stops_after_test_time() {
    let mut mgr = new_mgr();

    mgr.test_straight_drive(100);
    mgr.tick(100 + 3999);
    assert_eq!(mgr.get_wheel_dems(), WheelDems::new(255, 255));
    mgr.tick(100 + 4000);
    assert_eq!(mgr.get_wheel_dems(), WheelDems::stop());
    assert_eq!(mgr.get_state(), MissionState::ReadyForMission);
}

#[test]
fn test_invalidated_actions_never_run() {
    let mut sched = Scheduler::new();
    let epoch = sched.current_epoch();

    for i in 0..25u64 {
        sched.schedule(0, i * 10, Scope::State, i);
    }

    // Everything is already due when the epoch is cancelled
    assert_eq!(sched.cancel_epoch(epoch), 25);
    assert_eq!(sched.pop_due(u64::MAX), None);
}

#[test]
fn test_abort_mid_choreography_cancels_it() {
    let mut mgr = new_mgr();
    mgr.report_color(slot(1), BallColor::Blue);
    mgr.request_mission_start(0).unwrap();

    // Part way through the near ball retrieval
    mgr.tick(30_000);
    let num_arm_cmds = mgr.sink().arm_cmds().len();
    assert!(num_arm_cmds > 0 && num_arm_cmds < 11);

    mgr.request_mission_abort(30_050).unwrap();
    mgr.sink_mut().clear();

    // Nothing left over from the mission may reach the robot
    mgr.tick(200_000);
    assert!(mgr.sink().sent.is_empty());
    assert_eq!(mgr.get_state(), MissionState::ReadyForMission);
    assert_eq!(mgr.get_slot_color(slot(1)), BallColor::Blue);
}

#[test]
fn test_ready_only_accepts_start() {
    let mut mgr = new_mgr();
    mgr.take_notifications();

    let states = [
        MissionState::ReadyForMission,
        MissionState::DriveTowardsFarBall,
        MissionState::ArcToFarBall,
        MissionState::FarBallScript,
        MissionState::DriveTowardsHome,
        MissionState::ArcToHome,
        MissionState::WaitingForPickup,
        MissionState::SeekingHome,
        MissionState::RunningVoiceCommand,
    ];

    for s in states.iter() {
        assert!(matches!(
            mgr.request_transition(10, *s),
            Err(MissionMgrError::IllegalTransition { .. })
        ));
        assert_eq!(mgr.get_state(), MissionState::ReadyForMission);
    }

    let notifications = mgr.take_notifications();
    assert_eq!(notifications.len(), states.len());
    assert!(notifications
        .iter()
        .all(|n| matches!(n, Notification::TransitionRejected { .. })));

    mgr.request_transition(20, MissionState::NearBallScript)
        .unwrap();
    assert_eq!(mgr.get_state(), MissionState::NearBallScript);
}

#[test]
fn test_report_color_and_team_reset() {
    let mut mgr = new_mgr();

    mgr.report_color(slot(2), BallColor::Green);
    assert_eq!(mgr.get_slot_color(slot(2)), BallColor::Green);

    mgr.report_color(slot(3), BallColor::White);
    mgr.set_team(Team::Red);
    for s in SlotId::all() {
        assert_eq!(mgr.get_slot_color(s), BallColor::None);
    }
    assert_eq!(mgr.get_context().team, Team::Red);
}

#[test]
fn test_white_ball_survives_state_changes() {
    let mut mgr = new_mgr();
    mgr.report_color(slot(1), BallColor::Red);
    mgr.report_color(slot(3), BallColor::White);
    mgr.request_mission_start(0).unwrap();
    mgr.request_transition(100, MissionState::DriveTowardsFarBall)
        .unwrap();
    assert_eq!(mgr.get_context().white_slot, Some(slot(3)));

    // Not yet far enough up the field
    mgr.on_pose(1000, 150.0, 0.0, Some(0.0));
    assert!(mgr.sink().arm_cmds().is_empty());

    mgr.on_pose(2000, 201.0, 0.0, Some(0.0));
    assert_eq!(mgr.get_context().white_slot, None);
    assert_eq!(mgr.sink().arm_cmds(), vec!["ATTACH 111111".to_string()]);

    // The arc starts part way through the retrieval, which carries on regardless
    mgr.on_pose(3000, 225.0, 45.0, Some(45.0));
    assert_eq!(mgr.get_state(), MissionState::ArcToFarBall);

    mgr.tick(2000 + 14_999);
    assert_eq!(mgr.get_slot_color(slot(3)), BallColor::White);
    mgr.tick(2000 + 15_000);
    assert_eq!(mgr.get_slot_color(slot(3)), BallColor::None);

    // The far ball retrieval started later and is still running
    assert_eq!(mgr.get_state(), MissionState::FarBallScript);
    assert_eq!(mgr.get_slot_color(slot(1)), BallColor::Red);
}

#[test]
fn test_white_ball_cancelled_by_abort() {
    let mut mgr = new_mgr();
    mgr.report_color(slot(1), BallColor::Red);
    mgr.report_color(slot(2), BallColor::White);
    mgr.request_mission_start(0).unwrap();
    mgr.request_transition(100, MissionState::DriveTowardsFarBall)
        .unwrap();

    mgr.on_pose(1000, 210.0, 0.0, Some(0.0));
    assert_eq!(mgr.sink().arm_cmds().len(), 1);

    mgr.request_mission_abort(1500).unwrap();
    mgr.tick(60_000);

    assert_eq!(mgr.sink().arm_cmds().len(), 1);
    assert_eq!(mgr.get_slot_color(slot(2)), BallColor::White);
}

#[test]
fn test_scripted_mission() {
    let script = "
        0.0: team red;
        0.0: color 1 blue;
        0.0: color 2 red;
        0.1: start;
        50.0: pose 230 40 35;
        60.0: pose 238 49;
        90.0: abort;
    ";

    let mut si = ScriptInterpreter::from_script(script).unwrap();
    let mut mgr = new_mgr();

    // Step through the script at 10 Hz
    let mut states = vec![];
    for cycle in 0..=1000u64 {
        let now_ms = cycle * 100;

        if let PendingTcs::Some(tcs) = si.get_pending_tcs(now_ms as f64 / 1000.0) {
            for tc in tcs {
                if let Tc::StartMission = tc {
                    assert!(mgr.handle_tc(now_ms, tc).is_ok());
                } else {
                    mgr.handle_tc(now_ms, tc).ok();
                }
            }
        }

        mgr.tick(now_ms);

        if states.last() != Some(&mgr.get_state()) {
            states.push(mgr.get_state());
        }
    }

    assert_eq!(mgr.get_context().far_target, TargetPoint::new(240.0, 50.0));
    assert_eq!(
        states,
        vec![
            MissionState::ReadyForMission,
            MissionState::NearBallScript,
            MissionState::DriveTowardsFarBall,
            MissionState::ArcToFarBall,
            MissionState::FarBallScript,
            MissionState::DriveTowardsHome,
            MissionState::ReadyForMission,
        ]
    );
}
