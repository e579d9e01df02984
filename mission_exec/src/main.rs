//! Main mission executable entry point.
//!
//! # Architecture
//!
//! The mission manager is the single owner of all mission state. Inputs (sensor samples, operator
//! requests, voice commands) are produced on a separate thread, either replayed from a script or
//! read from stdin, and marshalled onto a single channel. The main loop:
//!
//!     - Drains the input channel, handing each TC to the mission manager
//!     - Performs scheduled actions which are due
//!     - Ticks the mission manager at 10 Hz
//!     - Reports notifications and telemetry
//!     - Sleeps until the next tick, the next scheduled action or the next input, whichever is
//!       first
//!
//! Given a script path the script is replayed, otherwise TCs are read one per line from stdin,
//! either as JSON or as commands like `pose 230 40 35`.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::WrapErr, Report};
use log::{debug, info, warn};
use std::{
    io::{self, BufRead},
    path::PathBuf,
    sync::mpsc::{self, Receiver, RecvTimeoutError, Sender},
    thread,
    time::Duration,
};
use structopt::StructOpt;

// Internal
use comms_if::tc::Tc;
use mission_lib::{
    mech_client::MechClient,
    mission_mgr::{MissionMgr, MissionState},
};
use util::{
    logger::{logger_init, LevelFilter},
    script_interpreter::{PendingTcs, ScriptInterpreter},
    session::{self, Session},
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Target period of one cycle.
const CYCLE_PERIOD_MS: u64 = 100;

/// Period between telemetry reports.
const TM_PERIOD_MS: u64 = 1000;

/// Longest the script thread sleeps between checks.
const SCRIPT_POLL_PERIOD_S: f64 = 0.05;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Golf ball delivery mission executable
#[derive(Debug, StructOpt)]
#[structopt(name = "mission_exec")]
struct Args {
    /// Script of TCs to replay. If not given TCs are read from stdin.
    #[structopt(parse(from_os_str))]
    script: Option<PathBuf>,

    /// Minimum level of log messages to show
    #[structopt(short, long, default_value = "debug")]
    log_level: LevelFilter,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Messages from the input thread.
#[derive(Debug)]
enum Input {
    Tc(Tc),

    /// No more input will be sent.
    End,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    let args = Args::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("mission_exec", "sessions")
        .wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(args.log_level, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Golf Ball Delivery Mission Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- INITIALISE TC SOURCE ----

    let (tx, rx) = mpsc::channel();

    match args.script {
        Some(ref path) => {
            info!("Loading script from {:?}", path);

            let si = ScriptInterpreter::new(path).wrap_err("Failed to load script")?;

            info!(
                "Loaded script lasts {:.02} s and contains {} TCs\n",
                si.get_duration(),
                si.get_num_tcs()
            );

            thread::Builder::new()
                .name("script".into())
                .spawn(move || run_script(si, tx))
                .wrap_err("Failed to start the script thread")?;
        }
        None => {
            info!("No script provided, reading TCs from stdin\n");

            thread::Builder::new()
                .name("stdin".into())
                .spawn(move || read_stdin(tx))
                .wrap_err("Failed to start the stdin thread")?;
        }
    }

    // ---- INITIALISE MODULES ----

    let mut mission_mgr = MissionMgr::init(
        "mission_mgr.toml",
        MechClient::new(),
        session::get_elapsed_millis(),
    )
    .wrap_err("Failed to initialise MissionMgr")?;
    info!("MissionMgr init complete");

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    run(&mut mission_mgr, rx);

    // ---- SHUTDOWN ----

    info!(
        "End of execution, {} wheel demands and {} arm commands sent",
        mission_mgr.sink().get_num_wheel_dems(),
        mission_mgr.sink().get_num_arm_cmds()
    );

    Ok(())
}

/// Run the mission until the input is exhausted and no mission is running.
fn run(mission_mgr: &mut MissionMgr<MechClient>, rx: Receiver<Input>) {
    let mut input_done = false;
    let mut next_tick_ms = session::get_elapsed_millis();
    let mut next_tm_ms = next_tick_ms;

    loop {
        // ---- INPUT PROCESSING ----

        loop {
            match rx.try_recv() {
                Ok(input) => input_done |= handle_input(mission_mgr, input),
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    input_done = true;
                    break;
                }
            }
        }

        let now_ms = session::get_elapsed_millis();

        // ---- SCHEDULED ACTIONS AND TICK ----

        mission_mgr.run_due(now_ms);

        if now_ms >= next_tick_ms {
            mission_mgr.tick(now_ms);

            next_tick_ms += CYCLE_PERIOD_MS;
            if next_tick_ms <= now_ms {
                warn!("Cycle overran by {} ms", now_ms - next_tick_ms + CYCLE_PERIOD_MS);
                next_tick_ms = now_ms + CYCLE_PERIOD_MS;
            }
        }

        // ---- TELEMETRY ----

        for n in mission_mgr.take_notifications() {
            info!("{}", n);
        }

        if now_ms >= next_tm_ms {
            match serde_json::to_string(&mission_mgr.get_tm(now_ms)) {
                Ok(tm) => info!("TM: {}", tm),
                Err(e) => warn!("Could not serialise telemetry: {}", e),
            }
            next_tm_ms += TM_PERIOD_MS;
        }

        if input_done && mission_mgr.get_state() == MissionState::ReadyForMission {
            info!("Input finished and no mission running, stopping");
            break;
        }

        // ---- CYCLE MANAGEMENT ----

        let wake_ms = match mission_mgr.next_fire_ms() {
            Some(t) => t.min(next_tick_ms),
            None => next_tick_ms,
        };
        let sleep_ms = wake_ms.saturating_sub(session::get_elapsed_millis());

        if input_done {
            thread::sleep(Duration::from_millis(sleep_ms));
            continue;
        }

        // Wake early for new input
        match rx.recv_timeout(Duration::from_millis(sleep_ms)) {
            Ok(input) => input_done |= handle_input(mission_mgr, input),
            Err(RecvTimeoutError::Timeout) => (),
            Err(RecvTimeoutError::Disconnected) => input_done = true,
        }
    }
}

/// Handle one input, returning true if it was the end of input.
fn handle_input(mission_mgr: &mut MissionMgr<MechClient>, input: Input) -> bool {
    match input {
        Input::Tc(tc) => {
            let now_ms = session::get_elapsed_millis();

            if let Err(e) = mission_mgr.handle_tc(now_ms, tc) {
                debug!("TC not executed: {}", e);
            }
            false
        }
        Input::End => true,
    }
}

/// Replay the script, sending each TC when it is due.
fn run_script(mut si: ScriptInterpreter, tx: Sender<Input>) {
    let start_s = session::get_elapsed_seconds();

    loop {
        let script_time_s = session::get_elapsed_seconds() - start_s;

        match si.get_pending_tcs(script_time_s) {
            PendingTcs::None => (),
            PendingTcs::Some(tcs) => {
                for tc in tcs {
                    if tx.send(Input::Tc(tc)).is_err() {
                        return;
                    }
                }
            }
            PendingTcs::EndOfScript => {
                info!("End of TC script reached");
                tx.send(Input::End).ok();
                return;
            }
        }

        let sleep_s = match si.get_next_exec_time() {
            Some(t) => (t - script_time_s).max(0.0).min(SCRIPT_POLL_PERIOD_S),
            None => 0.0,
        };
        thread::sleep(Duration::from_secs_f64(sleep_s));
    }
}

/// Read TCs from stdin, one per line.
fn read_stdin(tx: Sender<Input>) {
    let stdin = io::stdin();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                warn!("Could not read from stdin: {}", e);
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        match Tc::from_line(&line) {
            Ok(tc) => {
                if tx.send(Input::Tc(tc)).is_err() {
                    return;
                }
            }
            Err(e) => warn!("Could not parse TC \"{}\": {}", line.trim(), e),
        }
    }

    info!("End of stdin");
    tx.send(Input::End).ok();
}
