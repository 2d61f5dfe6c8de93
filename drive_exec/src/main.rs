//! # Drive Executable
//!
//! Drives a vehicle around a simulated track. The executable runs in one of two modes:
//!
//! - `drive`: steer and throttle with the fixed gains from `drive_ctrl.toml`.
//! - `tune`: drive while tuning the steering gains, resetting the simulation at the end of every
//!   episode.
//!
//! Frames from the simulator arrive through a relay connected to the simulator socket. Every
//! telemetry frame is answered before the next one is read.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use color_eyre::{Result, eyre::WrapErr};
use log::{debug, info, trace, warn};
use structopt::StructOpt;

// Internal
use comms_if::{
    net::{zmq, NetParams},
    sim::{Outbound, Telemetry}
};
use drive_lib::{
    drive_ctrl::DriveCtrl,
    frame_handler::{handle_frame, Handled},
    sim_server::{SimServer, SimServerError},
    tune_ctrl::{self, TuneCtrl}
};
use util::{
    archive::Archived,
    host,
    logger::{logger_init, LevelFilter},
    module::State,
    session::Session,
};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Path to the best gains file, relative to the session root.
const BEST_GAINS_PATH: &str = "gain_tuner/best_gains.json";

// ------------------------------------------------------------------------------------------------
// CLI
// ------------------------------------------------------------------------------------------------

#[derive(Debug, StructOpt)]
#[structopt(name = "drive_exec", about = "PID driving and gain tuning for the track simulator")]
struct Opts {
    /// Minimum level of log messages to record
    #[structopt(short, long, default_value = "debug")]
    log_level: LevelFilter,

    #[structopt(subcommand)]
    mode: Mode,
}

#[derive(Debug, StructOpt)]
enum Mode {
    /// Drive with the fixed gains in drive_ctrl.toml
    #[structopt(name = "drive")]
    Drive,

    /// Tune the steering gains with twiddle
    #[structopt(name = "tune")]
    Tune {
        /// Number of ticks in each of the warm-up and measurement windows
        #[structopt(short, long)]
        window: Option<u32>,
    },
}

// ------------------------------------------------------------------------------------------------
// MAIN
// ------------------------------------------------------------------------------------------------

fn main() -> Result<()> {

    let opts = Opts::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new(
        "drive_exec",
        "sessions"
    ).wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(opts.log_level, &session)
        .wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Drive Executable\n");
    info!("Running on: {}", host::get_host_info());
    info!("Session directory: {:?}\n", session.session_root);
    debug!("CLI options: {:?}", opts);

    // ---- LOAD PARAMETERS ----

    let net_params: NetParams = util::params::load("drive_exec.toml")
        .wrap_err("Could not load exec params")?;

    info!("Exec parameters loaded");

    // ---- SERVER INITIALISATION ----

    let ctx = zmq::Context::new();

    let mut server = SimServer::new(&ctx, &net_params)
        .wrap_err("Failed to initialise the simulator server")?;

    info!("Listening for the simulator on {}", net_params.sim_endpoint);

    // ---- MODULE INITIALISATION AND MAIN LOOP ----

    let result = match opts.mode {
        Mode::Drive => {
            let mut ctrl = DriveCtrl::default();
            ctrl.init("drive_ctrl.toml", &session)
                .wrap_err("Failed to initialise DriveCtrl")?;

            info!("DriveCtrl initialised, running in drive mode");

            run(&mut server, &mut ctrl, |_| ())
        },
        Mode::Tune { window } => {
            let mut ctrl = TuneCtrl::default();
            ctrl.init(
                tune_ctrl::InitData {
                    drive_params_path: "drive_ctrl.toml",
                    tuner_params_path: "gain_tuner.toml",
                    window_override: window
                },
                &session
            ).wrap_err("Failed to initialise TuneCtrl")?;

            info!(
                "TuneCtrl initialised, running in tune mode with a {} tick window",
                ctrl.tuner().window_ticks()
            );

            run(&mut server, &mut ctrl, |report: &tune_ctrl::StatusReport| {
                if let Some(best) = report.new_best {
                    info!(
                        "New best gains from episode {}: [{}, {}, {}] (cost {:.6})",
                        best.episode, best.k_p, best.k_i, best.k_d, best.cost
                    );
                    session.save(BEST_GAINS_PATH, best);
                }
            })
        }
    };

    info!("End of execution");

    session.exit();

    result
}

/// Serve the simulator with the given control module until the connection fails.
///
/// `on_report` is called with the status report of every processed tick.
fn run<S, F>(server: &mut SimServer, ctrl: &mut S, mut on_report: F) -> Result<()>
where
    S: State<InputData = Telemetry, OutputData = Outbound> + Archived,
    S::ProcError: std::fmt::Display,
    F: FnMut(&S::StatusReport)
{
    loop {
        match server.poll_connection() {
            Some(true) => info!("Simulator connected"),
            Some(false) => warn!("Simulator disconnected"),
            None => ()
        }

        let frame = match server.recv_frame() {
            Ok(Some(f)) => f,
            Ok(None) => continue,
            Err(SimServerError::NonUtf8Frame) => {
                warn!("Dropping frame which is not valid UTF-8");
                continue
            },
            Err(e) => return Err(e).wrap_err("Could not read from the simulator")
        };

        trace!("Recieved: {}", frame);

        let handled = match handle_frame(ctrl, &frame) {
            Ok(h) => h,
            Err(e) => {
                warn!("{}", e);
                continue
            }
        };

        if let Handled::Tick { ref report, .. } = handled {
            on_report(report);

            if let Err(e) = ctrl.write() {
                warn!("Could not write archives: {}", e);
            }
        }

        if let Some(response) = handled.response() {
            if response == Outbound::Reset {
                debug!("Episode complete, resetting the simulation");
            }

            debug!("Sending: {}", response.to_frame());

            if let Err(e) = server.send(&response) {
                warn!("{}", e);
            }
        }
    }
}
