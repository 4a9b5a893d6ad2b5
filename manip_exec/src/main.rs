//! Main manipulator executable entry point.
//!
//! # Architecture
//!
//! The executable runs one command, or a script of commands, against the
//! manipulator:
//!
//!     - Load parameters and the robot description
//!     - Initialise motion control, switching the equipment into
//!       manipulation mode
//!     - For each command:
//!         - Process it in motion control
//!         - Log and archive the response and status report
//!
//! # Modules
//!
//! All modules (e.g. `motion_ctrl`) shall meet the following requirements:
//!     1. Provide a public struct implementing the `util::module::State` trait.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::{error, info};
use std::{path::PathBuf, str::FromStr};
use structopt::StructOpt;

// Internal
use comms_if::tc::{self, ManipCmd};
use manip_lib::{
    kin_model::RobotDescription,
    motion_ctrl::{self, InputData, MotionCtrl},
    params::ManipExecParams,
};
use util::{
    host,
    logger::{logger_init, LevelFilter},
    module::State,
    session::Session,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Command line options.
#[derive(Debug, StructOpt)]
#[structopt(name = "manip_exec", about = "Drive the mobile manipulator")]
struct ExecOpts {
    /// JSON script holding an array of commands to run in order.
    #[structopt(long, parse(from_os_str))]
    script: Option<PathBuf>,

    #[structopt(subcommand)]
    cmd: Option<ManipCmd>,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    let opts = ExecOpts::from_args();

    // ---- LOAD COMMANDS ----

    let cmds = match (opts.script, opts.cmd) {
        (Some(path), _) => {
            let script = std::fs::read_to_string(&path)
                .wrap_err_with(|| format!("Failed to read script {:?}", path))?;
            tc::parse_script(&script).wrap_err("Failed to parse script")?
        }
        (None, Some(cmd)) => vec![cmd],
        (None, None) => return Err(eyre!("No command or script given, see --help")),
    };

    // ---- EARLY INITIALISATION ----

    let exec_params: ManipExecParams =
        util::params::load("manip_exec.toml").wrap_err("Could not load exec params")?;

    // Initialise session
    let session =
        Session::new("manip_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    let log_level = LevelFilter::from_str(&exec_params.log_level)
        .map_err(|_| eyre!("Invalid log level {:?}", exec_params.log_level))?;
    logger_init(log_level, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Manipulator Executable\n");
    info!("Running on: {}", host::describe());
    info!("Session directory: {:?}\n", session.session_root);

    let result = run(&exec_params, cmds, &session);

    if let Err(ref e) = result {
        error!("Exec stopped: {:#}", e);
    }

    session.exit();

    result
}

/// Initialise motion control and run the commands.
fn run(
    exec_params: &ManipExecParams,
    cmds: Vec<ManipCmd>,
    session: &Session,
) -> Result<(), Report> {
    // ---- LOAD PARAMETERS ----

    let mc_params: motion_ctrl::Params = util::params::load(&exec_params.motion_ctrl_params)
        .wrap_err("Could not load motion control params")?;

    let urdf_path = util::params::param_path(&exec_params.robot_description)
        .wrap_err("Could not find the robot description")?;
    let description = RobotDescription::from_urdf_file(&urdf_path)
        .wrap_err("Failed to load the robot description")?;

    info!("Exec parameters loaded");

    // ---- INITIALISE MODULES ----

    let mut motion_ctrl = MotionCtrl::new(exec_params.sim_eqpt(), mc_params, description)
        .wrap_err("Failed to create MotionCtrl")?;
    motion_ctrl
        .init((), session)
        .wrap_err("Failed to initialise MotionCtrl")?;

    info!("MotionCtrl init complete\n");

    // ---- COMMAND PROCESSING ----

    for (i, cmd) in cmds.into_iter().enumerate() {
        info!("Executing command {}: {:?}", i, cmd);

        let input = InputData { cmd: Some(cmd) };
        let (response, report) = motion_ctrl
            .proc(&input)
            .wrap_err_with(|| format!("Command {} failed", i))?;

        if let Some(response) = response {
            info!("{}", serde_json::to_string_pretty(&response)?);
            session.save(format!("tc_{:03}/response.json", i), response);
        }
        session.save(format!("tc_{:03}/status_report.json", i), report);
    }

    // Final joint state for the archive
    let (names, values) = motion_ctrl.get_joints()?;
    session.save("joints.json", names.into_iter().zip(values).collect::<Vec<_>>());
    session.save("sim_journal.json", motion_ctrl.eqpt().journal().to_vec());

    Ok(())
}
