//! Session management
//!
//! A session is one run of an exec. It owns a timestamped directory holding
//! the log file and an `arch` directory that results are archived into by a
//! background save thread.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use chrono::{DateTime, Utc};
use conquer_once::OnceCell;
use erased_serde::Serialize;
use log::{info, warn};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use thiserror::Error;

// Internal imports
use crate::time;

// ---------------------------------------------------------------------------
// STATICS
// ---------------------------------------------------------------------------

static SESSION_EPOCH: OnceCell<DateTime<Utc>> = OnceCell::uninit();

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// A chrono format string which diplays a timestamp. See
/// https://docs.rs/chrono/0.4.11/chrono/format/strftime/index.html for more
/// information.
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Period the save thread sleeps for when there's nothing to write.
const SAVE_IDLE_PERIOD: Duration = Duration::from_millis(5);

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

type SaveItem = (PathBuf, Box<dyn Serialize + Send>);

/// A struct storing information about the current session
#[derive(Clone)]
pub struct Session {
    /// The root directory for this session
    pub session_root: PathBuf,

    /// The root directory for this session's archives
    pub arch_root: PathBuf,

    /// The path to the session's log file
    pub log_file_path: PathBuf,

    save_sender: Sender<SaveItem>,

    save_stop: Arc<AtomicBool>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors associated with the session module.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("The software root environment variable (MANIP_SW_ROOT) is not set")]
    SwRootNotSet,

    #[error("Cannot create the session directory: {0}")]
    CannotCreateDir(std::io::Error),

    #[error(
        "Cannot initialise the session epoch, have you already initialised the \
         session? (conquer_once error: {0})"
    )]
    CannotInitEpoch(conquer_once::TryInitError),

    #[error("Cannot get the epoch time, did you forget to initialise the session?")]
    CannotGetEpoch,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Session {
    /// Start a new session within the given directory.
    ///
    /// This will create a new session directory named
    /// `$MANIP_SW_ROOT/{sessions_dir}/{exec_name}_{timestamp}`.
    pub fn new(exec_name: &str, sessions_dir: &str) -> Result<Self, SessionError> {
        let root = crate::host::get_sw_root().map_err(|_| SessionError::SwRootNotSet)?;

        Self::in_dir(root.join(sessions_dir), exec_name)
    }

    /// Start a new session inside an explicit parent directory.
    pub fn in_dir<P: AsRef<Path>>(parent: P, exec_name: &str) -> Result<Self, SessionError> {
        SESSION_EPOCH
            .try_init_once(Utc::now)
            .map_err(SessionError::CannotInitEpoch)?;

        let timestamp = SESSION_EPOCH
            .get()
            .ok_or(SessionError::CannotGetEpoch)?
            .format(TIMESTAMP_FORMAT);

        let session_root = parent
            .as_ref()
            .join(format!("{}_{}", exec_name, timestamp));
        let arch_root = session_root.join("arch");

        fs::create_dir_all(&arch_root).map_err(SessionError::CannotCreateDir)?;

        let log_file_path = session_root.join(format!("{}.log", exec_name));

        // Archive writes happen on a background thread so motion dispatch is
        // never held up by the filesystem.
        let (tx, rx) = channel();
        let save_stop = Arc::new(AtomicBool::new(false));

        let stop = save_stop.clone();
        let thread_arch_root = arch_root.clone();
        thread::spawn(move || save_thread(stop, thread_arch_root, rx));

        Ok(Session {
            session_root,
            arch_root,
            log_file_path,
            save_sender: tx,
            save_stop,
        })
    }

    /// Exit the session, waiting for the save thread to finish any pending actions
    pub fn exit(self) {
        self.save_stop.store(true, Ordering::Relaxed);

        info!("Stopping save thread");

        // The save thread clears the flag once the queue is drained
        while self.save_stop.load(Ordering::Relaxed) {
            thread::sleep(SAVE_IDLE_PERIOD);
        }

        info!("Save thread exited");
    }

    /// Saves the given data to the given archive-relative path in a background thread.
    ///
    /// Only `.json` paths are supported.
    pub fn save<P: AsRef<Path>, T: Serialize + Send + 'static>(&self, path: P, data: T) {
        if let Err(e) = self
            .save_sender
            .send((path.as_ref().to_path_buf(), Box::new(data)))
        {
            warn!(
                "Could not send data to be saved to path {:?}: {}",
                path.as_ref(),
                e
            )
        }
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Get the number of seconds elapsed since the start of the session.
///
/// Returns `0.0` if no session has been started, so log lines emitted before
/// the session exists (or from unit tests) still format.
pub fn get_elapsed_seconds() -> f64 {
    match SESSION_EPOCH.get() {
        Some(e) => time::duration_to_seconds(Utc::now() - *e).unwrap_or(std::f64::NAN),
        None => 0.0,
    }
}

/// Return a reference to the session's epoch.
///
/// # Panics
/// - This function will panic if the session epoch has not been
///   initialised, which is performed on creating a new Session instance.
pub fn get_epoch() -> &'static DateTime<Utc> {
    match SESSION_EPOCH.get() {
        Some(e) => e,
        None => panic!("Cannot get the session epoch!"),
    }
}

// -----------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// -----------------------------------------------------------------------------------------------

fn save_thread(stop: Arc<AtomicBool>, arch_root: PathBuf, receiver: Receiver<SaveItem>) {
    loop {
        match receiver.try_recv() {
            Ok((path, data)) => write_json(&arch_root.join(path), &data),
            Err(_) => {
                // Queue is drained, acknowledge a stop request by clearing the flag
                if stop.load(Ordering::Relaxed) {
                    stop.store(false, Ordering::Relaxed);
                    return;
                }
                thread::sleep(SAVE_IDLE_PERIOD);
            }
        }
    }
}

fn write_json(full_path: &Path, data: &Box<dyn Serialize + Send>) {
    match full_path.extension().and_then(|s| s.to_str()) {
        Some("json") => {
            if let Some(parent) = full_path.parent() {
                if let Err(e) = fs::create_dir_all(parent) {
                    warn!("Couldn't create parent directory for {:?}: {}", full_path, e);
                    return;
                }
            }

            let file = match OpenOptions::new()
                .write(true)
                .truncate(true)
                .create(true)
                .open(full_path)
            {
                Ok(f) => f,
                Err(e) => {
                    warn!("Couldn't create file {:?}: {}", full_path, e);
                    return;
                }
            };

            if let Err(e) = serde_json::to_writer_pretty(&file, data) {
                warn!("Couldn't serialize data for file {:?}: {}", full_path, e);
            }
        }
        ext => warn!(
            "Unrecognised file path extension for {:?} (got {:?})",
            full_path, ext
        ),
    }
}
