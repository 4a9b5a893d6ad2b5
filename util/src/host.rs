//! Host platform utility functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::env;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Environment variable holding the root directory of the software checkout.
///
/// Parameter files are found in `$MANIP_SW_ROOT/params` and sessions are
/// created in `$MANIP_SW_ROOT/sessions`.
pub const SW_ROOT_ENV_VAR: &str = "MANIP_SW_ROOT";

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Get the software root directory from the environment.
pub fn get_sw_root() -> Result<PathBuf, env::VarError> {
    env::var(SW_ROOT_ENV_VAR).map(PathBuf::from)
}

/// Describe the host this exec is running on, used in the startup banner.
pub fn describe() -> String {
    format!(
        "{} ({}, {} family)",
        env::consts::OS,
        env::consts::ARCH,
        env::consts::FAMILY
    )
}
