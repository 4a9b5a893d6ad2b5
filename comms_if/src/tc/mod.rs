//! # Telecommand module
//!
//! Telecommands are instructions given to the manipulator, either on the
//! command line or as a JSON script of several commands.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod manip;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use thiserror::Error;

// ---------------------------------------------------------------------------
// EXPORTS
// ---------------------------------------------------------------------------

pub use manip::ManipCmd;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible parsing errors.
#[derive(Debug, Error)]
pub enum TcParseError {
    #[error("TC contains invalid JSON: {0}")]
    InvalidJson(serde_json::Error),

    #[error("The script contains no telecommands")]
    EmptyScript,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Parse a script, a JSON array of manipulator telecommands.
pub fn parse_script(json_str: &str) -> Result<Vec<ManipCmd>, TcParseError> {
    let cmds: Vec<ManipCmd> = serde_json::from_str(json_str).map_err(TcParseError::InvalidJson)?;

    if cmds.is_empty() {
        return Err(TcParseError::EmptyScript);
    }

    Ok(cmds)
}
