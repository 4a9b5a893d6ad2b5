//! Utility library for the manipulator software.
//!
//! Holds the ambient pieces every exec needs: logging, parameter loading,
//! session management and a handful of maths helpers.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod host;
#[macro_use]
pub mod logger;
pub mod maths;
pub mod module;
pub mod params;
pub mod session;
pub mod time;
