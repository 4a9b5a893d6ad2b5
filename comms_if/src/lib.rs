//! # Communications interface crate.
//!
//! Provides the interface types shared between the manipulator exec and the
//! things either side of it: telecommands coming in, equipment demands going
//! out.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Telecommand definitions
pub mod tc;

/// Demand and response definitions for equipment (the manipulator's actuators)
pub mod eqpt;
