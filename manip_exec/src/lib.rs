//! # Manipulator library.
//!
//! This library allows other crates in the workspace (and the benchmarks) to
//! access items defined inside the manipulator crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Equipment client - reads and commands the manipulator's actuators
pub mod eqpt_client;

/// Frame transforms - relative poses between any two robot frames
pub mod frame_tf;

/// Joint state - named joint values decoupled from the physical joint vector
pub mod joint_state;

/// Kinematic model - joint chains, forward and inverse kinematics
pub mod kin_model;

/// Motion control - turns targets into ordered equipment demands
pub mod motion_ctrl;

/// Executable parameters
pub mod params;
