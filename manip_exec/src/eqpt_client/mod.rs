//! # Equipment client
//!
//! The narrow interface through which motion control reads and commands the
//! manipulator's actuators.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod sim;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use comms_if::eqpt::{EqptError, PhysJointPositions};

pub use sim::*;

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// Access to the manipulator equipment.
///
/// Errors are passed up unchanged and never retried.
pub trait ManipEqpt {
    /// Put the robot into the mode where the arm and lift can be commanded.
    fn switch_to_manipulation_mode(&mut self) -> Result<(), EqptError>;

    /// Current physical joint positions.
    fn get_joint_positions(&mut self) -> Result<PhysJointPositions, EqptError>;

    /// Command the physical joints, either absolutely or as offsets from
    /// their current positions.
    fn goto_joint_positions(
        &mut self,
        positions: &PhysJointPositions,
        relative: bool,
    ) -> Result<(), EqptError>;

    /// Command the gripper opening.
    fn move_gripper(&mut self, opening: f64) -> Result<(), EqptError>;

    /// Current gripper opening.
    fn get_gripper_position(&mut self) -> Result<f64, EqptError>;

    /// Current head pan and tilt.
    ///
    /// Units: radians
    fn get_pan_tilt(&mut self) -> Result<(f64, f64), EqptError>;

    /// Units: radians
    fn set_pan_tilt(&mut self, pan: f64, tilt: f64) -> Result<(), EqptError>;

    /// Drive the base to `[x, y, theta]` relative to its current pose.
    fn navigate_to(&mut self, xyt: [f64; 3]) -> Result<(), EqptError>;

    /// True once the last commanded motion has finished.
    ///
    /// Equipment which can't tell reports settled straight away.
    fn is_settled(&mut self) -> Result<bool, EqptError> {
        Ok(true)
    }
}
