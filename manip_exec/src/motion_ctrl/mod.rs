//! # Motion control module
//!
//! Turns joint, position and pose targets into an ordered sequence of
//! equipment demands. Targets are normalised and limited before dispatch, and
//! the lift can be moved on its own before the rest of the joints so the arm
//! never extends into something below it.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod grasp;
mod move_joints;
mod move_pose;
mod move_position;
mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use comms_if::eqpt::{EqptError, ManipDems};
use serde::{Deserialize, Serialize};

use crate::joint_state::JointStateError;
use crate::kin_model::KinModelError;

// Internal
pub use grasp::*;
pub use move_joints::*;
pub use move_pose::*;
pub use move_position::*;
pub use params::*;
pub use state::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// How a joint move is sequenced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveMode {
    /// All joints are commanded together.
    Direct,

    /// The lift is moved on its own first, then all joints together.
    Staged,
}

/// A dispatched part of a motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionPhase {
    /// Relative move of the lift only.
    LiftOnly,

    /// Absolute move of all physical joints.
    Combined,

    Gripper,
    Head,
    BaseRotation,
}

/// Possible errors that can occur during MotionCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum MotionCtrlError {
    #[error("Kinematic model error: {0}")]
    KinModel(#[from] KinModelError),

    #[error("Joint state error: {0}")]
    JointState(#[from] JointStateError),

    #[error("Equipment error: {0}")]
    Eqpt(#[from] EqptError),

    #[error("Motion stopped after completing {completed:?}: {source}")]
    PartialMotion {
        completed: Vec<MotionPhase>,
        source: Box<MotionCtrlError>,
    },
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Status of the last processed command.
#[derive(Clone, Copy, Default, Serialize, Deserialize, Debug, PartialEq)]
pub struct StatusReport {
    pub lift_limited: bool,
    pub arm_limited: bool,
    pub pitch_limited: bool,
    pub settle_timed_out: bool,
}

/// What a motion dispatched, in order.
#[derive(Clone, Default, Serialize, Deserialize, Debug, PartialEq)]
pub struct MotionReport {
    pub phases: Vec<MotionPhase>,

    /// Joint demands sent to the equipment.
    pub dems: Vec<ManipDems>,

    pub status: StatusReport,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl MotionCtrlError {
    /// Wrap an error raised after some phases of a motion were dispatched.
    ///
    /// Errors raised before anything moved are returned unchanged.
    pub(crate) fn after<E: Into<MotionCtrlError>>(completed: &[MotionPhase], error: E) -> Self {
        let error = error.into();

        if completed.is_empty() {
            error
        } else {
            MotionCtrlError::PartialMotion {
                completed: completed.to_vec(),
                source: Box::new(error),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// TEST FIXTURES
// ---------------------------------------------------------------------------
