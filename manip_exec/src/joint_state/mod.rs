//! # Joint state
//!
//! The named joint state used by the kinematic chains, decoupled from the
//! equipment's physical joint vector. The telescoping arm is reported by the
//! equipment as a single extension but appears in the robot description as
//! four equal virtual segments.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod state;
mod targets;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use state::*;
pub use targets::*;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Number of virtual segments the arm extension is split into.
pub const NUM_ARM_SEGMENTS: usize = 4;

/// Number of named joints.
pub const NUM_JOINTS: usize = 13;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The named joints of the manipulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum JointId {
    /// Virtual joint for the base translation along base X.
    BaseTranslation,
    Lift,
    ArmL3,
    ArmL2,
    ArmL1,
    ArmL0,
    WristYaw,
    WristPitch,
    WristRoll,
    GripperFingerLeft,
    GripperFingerRight,
    HeadPan,
    HeadTilt,
}

/// The physical arm extension.
///
/// Units: meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct ArmExtension(pub f64);

/// Possible errors in the joint state.
#[derive(Debug, thiserror::Error)]
pub enum JointStateError {
    #[error("Unknown joint {0:?}")]
    UnknownJoint(String),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl JointId {
    /// All joints in reporting order.
    pub const ALL: [JointId; NUM_JOINTS] = [
        JointId::BaseTranslation,
        JointId::Lift,
        JointId::ArmL3,
        JointId::ArmL2,
        JointId::ArmL1,
        JointId::ArmL0,
        JointId::WristYaw,
        JointId::WristPitch,
        JointId::WristRoll,
        JointId::GripperFingerLeft,
        JointId::GripperFingerRight,
        JointId::HeadPan,
        JointId::HeadTilt,
    ];

    /// The arm segments, from the lift outwards.
    pub const ARM_SEGMENTS: [JointId; NUM_ARM_SEGMENTS] =
        [JointId::ArmL3, JointId::ArmL2, JointId::ArmL1, JointId::ArmL0];

    /// Name of the joint in the robot description.
    pub fn name(self) -> &'static str {
        match self {
            JointId::BaseTranslation => "joint_fake",
            JointId::Lift => "joint_lift",
            JointId::ArmL3 => "joint_arm_l3",
            JointId::ArmL2 => "joint_arm_l2",
            JointId::ArmL1 => "joint_arm_l1",
            JointId::ArmL0 => "joint_arm_l0",
            JointId::WristYaw => "joint_wrist_yaw",
            JointId::WristPitch => "joint_wrist_pitch",
            JointId::WristRoll => "joint_wrist_roll",
            JointId::GripperFingerLeft => "joint_gripper_finger_left",
            JointId::GripperFingerRight => "joint_gripper_finger_right",
            JointId::HeadPan => "joint_head_pan",
            JointId::HeadTilt => "joint_head_tilt",
        }
    }

    pub fn is_arm_segment(self) -> bool {
        Self::ARM_SEGMENTS.contains(&self)
    }
}

impl FromStr for JointId {
    type Err = JointStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|id| id.name() == s)
            .ok_or_else(|| JointStateError::UnknownJoint(s.to_string()))
    }
}

impl fmt::Display for JointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl ArmExtension {
    /// Merge segment values into the physical extension.
    pub fn from_segments(segments: &[f64; NUM_ARM_SEGMENTS]) -> Self {
        // Pairwise so equal segments merge back exactly
        Self((segments[0] + segments[1]) + (segments[2] + segments[3]))
    }

    /// Split the extension into equal segment values.
    pub fn to_segments(self) -> [f64; NUM_ARM_SEGMENTS] {
        [self.segment(); NUM_ARM_SEGMENTS]
    }

    /// Value of a single segment.
    pub fn segment(self) -> f64 {
        self.0 / NUM_ARM_SEGMENTS as f64
    }

    pub fn meters(self) -> f64 {
        self.0
    }
}
