//! # Manipulator equipment interface
//!
//! The equipment reports and accepts its joints as a fixed 6-vector ordered
//! base translation, lift, arm extension, wrist yaw, wrist pitch, wrist roll.
//! The gripper and head are driven through separate calls.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Number of joints in the equipment's physical joint vector.
pub const NUM_PHYS_JOINTS: usize = 6;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Physical joint positions as reported by or demanded from the equipment.
///
/// Units: meters for the base translation, lift and arm extension, radians for
/// the wrist.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct PhysJointPositions(pub [f64; NUM_PHYS_JOINTS]);

/// Demands that are sent to the manipulator equipment.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ManipDems {
    /// The demanded joint positions.
    pub positions: PhysJointPositions,

    /// If true the positions are offsets from the current positions, otherwise
    /// they are absolute.
    pub relative: bool,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// IDs of the joints in the physical joint vector, in vector order.
#[derive(Serialize, Deserialize, Debug, Hash, Eq, PartialEq, Copy, Clone)]
pub enum PhysJointId {
    BaseTranslation,
    Lift,
    ArmExtension,
    WristYaw,
    WristPitch,
    WristRoll,
}

/// Errors reported across the equipment boundary.
///
/// These are opaque to the control layer, it passes them up unchanged.
#[derive(thiserror::Error, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum EqptError {
    #[error("The equipment is not connected")]
    NotConnected,

    #[error("The equipment rejected the demands: {0}")]
    DemsRejected(String),

    #[error("The equipment is invalid so demands cannot be actuated")]
    EqptInvalid,

    #[error("Communication with the equipment failed: {0}")]
    Comms(String),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl PhysJointId {
    /// All ids in vector order.
    pub const ALL: [PhysJointId; NUM_PHYS_JOINTS] = [
        PhysJointId::BaseTranslation,
        PhysJointId::Lift,
        PhysJointId::ArmExtension,
        PhysJointId::WristYaw,
        PhysJointId::WristPitch,
        PhysJointId::WristRoll,
    ];

    /// Index of this joint in the physical joint vector.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl PhysJointPositions {
    /// All joints at zero, also the "no motion" relative demand.
    pub fn zeros() -> Self {
        Self::default()
    }

    /// Build from a slice, returning `None` if it isn't exactly
    /// [`NUM_PHYS_JOINTS`] long.
    pub fn from_slice(values: &[f64]) -> Option<Self> {
        if values.len() != NUM_PHYS_JOINTS {
            return None;
        }

        let mut arr = [0.0; NUM_PHYS_JOINTS];
        arr.copy_from_slice(values);
        Some(Self(arr))
    }
}

impl Index<PhysJointId> for PhysJointPositions {
    type Output = f64;

    fn index(&self, id: PhysJointId) -> &f64 {
        &self.0[id.index()]
    }
}

impl IndexMut<PhysJointId> for PhysJointPositions {
    fn index_mut(&mut self, id: PhysJointId) -> &mut f64 {
        &mut self.0[id.index()]
    }
}

impl ManipDems {
    /// Absolute position demands.
    pub fn absolute(positions: PhysJointPositions) -> Self {
        Self {
            positions,
            relative: false,
        }
    }

    /// Relative position demands.
    pub fn relative(positions: PhysJointPositions) -> Self {
        Self {
            positions,
            relative: true,
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_index_order() {
        let p = PhysJointPositions([0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);

        for (i, id) in PhysJointId::ALL.iter().enumerate() {
            assert_eq!(p[*id], i as f64);
        }
    }

    #[test]
    fn test_from_slice() {
        assert!(PhysJointPositions::from_slice(&[0.0; 5]).is_none());
        assert_eq!(
            PhysJointPositions::from_slice(&[1.0; 6]),
            Some(PhysJointPositions([1.0; 6]))
        );
    }
}
