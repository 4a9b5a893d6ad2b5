//! Joint state cache

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use comms_if::eqpt::{PhysJointId, PhysJointPositions};
use serde::{Deserialize, Serialize};

use super::{ArmExtension, JointId, JointStateError};
use crate::kin_model::JointChain;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A consistent snapshot of everything the equipment reports about the
/// joints.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct EqptSnapshot {
    pub joints: PhysJointPositions,

    /// Units: radians
    pub head_pan: f64,

    /// Units: radians
    pub head_tilt: f64,
}

/// The named joint state.
///
/// Units: meters for the base translation, lift and arm, radians otherwise.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct JointState {
    pub base_translation: f64,
    pub lift: f64,
    pub arm: ArmExtension,
    pub wrist_yaw: f64,
    pub wrist_pitch: f64,
    pub wrist_roll: f64,
    pub head_pan: f64,
    pub head_tilt: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl JointState {
    /// Rewrite the whole state from an equipment snapshot.
    ///
    /// If `pitch_override` is set it replaces the reported wrist pitch, which
    /// drifts on the real hardware.
    pub fn refresh(&mut self, snapshot: &EqptSnapshot, pitch_override: Option<f64>) {
        let j = &snapshot.joints;

        *self = Self {
            base_translation: j[PhysJointId::BaseTranslation],
            lift: j[PhysJointId::Lift],
            arm: ArmExtension(j[PhysJointId::ArmExtension]),
            wrist_yaw: j[PhysJointId::WristYaw],
            wrist_pitch: pitch_override.unwrap_or(j[PhysJointId::WristPitch]),
            wrist_roll: j[PhysJointId::WristRoll],
            head_pan: snapshot.head_pan,
            head_tilt: snapshot.head_tilt,
        };
    }

    /// Value of a joint.
    ///
    /// Each arm segment holds a quarter of the arm extension, the fingers
    /// always read zero.
    pub fn get(&self, id: JointId) -> f64 {
        match id {
            JointId::BaseTranslation => self.base_translation,
            JointId::Lift => self.lift,
            JointId::ArmL3 | JointId::ArmL2 | JointId::ArmL1 | JointId::ArmL0 => {
                self.arm.segment()
            }
            JointId::WristYaw => self.wrist_yaw,
            JointId::WristPitch => self.wrist_pitch,
            JointId::WristRoll => self.wrist_roll,
            JointId::GripperFingerLeft | JointId::GripperFingerRight => 0.0,
            JointId::HeadPan => self.head_pan,
            JointId::HeadTilt => self.head_tilt,
        }
    }

    /// Value of a joint by name.
    pub fn read(&self, name: &str) -> Result<f64, JointStateError> {
        Ok(self.get(name.parse()?))
    }

    /// Joint values for a chain, in chain order.
    pub fn chain_values(&self, chain: &JointChain) -> Result<Vec<f64>, JointStateError> {
        chain
            .joint_names()
            .into_iter()
            .map(|name| self.read(name))
            .collect()
    }

    /// Names and values of every joint in reporting order.
    pub fn named_values(&self) -> (Vec<String>, Vec<f64>) {
        JointId::ALL
            .iter()
            .map(|id| (id.name().to_string(), self.get(*id)))
            .unzip()
    }

    /// The physical joint vector this state corresponds to.
    pub fn phys_positions(&self) -> PhysJointPositions {
        let mut p = PhysJointPositions::zeros();

        p[PhysJointId::BaseTranslation] = self.base_translation;
        p[PhysJointId::Lift] = self.lift;
        p[PhysJointId::ArmExtension] = self.arm.meters();
        p[PhysJointId::WristYaw] = self.wrist_yaw;
        p[PhysJointId::WristPitch] = self.wrist_pitch;
        p[PhysJointId::WristRoll] = self.wrist_roll;

        p
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::kin_model::{fixtures, JointChain};

    fn snapshot() -> EqptSnapshot {
        EqptSnapshot {
            joints: PhysJointPositions([0.2, 0.6, 0.4, 0.1, -0.3, 0.05]),
            head_pan: -1.2,
            head_tilt: -0.5,
        }
    }

    #[test]
    fn test_refresh() {
        let mut state = JointState::default();
        state.refresh(&snapshot(), None);

        assert_eq!(state.read("joint_fake").unwrap(), 0.2);
        assert_eq!(state.read("joint_lift").unwrap(), 0.6);
        for seg in JointId::ARM_SEGMENTS.iter() {
            assert_eq!(state.get(*seg), 0.1);
        }
        assert_eq!(state.read("joint_wrist_pitch").unwrap(), -0.3);
        assert_eq!(state.read("joint_gripper_finger_left").unwrap(), 0.0);
        assert_eq!(state.read("joint_head_pan").unwrap(), -1.2);
        assert_eq!(state.phys_positions(), snapshot().joints);

        assert!(matches!(
            state.read("joint_elbow"),
            Err(JointStateError::UnknownJoint(_))
        ));
    }

    #[test]
    fn test_pitch_override() {
        let mut state = JointState::default();

        state.refresh(&snapshot(), Some(-0.8));
        assert_eq!(state.wrist_pitch, -0.8);

        // Everything else still comes from the snapshot
        assert_eq!(state.wrist_yaw, 0.1);
    }

    #[test]
    fn test_chain_values() {
        let desc = fixtures::stretch();
        let mut state = JointState::default();
        state.refresh(&snapshot(), None);

        let tip = JointChain::build(&desc, "base_link", "link_gripper_fingertip_left").unwrap();
        assert_eq!(
            state.chain_values(&tip).unwrap(),
            vec![0.2, 0.6, 0.1, 0.1, 0.1, 0.1, 0.1, -0.3, 0.05, 0.0]
        );

        let head = JointChain::build(&desc, "base_link", "camera_link").unwrap();
        assert_eq!(state.chain_values(&head).unwrap(), vec![0.2, -1.2, -0.5]);

        let (names, values) = state.named_values();
        assert_eq!(names.len(), 13);
        assert_eq!(values.len(), 13);
        assert_eq!(names[10], "joint_gripper_finger_right");
    }
}
