//! Simulated manipulator equipment
//!
//! Joints move instantly to their demands. Every command is recorded in a
//! journal so the order of dispatched motions can be inspected.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use comms_if::eqpt::{EqptError, ManipDems, PhysJointId, PhysJointPositions};
use log::trace;
use serde::Serialize;

use super::ManipEqpt;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A command received by the simulated equipment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum EqptCall {
    SwitchToManipulation,
    Joints(ManipDems),
    Gripper(f64),
    PanTilt(f64, f64),
    Navigate([f64; 3]),
}

/// In-memory manipulator equipment.
#[derive(Debug, Clone, Default)]
pub struct SimManipEqpt {
    joints: PhysJointPositions,
    gripper: f64,
    pan_tilt: (f64, f64),
    base_pose: [f64; 3],
    manip_mode: bool,

    /// Added to the reported wrist pitch.
    ///
    /// Units: radians
    pitch_drift_rad: f64,

    /// Gripper openings below this are blocked by the held object.
    object_width: Option<f64>,

    /// Index of the joint command which will be rejected.
    fail_joint_cmd: Option<usize>,

    /// Number of joint commands received so far.
    num_joint_cmds: usize,

    journal: Vec<EqptCall>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SimManipEqpt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the given joint positions.
    pub fn with_joints(mut self, joints: PhysJointPositions) -> Self {
        self.joints = joints;
        self
    }

    /// Report the wrist pitch offset by `drift_rad`.
    pub fn with_pitch_drift(mut self, drift_rad: f64) -> Self {
        self.pitch_drift_rad = drift_rad;
        self
    }

    /// Place an object of the given width between the fingers.
    pub fn with_object_width(mut self, width: f64) -> Self {
        self.object_width = Some(width);
        self
    }

    /// Reject the `n`th (zero based) joint command.
    pub fn fail_joint_cmd(mut self, n: usize) -> Self {
        self.fail_joint_cmd = Some(n);
        self
    }

    /// Every command received, oldest first.
    pub fn journal(&self) -> &[EqptCall] {
        &self.journal
    }

    /// Only the joint demands received, oldest first.
    pub fn joint_dems(&self) -> Vec<ManipDems> {
        self.journal
            .iter()
            .filter_map(|c| match c {
                EqptCall::Joints(d) => Some(*d),
                _ => None,
            })
            .collect()
    }

    /// True joint positions, without any drift.
    pub fn joints(&self) -> PhysJointPositions {
        self.joints
    }

    pub fn pan_tilt(&self) -> (f64, f64) {
        self.pan_tilt
    }

    pub fn base_pose(&self) -> [f64; 3] {
        self.base_pose
    }

    pub fn in_manip_mode(&self) -> bool {
        self.manip_mode
    }
}

impl ManipEqpt for SimManipEqpt {
    fn switch_to_manipulation_mode(&mut self) -> Result<(), EqptError> {
        self.journal.push(EqptCall::SwitchToManipulation);
        self.manip_mode = true;
        Ok(())
    }

    fn get_joint_positions(&mut self) -> Result<PhysJointPositions, EqptError> {
        let mut joints = self.joints;
        joints[PhysJointId::WristPitch] += self.pitch_drift_rad;
        Ok(joints)
    }

    fn goto_joint_positions(
        &mut self,
        positions: &PhysJointPositions,
        relative: bool,
    ) -> Result<(), EqptError> {
        let dems = ManipDems {
            positions: *positions,
            relative,
        };
        self.journal.push(EqptCall::Joints(dems));

        let n = self.num_joint_cmds;
        self.num_joint_cmds += 1;

        if !self.manip_mode {
            return Err(EqptError::DemsRejected(
                "Not in manipulation mode".to_string(),
            ));
        }
        if self.fail_joint_cmd == Some(n) {
            return Err(EqptError::Comms(format!("Injected fault on command {}", n)));
        }

        for id in PhysJointId::ALL.iter() {
            if relative {
                self.joints[*id] += positions[*id];
            } else {
                self.joints[*id] = positions[*id];
            }
        }

        trace!("Sim joints now {:?}", self.joints);

        Ok(())
    }

    fn move_gripper(&mut self, opening: f64) -> Result<(), EqptError> {
        self.journal.push(EqptCall::Gripper(opening));

        self.gripper = match self.object_width {
            Some(w) if opening < w => w,
            _ => opening,
        };

        Ok(())
    }

    fn get_gripper_position(&mut self) -> Result<f64, EqptError> {
        Ok(self.gripper)
    }

    fn get_pan_tilt(&mut self) -> Result<(f64, f64), EqptError> {
        Ok(self.pan_tilt)
    }

    fn set_pan_tilt(&mut self, pan: f64, tilt: f64) -> Result<(), EqptError> {
        self.journal.push(EqptCall::PanTilt(pan, tilt));
        self.pan_tilt = (pan, tilt);
        Ok(())
    }

    fn navigate_to(&mut self, xyt: [f64; 3]) -> Result<(), EqptError> {
        self.journal.push(EqptCall::Navigate(xyt));

        // Goals are relative to the base frame
        let (s, c) = self.base_pose[2].sin_cos();
        self.base_pose[0] += c * xyt[0] - s * xyt[1];
        self.base_pose[1] += s * xyt[0] + c * xyt[1];
        self.base_pose[2] += xyt[2];

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_joint_moves() {
        let mut eqpt = SimManipEqpt::new();

        // Rejected until switched into manipulation mode
        assert!(eqpt
            .goto_joint_positions(&PhysJointPositions([1.0; 6]), false)
            .is_err());

        eqpt.switch_to_manipulation_mode().unwrap();
        eqpt.goto_joint_positions(&PhysJointPositions([0.0, 0.5, 0.2, 0.0, 0.0, 0.0]), false)
            .unwrap();
        eqpt.goto_joint_positions(&PhysJointPositions([0.0, 0.1, 0.0, 0.0, 0.0, 0.0]), true)
            .unwrap();

        assert_eq!(eqpt.joints()[PhysJointId::Lift], 0.6);
        assert_eq!(eqpt.joints()[PhysJointId::ArmExtension], 0.2);
        assert_eq!(eqpt.joint_dems().len(), 3);
    }

    #[test]
    fn test_faults_and_drift() {
        let mut eqpt = SimManipEqpt::new().with_pitch_drift(0.05).fail_joint_cmd(1);
        eqpt.switch_to_manipulation_mode().unwrap();

        let p = PhysJointPositions([0.0, 0.0, 0.0, 0.0, -0.5, 0.0]);
        eqpt.goto_joint_positions(&p, false).unwrap();
        assert!(matches!(
            eqpt.goto_joint_positions(&p, false),
            Err(EqptError::Comms(_))
        ));

        let reported = eqpt.get_joint_positions().unwrap();
        assert!((reported[PhysJointId::WristPitch] + 0.45).abs() < 1e-12);
    }

    #[test]
    fn test_gripper_object() {
        let mut eqpt = SimManipEqpt::new().with_object_width(0.12);

        eqpt.move_gripper(0.2).unwrap();
        assert_eq!(eqpt.get_gripper_position().unwrap(), 0.2);
        eqpt.move_gripper(0.05).unwrap();
        assert_eq!(eqpt.get_gripper_position().unwrap(), 0.12);
    }
}
