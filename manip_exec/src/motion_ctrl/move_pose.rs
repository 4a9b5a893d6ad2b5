//! Cartesian pose moves

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::debug;
use serde::Serialize;

use super::{MotionCtrl, MotionCtrlError, MotionReport, MoveMode};
use crate::eqpt_client::ManipEqpt;
use crate::joint_state::JointTargets;
use crate::kin_model::{pose_from_xyz_intrinsic, IkSolution, Pose};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The result of a pose move.
#[derive(Debug, Clone, Serialize)]
pub struct PoseMotionReport {
    /// End link pose before the move, in the root frame.
    pub start_pose: Pose,

    /// Requested end link pose, in the root frame.
    pub target_pose: Pose,

    pub ik: IkSolution,

    pub motion: MotionReport,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<E: ManipEqpt> MotionCtrl<E> {
    /// Pose of the end link in the root frame, from a fresh joint state.
    pub fn current_pose(&mut self) -> Result<Pose, MotionCtrlError> {
        let state = self.refresh()?;
        let q = state.chain_values(&self.arm_chain)?;

        Ok(self.arm_chain.forward(&q)?)
    }

    /// Move the end link by a translation and rotation given in its own frame.
    ///
    /// The rotation is intrinsic X-Y-Z Euler angles, each turn about the
    /// already rotated axes: `R = Rx(roll) * Ry(pitch) * Rz(yaw)`.
    pub fn move_to_pose(
        &mut self,
        translation: [f64; 3],
        rotation_rpy: [f64; 3],
        mode: MoveMode,
    ) -> Result<PoseMotionReport, MotionCtrlError> {
        let start_pose = self.current_pose()?;
        let target_pose = start_pose * pose_from_xyz_intrinsic(translation, rotation_rpy);

        debug!(
            "Pose target for {:?}: {:?}",
            self.arm_chain.end_frame(),
            target_pose
        );

        let seed = vec![0.0; self.arm_chain.len()];
        let ik = self
            .arm_chain
            .inverse(&seed, &target_pose, &self.params.ik)?;

        let targets = JointTargets::from_chain(&self.arm_chain, &ik.joint_values)?;
        let motion = self.move_to_joints(&targets, mode)?;

        self.refresh()?;

        Ok(PoseMotionReport {
            start_pose,
            target_pose,
            ik,
            motion,
        })
    }
}

#[cfg(test)]
mod test {
    use super::super::{fixtures, MotionPhase};
    use super::*;
    use crate::eqpt_client::SimManipEqpt;
    use approx::assert_relative_eq;
    use comms_if::eqpt::{PhysJointId, PhysJointPositions};
    use nalgebra::{UnitQuaternion, Vector3};

    #[test]
    fn test_raise_gripper() {
        let mut ctrl = fixtures::ctrl(SimManipEqpt::new());

        let report = ctrl
            .move_to_pose([0.0, 0.0, 0.1], [0.0; 3], MoveMode::Direct)
            .unwrap();

        assert_relative_eq!(
            report.target_pose.translation.vector - report.start_pose.translation.vector,
            Vector3::new(0.0, 0.0, 0.1),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            ctrl.eqpt().joints()[PhysJointId::Lift],
            0.1,
            epsilon = 1e-5
        );
        assert_relative_eq!(
            ctrl.joint_state().lift,
            0.1,
            epsilon = 1e-5
        );

        // The pose was reached
        let reached = ctrl.current_pose().unwrap();
        assert_relative_eq!(
            reached.translation.vector,
            report.target_pose.translation.vector,
            epsilon = 1e-4
        );
    }

    #[test]
    fn test_staged_pose() {
        let mut ctrl = fixtures::ctrl(SimManipEqpt::new());

        let report = ctrl
            .move_to_pose([0.0, -0.05, 0.2], [0.0, -0.3, 0.0], MoveMode::Staged)
            .unwrap();

        assert_eq!(
            report.motion.phases,
            vec![MotionPhase::LiftOnly, MotionPhase::Combined]
        );

        let reached = ctrl.current_pose().unwrap();
        assert_relative_eq!(
            reached.translation.vector,
            report.target_pose.translation.vector,
            epsilon = 1e-4
        );
        assert!(reached.rotation.angle_to(&report.target_pose.rotation) < 1e-4);
    }

    #[test]
    fn test_roll_then_pitch() {
        let eqpt =
            SimManipEqpt::new().with_joints(PhysJointPositions([0.0, 0.5, 0.2, 0.0, 0.0, 0.0]));
        let mut ctrl = fixtures::ctrl(eqpt);

        let (roll, pitch) = (-0.3, 0.2);
        let report = ctrl
            .move_to_pose([0.0; 3], [roll, pitch, 0.0], MoveMode::Direct)
            .unwrap();

        // Pitch is about the rolled Y axis
        let delta = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), roll)
            * UnitQuaternion::from_axis_angle(&Vector3::y_axis(), pitch);
        let expected = report.start_pose.rotation * delta;
        assert!(report.target_pose.rotation.angle_to(&expected) < 1e-6);

        let fixed_axis = report.start_pose.rotation
            * UnitQuaternion::from_euler_angles(roll, pitch, 0.0);
        assert!(report.target_pose.rotation.angle_to(&fixed_axis) > 1e-3);

        let reached = ctrl.current_pose().unwrap();
        assert!(reached.rotation.angle_to(&expected) < 1e-4);
        assert_relative_eq!(
            reached.translation.vector,
            report.start_pose.translation.vector,
            epsilon = 1e-4
        );
    }
}
