//! # Frame transforms
//!
//! Relative transforms between any two frames of the robot at its current
//! joint state. Each frame is located through its own chain from the root
//! link, so camera frames are resolved through the head joints and gripper
//! frames through the arm joints.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::debug;
use nalgebra::Point3;
use serde::Serialize;

use crate::eqpt_client::ManipEqpt;
use crate::joint_state::JointState;
use crate::kin_model::{JointChain, Pose};
use crate::motion_ctrl::{MotionCtrl, MotionCtrlError};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The transform between two frames.
#[derive(Debug, Clone, Serialize)]
pub struct FrameTransform {
    /// Takes points in frame A into frame B.
    pub relative: Pose,

    /// Pose of frame B in the root frame.
    pub pose_b: Pose,

    /// Pose of frame A in the root frame.
    pub pose_a: Pose,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<E: ManipEqpt> MotionCtrl<E> {
    /// Transform between two frames at the current joint state.
    pub fn transform_between(
        &mut self,
        frame_a: &str,
        frame_b: &str,
    ) -> Result<FrameTransform, MotionCtrlError> {
        let state = self.refresh()?;

        let pose_a = self.frame_pose(&state, frame_a)?;
        let pose_b = self.frame_pose(&state, frame_b)?;
        let relative = pose_b.inverse() * pose_a;

        debug!("Transform {} -> {}: {:?}", frame_a, frame_b, relative);

        Ok(FrameTransform {
            relative,
            pose_b,
            pose_a,
        })
    }

    /// Express a point given in `frame_a` in `frame_b`.
    pub fn transform_point(
        &mut self,
        frame_a: &str,
        frame_b: &str,
        point: &Point3<f64>,
    ) -> Result<Point3<f64>, MotionCtrlError> {
        Ok(self.transform_between(frame_a, frame_b)?.relative * point)
    }

    /// Pose of a frame in the root frame.
    fn frame_pose(&self, state: &JointState, frame: &str) -> Result<Pose, MotionCtrlError> {
        let chain = JointChain::build(&self.description, &self.params.root_link, frame)?;
        let q = state.chain_values(&chain)?;

        Ok(chain.forward(&q)?)
    }
}

#[cfg(test)]
mod test {
    use crate::eqpt_client::SimManipEqpt;
    use crate::kin_model::{JointChain, KinModelError};
    use crate::motion_ctrl::{fixtures, MotionCtrlError, MotionTarget};
    use approx::assert_relative_eq;
    use comms_if::eqpt::PhysJointPositions;
    use nalgebra::{Isometry3, Point3};

    #[test]
    fn test_same_frame_is_identity() {
        let eqpt =
            SimManipEqpt::new().with_joints(PhysJointPositions([0.3, 0.6, 0.2, 0.4, -0.5, 0.1]));
        let mut ctrl = fixtures::ctrl(eqpt);

        for frame in &["link_grasp_center", "camera_color_optical_frame", "base_link"] {
            let tf = ctrl.transform_between(frame, frame).unwrap();
            assert_relative_eq!(tf.relative, Isometry3::identity(), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_camera_to_gripper() {
        let eqpt =
            SimManipEqpt::new().with_joints(PhysJointPositions([0.3, 0.6, 0.2, 0.4, -0.5, 0.1]));
        let mut ctrl = fixtures::ctrl(eqpt);
        ctrl.move_to_position(&MotionTarget {
            head_pan: Some(-1.2),
            head_tilt: Some(-0.6),
            ..Default::default()
        })
        .unwrap();

        let tf = ctrl
            .transform_between("camera_color_optical_frame", "link_grasp_center")
            .unwrap();

        // The origin of the camera lands where the camera is, seen from the
        // gripper
        let p = tf.relative * Point3::origin();
        let expected = tf.pose_b.inverse() * Point3::from(tf.pose_a.translation.vector);
        assert_relative_eq!(p, expected, epsilon = 1e-12);

        // Both directions compose to the identity
        let back = ctrl
            .transform_between("link_grasp_center", "camera_color_optical_frame")
            .unwrap();
        assert_relative_eq!(
            back.relative * tf.relative,
            Isometry3::identity(),
            epsilon = 1e-9
        );

        // The camera is located through the head joints
        let head = JointChain::build(
            ctrl.description(),
            "base_link",
            "camera_color_optical_frame",
        )
        .unwrap();
        let camera = head.forward(&[0.3, -1.2, -0.6]).unwrap();
        assert_relative_eq!(tf.pose_a, camera, epsilon = 1e-12);

        let point = ctrl
            .transform_point("base_link", "link_grasp_center", &Point3::origin())
            .unwrap();
        assert_relative_eq!(point, tf.pose_b.inverse() * Point3::origin(), epsilon = 1e-12);
    }

    #[test]
    fn test_unknown_frame() {
        let mut ctrl = fixtures::ctrl(SimManipEqpt::new());

        assert!(matches!(
            ctrl.transform_between("link_grasp_center", "link_tail"),
            Err(MotionCtrlError::KinModel(KinModelError::ChainNotFound { .. }))
        ));
    }
}
