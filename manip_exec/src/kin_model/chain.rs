//! Joint chains and forward kinematics

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::trace;
use nalgebra::{DMatrix, Isometry3, Translation3, Unit, UnitQuaternion, Vector3};

use super::{JointKind, KinModelError, Pose, RobotDescription};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An actuated joint in a chain.
#[derive(Debug, Clone)]
pub struct ChainJoint {
    pub name: String,

    /// Transform from the previous joint's frame (after its motion) to this
    /// joint's frame, including any fixed joints in between.
    pub origin: Pose,

    /// Axis of motion in this joint's frame.
    pub axis: Unit<Vector3<f64>>,

    pub prismatic: bool,

    /// Units: radians or meters
    pub limits: [f64; 2],
}

/// An ordered chain of actuated joints from a root frame to an end frame.
///
/// Fixed joints are folded into the origin of the next actuated joint, any
/// trailing fixed joints into `end_offset`.
#[derive(Debug, Clone)]
pub struct JointChain {
    root: String,
    end: String,
    joints: Vec<ChainJoint>,
    end_offset: Pose,
}

/// Frames of each joint in the chain root frame, before the joint's own
/// motion is applied.
pub struct JointFrames {
    /// Position of each joint's origin.
    pub origins: Vec<Vector3<f64>>,

    /// Each joint's axis.
    pub axes: Vec<Vector3<f64>>,

    /// Pose of the end frame.
    pub end_pose: Pose,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl JointChain {
    /// Build the chain between two frames of the description.
    ///
    /// `root` must be an ancestor of `end` (or the same frame) otherwise
    /// `ChainNotFound` is returned.
    pub fn build(
        description: &RobotDescription,
        root: &str,
        end: &str,
    ) -> Result<Self, KinModelError> {
        let mut joints = Vec::new();
        let mut fixed = Isometry3::identity();

        for joint in description.path(root, end)? {
            if joint.kind.is_actuated() {
                joints.push(ChainJoint {
                    name: joint.name.clone(),
                    origin: fixed * joint.origin,
                    axis: joint.axis,
                    prismatic: joint.kind == JointKind::Prismatic,
                    limits: joint.limits,
                });
                fixed = Isometry3::identity();
            } else {
                fixed *= joint.origin;
            }
        }

        trace!(
            "Built chain {} -> {} with {} joints",
            root,
            end,
            joints.len()
        );

        Ok(Self {
            root: root.to_string(),
            end: end.to_string(),
            joints,
            end_offset: fixed,
        })
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn end_frame(&self) -> &str {
        &self.end
    }

    /// Number of actuated joints in the chain.
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    pub fn joints(&self) -> &[ChainJoint] {
        &self.joints
    }

    /// Joint names in chain order.
    pub fn joint_names(&self) -> Vec<&str> {
        self.joints.iter().map(|j| j.name.as_str()).collect()
    }

    /// Pose of the end frame in the root frame for the given joint values.
    pub fn forward(&self, joint_values: &[f64]) -> Result<Pose, KinModelError> {
        self.check_len(joint_values)?;

        let mut pose = Isometry3::identity();
        for (joint, &value) in self.joints.iter().zip(joint_values) {
            pose *= joint.origin * joint_motion(joint, value);
        }

        Ok(pose * self.end_offset)
    }

    /// Compute the frame of every joint for the given joint values.
    pub fn joint_frames(&self, joint_values: &[f64]) -> Result<JointFrames, KinModelError> {
        self.check_len(joint_values)?;

        let mut pose = Isometry3::identity();
        let mut origins = Vec::with_capacity(self.len());
        let mut axes = Vec::with_capacity(self.len());

        for (joint, &value) in self.joints.iter().zip(joint_values) {
            pose *= joint.origin;

            origins.push(pose.translation.vector);
            axes.push(pose.rotation * joint.axis.into_inner());

            pose *= joint_motion(joint, value);
        }

        Ok(JointFrames {
            origins,
            axes,
            end_pose: pose * self.end_offset,
        })
    }

    /// The 6 x N geometric Jacobian of the end frame in the root frame.
    ///
    /// Rows 0..3 are linear velocity, rows 3..6 angular velocity.
    pub fn jacobian(&self, joint_values: &[f64]) -> Result<DMatrix<f64>, KinModelError> {
        let frames = self.joint_frames(joint_values)?;
        Ok(jacobian_from_frames(self, &frames))
    }

    fn check_len(&self, joint_values: &[f64]) -> Result<(), KinModelError> {
        if joint_values.len() != self.len() {
            return Err(KinModelError::DimensionMismatch {
                expected: self.len(),
                found: joint_values.len(),
            });
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Build the Jacobian from precomputed joint frames.
pub(crate) fn jacobian_from_frames(chain: &JointChain, frames: &JointFrames) -> DMatrix<f64> {
    let end = frames.end_pose.translation.vector;
    let mut jac = DMatrix::zeros(6, chain.len());

    for (i, joint) in chain.joints.iter().enumerate() {
        let axis = frames.axes[i];

        if joint.prismatic {
            for r in 0..3 {
                jac[(r, i)] = axis[r];
            }
        } else {
            let linear = axis.cross(&(end - frames.origins[i]));
            for r in 0..3 {
                jac[(r, i)] = linear[r];
                jac[(r + 3, i)] = axis[r];
            }
        }
    }

    jac
}

fn joint_motion(joint: &ChainJoint, value: f64) -> Pose {
    if joint.prismatic {
        Isometry3::from_parts(
            Translation3::from(joint.axis.into_inner() * value),
            UnitQuaternion::identity(),
        )
    } else {
        Isometry3::from_parts(
            Translation3::identity(),
            UnitQuaternion::from_axis_angle(&joint.axis, value),
        )
    }
}

#[cfg(test)]
mod test {
    use super::super::fixtures;
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    const ARM_JOINTS: [&str; 9] = [
        "joint_fake",
        "joint_lift",
        "joint_arm_l3",
        "joint_arm_l2",
        "joint_arm_l1",
        "joint_arm_l0",
        "joint_wrist_yaw",
        "joint_wrist_pitch",
        "joint_wrist_roll",
    ];

    #[test]
    fn test_build() {
        let desc = fixtures::stretch();

        let chain = JointChain::build(&desc, "base_link", "link_grasp_center").unwrap();
        assert_eq!(chain.joint_names(), ARM_JOINTS.to_vec());
        assert_eq!(chain.root(), "base_link");
        assert_eq!(chain.end_frame(), "link_grasp_center");

        // The fingertip chain passes through the left finger joint
        let tip = JointChain::build(&desc, "base_link", "link_gripper_fingertip_left").unwrap();
        assert_eq!(tip.len(), 10);
        assert_eq!(tip.joint_names()[9], "joint_gripper_finger_left");

        let head = JointChain::build(&desc, "base_link", "camera_color_optical_frame").unwrap();
        assert_eq!(
            head.joint_names(),
            vec!["joint_fake", "joint_head_pan", "joint_head_tilt"]
        );

        assert!(matches!(
            JointChain::build(&desc, "base_link", "nowhere"),
            Err(KinModelError::ChainNotFound { .. })
        ));
    }

    #[test]
    fn test_forward() {
        let desc = fixtures::stretch();
        let chain = JointChain::build(&desc, "base_link", "link_grasp_center").unwrap();

        // Sum of all origins along the arm at zero
        let zero = chain.forward(&[0.0; 9]).unwrap();
        let home = Vector3::new(
            -0.07 + 0.05 + 0.08,
            0.14 - 0.12 - 0.05 - 0.02 - 0.03 - 0.04 - 0.11,
            0.03 + 0.16 - 0.03 - 0.06,
        );
        assert_relative_eq!(zero.translation.vector, home, epsilon = 1e-12);
        assert_relative_eq!(zero.rotation, UnitQuaternion::identity(), epsilon = 1e-12);

        // Base, lift and arm translate the end frame directly
        let moved = chain
            .forward(&[0.1, 0.5, 0.05, 0.05, 0.05, 0.05, 0.0, 0.0, 0.0])
            .unwrap();
        assert_relative_eq!(
            moved.translation.vector - zero.translation.vector,
            Vector3::new(0.1, -0.2, 0.5),
            epsilon = 1e-12
        );

        // Quarter turn of the yaw swings the wrist offset from -Y to +X
        let mut q = [0.0; 9];
        q[6] = FRAC_PI_2;
        let yawed = chain.forward(&q).unwrap();
        let wrist_to_end = 0.02 + 0.03 + 0.04 + 0.11;
        assert_relative_eq!(
            yawed.translation.vector - zero.translation.vector,
            Vector3::new(wrist_to_end, wrist_to_end, 0.0),
            epsilon = 1e-12
        );

        assert!(matches!(
            chain.forward(&[0.0; 8]),
            Err(KinModelError::DimensionMismatch {
                expected: 9,
                found: 8
            })
        ));
    }

    #[test]
    fn test_jacobian_matches_finite_difference() {
        let desc = fixtures::stretch();
        let chain = JointChain::build(&desc, "base_link", "link_grasp_center").unwrap();

        let q = [0.1, 0.4, 0.02, 0.02, 0.02, 0.02, 0.3, -0.5, 0.2];
        let jac = chain.jacobian(&q).unwrap();
        let p0 = chain.forward(&q).unwrap().translation.vector;

        let h = 1e-7;
        for i in 0..q.len() {
            let mut qh = q;
            qh[i] += h;
            let p1 = chain.forward(&qh).unwrap().translation.vector;
            let fd = (p1 - p0) / h;

            for r in 0..3 {
                assert_relative_eq!(jac[(r, i)], fd[r], epsilon = 1e-5);
            }
        }
    }
}
