//! # Kinematic model
//!
//! Builds joint chains between named frames of the robot description and
//! provides forward and inverse kinematics over them.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod chain;
mod description;
mod inverse_kinematics;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::{Isometry3, Translation3, UnitQuaternion, Vector3};
use std::path::PathBuf;

// Internal
pub use chain::*;
pub use description::*;
pub use inverse_kinematics::*;

// ---------------------------------------------------------------------------
// TYPES
// ---------------------------------------------------------------------------

/// A rigid transform, rotation then translation, relative to some frame.
pub type Pose = Isometry3<f64>;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur in the kinematic model.
#[derive(Debug, thiserror::Error)]
pub enum KinModelError {
    #[error("Cannot read the robot description {0:?}: {1}")]
    DescriptionIo(PathBuf, std::io::Error),

    #[error("Invalid robot description: {0}")]
    Description(String),

    #[error("No chain exists from {root:?} to {end:?}")]
    ChainNotFound { root: String, end: String },

    #[error("Expected {expected} joint values for the chain but got {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error(
        "IK did not converge after {iterations} iterations (position error {position_error_m} m, \
         angle error {angle_error_rad} rad)"
    )]
    IkDidNotConverge {
        iterations: usize,
        position_error_m: f64,
        angle_error_rad: f64,
    },
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Build a pose from a translation and fixed-axis roll, pitch, yaw angles.
///
/// The rotation is `Rz(yaw) * Ry(pitch) * Rx(roll)`, so roll is applied first
/// about the parent X axis. This is the URDF origin convention.
pub fn pose_from_xyz_rpy(xyz: [f64; 3], rpy: [f64; 3]) -> Pose {
    Isometry3::from_parts(
        Translation3::new(xyz[0], xyz[1], xyz[2]),
        UnitQuaternion::from_euler_angles(rpy[0], rpy[1], rpy[2]),
    )
}

/// Build a pose from a translation and intrinsic X-Y-Z Euler angles.
///
/// The frame is turned about its own X axis, then its new Y axis, then its
/// new Z axis: `Rx(angles[0]) * Ry(angles[1]) * Rz(angles[2])`.
pub fn pose_from_xyz_intrinsic(xyz: [f64; 3], angles: [f64; 3]) -> Pose {
    let rx = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), angles[0]);
    let ry = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), angles[1]);
    let rz = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), angles[2]);

    Isometry3::from_parts(Translation3::new(xyz[0], xyz[1], xyz[2]), rx * ry * rz)
}

// ---------------------------------------------------------------------------
// TEST FIXTURES
// ---------------------------------------------------------------------------


#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_pose_from_xyz_rpy() {
        // Pure yaw turns X into Y
        let p = pose_from_xyz_rpy([1.0, 2.0, 3.0], [0.0, 0.0, FRAC_PI_2]);
        let x = p.rotation * Vector3::x();
        assert_relative_eq!(x, Vector3::y(), epsilon = 1e-12);
        assert_relative_eq!(
            p * Point3::origin(),
            Point3::new(1.0, 2.0, 3.0),
            epsilon = 1e-12
        );

        // Roll is applied before yaw: Z is rolled to -Y then yawed to +X
        let p = pose_from_xyz_rpy([0.0; 3], [FRAC_PI_2, 0.0, FRAC_PI_2]);
        assert_relative_eq!(p.rotation * Vector3::z(), Vector3::x(), epsilon = 1e-12);
    }

    #[test]
    fn test_pose_from_xyz_intrinsic() {
        // Yaw about the rolled Z axis: X goes to Y then is rolled up to Z
        let p = pose_from_xyz_intrinsic([0.0; 3], [FRAC_PI_2, 0.0, FRAC_PI_2]);
        assert_relative_eq!(p.rotation * Vector3::x(), Vector3::z(), epsilon = 1e-12);
        assert_relative_eq!(p.rotation * Vector3::z(), -Vector3::y(), epsilon = 1e-12);

        // Single axis rotations agree with the fixed-axis form
        for angles in &[[0.3, 0.0, 0.0], [0.0, -0.7, 0.0], [0.0, 0.0, 1.1]] {
            let a = pose_from_xyz_intrinsic([0.0; 3], *angles);
            let b = pose_from_xyz_rpy([0.0; 3], *angles);
            assert!(a.rotation.angle_to(&b.rotation) < 1e-6);
        }
    }
}
