//! Inverse kinematics calculations

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::{debug, trace, warn};
use nalgebra::{DVector, Vector3, Vector6, SVD};
use serde::{Deserialize, Serialize};

use super::{chain::jacobian_from_frames, JointChain, KinModelError, Pose};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Iteration cap for each singular value decomposition.
const MAX_SVD_ITERATIONS: usize = 1000;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters of the inverse kinematics solver.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IkParams {
    /// Maximum number of solver iterations before giving up.
    pub max_iterations: usize,

    /// Convergence threshold on every component of the pose error twist.
    ///
    /// Units: meters for the translation, radians for the rotation
    pub eps: f64,

    /// Singular values below this are treated as zero in the pseudo-inverse.
    pub pinv_eps: f64,
}

/// A converged inverse kinematics solution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IkSolution {
    /// Joint values in chain order.
    pub joint_values: Vec<f64>,

    /// Number of iterations used.
    pub iterations: usize,

    /// Units: meters
    pub position_error_m: f64,

    /// Units: radians
    pub angle_error_rad: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for IkParams {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            eps: 1e-5,
            pinv_eps: 1e-5,
        }
    }
}

impl JointChain {
    /// Find joint values which place the end frame at `target`.
    ///
    /// Newton-Raphson iteration on the pose error using the pseudo-inverse of
    /// the geometric Jacobian, started from `seed`. Joint limits are not
    /// applied. Any solution may be returned when several exist.
    pub fn inverse(
        &self,
        seed: &[f64],
        target: &Pose,
        params: &IkParams,
    ) -> Result<IkSolution, KinModelError> {
        let mut q = DVector::from_column_slice(seed);
        let mut twist = Vector6::zeros();

        // Updates applied to q
        let mut iterations = 0;

        for iteration in 0..params.max_iterations {
            let frames = self.joint_frames(q.as_slice())?;
            twist = pose_error(&frames.end_pose, target);

            if twist.iter().all(|e| e.abs() < params.eps) {
                let (position_error_m, angle_error_rad) = error_norms(&twist);
                let solution = IkSolution {
                    joint_values: q.as_slice().to_vec(),
                    iterations: iteration,
                    position_error_m,
                    angle_error_rad,
                };
                debug!(
                    "IK converged in {} iterations for {} -> {}",
                    solution.iterations,
                    self.root(),
                    self.end_frame()
                );
                return Ok(solution);
            }

            let jac = jacobian_from_frames(self, &frames);
            let pinv = match SVD::try_new(jac, true, true, f64::EPSILON, MAX_SVD_ITERATIONS)
                .map(|svd| svd.pseudo_inverse(params.pinv_eps))
            {
                Some(Ok(p)) => p,
                _ => {
                    warn!("IK pseudo-inverse failed at iteration {}", iteration);
                    break;
                }
            };

            let dq = pinv * DVector::from_column_slice(twist.as_slice());
            q += dq;

            if q.iter().any(|v| !v.is_finite()) {
                warn!("IK diverged at iteration {}", iteration);
                break;
            }
            iterations += 1;

            trace!("IK iteration {}: error {:?}", iteration, twist.as_slice());
        }

        let (position_error_m, angle_error_rad) = error_norms(&twist);
        Err(KinModelError::IkDidNotConverge {
            iterations,
            position_error_m,
            angle_error_rad,
        })
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// The twist taking `current` to `target`: translation difference then the
/// rotation vector of `R_target * R_current^-1`, both in the root frame.
fn pose_error(current: &Pose, target: &Pose) -> Vector6<f64> {
    let dp = target.translation.vector - current.translation.vector;
    let dr = (target.rotation * current.rotation.inverse()).scaled_axis();

    Vector6::new(dp.x, dp.y, dp.z, dr.x, dr.y, dr.z)
}

/// Norms of the translation and rotation parts of an error twist.
fn error_norms(twist: &Vector6<f64>) -> (f64, f64) {
    (
        Vector3::new(twist[0], twist[1], twist[2]).norm(),
        Vector3::new(twist[3], twist[4], twist[5]).norm(),
    )
}

#[cfg(test)]
mod test {
    use super::super::{fixtures, pose_from_xyz_rpy};
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Translation3;

    #[test]
    fn test_round_trip() {
        let desc = fixtures::stretch();
        let chain = JointChain::build(&desc, "base_link", "link_grasp_center").unwrap();

        let q = [0.1, 0.5, 0.05, 0.05, 0.05, 0.05, 0.3, -0.4, 0.2];
        let target = chain.forward(&q).unwrap();

        let solution = chain
            .inverse(&[0.0; 9], &target, &IkParams::default())
            .unwrap();
        let reached = chain.forward(&solution.joint_values).unwrap();

        assert_relative_eq!(
            reached.translation.vector,
            target.translation.vector,
            epsilon = 1e-4
        );
        assert!(reached.rotation.angle_to(&target.rotation) < 1e-4);
        assert!(solution.iterations < IkParams::default().max_iterations);
    }

    #[test]
    fn test_lift_only_goal() {
        let desc = fixtures::stretch();
        let chain = JointChain::build(&desc, "base_link", "link_grasp_center").unwrap();

        let start = chain.forward(&[0.0; 9]).unwrap();
        let target = start * pose_from_xyz_rpy([0.0, 0.0, 0.1], [0.0; 3]);

        let solution = chain
            .inverse(&[0.0; 9], &target, &IkParams::default())
            .unwrap();

        // Only the lift moves along base Z at the home configuration
        assert_relative_eq!(solution.joint_values[1], 0.1, epsilon = 1e-5);
    }

    #[test]
    fn test_unreachable() {
        let desc = fixtures::stretch();
        let chain = JointChain::build(&desc, "base_link", "camera_link").unwrap();

        let target = Pose::from_parts(
            Translation3::new(0.0, 5.0, 0.0),
            nalgebra::UnitQuaternion::identity(),
        );
        let params = IkParams {
            max_iterations: 20,
            ..Default::default()
        };

        match chain.inverse(&[0.0; 3], &target, &params) {
            Err(KinModelError::IkDidNotConverge { iterations, .. }) => assert_eq!(iterations, 20),
            r => panic!("Expected IK to fail, got {:?}", r),
        }
    }

    #[test]
    fn test_diverged_reports_iterations() {
        let desc = fixtures::stretch();
        let chain = JointChain::build(&desc, "base_link", "link_grasp_center").unwrap();

        let target = Pose::from_parts(
            Translation3::new(f64::NAN, 0.0, 0.0),
            nalgebra::UnitQuaternion::identity(),
        );
        let params = IkParams {
            max_iterations: 20,
            ..Default::default()
        };

        // The first update is already non-finite
        match chain.inverse(&[0.0; 9], &target, &params) {
            Err(KinModelError::IkDidNotConverge { iterations, .. }) => assert_eq!(iterations, 0),
            r => panic!("Expected IK to fail, got {:?}", r),
        }
    }

    #[test]
    fn test_seed_dimension() {
        let desc = fixtures::stretch();
        let chain = JointChain::build(&desc, "base_link", "link_grasp_center").unwrap();

        assert!(matches!(
            chain.inverse(&[0.0; 3], &Pose::identity(), &IkParams::default()),
            Err(KinModelError::DimensionMismatch { .. })
        ));
    }
}
