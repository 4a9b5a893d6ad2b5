//! Closing the gripper onto an object

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::{MotionCtrl, MotionCtrlError};
use crate::eqpt_client::ManipEqpt;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Openings at or below this count as zero.
const OPENING_EPS: f64 = 1e-9;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The result of closing the gripper.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GraspReport {
    /// Number of openings commanded.
    pub iterations: usize,

    /// Last commanded opening.
    pub final_opening: f64,

    /// Opening reported after the last command.
    pub final_position: f64,

    /// True if the gripper stopped against an object.
    pub resistance: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<E: ManipEqpt> MotionCtrl<E> {
    /// Close the gripper step by step until it meets resistance.
    ///
    /// Openings decrease from the start opening by a fixed step. Once a step
    /// would reach zero the fully closed opening is commanded and the close
    /// ends there.
    pub fn grasp(&mut self) -> Result<GraspReport, MotionCtrlError> {
        let params = self.params.grasp;
        let mut step = 0;

        loop {
            let candidate = params.start_opening - step as f64 * params.step;
            let closing = candidate <= OPENING_EPS || params.step <= 0.0;
            let opening = if closing {
                params.closed_opening
            } else {
                candidate
            };

            self.eqpt.move_gripper(opening)?;
            let position = self.eqpt.get_gripper_position()?;
            step += 1;

            debug!(
                "Gripper commanded to {}, reports {}",
                opening, position
            );

            let resistance = position > opening + params.resistance_tol;
            if resistance || closing {
                let report = GraspReport {
                    iterations: step,
                    final_opening: opening,
                    final_position: position,
                    resistance,
                };
                info!("Grasp finished: {:?}", report);
                return Ok(report);
            }
        }
    }

    /// Pick up an object.
    ///
    /// The same as [`MotionCtrl::grasp`], the depth isn't used.
    pub fn pickup(&mut self, depth: f64) -> Result<GraspReport, MotionCtrlError> {
        debug!("Pickup depth {} m ignored", depth);
        self.grasp()
    }
}

#[cfg(test)]
mod test {
    use super::super::{fixtures, GraspParams, Params};
    use super::*;
    use crate::eqpt_client::SimManipEqpt;
    use crate::kin_model::fixtures::stretch;

    #[test]
    fn test_grasp_resistance() {
        let mut ctrl = fixtures::ctrl(SimManipEqpt::new().with_object_width(0.12));

        let report = ctrl.grasp().unwrap();

        assert!(report.resistance);
        assert!(report.iterations <= 4);
        assert!((report.final_opening - 0.1).abs() < 1e-12);
        assert_eq!(report.final_position, 0.12);
    }

    #[test]
    fn test_grasp_nothing() {
        let mut ctrl = fixtures::ctrl(SimManipEqpt::new());

        let report = ctrl.pickup(0.3).unwrap();

        // 0.25 to 0.05 in five steps then fully closed
        assert!(!report.resistance);
        assert_eq!(report.iterations, 6);
        assert_eq!(report.final_opening, -0.2);
        assert_eq!(ctrl.eqpt().journal().len(), 7);
    }

    #[test]
    fn test_grasp_zero_step() {
        let defaults = fixtures::params();
        let params = Params {
            grasp: GraspParams {
                step: 0.0,
                ..defaults.grasp
            },
            ..defaults
        };
        let mut ctrl = MotionCtrl::new(SimManipEqpt::new(), params, stretch()).unwrap();
        ctrl.startup().unwrap();

        let report = ctrl.grasp().unwrap();

        assert_eq!(report.iterations, 1);
        assert_eq!(report.final_opening, -0.2);
    }
}
