//! Parameters structure for MotionCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

use crate::kin_model::IkParams;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for motion control.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Params {
    // ---- CHAINS ----
    /// Frame poses are expressed in.
    pub root_link: String,

    /// Link moved by pose commands at startup.
    pub end_link: String,

    // ---- TIMING ----
    /// Minimum wait after each dispatched motion.
    ///
    /// Units: seconds
    pub settle_delay_s: f64,

    /// Period between settled checks after the minimum wait.
    ///
    /// Units: seconds
    pub settle_poll_period_s: f64,

    /// Longest extra time spent waiting for the equipment to settle.
    ///
    /// Units: seconds
    pub settle_timeout_s: f64,

    /// Wait after switching into manipulation mode.
    ///
    /// Units: seconds
    pub startup_delay_s: f64,

    // ---- LIMITS ----
    /// Units: radians
    pub wrist_pitch_limits_rad: [f64; 2],

    /// Units: meters
    pub lift_limits_m: [f64; 2],

    /// Units: meters
    pub arm_limits_m: [f64; 2],

    /// Gripper opening at normalised positions 0 and 1.
    pub gripper_limits: [f64; 2],

    // ---- GRASP ----
    pub grasp: GraspParams,

    // ---- IK ----
    pub ik: IkParams,
}

/// Parameters for closing the gripper onto an object.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GraspParams {
    /// First commanded opening.
    pub start_opening: f64,

    /// Decrease in opening between commands.
    pub step: f64,

    /// The gripper has met resistance when it reports more than this above
    /// the commanded opening.
    pub resistance_tol: f64,

    /// Opening commanded once the steps reach zero.
    pub closed_opening: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            root_link: "base_link".into(),
            end_link: "link_grasp_center".into(),
            settle_delay_s: 0.7,
            settle_poll_period_s: 0.05,
            settle_timeout_s: 2.0,
            startup_delay_s: 2.0,
            wrist_pitch_limits_rad: [-FRAC_PI_2, 0.1],
            lift_limits_m: [0.0, 1.1],
            arm_limits_m: [0.0, 0.52],
            gripper_limits: [0.0, 0.3],
            grasp: GraspParams::default(),
            ik: IkParams::default(),
        }
    }
}

impl Default for GraspParams {
    fn default() -> Self {
        Self {
            start_opening: 0.25,
            step: 0.05,
            resistance_tol: 0.01,
            closed_opening: -0.2,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_params_file() {
        let p: Params = util::params::from_str(include_str!("../../../params/motion_ctrl.toml"))
            .unwrap();

        assert_eq!(p.end_link, "link_grasp_center");
        assert_eq!(p.settle_delay_s, 0.7);
        assert_eq!(p.wrist_pitch_limits_rad, [-FRAC_PI_2, 0.1]);
        assert_eq!(p.grasp.start_opening, 0.25);
        assert_eq!(p.ik.max_iterations, 100);
    }
}
