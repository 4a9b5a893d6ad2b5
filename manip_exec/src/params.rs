//! # Manipulator Executable Parameters
//!
//! This module provides parameters for the manipulator executable.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use crate::eqpt_client::SimManipEqpt;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManipExecParams {
    /// Minimum log level, one of `Info`, `Debug` or `Trace`.
    pub log_level: String,

    /// Motion control parameter file, relative to the params directory
    pub motion_ctrl_params: String,

    /// Robot description (URDF) file, relative to the params directory
    pub robot_description: String,

    /// Offset added to the wrist pitch the simulated equipment reports.
    ///
    /// Units: radians
    pub sim_pitch_drift_rad: f64,

    /// Width of an object between the simulated fingers, negative for no
    /// object.
    pub sim_object_width: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ManipExecParams {
    /// Build the simulated equipment these parameters describe.
    pub fn sim_eqpt(&self) -> SimManipEqpt {
        let eqpt = SimManipEqpt::new().with_pitch_drift(self.sim_pitch_drift_rad);

        if self.sim_object_width >= 0.0 {
            eqpt.with_object_width(self.sim_object_width)
        } else {
            eqpt
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::eqpt_client::ManipEqpt;

    #[test]
    fn test_exec_params() {
        let p: ManipExecParams =
            util::params::from_str(include_str!("../../params/manip_exec.toml")).unwrap();

        assert_eq!(p.robot_description, "stretch_manip.urdf");
        assert_eq!(p.log_level, "Debug");

        let mut eqpt = p.sim_eqpt();
        eqpt.move_gripper(0.0).unwrap();
        assert_eq!(eqpt.get_gripper_position().unwrap(), 0.12);
    }
}
