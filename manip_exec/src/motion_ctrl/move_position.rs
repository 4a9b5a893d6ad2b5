//! Position moves of the individual joints

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use comms_if::eqpt::{ManipDems, PhysJointId};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::{MotionCtrl, MotionCtrlError, MotionPhase, MotionReport, StatusReport};
use crate::eqpt_client::ManipEqpt;
use util::maths;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A partially specified target, `None` fields are left unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MotionTarget {
    /// Units: meters
    pub lift: Option<f64>,

    /// Units: meters
    pub arm: Option<f64>,

    /// Translation added to the current base position.
    ///
    /// Units: meters
    pub base_trans: Option<f64>,

    /// Units: radians
    pub wrist_yaw: Option<f64>,
    pub wrist_pitch: Option<f64>,
    pub wrist_roll: Option<f64>,

    /// Normalised opening, 0 closed to 1 open.
    pub gripper: Option<f64>,

    /// Base rotation, when set nothing else moves.
    ///
    /// Units: radians
    pub base_theta: Option<f64>,

    /// Units: radians
    pub head_pan: Option<f64>,
    pub head_tilt: Option<f64>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<E: ManipEqpt> MotionCtrl<E> {
    /// Move any of the joints to the given target.
    ///
    /// The gripper moves first, then the base, lift, arm and wrist together,
    /// then the head. A base rotation is sent on its own and nothing else in
    /// the target is used.
    pub fn move_to_position(
        &mut self,
        target: &MotionTarget,
    ) -> Result<MotionReport, MotionCtrlError> {
        self.report = StatusReport::default();
        let mut report = MotionReport::default();

        if let Some(theta) = target.base_theta {
            debug!("Rotating base by {} rad", theta);

            self.eqpt.navigate_to([0.0, 0.0, theta])?;
            self.settle()?;

            report.phases.push(MotionPhase::BaseRotation);
            report.status = self.report;
            return Ok(report);
        }

        let current = self.refresh()?;

        if let Some(pos) = target.gripper {
            let [closed, open] = self.params.gripper_limits;
            let opening = maths::lin_map((0.0, 1.0), (closed, open), pos);

            self.eqpt.move_gripper(opening)?;
            report.phases.push(MotionPhase::Gripper);
        }

        let mut dems = current.phys_positions();
        if let Some(arm) = target.arm {
            dems[PhysJointId::ArmExtension] = arm;
        }
        if let Some(lift) = target.lift {
            dems[PhysJointId::Lift] = lift;
        }
        dems[PhysJointId::BaseTranslation] += target.base_trans.unwrap_or(0.0);
        if let Some(yaw) = target.wrist_yaw {
            dems[PhysJointId::WristYaw] = yaw;
        }
        if let Some(pitch) = target.wrist_pitch {
            let max = self.params.wrist_pitch_limits_rad[1];
            if pitch > max {
                warn!("Wrist pitch demand {} rad limited to {} rad", pitch, max);
                self.report.pitch_limited = true;
            }
            dems[PhysJointId::WristPitch] = pitch.min(max);
        }
        if let Some(roll) = target.wrist_roll {
            dems[PhysJointId::WristRoll] = roll;
        }

        self.enforce_limits(&mut dems);

        let dems = ManipDems::absolute(dems);
        debug!("Dispatching {:?}", dems);
        self.eqpt
            .goto_joint_positions(&dems.positions, dems.relative)
            .map_err(|e| MotionCtrlError::after(&report.phases, e))?;
        report.phases.push(MotionPhase::Combined);
        report.dems.push(dems);

        if target.wrist_pitch.is_some() {
            self.pitch_override = Some(dems.positions[PhysJointId::WristPitch]);
        }

        if target.head_pan.is_some() || target.head_tilt.is_some() {
            self.eqpt
                .set_pan_tilt(
                    target.head_pan.unwrap_or(current.head_pan),
                    target.head_tilt.unwrap_or(current.head_tilt),
                )
                .map_err(|e| MotionCtrlError::after(&report.phases, e))?;
            report.phases.push(MotionPhase::Head);
        }

        self.settle()
            .map_err(|e| MotionCtrlError::after(&report.phases, e))?;

        report.status = self.report;
        Ok(report)
    }
}
