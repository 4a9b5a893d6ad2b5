//! Direct joint moves

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use comms_if::eqpt::{ManipDems, PhysJointId, PhysJointPositions};
use log::{debug, warn};
use std::f64::consts::{FRAC_PI_2, PI};

use super::{MotionCtrl, MotionCtrlError, MotionPhase, MotionReport, MoveMode, StatusReport};
use crate::eqpt_client::ManipEqpt;
use crate::joint_state::{ArmExtension, JointId, JointTargets, NUM_ARM_SEGMENTS};
use util::maths;

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Wrap a wrist angle into `[-pi/2, pi/2)`.
pub fn normalise_wrist_angle(angle_rad: f64) -> f64 {
    maths::wrap(angle_rad, -FRAC_PI_2, PI)
}

/// Clamp a wrist pitch into `[limits[0], limits[1]]`.
pub fn clamp_wrist_pitch(pitch_rad: f64, limits: [f64; 2]) -> f64 {
    maths::clamp(&pitch_rad, &limits[0], &limits[1])
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<E: ManipEqpt> MotionCtrl<E> {
    /// Move the joints to the given targets.
    ///
    /// Targeted wrist angles are normalised and the pitch clamped, the arm
    /// segments are merged into one extension and the lift and arm limited.
    /// In `Staged` mode the lift is moved on its own first. Joints without a
    /// target keep their current value.
    ///
    /// If a later phase fails after an earlier one was dispatched the robot is
    /// left where it is and `PartialMotion` names the completed phases.
    ///
    /// The status in the returned report only covers this move.
    pub fn move_to_joints(
        &mut self,
        targets: &JointTargets,
        mode: MoveMode,
    ) -> Result<MotionReport, MotionCtrlError> {
        self.report = StatusReport::default();

        let current = self.refresh()?;
        let mut report = MotionReport::default();

        let value = |id: JointId| targets.get(id).unwrap_or_else(|| current.get(id));
        let wrist = |id: JointId| match targets.get(id) {
            Some(v) => normalise_wrist_angle(v),
            None => current.get(id),
        };

        let mut segments = [0.0; NUM_ARM_SEGMENTS];
        for (seg, id) in segments.iter_mut().zip(JointId::ARM_SEGMENTS.iter()) {
            *seg = value(*id);
        }

        let mut target = PhysJointPositions::zeros();
        target[PhysJointId::BaseTranslation] = value(JointId::BaseTranslation);
        target[PhysJointId::Lift] = value(JointId::Lift);
        target[PhysJointId::ArmExtension] = ArmExtension::from_segments(&segments).meters();
        target[PhysJointId::WristYaw] = wrist(JointId::WristYaw);
        target[PhysJointId::WristRoll] = wrist(JointId::WristRoll);

        let pitch = wrist(JointId::WristPitch);
        target[PhysJointId::WristPitch] = match targets.get(JointId::WristPitch) {
            Some(_) => {
                let clamped = clamp_wrist_pitch(pitch, self.params.wrist_pitch_limits_rad);
                if clamped != pitch {
                    warn!("Wrist pitch demand {} rad limited to {} rad", pitch, clamped);
                    self.report.pitch_limited = true;
                }
                clamped
            }
            None => pitch,
        };

        self.enforce_limits(&mut target);

        if targets.get(JointId::GripperFingerLeft).is_some() {
            debug!("Finger target ignored, use the gripper commands to move the fingers");
        }

        if mode == MoveMode::Staged {
            let mut lift_only = PhysJointPositions::zeros();
            lift_only[PhysJointId::Lift] = target[PhysJointId::Lift] - current.lift;

            let dems = ManipDems::relative(lift_only);
            self.dispatch(dems)?;
            report.phases.push(MotionPhase::LiftOnly);
            report.dems.push(dems);
        }

        let dems = ManipDems::absolute(target);
        self.dispatch(dems)
            .map_err(|e| MotionCtrlError::after(&report.phases, e))?;
        report.phases.push(MotionPhase::Combined);
        report.dems.push(dems);

        self.pitch_override = Some(target[PhysJointId::WristPitch]);

        let pan = targets.get(JointId::HeadPan);
        let tilt = targets.get(JointId::HeadTilt);
        if pan.is_some() || tilt.is_some() {
            self.eqpt
                .set_pan_tilt(
                    pan.unwrap_or(current.head_pan),
                    tilt.unwrap_or(current.head_tilt),
                )
                .and_then(|_| self.settle())
                .map_err(|e| MotionCtrlError::after(&report.phases, e))?;
            report.phases.push(MotionPhase::Head);
        }

        report.status = self.report;
        Ok(report)
    }
}
