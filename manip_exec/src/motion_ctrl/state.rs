//! Implementations for the MotionCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, warn};
use serde::Serialize;
use std::thread;
use std::time::Instant;

// Internal
use super::{
    GraspReport, MotionCtrlError, MotionReport, MotionTarget, MoveMode, Params,
    PoseMotionReport, StatusReport,
};
use crate::eqpt_client::ManipEqpt;
use crate::frame_tf::FrameTransform;
use crate::joint_state::{EqptSnapshot, JointState};
use crate::kin_model::{JointChain, RobotDescription};
use comms_if::{
    eqpt::{EqptError, ManipDems, PhysJointId, PhysJointPositions},
    tc::ManipCmd,
};
use util::{maths, module::State, session::Session, time::seconds_to_duration};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Motion control module state.
///
/// Owns the equipment, the joint state cache and the wrist pitch override.
/// Every operation takes `&mut self`, so there is only ever one writer.
pub struct MotionCtrl<E> {
    pub(crate) params: Params,

    pub(crate) eqpt: E,

    pub(crate) description: RobotDescription,

    /// Chain from the root link to the current end link.
    pub(crate) arm_chain: JointChain,

    pub(crate) joint_state: JointState,

    /// Last commanded wrist pitch, reported in place of the measured pitch.
    pub(crate) pitch_override: Option<f64>,

    pub(crate) report: StatusReport,
}

/// Input data to motion control.
#[derive(Default)]
pub struct InputData {
    /// The command to be executed, or `None` if there is no new command.
    pub cmd: Option<ManipCmd>,
}

/// The result of executing a command.
#[derive(Debug, Clone, Serialize)]
pub enum ManipResponse {
    Motion(MotionReport),
    Pose(PoseMotionReport),
    Transform(FrameTransform),
    Joints { names: Vec<String>, values: Vec<f64> },
    EndLink { link: String, num_joints: usize },
    Grasp(GraspReport),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<E: ManipEqpt> State for MotionCtrl<E> {
    type InitData = ();
    type InitError = MotionCtrlError;

    type InputData = InputData;
    type OutputData = Option<ManipResponse>;
    type StatusReport = StatusReport;
    type ProcError = MotionCtrlError;

    /// Initialise the MotionCtrl module.
    ///
    /// Switches the equipment into manipulation mode and archives the
    /// parameters in use.
    fn init(&mut self, _init_data: (), session: &Session) -> Result<(), Self::InitError> {
        self.startup()?;

        session.save("motion_ctrl/params.json", self.params.clone());

        Ok(())
    }

    /// Execute a command, if there is one.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        // Clear the status report
        self.report = StatusReport::default();

        let response = match &input_data.cmd {
            Some(cmd) => {
                debug!("New MotionCtrl ManipCmd::{:?}", cmd);
                Some(self.exec_cmd(cmd)?)
            }
            None => None,
        };

        Ok((response, self.report))
    }
}

impl<E: ManipEqpt> MotionCtrl<E> {
    /// Create a new controller.
    ///
    /// Fails if there is no chain from the root link to the end link.
    pub fn new(
        eqpt: E,
        params: Params,
        description: RobotDescription,
    ) -> Result<Self, MotionCtrlError> {
        let arm_chain = JointChain::build(&description, &params.root_link, &params.end_link)?;

        Ok(Self {
            params,
            eqpt,
            description,
            arm_chain,
            joint_state: JointState::default(),
            pitch_override: None,
            report: StatusReport::default(),
        })
    }

    /// Put the equipment into manipulation mode and wait for it to be ready.
    pub fn startup(&mut self) -> Result<(), MotionCtrlError> {
        info!("Switching to manipulation mode");
        self.eqpt.switch_to_manipulation_mode()?;

        thread::sleep(seconds_to_duration(self.params.startup_delay_s));

        self.refresh()?;
        info!("MotionCtrl ready, end link {:?}", self.arm_chain.end_frame());

        Ok(())
    }

    pub fn eqpt(&self) -> &E {
        &self.eqpt
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn description(&self) -> &RobotDescription {
        &self.description
    }

    pub fn arm_chain(&self) -> &JointChain {
        &self.arm_chain
    }

    /// The joint state as of the last refresh.
    pub fn joint_state(&self) -> &JointState {
        &self.joint_state
    }

    pub fn pitch_override(&self) -> Option<f64> {
        self.pitch_override
    }

    /// Re-read the joint state from the equipment.
    pub fn refresh(&mut self) -> Result<JointState, MotionCtrlError> {
        let joints = self.eqpt.get_joint_positions()?;
        let (head_pan, head_tilt) = self.eqpt.get_pan_tilt()?;

        self.joint_state.refresh(
            &EqptSnapshot {
                joints,
                head_pan,
                head_tilt,
            },
            self.pitch_override,
        );

        Ok(self.joint_state)
    }

    /// Names and values of all joints.
    pub fn get_joints(&mut self) -> Result<(Vec<String>, Vec<f64>), MotionCtrlError> {
        Ok(self.refresh()?.named_values())
    }

    /// Change the link moved by pose commands.
    pub fn set_end_link(&mut self, link: &str) -> Result<&JointChain, MotionCtrlError> {
        self.arm_chain = JointChain::build(&self.description, &self.params.root_link, link)?;

        info!(
            "End link is now {:?} ({} joints)",
            link,
            self.arm_chain.len()
        );

        Ok(&self.arm_chain)
    }

    /// Send joint demands and wait for them to settle.
    pub(crate) fn dispatch(&mut self, dems: ManipDems) -> Result<(), EqptError> {
        debug!("Dispatching {:?}", dems);

        self.eqpt
            .goto_joint_positions(&dems.positions, dems.relative)?;
        self.settle()
    }

    /// Wait for the last motion to finish.
    ///
    /// Always waits the minimum settle delay, then polls the equipment until
    /// it reports settled or the timeout expires.
    pub(crate) fn settle(&mut self) -> Result<(), EqptError> {
        thread::sleep(seconds_to_duration(self.params.settle_delay_s));

        let start = Instant::now();
        let timeout = seconds_to_duration(self.params.settle_timeout_s);

        while !self.eqpt.is_settled()? {
            if start.elapsed() >= timeout {
                warn!(
                    "Equipment not settled after {} s, continuing",
                    self.params.settle_delay_s + self.params.settle_timeout_s
                );
                self.report.settle_timed_out = true;
                break;
            }

            thread::sleep(seconds_to_duration(self.params.settle_poll_period_s));
        }

        Ok(())
    }

    /// Limit the lift and arm demands to the manipulator's range.
    ///
    /// Limited axes are flagged in the status report.
    pub(crate) fn enforce_limits(&mut self, positions: &mut PhysJointPositions) {
        let [lift_min, lift_max] = self.params.lift_limits_m;
        let [arm_min, arm_max] = self.params.arm_limits_m;

        let lift = maths::clamp(&positions[PhysJointId::Lift], &lift_min, &lift_max);
        if lift != positions[PhysJointId::Lift] {
            warn!(
                "Lift demand {} m limited to {} m",
                positions[PhysJointId::Lift],
                lift
            );
            positions[PhysJointId::Lift] = lift;
            self.report.lift_limited = true;
        }

        let arm = maths::clamp(&positions[PhysJointId::ArmExtension], &arm_min, &arm_max);
        if arm != positions[PhysJointId::ArmExtension] {
            warn!(
                "Arm demand {} m limited to {} m",
                positions[PhysJointId::ArmExtension],
                arm
            );
            positions[PhysJointId::ArmExtension] = arm;
            self.report.arm_limited = true;
        }
    }

    /// Execute a single telecommand.
    pub fn exec_cmd(&mut self, cmd: &ManipCmd) -> Result<ManipResponse, MotionCtrlError> {
        let response = match cmd {
            ManipCmd::Position {
                lift_pos,
                arm_pos,
                base_trans,
                wrist_yaw,
                wrist_pitch,
                wrist_roll,
                gripper_pos,
                base_theta,
                head_tilt,
                head_pan,
            } => ManipResponse::Motion(self.move_to_position(&MotionTarget {
                lift: *lift_pos,
                arm: *arm_pos,
                base_trans: *base_trans,
                wrist_yaw: *wrist_yaw,
                wrist_pitch: *wrist_pitch,
                wrist_roll: *wrist_roll,
                gripper: *gripper_pos,
                base_theta: *base_theta,
                head_pan: *head_pan,
                head_tilt: *head_tilt,
            })?),
            ManipCmd::Pose {
                x,
                y,
                z,
                roll,
                pitch,
                yaw,
                staged,
            } => {
                let mode = if *staged {
                    MoveMode::Staged
                } else {
                    MoveMode::Direct
                };
                ManipResponse::Pose(self.move_to_pose([*x, *y, *z], [*roll, *pitch, *yaw], mode)?)
            }
            ManipCmd::Transform { frame_a, frame_b } => {
                ManipResponse::Transform(self.transform_between(frame_a, frame_b)?)
            }
            ManipCmd::Joints => {
                let (names, values) = self.get_joints()?;
                ManipResponse::Joints { names, values }
            }
            ManipCmd::SetEndLink { link } => {
                let num_joints = self.set_end_link(link)?.len();
                ManipResponse::EndLink {
                    link: link.clone(),
                    num_joints,
                }
            }
            ManipCmd::Grasp => ManipResponse::Grasp(self.grasp()?),
            ManipCmd::Pickup { depth } => ManipResponse::Grasp(self.pickup(*depth)?),
        };

        Ok(response)
    }
}

#[cfg(test)]
mod test {
    use super::super::fixtures;
    use super::*;
    use crate::eqpt_client::{EqptCall, SimManipEqpt};
    use crate::kin_model::{fixtures::stretch, KinModelError};

    #[test]
    fn test_startup() {
        let ctrl = fixtures::ctrl(SimManipEqpt::new());

        assert!(ctrl.eqpt().in_manip_mode());
        assert_eq!(ctrl.eqpt().journal()[0], EqptCall::SwitchToManipulation);
        assert_eq!(ctrl.arm_chain().len(), 9);
    }

    #[test]
    fn test_bad_end_link() {
        let params = Params {
            end_link: "link_tail".into(),
            ..fixtures::params()
        };

        assert!(matches!(
            MotionCtrl::new(SimManipEqpt::new(), params, stretch()),
            Err(MotionCtrlError::KinModel(KinModelError::ChainNotFound { .. }))
        ));

        // A bad end link at runtime leaves the previous chain in place
        let mut ctrl = fixtures::ctrl(SimManipEqpt::new());
        assert!(ctrl.set_end_link("link_tail").is_err());
        assert_eq!(ctrl.arm_chain().end_frame(), "link_grasp_center");

        assert_eq!(
            ctrl.set_end_link("link_gripper_fingertip_left").unwrap().len(),
            10
        );
    }

    #[test]
    fn test_get_joints() {
        let eqpt =
            SimManipEqpt::new().with_joints(PhysJointPositions([0.0, 0.4, 0.2, 0.0, -0.1, 0.0]));
        let mut ctrl = fixtures::ctrl(eqpt);

        let (names, values) = ctrl.get_joints().unwrap();
        assert_eq!(names.len(), 13);
        assert_eq!(names[0], "joint_fake");
        assert_eq!(names[12], "joint_head_tilt");
        assert_eq!(values[1], 0.4);
        assert_eq!(values[2], 0.05);
    }

    #[test]
    fn test_proc() {
        let mut ctrl = fixtures::ctrl(SimManipEqpt::new());

        let (out, _) = ctrl.proc(&InputData::default()).unwrap();
        assert!(out.is_none());

        let (out, report) = ctrl
            .proc(&InputData {
                cmd: Some(ManipCmd::Position {
                    lift_pos: Some(2.0),
                    arm_pos: None,
                    base_trans: None,
                    wrist_yaw: None,
                    wrist_pitch: None,
                    wrist_roll: None,
                    gripper_pos: None,
                    base_theta: None,
                    head_tilt: None,
                    head_pan: None,
                }),
            })
            .unwrap();

        assert!(matches!(out, Some(ManipResponse::Motion(_))));
        assert!(report.lift_limited);
        assert_eq!(ctrl.eqpt().joints()[PhysJointId::Lift], 1.1);
    }

    #[test]
    fn test_demo_script() {
        let cmds = comms_if::tc::parse_script(include_str!("../../../scripts/demo.json")).unwrap();
        let mut ctrl = fixtures::ctrl(SimManipEqpt::new().with_object_width(0.12));

        let mut responses = Vec::new();
        for cmd in cmds {
            let (out, _) = ctrl.proc(&InputData { cmd: Some(cmd) }).unwrap();
            responses.push(out.unwrap());
        }

        assert!(matches!(responses[0], ManipResponse::Motion(_)));
        assert!(matches!(responses[1], ManipResponse::Pose(_)));
        match &responses[2] {
            ManipResponse::Grasp(g) => assert!(g.resistance),
            r => panic!("Expected a grasp report, got {:?}", r),
        }
        assert!(matches!(responses[3], ManipResponse::Transform(_)));
        match &responses[4] {
            ManipResponse::Joints { names, .. } => assert_eq!(names.len(), 13),
            r => panic!("Expected joints, got {:?}", r),
        }

        // Responses can be archived
        assert!(serde_json::to_string(&responses).is_ok());
    }
}
