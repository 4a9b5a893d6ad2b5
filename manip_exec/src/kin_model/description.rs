//! Robot description, the static link/joint graph read from a URDF file.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::debug;
use nalgebra::{Unit, Vector3};
use std::collections::HashMap;
use std::path::Path;

use super::{pose_from_xyz_rpy, KinModelError, Pose};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The kind of motion a joint allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JointKind {
    Revolute,
    Continuous,
    Prismatic,
    Fixed,
}

/// A joint of the robot description.
#[derive(Debug, Clone)]
pub struct DescJoint {
    pub name: String,
    pub kind: JointKind,

    /// Name of the parent link.
    pub parent: String,

    /// Name of the child link.
    pub child: String,

    /// Transform from the parent link frame to the joint frame.
    pub origin: Pose,

    /// Axis of motion in the joint frame.
    pub axis: Unit<Vector3<f64>>,

    /// Position limits, infinite for continuous joints.
    ///
    /// Units: radians or meters
    pub limits: [f64; 2],
}

/// The static link and joint graph of the robot.
///
/// The graph is a tree: every link except the root has exactly one parent
/// joint.
#[derive(Debug, Clone)]
pub struct RobotDescription {
    name: String,
    links: Vec<String>,
    joints: Vec<DescJoint>,

    /// Index into `joints` of each link's parent joint.
    parent_joint: HashMap<String, usize>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl JointKind {
    /// True if the joint has a position which can be commanded.
    pub fn is_actuated(self) -> bool {
        !matches!(self, JointKind::Fixed)
    }
}

impl RobotDescription {
    /// Parse a description from URDF text.
    pub fn from_urdf_str(urdf: &str) -> Result<Self, KinModelError> {
        let robot = urdf_rs::read_from_string(urdf)
            .map_err(|e| KinModelError::Description(e.to_string()))?;

        Self::from_robot(&robot)
    }

    /// Load a description from a URDF file.
    pub fn from_urdf_file<P: AsRef<Path>>(path: P) -> Result<Self, KinModelError> {
        let urdf = std::fs::read_to_string(path.as_ref())
            .map_err(|e| KinModelError::DescriptionIo(path.as_ref().to_path_buf(), e))?;

        Self::from_urdf_str(&urdf)
    }

    fn from_robot(robot: &urdf_rs::Robot) -> Result<Self, KinModelError> {
        let links: Vec<String> = robot.links.iter().map(|l| l.name.clone()).collect();

        let joints = robot
            .joints
            .iter()
            .map(convert_joint)
            .collect::<Result<Vec<_>, _>>()?;

        let mut parent_joint = HashMap::new();
        for (i, joint) in joints.iter().enumerate() {
            if parent_joint.insert(joint.child.clone(), i).is_some() {
                return Err(KinModelError::Description(format!(
                    "Link {:?} has more than one parent joint",
                    joint.child
                )));
            }
        }

        // Every link must reach a root within one step per joint
        'links: for joint in &joints {
            let mut link = joint.child.as_str();
            for _ in 0..=joints.len() {
                match parent_joint.get(link) {
                    Some(&i) => link = joints[i].parent.as_str(),
                    None => continue 'links,
                }
            }

            return Err(KinModelError::Description(format!(
                "Joint {:?} has a cycle in its parent links",
                joint.name
            )));
        }

        debug!(
            "Loaded robot description {:?} with {} links and {} joints",
            robot.name,
            links.len(),
            joints.len()
        );

        Ok(Self {
            name: robot.name.clone(),
            links,
            joints,
            parent_joint,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn links(&self) -> &[String] {
        &self.links
    }

    pub fn joints(&self) -> &[DescJoint] {
        &self.joints
    }

    /// True if the link (or joint child frame) exists in the description.
    pub fn has_link(&self, link: &str) -> bool {
        self.links.iter().any(|l| l == link) || self.parent_joint.contains_key(link)
    }

    /// Find a joint by name.
    pub fn joint(&self, name: &str) -> Option<&DescJoint> {
        self.joints.iter().find(|j| j.name == name)
    }

    /// The joint whose child is `link`, or `None` for the root link.
    pub fn parent_joint(&self, link: &str) -> Option<&DescJoint> {
        self.parent_joint.get(link).map(|&i| &self.joints[i])
    }

    /// The joints on the path from `root` down to `end`, in order from the
    /// root.
    pub fn path(&self, root: &str, end: &str) -> Result<Vec<&DescJoint>, KinModelError> {
        let not_found = || KinModelError::ChainNotFound {
            root: root.to_string(),
            end: end.to_string(),
        };

        if !self.has_link(root) || !self.has_link(end) {
            return Err(not_found());
        }

        // Walk up the tree from the end link, the root must be one of its
        // ancestors.
        let mut path = Vec::new();
        let mut link = end;
        while link != root {
            let joint = self.parent_joint(link).ok_or_else(not_found)?;
            path.push(joint);
            link = &joint.parent;
        }

        path.reverse();
        Ok(path)
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn convert_joint(joint: &urdf_rs::Joint) -> Result<DescJoint, KinModelError> {
    let kind = match joint.joint_type {
        urdf_rs::JointType::Revolute => JointKind::Revolute,
        urdf_rs::JointType::Continuous => JointKind::Continuous,
        urdf_rs::JointType::Prismatic => JointKind::Prismatic,
        urdf_rs::JointType::Fixed => JointKind::Fixed,
        ref other => {
            return Err(KinModelError::Description(format!(
                "Joint {:?} has unsupported type {:?}",
                joint.name, other
            )))
        }
    };

    let axis = Vector3::new(joint.axis.xyz[0], joint.axis.xyz[1], joint.axis.xyz[2]);
    let axis = match kind {
        JointKind::Fixed => Vector3::x_axis(),
        _ => Unit::try_new(axis, 1e-9).ok_or_else(|| {
            KinModelError::Description(format!("Joint {:?} has a zero axis", joint.name))
        })?,
    };

    // urdf-rs reports missing limits as zero, treat an empty range as
    // unbounded
    let has_limits = (joint.limit.upper - joint.limit.lower).abs() > f64::EPSILON;
    let limits = match kind {
        JointKind::Revolute | JointKind::Prismatic if has_limits => {
            [joint.limit.lower, joint.limit.upper]
        }
        _ => [f64::NEG_INFINITY, f64::INFINITY],
    };

    Ok(DescJoint {
        name: joint.name.clone(),
        kind,
        parent: joint.parent.link.clone(),
        child: joint.child.link.clone(),
        origin: pose_from_xyz_rpy(
            [
                joint.origin.xyz[0],
                joint.origin.xyz[1],
                joint.origin.xyz[2],
            ],
            [
                joint.origin.rpy[0],
                joint.origin.rpy[1],
                joint.origin.rpy[2],
            ],
        ),
        axis,
        limits,
    })
}

#[cfg(test)]
mod test {
    use super::super::fixtures;
    use super::*;

    #[test]
    fn test_load_description() {
        let desc = fixtures::stretch();

        assert_eq!(desc.name(), "stretch_manip");
        assert!(desc.has_link("link_grasp_center"));
        assert!(!desc.has_link("link_tail"));

        let lift = desc.joint("joint_lift").unwrap();
        assert_eq!(lift.kind, JointKind::Prismatic);
        assert_eq!(lift.limits, [0.0, 1.1]);
        assert_eq!(lift.parent, "link_mast");

        assert!(!desc.joint("joint_mast").unwrap().kind.is_actuated());
    }

    #[test]
    fn test_path() {
        let desc = fixtures::stretch();

        let names: Vec<&str> = desc
            .path("base_link", "link_wrist_yaw")
            .unwrap()
            .iter()
            .map(|j| j.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                "joint_fake",
                "joint_mast",
                "joint_lift",
                "joint_arm_l4",
                "joint_arm_l3",
                "joint_arm_l2",
                "joint_arm_l1",
                "joint_arm_l0",
                "joint_wrist_yaw"
            ]
        );

        assert!(desc.path("base_link", "base_link").unwrap().is_empty());

        // Siblings and unknown links have no downward path
        assert!(matches!(
            desc.path("link_head", "link_grasp_center"),
            Err(KinModelError::ChainNotFound { .. })
        ));
        assert!(matches!(
            desc.path("base_link", "link_tail"),
            Err(KinModelError::ChainNotFound { .. })
        ));
    }

    #[test]
    fn test_bad_description() {
        assert!(matches!(
            RobotDescription::from_urdf_str("<robot name=\"x\"><joint></robot>"),
            Err(KinModelError::Description(_))
        ));

        let planar = r#"<robot name="p">
              <link name="a"/><link name="b"/>
              <joint name="j" type="planar">
                <parent link="a"/><child link="b"/>
              </joint>
            </robot>"#;
        assert!(matches!(
            RobotDescription::from_urdf_str(planar),
            Err(KinModelError::Description(_))
        ));
    }

    #[test]
    fn test_cyclic_description() {
        let cyclic = r#"<robot name="c">
              <link name="base"/><link name="a"/><link name="b"/>
              <joint name="ab" type="fixed">
                <parent link="a"/><child link="b"/>
              </joint>
              <joint name="ba" type="fixed">
                <parent link="b"/><child link="a"/>
              </joint>
            </robot>"#;

        assert!(matches!(
            RobotDescription::from_urdf_str(cyclic),
            Err(KinModelError::Description(_))
        ));
    }
}
