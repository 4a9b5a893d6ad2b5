//! # Manipulator telecommands

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use structopt::StructOpt;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A command that can be completed by the manipulator.
#[derive(Debug, Clone, Serialize, Deserialize, StructOpt)]
pub enum ManipCmd {
    /// Move any of the base, lift, arm, wrist, gripper or head.
    ///
    /// Fields which aren't given are left where they are. If `base_theta` is
    /// given the base is rotated and nothing else moves.
    #[structopt(name = "pos")]
    Position {
        /// Absolute lift height.
        ///
        /// Units: meters
        #[structopt(long, allow_hyphen_values = true)]
        lift_pos: Option<f64>,

        /// Absolute arm extension.
        ///
        /// Units: meters
        #[structopt(long, allow_hyphen_values = true)]
        arm_pos: Option<f64>,

        /// Base translation relative to the current base position.
        ///
        /// Units: meters
        #[structopt(long, allow_hyphen_values = true)]
        base_trans: Option<f64>,

        /// Units: radians
        #[structopt(long, allow_hyphen_values = true)]
        wrist_yaw: Option<f64>,

        /// Units: radians. Values above 0.1 are limited to 0.1.
        #[structopt(long, allow_hyphen_values = true)]
        wrist_pitch: Option<f64>,

        /// Units: radians
        #[structopt(long, allow_hyphen_values = true)]
        wrist_roll: Option<f64>,

        /// Gripper opening normalised between 0 (closed) and 1 (open).
        #[structopt(long, allow_hyphen_values = true)]
        gripper_pos: Option<f64>,

        /// Base rotation.
        ///
        /// Units: radians
        #[structopt(long, allow_hyphen_values = true)]
        base_theta: Option<f64>,

        /// Units: radians
        #[structopt(long, allow_hyphen_values = true)]
        head_tilt: Option<f64>,

        /// Units: radians
        #[structopt(long, allow_hyphen_values = true)]
        head_pan: Option<f64>,
    },

    /// Move the end link by a translation and rotation expressed in the end
    /// link's own frame.
    ///
    /// The rotation is intrinsic X-Y-Z: roll, then pitch about the rolled Y
    /// axis, then yaw about the resulting Z axis.
    #[structopt(name = "pose")]
    Pose {
        /// Units: meters
        #[structopt(long, default_value = "0.0", allow_hyphen_values = true)]
        x: f64,

        /// Units: meters
        #[structopt(long, default_value = "0.0", allow_hyphen_values = true)]
        y: f64,

        /// Units: meters
        #[structopt(long, default_value = "0.0", allow_hyphen_values = true)]
        z: f64,

        /// Rotation about the end link's X axis.
        ///
        /// Units: radians
        #[structopt(long, default_value = "0.0", allow_hyphen_values = true)]
        roll: f64,

        /// Rotation about the rolled Y axis.
        ///
        /// Units: radians
        #[structopt(long, default_value = "0.0", allow_hyphen_values = true)]
        pitch: f64,

        /// Rotation about the rolled and pitched Z axis.
        ///
        /// Units: radians
        #[structopt(long, default_value = "0.0", allow_hyphen_values = true)]
        yaw: f64,

        /// Move the lift on its own before the rest of the joints.
        #[structopt(long)]
        staged: bool,
    },

    /// Get the transform taking points in `frame_a` into `frame_b`.
    #[structopt(name = "tf")]
    Transform { frame_a: String, frame_b: String },

    /// Report all joint names and values.
    #[structopt(name = "joints")]
    Joints,

    /// Change the link that pose commands move.
    #[structopt(name = "end-link")]
    SetEndLink { link: String },

    /// Close the gripper until it meets resistance.
    #[structopt(name = "grasp")]
    Grasp,

    /// Pick up an object at the given depth.
    #[structopt(name = "pickup")]
    Pickup {
        /// Units: meters
        #[structopt(default_value = "0.0")]
        depth: f64,
    },
}
