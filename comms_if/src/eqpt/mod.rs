//! # Equipment Interface
//!
//! This module defines the interface structures which are exchanged with the
//! manipulator equipment.

// -----------------------------------------------------------------------------------------------
// MODULES
// -----------------------------------------------------------------------------------------------

pub mod manip;

// -----------------------------------------------------------------------------------------------
// EXPORTS
// -----------------------------------------------------------------------------------------------

pub use manip::{EqptError, ManipDems, PhysJointId, PhysJointPositions, NUM_PHYS_JOINTS};
