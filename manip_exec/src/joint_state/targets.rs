//! Named joint targets

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{JointId, JointStateError};
use crate::kin_model::JointChain;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A set of joint targets, joints which aren't included keep their current
/// value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JointTargets(BTreeMap<JointId, f64>);

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl JointTargets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Targets from a chain's joint values, in chain order.
    pub fn from_chain(chain: &JointChain, values: &[f64]) -> Result<Self, JointStateError> {
        let mut targets = Self::new();

        for (name, &value) in chain.joint_names().into_iter().zip(values) {
            targets.set(name.parse()?, value);
        }

        Ok(targets)
    }

    /// Builder style [`JointTargets::set`].
    pub fn with(mut self, id: JointId, value: f64) -> Self {
        self.set(id, value);
        self
    }

    pub fn set(&mut self, id: JointId, value: f64) {
        self.0.insert(id, value);
    }

    pub fn get(&self, id: JointId) -> Option<f64> {
        self.0.get(&id).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (JointId, f64)> + '_ {
        self.0.iter().map(|(id, v)| (*id, *v))
    }
}
