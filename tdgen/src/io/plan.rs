//! Session plan parsing.
//!
//! A plan is a TOML script of reclassification steps replayed against the
//! store, in order:
//!
//! ```toml
//! [[step]]
//! select = { kind = "action", position = 0 }
//! move_to = { target = "new-property", direction = "get" }
//!
//! [[step]]
//! move_to = { target = "existing-property", direction = "set", position = 2 }
//! ```
//!
//! A step without `select` moves whatever the previous step left selected.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::core::types::{AffordanceKind, MoveTarget};

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Plan {
    #[serde(default, rename = "step")]
    pub steps: Vec<PlanStep>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PlanStep {
    #[serde(default)]
    pub select: Option<SelectStep>,
    #[serde(default)]
    pub move_to: Option<MoveTarget>,
}

/// Positional address of the affordance to select.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct SelectStep {
    pub kind: AffordanceKind,
    pub position: usize,
}

impl Plan {
    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("read plan {}", path.display()))?;
        Self::parse_str(&contents).with_context(|| format!("load plan {}", path.display()))
    }

    pub fn parse_str(contents: &str) -> Result<Self> {
        let plan: Plan = toml::from_str(contents).context("parse plan")?;
        plan.validate()?;
        Ok(plan)
    }

    fn validate(&self) -> Result<()> {
        for (index, step) in self.steps.iter().enumerate() {
            if step.select.is_none() && step.move_to.is_none() {
                bail!("step[{}] must have select, move_to, or both", index);
            }
        }
        Ok(())
    }
}
