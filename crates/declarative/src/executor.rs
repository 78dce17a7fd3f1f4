//! Lifecycle dispatch - runs one operation per resource instance

use crate::data::ResourceData;
use crate::resource::Resource;
use anyhow::Result;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A lifecycle operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
}

impl Operation {
    /// Whether the operation needs every required field declared
    pub fn needs_full_config(self) -> bool {
        matches!(self, Self::Create | Self::Update)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Operation {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "create" => Ok(Self::Create),
            "read" => Ok(Self::Read),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            other => anyhow::bail!("unknown operation: {other}"),
        }
    }
}

/// Result of running one operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Created,
    Refreshed,
    Updated,
    Deleted,
    /// The operation failed; tracked state may be partially written
    Failed { error: String },
}

impl Outcome {
    fn success(op: Operation) -> Self {
        match op {
            Operation::Create => Self::Created,
            Operation::Read => Self::Refreshed,
            Operation::Update => Self::Updated,
            Operation::Delete => Self::Deleted,
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }
}

/// Counts of batch results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn add(&mut self, outcome: &Outcome) {
        if outcome.is_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }
}

impl<'a> FromIterator<&'a Outcome> for BatchSummary {
    fn from_iter<I: IntoIterator<Item = &'a Outcome>>(iter: I) -> Self {
        let mut summary = Self::default();
        for outcome in iter {
            summary.add(outcome);
        }
        summary
    }
}

/// Run one lifecycle operation against one instance
///
/// Create and Update check required fields first and fail without calling
/// the resource when any are missing.
pub fn execute(resource: &dyn Resource, op: Operation, data: &mut ResourceData) -> Outcome {
    log::debug!("{} {}", op, resource.type_name());

    if op.needs_full_config() {
        if let Err(e) = data.validate() {
            return Outcome::Failed {
                error: format!("invalid {} configuration: {e}", resource.type_name()),
            };
        }
    }

    let result = match op {
        Operation::Create => resource.create(data),
        Operation::Read => resource.read(data),
        Operation::Update => resource.update(data),
        Operation::Delete => resource.delete(data),
    };

    match result {
        Ok(()) => Outcome::success(op),
        Err(e) => {
            log::debug!("{} {} failed: {e:#}", op, resource.type_name());
            Outcome::Failed {
                error: format!("{e:#}"),
            }
        }
    }
}

/// Run one operation for many independent instances
///
/// Instances are dispatched across `jobs` threads. Each invocation owns its
/// own state handle; results come back in input order.
pub fn execute_batch(
    resource: &dyn Resource,
    op: Operation,
    items: Vec<ResourceData>,
    jobs: usize,
) -> Result<Vec<(ResourceData, Outcome)>> {
    if jobs <= 1 || items.len() <= 1 {
        return Ok(items
            .into_iter()
            .map(|mut data| {
                let outcome = execute(resource, op, &mut data);
                (data, outcome)
            })
            .collect());
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to create thread pool: {}", e))?;

    Ok(pool.install(|| {
        items
            .into_par_iter()
            .map(|mut data| {
                let outcome = execute(resource, op, &mut data);
                (data, outcome)
            })
            .collect()
    }))
}
