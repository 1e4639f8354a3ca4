use crate::{Error, Result};

/// Number of concurrent removal workers used when nothing else is configured.
pub const DEFAULT_NUM_WORKERS: usize = 8;

/// How a run reacts to a failed removal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FailurePolicy {
    /// Warn, count the attempt and keep going. The run never fails.
    #[default]
    BestEffort,
    /// Cancel the run and return the first error.
    FailFast,
}

/// Tunables for a [`Deleter`](crate::Deleter).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeleteConfig {
    /// Number of workers issuing removals concurrently. Fixed for the whole
    /// run, whatever the size of the set.
    pub num_workers: usize,
}

impl Default for DeleteConfig {
    fn default() -> Self {
        Self {
            num_workers: DEFAULT_NUM_WORKERS,
        }
    }
}

impl DeleteConfig {
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `num_workers` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.num_workers == 0 {
            return Err(Error::InvalidConfig {
                reason: "num_workers must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}
