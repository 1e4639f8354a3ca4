use super::FailurePolicy;
use crate::FileType;
use core::fmt;

/// Tally of one deletion run.
///
/// `attempted` is the progress count: successes, plus failures under
/// [`FailurePolicy::BestEffort`]. A removal that aborted a
/// [`FailurePolicy::FailFast`] run shows up in `failed` but not in
/// `attempted`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DeleteSummary {
    pub file_type: FileType,
    pub policy: FailurePolicy,
    /// Size of the input set.
    pub total: u64,
    pub attempted: u64,
    pub removed: u64,
    pub failed: u64,
    /// The run stopped before every object was handed to a worker, or was
    /// cancelled while finishing.
    pub cancelled: bool,
}

impl DeleteSummary {
    /// Number of objects that were never handed to a worker.
    pub const fn skipped(&self) -> u64 {
        self.total.saturating_sub(self.removed + self.failed)
    }

    pub const fn is_complete(&self) -> bool {
        self.removed + self.failed == self.total
    }
}

impl fmt::Display for DeleteSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "removed {} of {} {} files",
            self.removed, self.total, self.file_type
        )?;
        if self.failed > 0 {
            write!(f, ", {} failed", self.failed)?;
        }
        if self.skipped() > 0 {
            write!(f, ", {} skipped", self.skipped())?;
        }
        Ok(())
    }
}
