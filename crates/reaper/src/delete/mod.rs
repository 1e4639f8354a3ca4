//! Parallel removal of a set of repository objects.
//!
//! A deletion run has two stages connected by a zero-capacity handoff channel:
//!
//! - the **dispatcher** walks the [`IdSet`](crate::IdSet) and hands identifiers
//!   to the channel one at a time, stopping as soon as the run is cancelled;
//! - a fixed pool of **workers** pulls identifiers, removes the matching
//!   [`Handle`](crate::Handle) from the [`Backend`](crate::Backend), reports
//!   progress and applies the run's [`FailurePolicy`].
//!
//! All participants share one cancellation token. Under
//! [`FailurePolicy::FailFast`] the first failing worker stores its error and
//! raises the token under the same lock, so exactly one error leaves the run.
//!
//! ## Entry points
//!
//! - [`Deleter::delete_files`] - best effort: failures become warnings and the
//!   run always completes.
//! - [`Deleter::delete_files_checked`] - fail fast: the first failure (or an
//!   external cancellation) stops the run and is returned.

mod config;
mod context;
mod deleter;
mod dispatcher;
mod summary;
mod worker;

#[cfg(test)]
mod tests;

pub use config::*;
pub use deleter::*;
pub use summary::*;
