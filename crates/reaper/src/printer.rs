//! User-facing diagnostics emitted while deleting.
//!
//! Every failed removal produces one warning; every successful removal may
//! produce one verbose trace line. Whether either is shown is a presentation
//! decision made by the [`Printer`] implementation.

use core::fmt;

/// Verbosity level at which per-object removal traces are shown.
pub const TRACE_VERBOSITY: u8 = 3;

/// Receives diagnostics from a deletion run.
pub trait Printer: Send + Sync {
    /// A removal failed.
    fn warn(&self, msg: fmt::Arguments<'_>);

    /// A removal succeeded.
    fn verbose(&self, msg: fmt::Arguments<'_>);
}

/// Output settings shared by the printers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OutputMode {
    /// Machine-readable output is active; human text is suppressed.
    pub json: bool,
    /// Only errors and warnings are shown.
    pub quiet: bool,
    /// Higher values show more detail.
    pub verbosity: u8,
}

impl OutputMode {
    pub const fn shows_warnings(&self) -> bool {
        !self.json
    }

    pub const fn shows_traces(&self) -> bool {
        !self.json && !self.quiet && self.verbosity >= TRACE_VERBOSITY
    }

    /// Progress is only drawn for interactive, non-quiet output.
    pub const fn shows_progress(&self) -> bool {
        !self.json && !self.quiet
    }
}

/// Writes warnings to stderr and traces to stdout, honoring an [`OutputMode`].
#[derive(Clone, Copy, Debug, Default)]
pub struct StdPrinter {
    mode: OutputMode,
}

impl StdPrinter {
    pub const fn new(mode: OutputMode) -> Self {
        Self { mode }
    }
}

impl Printer for StdPrinter {
    fn warn(&self, msg: fmt::Arguments<'_>) {
        if self.mode.shows_warnings() {
            eprintln!("{msg}");
        }
    }

    fn verbose(&self, msg: fmt::Arguments<'_>) {
        if self.mode.shows_traces() {
            println!("{msg}");
        }
    }
}

/// Discards all diagnostics.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopPrinter;

impl Printer for NoopPrinter {
    fn warn(&self, _msg: fmt::Arguments<'_>) {}

    fn verbose(&self, _msg: fmt::Arguments<'_>) {}
}
