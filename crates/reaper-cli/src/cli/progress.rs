use parking_lot::Mutex;
use reaper::Progress;
use std::{
    io::{IsTerminal, Write},
    time::{Duration, Instant},
};

/// Minimum time between two redraws of the progress line.
const REDRAW_INTERVAL: Duration = Duration::from_millis(100);

/// Single-line progress display on stderr.
///
/// On a terminal the line is redrawn in place at most every
/// [`REDRAW_INTERVAL`]. Otherwise only the final line is printed.
pub struct TerminalProgress {
    enabled: bool,
    interactive: bool,
    state: Mutex<State>,
}

struct State {
    total: u64,
    current: u64,
    started: Instant,
    last_draw: Option<Instant>,
}

impl TerminalProgress {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            interactive: std::io::stderr().is_terminal(),
            state: Mutex::new(State {
                total: 0,
                current: 0,
                started: Instant::now(),
                last_draw: None,
            }),
        }
    }

    fn draw(line: &str, last: bool) {
        let mut stderr = std::io::stderr().lock();
        let end = if last { "\n" } else { "" };
        let _ = write!(stderr, "\r{line}{end}");
        let _ = stderr.flush();
    }
}

impl Progress for TerminalProgress {
    fn start(&self, total: u64) {
        let mut state = self.state.lock();
        state.total = total;
        state.current = 0;
        state.started = Instant::now();
        state.last_draw = None;
    }

    fn add(&self, n: u64) {
        let mut state = self.state.lock();
        state.current += n;

        if !self.enabled || !self.interactive {
            return;
        }
        let now = Instant::now();
        if state
            .last_draw
            .is_some_and(|last| now.duration_since(last) < REDRAW_INTERVAL)
        {
            return;
        }
        state.last_draw = Some(now);
        Self::draw(
            &format_line(now - state.started, state.current, state.total),
            false,
        );
    }

    fn done(&self) {
        if !self.enabled {
            return;
        }
        let state = self.state.lock();
        Self::draw(
            &format_line(state.started.elapsed(), state.current, state.total),
            true,
        );
    }
}

/// Renders `[0:03] 42.86%  3 / 7 files deleted`.
pub fn format_line(elapsed: Duration, current: u64, total: u64) -> String {
    let percent = if total == 0 {
        100.0
    } else {
        current as f64 * 100.0 / total as f64
    };
    format!(
        "[{}] {percent:.2}%  {current} / {total} files deleted",
        format_elapsed(elapsed)
    )
}

fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    let (hours, mins, secs) = (secs / 3600, secs / 60 % 60, secs % 60);
    if hours > 0 {
        format!("{hours}:{mins:02}:{secs:02}")
    } else {
        format!("{mins}:{secs:02}")
    }
}
