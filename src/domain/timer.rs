/// The stopwatch counting state machine.
///
/// `running` mirrors whether the owning widget holds an active tick
/// source; `elapsed_seconds` only advances while running and is only
/// cleared by [`reset`](TimerState::reset).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimerState {
    pub elapsed_seconds: u64,
    pub running: bool,
}

impl TimerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves to running. Returns false if already running (no-op).
    pub fn start(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        true
    }

    /// Moves to stopped, elapsed time unchanged. Returns false if
    /// already stopped (no-op).
    pub fn stop(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;
        true
    }

    /// Stops and zeroes the elapsed time.
    pub fn reset(&mut self) {
        self.running = false;
        self.elapsed_seconds = 0;
    }

    /// Advances by one second. Ticks arriving while stopped are ignored.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.elapsed_seconds += 1;
        true
    }
}

/// Renders elapsed seconds as `HH:MM:SS`, each part zero-padded to
/// width 2. Hour counts of 100 or more simply widen the hours part.
pub fn format_elapsed(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}
