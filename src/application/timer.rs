use crate::domain::ports::{Renderer, TickSchedulerBox, TickSource};
use crate::domain::scope::Scope;
use crate::domain::timer::{TimerState, format_elapsed};
use crate::error::Result;
use std::time::Duration;
use tracing::{debug, trace};

/// Tag name the timer registers under.
pub const TAG: &str = "timer";

/// Real-time period between ticks.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

const TIME_DISPLAY_ID: &str = "time-display";

const TEMPLATE: &str = r#"
<div class="container">
    <div class="time-display" id="time-display">00:00:00</div>
    <div class="controls">
        <button id="btn-start">Start</button>
        <button id="btn-stop">Stop</button>
        <button id="btn-reset">Reset</button>
    </div>
</div>
"#;

const STYLESHEET: &str = r#"
.container {
    background-color: #fff;
    padding: 20px;
    border-radius: 10px;
    text-align: center;
}
.time-display {
    font-size: 48px;
    margin: 20px 0;
    color: #333;
    font-family: monospace;
}
.controls {
    display: flex;
    gap: 10px;
    justify-content: center;
}
button {
    padding: 10px 20px;
    font-size: 16px;
    border: none;
    border-radius: 5px;
    cursor: pointer;
}
#btn-start { background-color: rgb(0, 139, 5); color: #fff; }
#btn-stop { background-color: rgb(182, 12, 0); color: #fff; }
#btn-reset { background-color: rgb(0, 89, 162); color: #fff; }
"#;

/// The stopwatch widget.
///
/// Holds the counting state machine and, while running, the handle of
/// the active tick source. The handle is the source of truth for the
/// running flag: starting when one exists is a no-op, stopping cancels
/// and clears it, and dropping the widget cancels it as well so no
/// periodic callback can reference a dead instance.
pub struct TimerWidget {
    scope: Scope,
    state: TimerState,
    ticker: Option<TickSource>,
    scheduler: TickSchedulerBox,
    detached: bool,
}

impl TimerWidget {
    /// Renders the timer template into a fresh scope and binds the
    /// widget to it.
    pub fn mount(renderer: &dyn Renderer, scheduler: TickSchedulerBox) -> Result<Self> {
        let scope = renderer.mount(TEMPLATE, STYLESHEET)?;
        let mut widget = Self {
            scope,
            state: TimerState::new(),
            ticker: None,
            scheduler,
            detached: false,
        };
        widget.render_display()?;
        Ok(widget)
    }

    /// Registers a once-per-second tick source and moves to running.
    /// No-op if already running.
    pub fn start(&mut self) {
        self.ensure_attached();
        if self.ticker.is_some() {
            return;
        }
        self.ticker = Some(self.scheduler.every(TICK_PERIOD));
        self.state.start();
        debug!("timer started");
    }

    /// Cancels the tick source and moves to stopped; the elapsed time is
    /// kept. No-op if already stopped.
    pub fn stop(&mut self) {
        self.ensure_attached();
        let Some(source) = self.ticker.take() else {
            return;
        };
        source.cancel();
        self.state.stop();
        debug!(elapsed = self.state.elapsed_seconds, "timer stopped");
    }

    /// Stops and zeroes the display.
    pub fn reset(&mut self) -> Result<()> {
        self.stop();
        self.state.reset();
        self.render_display()
    }

    /// Drains all pending ticks synchronously. Returns how many were
    /// applied.
    pub fn pump(&mut self) -> Result<usize> {
        let mut applied = 0;
        loop {
            let pending = match self.ticker.as_mut() {
                Some(source) => source.try_tick(),
                None => false,
            };
            if !pending {
                return Ok(applied);
            }
            self.apply_tick()?;
            applied += 1;
        }
    }

    /// Waits for the next tick and applies it. Returns false immediately
    /// when the timer is stopped or the source has closed.
    pub async fn next_tick(&mut self) -> Result<bool> {
        self.ensure_attached();
        let received = match self.ticker.as_mut() {
            Some(source) => source.tick().await,
            None => false,
        };
        if received {
            self.apply_tick()?;
        }
        Ok(received)
    }

    pub fn is_running(&self) -> bool {
        self.ticker.is_some()
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.state.elapsed_seconds
    }

    /// The rendered `HH:MM:SS` display text.
    pub fn display(&self) -> Result<&str> {
        self.scope.text(TIME_DISPLAY_ID)
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Detaches the widget, cancelling any active tick source. Driving a
    /// detached widget is a programming error and panics.
    pub fn detach(&mut self) {
        if let Some(source) = self.ticker.take() {
            source.cancel();
        }
        self.state.stop();
        self.detached = true;
    }

    fn apply_tick(&mut self) -> Result<()> {
        if self.state.tick() {
            trace!(elapsed = self.state.elapsed_seconds, "tick");
            self.render_display()?;
        }
        Ok(())
    }

    fn render_display(&mut self) -> Result<()> {
        let text = format_elapsed(self.state.elapsed_seconds);
        self.scope.set_text(TIME_DISPLAY_ID, &text)
    }

    fn ensure_attached(&self) {
        assert!(!self.detached, "timer widget used after detach");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::scheduler::ManualScheduler;
    use crate::infrastructure::template_renderer::TemplateRenderer;

    fn mount_manual() -> (TimerWidget, ManualScheduler) {
        let scheduler = ManualScheduler::new();
        let widget = TimerWidget::mount(&TemplateRenderer, Box::new(scheduler.clone())).unwrap();
        (widget, scheduler)
    }

    #[test]
    fn test_mount_renders_zero_display() {
        let (widget, _scheduler) = mount_manual();
        assert_eq!(widget.display().unwrap(), "00:00:00");
        assert!(!widget.is_running());
    }

    #[test]
    fn test_three_ticks_advance_the_display() {
        let (mut widget, scheduler) = mount_manual();
        widget.start();
        scheduler.fire();
        scheduler.fire();
        scheduler.fire();

        assert_eq!(widget.pump().unwrap(), 3);
        assert_eq!(widget.display().unwrap(), "00:00:03");
        assert_eq!(widget.elapsed_seconds(), 3);
    }

    #[test]
    fn test_double_start_keeps_a_single_tick_source() {
        let (mut widget, scheduler) = mount_manual();
        widget.start();
        widget.start();
        assert_eq!(scheduler.active_sources(), 1);

        scheduler.fire();
        assert_eq!(widget.pump().unwrap(), 1);
        assert_eq!(widget.elapsed_seconds(), 1);
    }

    #[test]
    fn test_stop_keeps_elapsed_and_cancels_source() {
        let (mut widget, scheduler) = mount_manual();
        widget.start();
        scheduler.fire();
        widget.pump().unwrap();

        widget.stop();
        assert!(!widget.is_running());
        assert_eq!(scheduler.active_sources(), 0);
        assert_eq!(widget.display().unwrap(), "00:00:01");

        // Ticks fired while stopped go nowhere.
        scheduler.fire();
        assert_eq!(widget.pump().unwrap(), 0);
        assert_eq!(widget.elapsed_seconds(), 1);
    }

    #[test]
    fn test_reset_while_running_stops_and_zeroes() {
        let (mut widget, scheduler) = mount_manual();
        widget.start();
        scheduler.fire();
        scheduler.fire();
        widget.pump().unwrap();

        widget.reset().unwrap();
        assert!(!widget.is_running());
        assert_eq!(widget.display().unwrap(), "00:00:00");
        assert_eq!(scheduler.active_sources(), 0);
    }

    #[test]
    fn test_drop_cancels_the_tick_source() {
        let (mut widget, scheduler) = mount_manual();
        widget.start();
        assert_eq!(scheduler.active_sources(), 1);
        drop(widget);
        assert_eq!(scheduler.active_sources(), 0);
    }

    #[test]
    #[should_panic(expected = "used after detach")]
    fn test_detached_widget_panics_on_start() {
        let (mut widget, _scheduler) = mount_manual();
        widget.detach();
        widget.start();
    }
}
