use crate::domain::form::{PaymentFormSnapshot, Receipt};
use crate::domain::scope::Scope;
use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Accepts a payment snapshot and resolves with a receipt or an opaque
/// error. The gateway call is the only asynchronous boundary of the
/// payment form.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn submit(&self, snapshot: &PaymentFormSnapshot) -> Result<Receipt>;
}

pub type PaymentGatewayBox = Box<dyn PaymentGateway>;

/// Produces an isolated, styled element scope from a template markup
/// string and a stylesheet string.
pub trait Renderer {
    fn mount(&self, markup: &str, stylesheet: &str) -> Result<Scope>;
}

/// Host-provided source of periodic ticks for the timer widget.
pub trait TickScheduler: Send + Sync {
    /// Registers a new tick source firing once per `period`.
    fn every(&self, period: Duration) -> TickSource;
}

pub type TickSchedulerBox = Box<dyn TickScheduler>;

/// Handle to an active periodic tick source.
///
/// Ticks arrive over the owned channel; dropping or cancelling the
/// handle detaches the source so no callback can outlive its widget.
pub struct TickSource {
    rx: mpsc::UnboundedReceiver<()>,
    task: Option<JoinHandle<()>>,
}

impl TickSource {
    /// A source whose ticks are pushed externally (manual schedulers).
    pub fn detached(rx: mpsc::UnboundedReceiver<()>) -> Self {
        Self { rx, task: None }
    }

    /// A source backed by a spawned task that is aborted on cancel.
    pub fn with_task(rx: mpsc::UnboundedReceiver<()>, task: JoinHandle<()>) -> Self {
        Self {
            rx,
            task: Some(task),
        }
    }

    /// Waits for the next tick. Returns false once the source is closed.
    pub async fn tick(&mut self) -> bool {
        self.rx.recv().await.is_some()
    }

    /// Consumes a pending tick without waiting, if one has arrived.
    pub fn try_tick(&mut self) -> bool {
        self.rx.try_recv().is_ok()
    }

    /// Cancels the source, dropping any pending ticks.
    pub fn cancel(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.rx.close();
    }
}

impl Drop for TickSource {
    fn drop(&mut self) {
        self.shutdown();
    }
}
