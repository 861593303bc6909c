use crate::domain::form::{PaymentFormSnapshot, Receipt};
use crate::domain::ports::PaymentGateway;
use crate::error::{Result, WidgetError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

/// Placeholder for a real payment backend: always succeeds after a fixed
/// delay.
pub struct StubGateway {
    delay: Duration,
    sequence: AtomicU64,
}

impl StubGateway {
    /// A stub resolving after the default 1 second delay.
    pub fn new() -> Self {
        Self::with_delay(Duration::from_millis(1000))
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            sequence: AtomicU64::new(0),
        }
    }
}

impl Default for StubGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaymentGateway for StubGateway {
    async fn submit(&self, snapshot: &PaymentFormSnapshot) -> Result<Receipt> {
        debug!(card_holder = %snapshot.card_holder, "stub gateway accepted snapshot");
        tokio::time::sleep(self.delay).await;
        let number = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        Ok(Receipt {
            reference: format!("stub-{number:06}"),
        })
    }
}

/// Gateway that rejects every submission; for harnesses exercising the
/// failure path.
pub struct FailingGateway;

#[async_trait]
impl PaymentGateway for FailingGateway {
    async fn submit(&self, _snapshot: &PaymentFormSnapshot) -> Result<Receipt> {
        Err(WidgetError::Gateway("payment declined".to_string()))
    }
}
