//! Fixed inter-request throttle

use std::time::Duration;
use tokio::time::sleep;
use tracing::info;

/// Fixed pause between requests. Does not adapt to quota headers.
#[derive(Debug, Clone, Copy)]
pub struct Throttle {
    delay: Duration,
}

impl Throttle {
    /// Create new throttle
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// No pause at all
    pub fn none() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Wait the configured delay before the next request
    pub async fn pause(&self) {
        if self.delay.is_zero() {
            return;
        }
        info!("Waiting {} seconds before next request…", self.delay.as_secs());
        sleep(self.delay).await;
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(Duration::from_secs(60))
    }
}
