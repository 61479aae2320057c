//! Pacing between consecutive requests.

use async_trait::async_trait;
use std::time::Duration;

/// Decides how long to wait between consecutive requests of a multi-request operation, such as
/// [`Client::get_all_posts`][`crate::Client::get_all_posts`].
///
/// This is politeness throttling only. Nothing here reacts to rate-limit responses.
#[async_trait]
pub trait Pacer: Send + Sync {
    /// Waits before the next request.
    async fn pause(&self);
}

/// Does not wait at all.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoDelay;

#[async_trait]
impl Pacer for NoDelay {
    async fn pause(&self) {}
}

/// Sleeps for a fixed duration. The default is 30 milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedDelay(pub Duration);

impl Default for FixedDelay {
    fn default() -> FixedDelay {
        FixedDelay(Duration::from_millis(30))
    }
}

#[async_trait]
impl Pacer for FixedDelay {
    async fn pause(&self) {
        tokio::time::sleep(self.0).await;
    }
}
