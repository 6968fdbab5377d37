//! Unread message counter
//!
//! The counter is refreshed every five seconds until its token is cancelled.
//! Subscribers watch the latest value through a [`watch::Receiver`], which
//! holds `None` until the first successful fetch.
//! [`PollerHandle::refresh_now`] forces an immediate refresh.

use super::http::PortalApi;
use crate::types::PortalError;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Notify};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Polls the unread message count of the customer
pub struct NotificationPoller<A> {
    api: A,
    interval: Duration,
    sender: watch::Sender<Option<u32>>,
    refresh: Arc<Notify>,
    token: CancellationToken,
}

/// Control side of a running [`NotificationPoller`]
#[derive(Debug, Clone)]
pub struct PollerHandle {
    receiver: watch::Receiver<Option<u32>>,
    refresh: Arc<Notify>,
    token: CancellationToken,
}

impl PollerHandle {
    /// Latest known unread count, 0 before the first fetch
    pub fn count(&self) -> u32 {
        self.receiver.borrow().unwrap_or(0)
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<u32>> {
        self.receiver.clone()
    }

    /// Ask the poller to fetch the count right away
    pub fn refresh_now(&self) {
        self.refresh.notify_one();
    }

    /// Stop polling
    pub fn stop(&self) {
        self.token.cancel();
    }
}

impl<A: PortalApi> NotificationPoller<A> {
    pub fn new(api: A, token: CancellationToken) -> (Self, PollerHandle) {
        let (sender, receiver) = watch::channel(None);
        let refresh = Arc::new(Notify::new());

        let handle = PollerHandle {
            receiver,
            refresh: Arc::clone(&refresh),
            token: token.clone(),
        };
        let poller = NotificationPoller {
            api,
            interval: POLL_INTERVAL,
            sender,
            refresh,
            token,
        };
        (poller, handle)
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Poll until cancelled
    ///
    /// The first fetch happens immediately. Failed fetches keep the last
    /// published count.
    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = self.token.cancelled() => break,
                _ = ticker.tick() => {}
                _ = self.refresh.notified() => {
                    tracing::debug!("Unread count refresh requested");
                    ticker.reset();
                }
            }

            match self.api.unread_count(&self.token).await {
                Ok(count) => {
                    self.sender.send_if_modified(|current| {
                        let changed = *current != Some(count);
                        *current = Some(count);
                        changed
                    });
                }
                Err(PortalError::Cancelled) => break,
                Err(e) => tracing::warn!("Failed to refresh unread count: {}", e),
            }
        }

        tracing::debug!("Notification poller stopped");
    }
}
