//! Cross-page cache invalidation.
//!
//! Deleting a product changes the `productCount` of its category and
//! subcategory, so pages that mirror those collections subscribe here and
//! refetch when the product page publishes [`Invalidation::ProductRemoved`].

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use storedash_client::ResourceBackend;

use crate::error::SyncError;
use crate::synchronizer::Synchronizer;

const CHANNEL_CAPACITY: usize = 64;

/// Something changed on the server that other collections derive from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invalidation {
    ProductRemoved,
}

/// In-process pub/sub for [`Invalidation`] events. Clones share the channel.
#[derive(Debug, Clone)]
pub struct InvalidationBus {
    sender: broadcast::Sender<Invalidation>,
}

impl Default for InvalidationBus {
    fn default() -> Self {
        Self::new()
    }
}

impl InvalidationBus {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Delivers `event` to every live subscriber. Having none is not an error.
    pub fn publish(&self, event: Invalidation) {
        match self.sender.send(event) {
            Ok(receivers) => tracing::debug!(?event, receivers, "invalidation published"),
            Err(_) => tracing::debug!(?event, "invalidation published with no subscribers"),
        }
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Reloads `sync` every time `event` is published, until the returned
    /// [`Subscription`] is dropped or the synchronizer is unmounted.
    #[must_use]
    pub fn subscribe_refetch<B: ResourceBackend>(
        &self,
        sync: Synchronizer<B>,
        event: Invalidation,
    ) -> Subscription {
        let mut receiver = self.sender.subscribe();
        let task = tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(received) if received == event => {}
                    Ok(_) => continue,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "invalidation listener lagged; refetching once");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::debug!("invalidation bus closed; listener stopping");
                        break;
                    }
                }
                match sync.load().await {
                    Ok(()) => {}
                    Err(SyncError::Unmounted) => break,
                    Err(err) => tracing::warn!(error = %err, "refetch after invalidation failed"),
                }
            }
        });
        Subscription { task }
    }
}

/// Listener handle; dropping it stops the listener.
#[derive(Debug)]
pub struct Subscription {
    task: JoinHandle<()>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_without_subscribers_is_a_no_op() {
        let bus = InvalidationBus::new();
        assert_eq!(bus.subscriber_count(), 0);
        bus.publish(Invalidation::ProductRemoved);
    }

    #[tokio::test]
    async fn clones_share_the_channel() {
        let bus = InvalidationBus::new();
        let mut receiver = bus.clone().sender.subscribe();
        bus.publish(Invalidation::ProductRemoved);
        assert_eq!(receiver.recv().await.unwrap(), Invalidation::ProductRemoved);
    }
}
