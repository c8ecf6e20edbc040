//! Realtime collection subscriptions.

use tokio::sync::mpsc;

use crate::error::StoreResult;
use crate::types::Document;

/// Snapshot channel capacity. Producers block once a consumer falls this far
/// behind.
pub const SNAPSHOT_BUFFER: usize = 16;

/// A stream of collection snapshots.
///
/// The first item is the current result of the subscribed query; every later
/// item is the full result after a change. Dropping the subscription closes
/// the channel, which stops the backend task producing snapshots.
#[derive(Debug)]
pub struct Subscription {
    collection: String,
    receiver: mpsc::Receiver<StoreResult<Vec<Document>>>,
}

/// Producer half of a [`Subscription`], held by backend tasks.
#[derive(Debug, Clone)]
pub struct SnapshotSender {
    sender: mpsc::Sender<StoreResult<Vec<Document>>>,
}

impl Subscription {
    /// Creates a subscription and the sender its backend task feeds.
    pub fn channel(collection: impl Into<String>) -> (SnapshotSender, Self) {
        let (sender, receiver) = mpsc::channel(SNAPSHOT_BUFFER);
        (
            SnapshotSender { sender },
            Self {
                collection: collection.into(),
                receiver,
            },
        )
    }

    /// Returns the subscribed collection.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Waits for the next snapshot.
    ///
    /// Returns `None` once the backend stops producing snapshots.
    pub async fn next(&mut self) -> Option<StoreResult<Vec<Document>>> {
        self.receiver.recv().await
    }

    /// Returns a snapshot if one is already queued.
    pub fn try_next(&mut self) -> Option<StoreResult<Vec<Document>>> {
        self.receiver.try_recv().ok()
    }
}

impl SnapshotSender {
    /// Sends a snapshot. Returns false once the subscription was dropped.
    pub async fn send(&self, snapshot: StoreResult<Vec<Document>>) -> bool {
        self.sender.send(snapshot).await.is_ok()
    }

    /// Completes once the subscription was dropped.
    pub async fn closed(&self) {
        self.sender.closed().await
    }

    /// Returns true once the subscription was dropped.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_channel_delivers_in_order() {
        let (sender, mut subscription) = Subscription::channel("leaves");
        assert!(sender.send(Ok(vec![])).await);
        assert!(
            sender
                .send(Ok(vec![Document::new("a", Default::default())]))
                .await
        );

        assert_eq!(subscription.collection(), "leaves");
        assert_eq!(subscription.next().await.unwrap().unwrap().len(), 0);
        assert_eq!(subscription.next().await.unwrap().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_drop_closes_sender() {
        let (sender, subscription) = Subscription::channel("leaves");
        drop(subscription);
        assert!(sender.is_closed());
        assert!(!sender.send(Ok(vec![])).await);
    }

    #[tokio::test]
    async fn test_next_returns_none_after_sender_dropped() {
        let (sender, mut subscription) = Subscription::channel("leaves");
        drop(sender);
        assert!(subscription.next().await.is_none());
    }
}
