//! Advisory change notifications.
//!
//! Services publish a [`SyncSignal`] after each successful mutation; the SSE
//! endpoint forwards signals for the caller's family. Signals are hints for
//! clients to re-fetch, never a source of truth: publishing never blocks,
//! never fails the mutation, and is dropped when nobody listens.

use shared::SyncTopic;
use tokio::sync::broadcast;
use tracing::debug;

const DEFAULT_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSignal {
    pub topic: SyncTopic,
    /// Id of the parent owning the changed data
    pub family_id: String,
}

#[derive(Debug, Clone)]
pub struct SyncHub {
    sender: broadcast::Sender<SyncSignal>,
}

impl SyncHub {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn publish(&self, family_id: &str, topic: SyncTopic) {
        let signal = SyncSignal {
            topic,
            family_id: family_id.to_string(),
        };
        match self.sender.send(signal) {
            Ok(receivers) => debug!("Sync {:?} for family {} to {} subscribers", topic, family_id, receivers),
            Err(_) => debug!("Sync {:?} for family {} dropped, no subscribers", topic, family_id),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SyncSignal> {
        self.sender.subscribe()
    }
}

impl Default for SyncHub {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_without_subscribers_is_harmless() {
        let hub = SyncHub::default();
        hub.publish("p1", SyncTopic::Tasks);
    }

    #[tokio::test]
    async fn test_subscribers_receive_signals() {
        let hub = SyncHub::default();
        let mut rx = hub.subscribe();

        hub.publish("p1", SyncTopic::Wishes);

        let signal = rx.recv().await.unwrap();
        assert_eq!(signal.topic, SyncTopic::Wishes);
        assert_eq!(signal.family_id, "p1");
    }

    #[tokio::test]
    async fn test_slow_subscriber_lags_instead_of_blocking() {
        let hub = SyncHub::new(2);
        let mut rx = hub.subscribe();

        for _ in 0..5 {
            hub.publish("p1", SyncTopic::Tasks);
        }

        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(_))
        ));
    }
}
