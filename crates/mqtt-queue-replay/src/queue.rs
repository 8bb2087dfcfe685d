//! Entry points for the MQTT client.

use crate::{replay, PublishMessage, Publisher, ReplayReport, ReplayResult};
use mqtt_queue_config::{Config, QoS};
use mqtt_queue_database::{OutgoingRepository, QueueStore};
use tracing::{debug, warn};

/// Result of [`OutgoingQueue::publish_or_enqueue`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// The publisher confirmed the message.
    Sent,
    /// The publish failed and the message was queued under this id.
    Queued(String),
}

/// The outgoing queue as seen by the MQTT client.
///
/// Owns the store for its whole lifetime; the client calls
/// [`send_queued`](Self::send_queued) when it reconnects.
#[derive(Debug)]
pub struct OutgoingQueue {
    store: QueueStore,
}

impl OutgoingQueue {
    /// Open the queue storage described by `config`.
    pub fn init_queue(config: &Config) -> ReplayResult<Self> {
        let store = QueueStore::open(config)?;
        Ok(Self { store })
    }

    /// Wrap an already opened store.
    pub fn from_store(store: QueueStore) -> Self {
        Self { store }
    }

    /// Queue a message for a later replay pass.
    pub fn enqueue(&mut self, topic: &str, payload: &[u8]) -> ReplayResult<String> {
        Ok(self.store.insert_outgoing(topic, payload)?)
    }

    /// Publish now, or queue the message if the publish is not confirmed.
    pub fn publish_or_enqueue<P>(
        &mut self,
        topic: &str,
        payload: &[u8],
        qos: QoS,
        publisher: &mut P,
    ) -> ReplayResult<Delivery>
    where
        P: Publisher + ?Sized,
    {
        match publisher.publish(topic, &PublishMessage::new(qos, payload)) {
            Ok(()) => Ok(Delivery::Sent),
            Err(e) => {
                debug!(topic, error = %e, "publish failed, queueing");
                let id = self.enqueue(topic, payload)?;
                Ok(Delivery::Queued(id))
            }
        }
    }

    /// Number of queued messages.
    pub fn pending_count(&self) -> ReplayResult<i64> {
        Ok(self.store.count_outgoing()?)
    }

    /// Run one replay pass over the queue.
    pub fn send_queued<P>(&self, qos: QoS, publisher: &mut P) -> ReplayResult<ReplayReport>
    where
        P: Publisher + ?Sized,
    {
        let report = replay(&self.store, qos, publisher)?;
        if report.delete_failures > 0 {
            warn!(
                count = report.delete_failures,
                "delivered messages left in queue after delete failure"
            );
        }
        Ok(report)
    }

    /// Borrow the underlying store.
    pub fn store(&self) -> &QueueStore {
        &self.store
    }

    /// Close the storage. Safe to call more than once.
    pub fn close(&mut self) -> ReplayResult<()> {
        Ok(self.store.close()?)
    }
}
