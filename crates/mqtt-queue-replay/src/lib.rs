//! # Outgoing queue replay
//!
//! Resubmits queued MQTT publishes after a reconnect and removes each one
//! only after the transport confirms delivery.
//!
//! ## Delivery guarantees
//!
//! - A queued message is deleted only after a successful publish
//! - A failed publish leaves the message queued for the next pass
//! - Messages are published and deleted one at a time, so a crash
//!   mid-pass leaves at most one message that may be delivered twice
//!
//! ```text
//! reconnect ──▶ send_queued ──▶ count ──▶ list ──▶ publish ──▶ delete
//!                                  │                  │
//!                                  └─ 0: return       └─ error: keep, continue
//! ```
//!
//! ## Example
//!
//! ```rust
//! use mqtt_queue_database::QueueStore;
//! use mqtt_queue_replay::{OutgoingQueue, QoS, RecordingPublisher};
//!
//! let mut queue = OutgoingQueue::from_store(QueueStore::open_in_memory().unwrap());
//! queue.enqueue("sensors/temp", b"21C").unwrap();
//!
//! let mut publisher = RecordingPublisher::new();
//! let report = queue.send_queued(QoS::AtLeastOnce, &mut publisher).unwrap();
//!
//! assert_eq!(report.delivered, 1);
//! assert_eq!(queue.pending_count().unwrap(), 0);
//! ```

mod engine;
mod error;
mod message;
mod publisher;
mod queue;

#[cfg(test)]
mod tests;

pub use engine::{replay, ReplayReport};
pub use error::{ReplayError, ReplayResult};
pub use message::PublishMessage;
pub use mqtt_queue_config::QoS;
pub use publisher::{PublishError, PublishedRecord, Publisher, RecordingPublisher};
pub use queue::{Delivery, OutgoingQueue};
