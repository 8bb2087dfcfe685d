//! The delivery capability supplied by the transport.

use crate::PublishMessage;
use mqtt_queue_config::QoS;
use std::collections::HashSet;
use thiserror::Error;

/// Why a publish did not complete.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PublishError {
    /// No broker connection.
    #[error("not connected")]
    NotConnected,

    /// The broker or client refused the message.
    #[error("publish rejected: {0}")]
    Rejected(String),

    /// Lower-level transport failure.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Sends a message to the broker.
///
/// `Ok(())` means delivery is confirmed and the queued copy may be deleted.
pub trait Publisher {
    fn publish(&mut self, topic: &str, message: &PublishMessage<'_>) -> Result<(), PublishError>;
}

impl<F> Publisher for F
where
    F: FnMut(&str, &PublishMessage<'_>) -> Result<(), PublishError>,
{
    fn publish(&mut self, topic: &str, message: &PublishMessage<'_>) -> Result<(), PublishError> {
        self(topic, message)
    }
}

/// A publish call captured by [`RecordingPublisher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedRecord {
    pub topic: String,
    pub payload: Vec<u8>,
    pub qos: QoS,
    pub retained: bool,
    pub dup: bool,
    pub id: u16,
    pub from_queue: bool,
    /// Whether this call was answered with success.
    pub succeeded: bool,
}

/// A publisher that records every call, for tests.
///
/// Succeeds unless the call index or topic has been marked as failing.
#[derive(Debug, Default)]
pub struct RecordingPublisher {
    calls: Vec<PublishedRecord>,
    failing_calls: HashSet<usize>,
    failing_topics: HashSet<String>,
    fail_all: bool,
}

impl RecordingPublisher {
    /// Creates a publisher that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a publisher that rejects everything.
    pub fn always_failing() -> Self {
        Self {
            fail_all: true,
            ..Self::default()
        }
    }

    /// Fail the `n`th call (zero-based).
    pub fn fail_call(mut self, n: usize) -> Self {
        self.failing_calls.insert(n);
        self
    }

    /// Fail every call for `topic`.
    pub fn fail_topic(mut self, topic: &str) -> Self {
        self.failing_topics.insert(topic.to_string());
        self
    }

    /// Returns all recorded calls.
    pub fn calls(&self) -> &[PublishedRecord] {
        &self.calls
    }

    /// Returns the successful calls only.
    pub fn delivered(&self) -> Vec<&PublishedRecord> {
        self.calls.iter().filter(|c| c.succeeded).collect()
    }

    /// Returns the number of recorded calls.
    pub fn len(&self) -> usize {
        self.calls.len()
    }

    /// Returns true if nothing has been published.
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }
}

impl Publisher for RecordingPublisher {
    fn publish(&mut self, topic: &str, message: &PublishMessage<'_>) -> Result<(), PublishError> {
        let index = self.calls.len();
        let fail = self.fail_all
            || self.failing_calls.contains(&index)
            || self.failing_topics.contains(topic);

        let len = message.payload_len.min(message.payload.len());
        self.calls.push(PublishedRecord {
            topic: topic.to_string(),
            payload: message.payload[..len].to_vec(),
            qos: message.qos,
            retained: message.retained,
            dup: message.dup,
            id: message.id,
            from_queue: message.from_queue,
            succeeded: !fail,
        });

        if fail {
            Err(PublishError::NotConnected)
        } else {
            Ok(())
        }
    }
}
