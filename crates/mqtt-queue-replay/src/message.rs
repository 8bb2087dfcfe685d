//! Publish request handed to the transport.

use mqtt_queue_config::QoS;

/// A publish request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishMessage<'a> {
    pub qos: QoS,
    pub retained: bool,
    pub dup: bool,
    /// Packet identifier; `0` lets the transport assign one.
    pub id: u16,
    pub payload: &'a [u8],
    pub payload_len: usize,
    /// Set when the message comes from the queue. A publisher must not
    /// queue such a message again on failure, since it is still stored.
    pub from_queue: bool,
}

impl<'a> PublishMessage<'a> {
    /// A fresh publish from the application.
    pub fn new(qos: QoS, payload: &'a [u8]) -> Self {
        Self {
            qos,
            retained: false,
            dup: false,
            id: 0,
            payload,
            payload_len: payload.len(),
            from_queue: false,
        }
    }

    /// A replayed publish: flags cleared, marked as coming from the queue.
    pub fn queued(qos: QoS, payload: &'a [u8]) -> Self {
        Self {
            from_queue: true,
            ..Self::new(qos, payload)
        }
    }
}
