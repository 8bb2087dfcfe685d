//! Model types for queued messages.

/// A message waiting to be published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMessage {
    /// Unique identifier (the `UUID` column).
    pub id: String,
    /// Destination topic.
    pub topic: String,
    /// Payload bytes as stored.
    pub payload: Vec<u8>,
    /// Byte length recorded when the message was queued.
    pub payload_len: usize,
}

impl PendingMessage {
    /// The bytes to publish: the first `payload_len` bytes of the stored payload.
    pub fn payload(&self) -> &[u8] {
        let end = self.payload_len.min(self.payload.len());
        &self.payload[..end]
    }
}

/// A raw row from the `outgoing` table.
///
/// Columns are optional so that rows written by other clients with missing
/// values can be recognised and skipped instead of failing the whole read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRow {
    pub rowid: i64,
    pub id: Option<String>,
    pub topic: Option<String>,
    pub payload: Option<Vec<u8>>,
    pub payload_len: Option<i64>,
}

impl StoredRow {
    /// Convert into a [`PendingMessage`] if id, topic and payload are present.
    ///
    /// A missing or negative length falls back to the payload size or zero.
    pub fn into_pending(self) -> Option<PendingMessage> {
        let id = self.id?;
        let topic = self.topic?;
        let payload = self.payload?;
        let payload_len = match self.payload_len {
            Some(len) => usize::try_from(len).unwrap_or(0),
            None => payload.len(),
        };

        Some(PendingMessage {
            id,
            topic,
            payload,
            payload_len,
        })
    }
}
