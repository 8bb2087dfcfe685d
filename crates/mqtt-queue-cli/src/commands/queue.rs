//! Queue inspection and editing commands.

use crate::output::{self, OutputFormat};
use anyhow::Result;
use mqtt_queue_database::OutgoingRepository;
use mqtt_queue_replay::OutgoingQueue;
use serde::Serialize;
use serde_json::json;

#[derive(Serialize)]
struct QueuedEntry {
    rowid: i64,
    id: Option<String>,
    topic: Option<String>,
    payload: Option<String>,
    payload_len: Option<i64>,
}

/// Show how many messages are queued.
pub fn count(queue: &OutgoingQueue, format: &OutputFormat) -> Result<()> {
    let pending = queue.pending_count()?;
    match format {
        OutputFormat::Text => println!("{}", pending),
        OutputFormat::Json => output::print_json(&json!({ "pending": pending }))?,
    }
    Ok(())
}

/// List queued messages in replay order.
pub fn list(queue: &OutgoingQueue, format: &OutputFormat) -> Result<()> {
    let entries: Vec<QueuedEntry> = queue
        .store()
        .list_outgoing()?
        .into_iter()
        .map(|row| QueuedEntry {
            rowid: row.rowid,
            id: row.id,
            topic: row.topic,
            payload: row.payload.as_deref().map(output::display_payload),
            payload_len: row.payload_len,
        })
        .collect();

    match format {
        OutputFormat::Text => {
            if entries.is_empty() {
                println!("No queued messages");
                return Ok(());
            }
            println!("{:<36} {:<24} {:>6}  {}", "ID", "Topic", "Bytes", "Payload");
            println!("{}", "-".repeat(100));
            for entry in &entries {
                let len = entry
                    .payload_len
                    .map(|l| l.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{:<36} {:<24} {:>6}  {}",
                    entry.id.as_deref().unwrap_or("-"),
                    entry.topic.as_deref().unwrap_or("-"),
                    len,
                    entry.payload.as_deref().unwrap_or("-"),
                );
            }
        }
        OutputFormat::Json => output::print_json(&entries)?,
    }
    Ok(())
}

/// Queue a message.
pub fn enqueue(
    queue: &mut OutgoingQueue,
    topic: &str,
    payload: &str,
    format: &OutputFormat,
) -> Result<()> {
    let id = queue.enqueue(topic, payload.as_bytes())?;
    match format {
        OutputFormat::Text => output::print_success(&format!("Queued: {}", id), format),
        OutputFormat::Json => output::print_json(&json!({ "id": id, "topic": topic }))?,
    }
    Ok(())
}

/// Remove a queued message by ID.
pub fn remove(queue: &OutgoingQueue, id: &str, format: &OutputFormat) -> Result<()> {
    if queue.store().delete_outgoing(id)? {
        output::print_success(&format!("Removed: {}", id), format);
        Ok(())
    } else {
        anyhow::bail!("No queued message with ID {}", id)
    }
}
