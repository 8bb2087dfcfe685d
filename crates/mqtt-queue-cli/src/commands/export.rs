//! SQL export.

use anyhow::Result;
use mqtt_queue_database::export_sql;
use mqtt_queue_replay::OutgoingQueue;

/// Print every queued message as a SQL script that rebuilds the queue.
pub fn export(queue: &OutgoingQueue) -> Result<()> {
    print!("{}", export_sql(queue.store())?);
    Ok(())
}
