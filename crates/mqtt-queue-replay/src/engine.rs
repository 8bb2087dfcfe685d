//! The replay pass.

use crate::{PublishMessage, Publisher, ReplayResult};
use mqtt_queue_config::QoS;
use mqtt_queue_database::OutgoingRepository;
use serde::Serialize;
use tracing::{debug, error, info, warn};

/// Outcome of one replay pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReplayReport {
    /// Messages handed to the publisher.
    pub attempted: usize,
    /// Messages the publisher confirmed.
    pub delivered: usize,
    /// Messages the publisher did not confirm; still queued.
    pub failed: usize,
    /// Rows skipped because id, topic or payload was missing.
    pub skipped: usize,
    /// Delivered messages whose deletion failed; they will be sent again.
    pub delete_failures: usize,
}

/// Publish every queued message and delete each one once it is delivered.
///
/// `qos` comes from the caller's current session settings, not from the
/// stored row. Publish failures and deletion failures are logged and
/// counted; only failing to read the queue aborts the pass.
pub fn replay<R, P>(repo: &R, qos: QoS, publisher: &mut P) -> ReplayResult<ReplayReport>
where
    R: OutgoingRepository + ?Sized,
    P: Publisher + ?Sized,
{
    let mut report = ReplayReport::default();

    if repo.count_outgoing()? == 0 {
        debug!("no message into the queue");
        return Ok(report);
    }

    for row in repo.list_outgoing()? {
        let rowid = row.rowid;
        let Some(msg) = row.into_pending() else {
            warn!(rowid, "skipping queued row with missing fields");
            report.skipped += 1;
            continue;
        };

        info!(id = %msg.id, "send queued message");
        report.attempted += 1;

        let request = PublishMessage::queued(qos, msg.payload());
        match publisher.publish(&msg.topic, &request) {
            Ok(()) => {
                report.delivered += 1;
                match repo.delete_outgoing(&msg.id) {
                    Ok(true) => {}
                    Ok(false) => debug!(id = %msg.id, "queued message already removed"),
                    Err(e) => {
                        error!(id = %msg.id, error = %e, "failed to delete message from queue");
                        report.delete_failures += 1;
                    }
                }
            }
            Err(e) => {
                warn!(id = %msg.id, topic = %msg.topic, error = %e, "queued message not delivered");
                report.failed += 1;
            }
        }
    }

    info!(
        attempted = report.attempted,
        delivered = report.delivered,
        failed = report.failed,
        skipped = report.skipped,
        "replay pass finished"
    );
    Ok(report)
}
