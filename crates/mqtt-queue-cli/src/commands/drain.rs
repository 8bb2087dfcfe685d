//! Replay the queue to stdout.

use crate::output::{self, OutputFormat};
use anyhow::Result;
use mqtt_queue_replay::{
    OutgoingQueue, PublishError, PublishMessage, Publisher, QoS, ReplayReport,
};
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct DrainedMessage<'a> {
    topic: &'a str,
    payload: String,
    qos: QoS,
    from_queue: bool,
}

/// Writes each replayed message as one JSON line.
///
/// In dry-run mode every publish reports failure after the line is written,
/// so the replay pass keeps the message queued.
struct JsonLinesPublisher<W> {
    out: W,
    dry_run: bool,
}

impl<W: Write> Publisher for JsonLinesPublisher<W> {
    fn publish(&mut self, topic: &str, message: &PublishMessage<'_>) -> Result<(), PublishError> {
        let line = DrainedMessage {
            topic,
            payload: output::display_payload(message.payload),
            qos: message.qos,
            from_queue: message.from_queue,
        };
        let json =
            serde_json::to_string(&line).map_err(|e| PublishError::Rejected(e.to_string()))?;
        writeln!(self.out, "{}", json).map_err(|e| PublishError::Transport(e.to_string()))?;

        if self.dry_run {
            Err(PublishError::Rejected("dry run".to_string()))
        } else {
            Ok(())
        }
    }
}

/// Replay every queued message as a JSON line on stdout.
///
/// Each message is removed once its line has been written. With `dry_run`
/// nothing is removed.
pub fn drain(queue: &OutgoingQueue, qos: QoS, dry_run: bool, format: &OutputFormat) -> Result<()> {
    let mut publisher = JsonLinesPublisher {
        out: std::io::stdout().lock(),
        dry_run,
    };
    let report = queue.send_queued(qos, &mut publisher)?;
    drop(publisher);
    print_report(&report, dry_run, format)
}

fn print_report(report: &ReplayReport, dry_run: bool, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            output::print_heading(if dry_run { "Dry run" } else { "Drained" });
            output::print_row("Attempted", &report.attempted.to_string());
            output::print_row("Delivered", &report.delivered.to_string());
            output::print_row("Failed", &report.failed.to_string());
            output::print_row("Skipped", &report.skipped.to_string());
            output::print_row("Delete failures", &report.delete_failures.to_string());
        }
        OutputFormat::Json => output::print_json(report)?,
    }
    Ok(())
}
