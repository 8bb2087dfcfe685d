//! mqtt-queue - inspect and maintain the MQTT outgoing queue.

mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

/// Inspect, edit and drain the queue of unsent MQTT publishes.
#[derive(Parser)]
#[command(name = "mqtt-queue")]
#[command(about = "Inspect and maintain the MQTT outgoing message queue")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (text or json)
    #[arg(short, long, default_value = "text", global = true)]
    format: output::OutputFormat,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "MQTT_QUEUE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Queue database file, overriding the configured location
    #[arg(long, global = true)]
    db: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the number of queued messages
    Count,

    /// List queued messages
    List,

    /// Queue a message for later delivery
    Enqueue {
        /// Destination topic
        topic: String,
        /// Message payload
        payload: String,
    },

    /// Remove a queued message
    Remove {
        /// Message ID
        id: String,
    },

    /// Print the queue as a SQL script
    Export,

    /// Replay queued messages to stdout as JSON lines and remove them
    Drain {
        /// Show what would be sent without removing anything
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = commands::load_config(cli.db.as_deref()).and_then(|config| {
        let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
        mqtt_queue_config::init_logging(level);
        debug!(db = %config.database_file().display(), "using queue database");

        let mut queue = commands::open_queue(&config)?;
        let outcome = match cli.command {
            Commands::Count => commands::count(&queue, &cli.format),
            Commands::List => commands::list(&queue, &cli.format),
            Commands::Enqueue { topic, payload } => {
                commands::enqueue(&mut queue, &topic, &payload, &cli.format)
            }
            Commands::Remove { id } => commands::remove(&queue, &id, &cli.format),
            Commands::Export => commands::export(&queue),
            Commands::Drain { dry_run } => {
                commands::drain(&queue, config.qos, dry_run, &cli.format)
            }
        };
        let closed = queue.close();
        commands::finish(outcome, closed)
    });

    if let Err(e) = result {
        output::print_error(&format!("{:#}", e), &cli.format);
        std::process::exit(1);
    }
}
