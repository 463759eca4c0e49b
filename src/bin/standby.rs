use anyhow::Result;
use dotenvy::dotenv;
use log::{error, info};
use std::sync::Arc;
use std::time::Duration;

use jarvis::core::{Config, SystemClock};
use jarvis::features::reminders::{JsonFileBackend, LogNotifier, ReminderScheduler, ReminderStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!(
        "Starting JARVIS standby service for {}",
        config.reminders_file.display()
    );

    let store = ReminderStore::new(
        Arc::new(JsonFileBackend::new(&config.reminders_file)),
        Arc::new(SystemClock),
    );
    let scheduler = ReminderScheduler::new(
        store,
        Arc::new(LogNotifier),
        Duration::from_secs(config.poll_interval_secs),
    );

    tokio::select! {
        _ = scheduler.run() => {}
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                error!("Failed to listen for shutdown signal: {e}");
            }
        }
    }

    scheduler.shutdown().await;
    Ok(())
}
