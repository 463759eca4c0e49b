use anyhow::Result;
use dotenvy::dotenv;
use log::info;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use jarvis::commands::CommandHandler;
use jarvis::core::{Config, SystemClock};
use jarvis::features::reminders::{JsonFileBackend, ReminderStore};

/// Print the reply the way the assistant's log view shows it
fn print_exchange(raw: &str, reply: Option<String>) {
    println!("> {raw}");
    if let Some(reply) = reply {
        println!("[JARVIS] {reply}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!(
        "JARVIS ready (wake word: {}, reminders: {})",
        config.wake_word,
        config.reminders_file.display()
    );

    let store = ReminderStore::new(
        Arc::new(JsonFileBackend::new(&config.reminders_file)),
        Arc::new(SystemClock),
    );
    let handler = CommandHandler::new(store, config.wake_word.clone());

    // One-shot mode: `assistant jarvis show reminders`
    let args: Vec<String> = std::env::args().skip(1).collect();
    if !args.is_empty() {
        let raw = args.join(" ");
        let reply = handler.handle(&raw).await;
        print_exchange(&raw, reply);
        return Ok(());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let reply = handler.handle(&line).await;
        print_exchange(&line, reply);
    }

    Ok(())
}
