//! Command execution
//!
//! Turns a parsed `Command` into at most one `ReminderStore` mutation and a
//! reply line for display.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.5.0

use log::{debug, warn};

use super::parser::{self, Command};
use crate::features::reminders::{Reminder, ReminderStore};

pub const REPLY_NO_REMINDERS: &str = "No active reminders.";
pub const REPLY_DELETED: &str = "Deleted.";
pub const REPLY_NOT_FOUND: &str = "Not found.";
pub const REPLY_NOT_UNDERSTOOD: &str = "Command not understood.";

/// Executes utterances against the shared reminder store
#[derive(Clone)]
pub struct CommandHandler {
    store: ReminderStore,
    wake_word: String,
}

impl CommandHandler {
    pub fn new(store: ReminderStore, wake_word: impl Into<String>) -> Self {
        Self {
            store,
            wake_word: wake_word.into(),
        }
    }

    pub fn wake_word(&self) -> &str {
        &self.wake_word
    }

    /// Handle one raw utterance. Blank input produces no reply.
    pub async fn handle(&self, raw: &str) -> Option<String> {
        if raw.trim().is_empty() {
            return None;
        }

        let Some(command) = parser::parse(raw, &self.wake_word) else {
            debug!("Rejected utterance without wake word: {raw}");
            return Some(self.wake_word_prompt());
        };

        debug!("Parsed {command:?}");
        Some(self.execute(command).await)
    }

    /// Run a parsed command and produce its reply
    pub async fn execute(&self, command: Command) -> String {
        match command {
            Command::Schedule { minutes, message } => {
                match self.store.add(minutes, &message).await {
                    Ok(_) => format!(
                        "Reminder saved: in {minutes} min. It fires while the standby service is running."
                    ),
                    Err(e) => {
                        warn!("Failed to save reminder: {e:#}");
                        format!("Could not save reminders: {e}")
                    }
                }
            }
            Command::List => {
                let active = self.store.list_active().await;
                format_active(&active, self.store.clock().now_secs())
            }
            Command::Delete { index } => match self.store.delete_by_index(index).await {
                Ok(true) => REPLY_DELETED.to_string(),
                Ok(false) => REPLY_NOT_FOUND.to_string(),
                Err(e) => {
                    warn!("Failed to delete reminder #{index}: {e:#}");
                    format!("Could not save reminders: {e}")
                }
            },
            Command::Help => self.help_text(),
            Command::Unknown => REPLY_NOT_UNDERSTOOD.to_string(),
        }
    }

    pub fn wake_word_prompt(&self) -> String {
        format!("Command must start with \"{} ...\"", self.wake_word)
    }

    pub fn help_text(&self) -> String {
        let wake = &self.wake_word;
        format!(
            "Commands:\n- {wake} remind in 30 minutes: ...\n- {wake} show reminders\n- {wake} delete reminder 2"
        )
    }
}

/// Numbered list of active reminders with whole minutes left
pub fn format_active(reminders: &[Reminder], now: i64) -> String {
    if reminders.is_empty() {
        return REPLY_NO_REMINDERS.to_string();
    }

    let lines: Vec<String> = reminders
        .iter()
        .enumerate()
        .map(|(i, r)| format!("{}. in ~{} min: {}", i + 1, r.minutes_left(now), r.text))
        .collect();
    format!("Reminders:\n{}", lines.join("\n"))
}
