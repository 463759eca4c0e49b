//! # Features
//!
//! Feature modules of the assistant. Reminders are the only feature with
//! state that outlives a command.

pub mod reminders;

pub use reminders::{
    JsonFileBackend, LogNotifier, MemoryBackend, NotificationSink, Reminder, ReminderBackend,
    ReminderScheduler, ReminderSet, ReminderStore, ScanReport,
};
