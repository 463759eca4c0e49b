// Core layer - configuration and clock
pub mod core;

// Features layer - reminder storage, scheduling and delivery
pub mod features;

// Application layer - wake word and command handling
pub mod commands;

pub use crate::core::Config;

pub use commands::{Command, CommandHandler};
pub use features::{
    JsonFileBackend, LogNotifier, MemoryBackend, NotificationSink, Reminder, ReminderBackend,
    ReminderScheduler, ReminderSet, ReminderStore, ScanReport,
};
