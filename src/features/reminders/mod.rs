//! # Reminders Feature
//!
//! Persisted one-shot reminders shared between the foreground assistant and
//! the standby service, with exactly-once background delivery.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 2.0.0: Whole-document backends, soft-failing store, restart-safe scheduler
//! - 1.0.0: Initial release with polling scheduler

pub mod backend;
pub mod model;
pub mod notification;
pub mod scheduler;
pub mod store;

pub use backend::{JsonFileBackend, MemoryBackend, Mutation, ReminderBackend};
pub use model::{Reminder, ReminderSet};
pub use notification::{LogNotifier, NotificationSink};
pub use scheduler::{ReminderScheduler, ScanReport};
pub use store::ReminderStore;
