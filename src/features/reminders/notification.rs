//! Notification delivery interface
//!
//! Platform notification plumbing lives outside this crate; the scheduler and
//! the binaries only talk to a `NotificationSink`.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.5.0

use anyhow::Result;
use async_trait::async_trait;
use log::info;

#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Show a one-shot, dismissible notification carrying `text`
    async fn notify_reminder(&self, text: &str, notification_id: i64) -> Result<()>;

    /// Raise or lower the "standby service is running" indicator
    async fn notify_service_status(&self, active: bool) -> Result<()>;
}

/// Sink that reports notifications through the log and standard output
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl NotificationSink for LogNotifier {
    async fn notify_reminder(&self, text: &str, notification_id: i64) -> Result<()> {
        info!("🔔 Reminder notification {notification_id}: {text}");
        println!("[Reminder] {text}");
        Ok(())
    }

    async fn notify_service_status(&self, active: bool) -> Result<()> {
        if active {
            info!("JARVIS standby is on");
        } else {
            info!("JARVIS standby is off");
        }
        Ok(())
    }
}
