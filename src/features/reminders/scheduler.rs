//! # Reminder Scheduler
//!
//! Background loop that delivers due reminders exactly once. Each scan claims
//! every active reminder whose due time has passed by tombstoning it inside a
//! single backend update, then dispatches the claimed reminders. Claiming
//! happens under the backend's exclusive update, so foreground writes made
//! while notifications are being dispatched are never overwritten, and the
//! persisted `done` flag prevents re-delivery after a restart.
//!
//! Delivery is best-effort: a reminder whose dispatch fails is logged and
//! stays tombstoned, so one broken notification never blocks the rest.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.5.0
//!
//! ## Changelog
//! - 1.1.0: Claim due reminders in one transactional update before dispatch
//! - 1.0.0: Load, dispatch, save scan cycle

use log::{debug, error, info, warn};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

use super::model::{Reminder, ReminderSet};
use super::notification::NotificationSink;
use super::store::ReminderStore;

/// Outcome of a single scan cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Notifications dispatched successfully
    pub delivered: usize,
    /// Dispatches that returned an error (still tombstoned)
    pub failed: usize,
    /// Whether an updated document was written
    pub persisted: bool,
}

impl ScanReport {
    pub fn is_idle(&self) -> bool {
        self.delivered == 0 && self.failed == 0
    }
}

pub struct ReminderScheduler {
    store: ReminderStore,
    sink: Arc<dyn NotificationSink>,
    interval: Duration,
}

impl ReminderScheduler {
    pub fn new(store: ReminderStore, sink: Arc<dyn NotificationSink>, interval: Duration) -> Self {
        Self {
            store,
            sink,
            interval,
        }
    }

    /// Raise the service indicator and scan forever at the configured interval
    pub async fn run(&self) {
        if let Err(e) = self.sink.notify_service_status(true).await {
            warn!("Failed to raise service indicator: {e:#}");
        }

        info!(
            "Reminder scheduler started (interval: {:?})",
            self.interval
        );

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            let report = self.scan_once().await;
            if !report.is_idle() {
                debug!("Scan finished: {report:?}");
            }
        }
    }

    /// Lower the service indicator
    pub async fn shutdown(&self) {
        if let Err(e) = self.sink.notify_service_status(false).await {
            warn!("Failed to lower service indicator: {e:#}");
        }
        info!("Reminder scheduler stopped");
    }

    /// Run one scan cycle
    pub async fn scan_once(&self) -> ScanReport {
        let now = self.store.clock().now_secs();
        let mut claimed: Vec<Reminder> = Vec::new();
        let mut report = ScanReport::default();

        let outcome = self
            .store
            .update(Box::new(|set: &mut ReminderSet| {
                let mut fired: HashSet<i64> = HashSet::new();
                let mut changed = false;

                for reminder in set.reminders.iter_mut().filter(|r| r.is_due(now)) {
                    reminder.done = true;
                    changed = true;

                    if fired.insert(reminder.id) {
                        claimed.push(reminder.clone());
                    } else {
                        warn!(
                            "Reminder id {} appeared twice in one scan, not dispatching again",
                            reminder.id
                        );
                    }
                }
                changed
            }))
            .await;

        match outcome {
            Ok(_) => report.persisted = !claimed.is_empty(),
            Err(e) => error!("Failed to persist delivered reminders: {e:#}"),
        }

        for reminder in &claimed {
            match self
                .sink
                .notify_reminder(&reminder.text, reminder.notification_id())
                .await
            {
                Ok(()) => {
                    info!("Delivered reminder {}: {}", reminder.id, reminder.text);
                    report.delivered += 1;
                }
                Err(e) => {
                    error!("Failed to deliver reminder {}: {e:#}", reminder.id);
                    report.failed += 1;
                }
            }
        }

        report
    }
}
