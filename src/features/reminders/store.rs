//! # Reminder Store
//!
//! Reminder operations over a shared `ReminderBackend`. Nothing is cached:
//! every read reloads the document, and every mutation is a backend `update`
//! that reloads, changes and writes back in one exclusive step, so writes from
//! the assistant and the standby service never overwrite each other.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.5.0
//!
//! ## Changelog
//! - 1.1.0: Mutations go through transactional backend updates
//! - 1.0.0: Load, save, add, list and delete over a backend

use anyhow::{anyhow, Result};
use log::{info, warn};
use std::sync::Arc;

use super::backend::{Mutation, ReminderBackend};
use super::model::{Reminder, ReminderSet};
use crate::core::Clock;

#[derive(Clone)]
pub struct ReminderStore {
    backend: Arc<dyn ReminderBackend>,
    clock: Arc<dyn Clock>,
}

impl ReminderStore {
    pub fn new(backend: Arc<dyn ReminderBackend>, clock: Arc<dyn Clock>) -> Self {
        Self { backend, clock }
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Load the full collection. Read failures degrade to an empty set.
    pub async fn load(&self) -> ReminderSet {
        match self.backend.load().await {
            Ok(set) => set,
            Err(e) => {
                warn!("Failed to load reminders, starting empty: {e:#}");
                ReminderSet::default()
            }
        }
    }

    /// Replace the persisted collection
    pub async fn save(&self, set: &ReminderSet) -> Result<()> {
        self.update(Box::new(|current: &mut ReminderSet| {
            *current = set.clone();
            true
        }))
        .await
        .map(|_| ())
    }

    /// Apply `mutation` to the freshly loaded collection and persist it
    pub async fn update(&self, mutation: Mutation<'_>) -> Result<ReminderSet> {
        self.backend.update(mutation).await
    }

    /// Create a reminder due `minutes` from now and persist it
    pub async fn add(&self, minutes: u32, text: &str) -> Result<Reminder> {
        let now_millis = self.clock.now_millis();
        let mut created = None;

        self.update(Box::new(|set: &mut ReminderSet| {
            let reminder = Reminder {
                id: set.next_id(now_millis),
                due: now_millis.div_euclid(1000) + i64::from(minutes) * 60,
                text: text.to_string(),
                done: false,
            };
            set.reminders.push(reminder.clone());
            created = Some(reminder);
            true
        }))
        .await?;

        let reminder = created.ok_or_else(|| anyhow!("Reminder was not created"))?;
        info!(
            "Created reminder {} due at {} ({} min)",
            reminder.id, reminder.due, minutes
        );
        Ok(reminder)
    }

    /// Records with `done = false`, in stored order
    pub async fn list_active(&self) -> Vec<Reminder> {
        self.load().await.active().cloned().collect()
    }

    /// Tombstone the `index`-th active reminder (1-based).
    ///
    /// Returns `Ok(false)` without writing when the index is out of range.
    pub async fn delete_by_index(&self, index: usize) -> Result<bool> {
        let mut deleted = None;

        self.update(Box::new(|set: &mut ReminderSet| {
            let Some(pos) = set.position_of_active(index) else {
                return false;
            };
            set.reminders[pos].done = true;
            deleted = Some(set.reminders[pos].id);
            true
        }))
        .await?;

        match deleted {
            Some(id) => {
                info!("Deleted reminder {id} (#{index})");
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
