//! Reminder records and the persisted reminder document
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.5.0

use serde::{Deserialize, Serialize};

/// Ids are reduced modulo this range to bound their magnitude
pub const REMINDER_ID_RANGE: i64 = 2_000_000_000;

/// Base offset for reminder notification ids
pub const REMINDER_NOTIF_ID_BASE: i64 = 2000;

/// One scheduled notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    #[serde(default)]
    pub id: i64,
    /// Epoch seconds at which the reminder becomes deliverable
    #[serde(default)]
    pub due: i64,
    #[serde(default)]
    pub text: String,
    /// Delivered or deleted; never reverts to false
    #[serde(default)]
    pub done: bool,
}

impl Reminder {
    pub fn is_active(&self) -> bool {
        !self.done
    }

    pub fn is_due(&self, now: i64) -> bool {
        !self.done && self.due <= now
    }

    /// Whole minutes until due, floored and never negative
    pub fn minutes_left(&self, now: i64) -> i64 {
        (self.due - now).max(0) / 60
    }

    /// Id handed to the notification sink for this reminder
    pub fn notification_id(&self) -> i64 {
        if self.id == 0 {
            REMINDER_NOTIF_ID_BASE + 1
        } else {
            REMINDER_NOTIF_ID_BASE + self.id.rem_euclid(5000)
        }
    }
}

/// Insertion-ordered collection persisted as `{"reminders": [...]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderSet {
    #[serde(default)]
    pub reminders: Vec<Reminder>,
}

impl ReminderSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.reminders.is_empty()
    }

    pub fn len(&self) -> usize {
        self.reminders.len()
    }

    /// Active records in stored order
    pub fn active(&self) -> impl Iterator<Item = &Reminder> {
        self.reminders.iter().filter(|r| r.is_active())
    }

    /// Derive an id from `now_millis` that no active record already uses
    pub fn next_id(&self, now_millis: i64) -> i64 {
        let mut id = now_millis.rem_euclid(REMINDER_ID_RANGE);
        while self.active().any(|r| r.id == id) {
            id = (id + 1) % REMINDER_ID_RANGE;
        }
        id
    }

    /// Position in `reminders` of the `index`-th active record (1-based)
    pub fn position_of_active(&self, index: usize) -> Option<usize> {
        if index == 0 {
            return None;
        }
        self.reminders
            .iter()
            .enumerate()
            .filter(|(_, r)| r.is_active())
            .nth(index - 1)
            .map(|(pos, _)| pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reminder(id: i64, due: i64, done: bool) -> Reminder {
        Reminder {
            id,
            due,
            text: format!("r{id}"),
            done,
        }
    }

    #[test]
    fn test_minutes_left_is_floored_and_clamped() {
        let r = reminder(1, 1_125, false);
        assert_eq!(r.minutes_left(1_000), 2);
        assert_eq!(r.minutes_left(1_125), 0);
        assert_eq!(r.minutes_left(5_000), 0);
    }

    #[test]
    fn test_is_due() {
        assert!(reminder(1, 100, false).is_due(100));
        assert!(!reminder(1, 101, false).is_due(100));
        assert!(!reminder(1, 50, true).is_due(100));
    }

    #[test]
    fn test_notification_id() {
        assert_eq!(reminder(0, 0, false).notification_id(), 2001);
        assert_eq!(reminder(7, 0, false).notification_id(), 2007);
        assert_eq!(reminder(12_345, 0, false).notification_id(), 2000 + 2_345);
    }

    #[test]
    fn test_next_id_skips_active_collisions() {
        let set = ReminderSet {
            reminders: vec![reminder(42, 0, false), reminder(43, 0, true)],
        };
        assert_eq!(set.next_id(42), 43);
        assert_eq!(set.next_id(2_000_000_042), 43);
        assert_eq!(set.next_id(10), 10);
    }

    #[test]
    fn test_next_id_wraps_in_range() {
        let set = ReminderSet {
            reminders: vec![reminder(REMINDER_ID_RANGE - 1, 0, false)],
        };
        assert_eq!(set.next_id(REMINDER_ID_RANGE - 1), 0);
    }

    #[test]
    fn test_position_of_active_skips_tombstones() {
        let set = ReminderSet {
            reminders: vec![
                reminder(1, 0, false),
                reminder(2, 0, true),
                reminder(3, 0, false),
            ],
        };
        assert_eq!(set.position_of_active(0), None);
        assert_eq!(set.position_of_active(1), Some(0));
        assert_eq!(set.position_of_active(2), Some(2));
        assert_eq!(set.position_of_active(3), None);
    }

    #[test]
    fn test_tolerant_deserialization() {
        let json = r#"{"reminders":[{"text":"x","due":5,"extra":true},{"id":3,"done":true}]}"#;
        let set: ReminderSet = serde_json::from_str(json).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.reminders[0].id, 0);
        assert!(!set.reminders[0].done);
        assert!(set.reminders[1].done);
        assert_eq!(set.reminders[1].text, "");

        let empty: ReminderSet = serde_json::from_str("{}").unwrap();
        assert!(empty.is_empty());
    }
}
