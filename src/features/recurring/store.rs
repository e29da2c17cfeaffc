//! Recurring-reminder collection and its state transitions.

use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::scheduler;
use crate::storage::{load_collection, KvStore, Persister, RECURRING_KEY};

/// Visual category for a reminder. Picks a display glyph, nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderIcon {
    Water,
    Meeting,
    Custom,
}

/// A named reminder that re-fires every `interval_minutes`.
///
/// `last_triggered` absent means it has never fired; the interval is fixed
/// at creation (there is no edit operation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringReminder {
    pub id: String,
    pub title: String,
    pub message: String,
    pub interval_minutes: u32,
    pub icon: ReminderIcon,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_triggered: Option<DateTime<Utc>>,
    pub enabled: bool,
}

/// Owns the recurring-reminder list and persists it on every mutation.
pub struct RecurringStore {
    reminders: RwLock<Vec<RecurringReminder>>,
    persister: Persister,
}

impl RecurringStore {
    /// Rehydrate the store from the key-value record, empty on any failure.
    pub fn load(kv: &dyn KvStore, persister: Persister) -> Self {
        let reminders: Vec<RecurringReminder> = load_collection(kv, RECURRING_KEY);
        debug!("Loaded {} recurring reminders", reminders.len());
        Self {
            reminders: RwLock::new(reminders),
            persister,
        }
    }

    /// Create a reminder, enabled, with `last_triggered` seeded to `now`.
    ///
    /// Seeding defers the first fire by a full interval; without it a new
    /// reminder would fire on the next sweep. Blank title/message or an
    /// interval that doesn't parse to an integer >= 1 is rejected silently.
    pub async fn add(
        &self,
        title: &str,
        message: &str,
        interval: &str,
        icon: ReminderIcon,
        now: DateTime<Utc>,
    ) -> Option<RecurringReminder> {
        if title.trim().is_empty() || message.trim().is_empty() {
            debug!("Ignoring recurring reminder with blank title or message");
            return None;
        }
        let interval_minutes: u32 = match interval.trim().parse() {
            Ok(n) if n >= 1 => n,
            _ => {
                debug!("Ignoring recurring reminder with invalid interval {interval:?}");
                return None;
            }
        };

        let reminder = RecurringReminder {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            message: message.to_string(),
            interval_minutes,
            icon,
            last_triggered: Some(now),
            enabled: true,
        };

        let mut reminders = self.reminders.write().await;
        reminders.push(reminder.clone());
        self.persist(&reminders);

        info!(
            "Added recurring reminder {} (every {interval_minutes} min)",
            reminder.id
        );
        Some(reminder)
    }

    /// Flip a reminder's enabled flag.
    ///
    /// Re-enabling re-arms from the toggle moment so a long-disabled
    /// reminder doesn't fire immediately; disabling leaves `last_triggered`
    /// untouched. Returns false when the id is unknown.
    pub async fn toggle(&self, id: &str, now: DateTime<Utc>) -> bool {
        let mut reminders = self.reminders.write().await;
        let Some(reminder) = reminders.iter_mut().find(|r| r.id == id) else {
            return false;
        };

        if reminder.enabled {
            reminder.enabled = false;
        } else {
            reminder.enabled = true;
            reminder.last_triggered = Some(now);
        }
        self.persist(&reminders);
        true
    }

    /// Remove a reminder. Returns false when the id is unknown.
    pub async fn delete(&self, id: &str) -> bool {
        let mut reminders = self.reminders.write().await;
        let before = reminders.len();
        reminders.retain(|r| r.id != id);
        if reminders.len() == before {
            return false;
        }
        self.persist(&reminders);
        info!("Deleted recurring reminder {id}");
        true
    }

    /// Evaluate every reminder against `now`, re-arm the due ones, and
    /// return them for notification.
    ///
    /// Re-arming uses the evaluation time, not the originally scheduled due
    /// time, so intervals missed while the process was down are never
    /// backfilled.
    pub async fn fire_due(&self, now: DateTime<Utc>) -> Vec<RecurringReminder> {
        let mut reminders = self.reminders.write().await;
        let mut fired = Vec::new();

        for reminder in reminders.iter_mut() {
            if scheduler::is_due(reminder, now) {
                reminder.last_triggered = Some(now);
                fired.push(reminder.clone());
            }
        }

        if !fired.is_empty() {
            self.persist(&reminders);
            debug!("{} recurring reminders fired", fired.len());
        }
        fired
    }

    /// Clone of the current list, in creation order.
    pub async fn snapshot(&self) -> Vec<RecurringReminder> {
        self.reminders.read().await.clone()
    }

    fn persist(&self, reminders: &[RecurringReminder]) {
        self.persister.queue(RECURRING_KEY, reminders);
    }
}
