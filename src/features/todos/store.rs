//! Todo collection with persistence on every mutation.
//!
//! Mutations snapshot the list and hand it to the background persister;
//! callers never wait on storage. Invalid input (blank text, bad
//! hour/minute) is a silent no-op, not an error.

use chrono::{DateTime, Duration, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::storage::{load_collection, KvStore, Persister, TODOS_KEY};

/// A single todo item.
///
/// `reminder_at` absent means no reminder is set. A completed todo's
/// reminder is inert regardless of its timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    pub id: String,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder_at: Option<DateTime<Utc>>,
}

/// Counts for the stats line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TodoStats {
    pub total: usize,
    pub completed: usize,
    pub remaining: usize,
}

/// Owns the todo list and persists it on every mutation.
pub struct TodoStore {
    todos: RwLock<Vec<Todo>>,
    persister: Persister,
}

impl TodoStore {
    /// Rehydrate the store from the key-value record, empty on any failure.
    pub fn load(kv: &dyn KvStore, persister: Persister) -> Self {
        let todos: Vec<Todo> = load_collection(kv, TODOS_KEY);
        debug!("Loaded {} todos", todos.len());
        Self {
            todos: RwLock::new(todos),
            persister,
        }
    }

    /// Add a todo at the front of the list (newest first).
    ///
    /// Blank text is rejected silently.
    pub async fn add(&self, text: &str, now: DateTime<Utc>) -> Option<Todo> {
        if text.trim().is_empty() {
            debug!("Ignoring empty todo");
            return None;
        }

        let todo = Todo {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            completed: false,
            created_at: now,
            reminder_at: None,
        };

        let mut todos = self.todos.write().await;
        todos.insert(0, todo.clone());
        self.persist(&todos);

        info!("Added todo {}", todo.id);
        Some(todo)
    }

    /// Flip a todo's completed flag. Returns false when the id is unknown.
    pub async fn toggle(&self, id: &str) -> bool {
        let mut todos = self.todos.write().await;
        let Some(todo) = todos.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        todo.completed = !todo.completed;
        self.persist(&todos);
        true
    }

    /// Remove a todo. Returns false when the id is unknown.
    pub async fn delete(&self, id: &str) -> bool {
        let mut todos = self.todos.write().await;
        let before = todos.len();
        todos.retain(|t| t.id != id);
        if todos.len() == before {
            return false;
        }
        self.persist(&todos);
        info!("Deleted todo {id}");
        true
    }

    /// Remove every completed todo, returning how many were removed.
    pub async fn clear_completed(&self) -> usize {
        let mut todos = self.todos.write().await;
        let before = todos.len();
        todos.retain(|t| !t.completed);
        let removed = before - todos.len();
        if removed > 0 {
            self.persist(&todos);
            info!("Cleared {removed} completed todos");
        }
        removed
    }

    /// Set or clear a todo's reminder. Returns false when the id is unknown.
    pub async fn set_reminder(&self, id: &str, when: Option<DateTime<Utc>>) -> bool {
        let mut todos = self.todos.write().await;
        let Some(todo) = todos.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        todo.reminder_at = when;
        self.persist(&todos);
        true
    }

    /// Set a reminder from hour/minute input, as entered in a time picker.
    ///
    /// The reminder lands on today's date at `HH:MM:00`; if that instant has
    /// already passed it rolls to tomorrow. Non-numeric or out-of-range
    /// input, like a missing todo id, is a silent no-op. Returns the
    /// timestamp that was set.
    pub async fn schedule_reminder(
        &self,
        id: &str,
        hours: &str,
        minutes: &str,
        now: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        let when = reminder_time(hours, minutes, now)?;
        if self.set_reminder(id, Some(when)).await {
            Some(when)
        } else {
            None
        }
    }

    /// Clone of the current list, newest first.
    pub async fn snapshot(&self) -> Vec<Todo> {
        self.todos.read().await.clone()
    }

    /// Counts for the stats line.
    pub async fn stats(&self) -> TodoStats {
        let todos = self.todos.read().await;
        let completed = todos.iter().filter(|t| t.completed).count();
        TodoStats {
            total: todos.len(),
            completed,
            remaining: todos.len() - completed,
        }
    }

    fn persist(&self, todos: &[Todo]) {
        self.persister.queue(TODOS_KEY, todos);
    }
}

/// Resolve hour/minute input to the next occurrence of that wall-clock time.
fn reminder_time(hours: &str, minutes: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let hour: u32 = hours.trim().parse().ok()?;
    let minute: u32 = minutes.trim().parse().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }

    let naive = now.date_naive().and_hms_opt(hour, minute, 0)?;
    let when = DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc);

    // A time already past today means tomorrow
    if when < now {
        Some(when + Duration::days(1))
    } else {
        Some(when)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use chrono::TimeZone;
    use std::sync::Arc;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()
    }

    fn new_store() -> TodoStore {
        let kv = Arc::new(MemoryStore::new());
        let persister = Persister::new(kv.clone() as Arc<dyn KvStore>);
        TodoStore::load(&*kv, persister)
    }

    #[tokio::test]
    async fn test_add_rejects_blank_text() {
        let store = new_store();
        assert!(store.add("", t0()).await.is_none());
        assert!(store.add("   ", t0()).await.is_none());
        assert!(store.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_add_prepends_newest_first() {
        let store = new_store();
        store.add("first", t0()).await.unwrap();
        store.add("second", t0()).await.unwrap();

        let todos = store.snapshot().await;
        assert_eq!(todos[0].text, "second");
        assert_eq!(todos[1].text, "first");
    }

    #[tokio::test]
    async fn test_toggle_flips_completed() {
        let store = new_store();
        let todo = store.add("task", t0()).await.unwrap();

        assert!(store.toggle(&todo.id).await);
        assert!(store.snapshot().await[0].completed);

        assert!(store.toggle(&todo.id).await);
        assert!(!store.snapshot().await[0].completed);
    }

    #[tokio::test]
    async fn test_toggle_unknown_id() {
        let store = new_store();
        assert!(!store.toggle("nope").await);
    }

    #[tokio::test]
    async fn test_delete_removes_only_target() {
        let store = new_store();
        let a = store.add("a", t0()).await.unwrap();
        store.add("b", t0()).await.unwrap();

        assert!(store.delete(&a.id).await);
        assert!(!store.delete(&a.id).await);

        let todos = store.snapshot().await;
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].text, "b");
    }

    #[tokio::test]
    async fn test_clear_completed_counts() {
        let store = new_store();
        let a = store.add("a", t0()).await.unwrap();
        store.add("b", t0()).await.unwrap();
        let c = store.add("c", t0()).await.unwrap();
        store.toggle(&a.id).await;
        store.toggle(&c.id).await;

        assert_eq!(store.clear_completed().await, 2);
        assert_eq!(store.clear_completed().await, 0);
        assert_eq!(store.snapshot().await.len(), 1);
    }

    #[tokio::test]
    async fn test_stats() {
        let store = new_store();
        let a = store.add("a", t0()).await.unwrap();
        store.add("b", t0()).await.unwrap();
        store.toggle(&a.id).await;

        let stats = store.stats().await;
        assert_eq!(stats.total, 2);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.remaining, 1);
    }

    #[tokio::test]
    async fn test_set_and_clear_reminder() {
        let store = new_store();
        let todo = store.add("task", t0()).await.unwrap();
        let at = t0() + Duration::minutes(30);

        assert!(store.set_reminder(&todo.id, Some(at)).await);
        assert_eq!(store.snapshot().await[0].reminder_at, Some(at));

        assert!(store.set_reminder(&todo.id, None).await);
        assert_eq!(store.snapshot().await[0].reminder_at, None);
    }

    #[tokio::test]
    async fn test_schedule_reminder_later_today() {
        let store = new_store();
        let todo = store.add("task", t0()).await.unwrap();

        // 12:00 now, 15:30 is still today
        let when = store
            .schedule_reminder(&todo.id, "15", "30", t0())
            .await
            .unwrap();
        assert_eq!(when, Utc.with_ymd_and_hms(2025, 3, 10, 15, 30, 0).unwrap());
    }

    #[tokio::test]
    async fn test_schedule_reminder_rolls_to_tomorrow() {
        let store = new_store();
        let todo = store.add("task", t0()).await.unwrap();

        // 12:00 now, 08:15 already passed so it lands tomorrow
        let when = store
            .schedule_reminder(&todo.id, "8", "15", t0())
            .await
            .unwrap();
        assert_eq!(when, Utc.with_ymd_and_hms(2025, 3, 11, 8, 15, 0).unwrap());
    }

    #[tokio::test]
    async fn test_schedule_reminder_rejects_bad_input() {
        let store = new_store();
        let todo = store.add("task", t0()).await.unwrap();

        assert!(store.schedule_reminder(&todo.id, "25", "00", t0()).await.is_none());
        assert!(store.schedule_reminder(&todo.id, "12", "60", t0()).await.is_none());
        assert!(store.schedule_reminder(&todo.id, "noon", "00", t0()).await.is_none());
        assert!(store.schedule_reminder(&todo.id, "", "15", t0()).await.is_none());
        assert_eq!(store.snapshot().await[0].reminder_at, None);
    }

    #[tokio::test]
    async fn test_schedule_reminder_unknown_id() {
        let store = new_store();
        assert!(store.schedule_reminder("nope", "12", "30", t0()).await.is_none());
    }

    #[tokio::test]
    async fn test_round_trip_preserves_fields() {
        use crate::storage::{load_collection, save_collection, TODOS_KEY};

        let store = new_store();
        let todo = store.add("persist me", t0()).await.unwrap();
        store
            .set_reminder(&todo.id, Some(t0() + Duration::hours(2)))
            .await;
        let original = store.snapshot().await;

        let kv = MemoryStore::new();
        save_collection(&kv, TODOS_KEY, &original).unwrap();
        let reloaded: Vec<Todo> = load_collection(&kv, TODOS_KEY);

        assert_eq!(reloaded, original);
    }
}
