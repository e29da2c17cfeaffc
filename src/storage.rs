//! # Key-Value Storage
//!
//! Local key-value persistence for the todo and recurring-reminder
//! collections. Each collection lives under its own namespaced record as a
//! JSON array; timestamps are serialized in RFC 3339 form. Malformed or
//! unreadable saved data loads as the empty collection and is logged,
//! never surfaced as an error.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Background persister task for non-blocking writes
//! - 1.0.0: Initial release with JSON file store

use anyhow::{Context, Result};
use dashmap::DashMap;
use log::{debug, error, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Record key for the todo collection
pub const TODOS_KEY: &str = "todos";

/// Record key for the recurring-reminder collection
pub const RECURRING_KEY: &str = "recurring_reminders";

// ============================================================================
// Store trait and implementations
// ============================================================================

/// Minimal key-value contract the engines persist through.
///
/// Keys are opaque record names; values are serialized JSON documents.
pub trait KvStore: Send + Sync {
    /// Read the raw value for a key, `None` if the key has never been written.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Write the raw value for a key, replacing any previous value.
    fn write(&self, key: &str, value: &str) -> Result<()>;
}

/// File-backed store keeping one `<key>.json` document per record under a
/// data directory.
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create data directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KvStore for JsonFileStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Some(contents))
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        std::fs::write(&path, value)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}

/// In-memory store used by tests and as a null persistence backend.
#[derive(Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ============================================================================
// Collection helpers
// ============================================================================

/// Load a collection from its record, recovering to empty on any failure.
///
/// Missing records, unreadable files, and unparseable JSON all degrade to an
/// empty collection so a corrupt save can never wedge startup.
pub fn load_collection<T: DeserializeOwned>(store: &dyn KvStore, key: &str) -> Vec<T> {
    match store.read(key) {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(items) => items,
            Err(e) => {
                error!("Failed to parse saved {key} data, starting empty: {e}");
                Vec::new()
            }
        },
        Ok(None) => Vec::new(),
        Err(e) => {
            error!("Failed to read saved {key} data, starting empty: {e}");
            Vec::new()
        }
    }
}

/// Serialize and write a collection to its record.
pub fn save_collection<T: Serialize>(store: &dyn KvStore, key: &str, items: &[T]) -> Result<()> {
    let payload = serde_json::to_string(items)?;
    store.write(key, &payload)
}

// ============================================================================
// Background persister
// ============================================================================

/// A queued snapshot write
struct PersistJob {
    key: &'static str,
    payload: String,
}

/// Handles fire-and-forget persistence without blocking mutations.
///
/// Mutating operations queue a serialized snapshot of the full collection;
/// a background task drains the queue and writes to the [`KvStore`]. Writes
/// are never awaited by callers and write failures are logged, not
/// propagated.
#[derive(Clone)]
pub struct Persister {
    sender: mpsc::UnboundedSender<PersistJob>,
}

impl Persister {
    /// Create a persister with a background writer task over `store`.
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();

        // Spawn background task for non-blocking writes
        tokio::spawn(Self::background_writer(store, receiver));

        Persister { sender }
    }

    /// Queue a snapshot of `items` for the record `key` (non-blocking).
    pub fn queue<T: Serialize>(&self, key: &'static str, items: &[T]) {
        let payload = match serde_json::to_string(items) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Failed to serialize {key} snapshot: {e}");
                return;
            }
        };

        if let Err(e) = self.sender.send(PersistJob { key, payload }) {
            warn!("Failed to queue {key} snapshot: {e}");
        }
    }

    /// Background task that processes queued snapshot writes
    async fn background_writer(
        store: Arc<dyn KvStore>,
        mut receiver: mpsc::UnboundedReceiver<PersistJob>,
    ) {
        while let Some(job) = receiver.recv().await {
            match store.write(job.key, &job.payload) {
                Ok(()) => debug!("Persisted {} ({} bytes)", job.key, job.payload.len()),
                Err(e) => error!("Failed to persist {}: {e}", job.key),
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
