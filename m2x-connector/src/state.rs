//! Persisted cursor state.
//!
//! The read path remembers where it left off as a single `startTime` entry
//! in a flat string map, scoped per device/stream configuration. The backing
//! store is pluggable: the pipeline may provide a cluster-wide one, the CLI
//! uses a JSON file, tests use memory.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::error::StateError;

/// Key under which the read cursor is stored.
pub const START_TIME_KEY: &str = "startTime";

/// Persisted flat string map, scoped by an opaque key.
///
/// Implementations must offer read-after-write consistency on the node that
/// wrote. Cross-node coordination, if any, is the backing store's concern.
pub trait StateStore: Send + Sync {
    /// Fetch the map for a scope; an unknown scope is an empty map.
    fn get(&self, scope: &str) -> Result<BTreeMap<String, String>, StateError>;

    /// Replace the map for a scope.
    fn put(&self, scope: &str, state: BTreeMap<String, String>) -> Result<(), StateError>;
}

/// Cursor accessor scoped to one device/stream configuration.
///
/// The cursor is read at the start of an invocation and written back only
/// after the invocation fully succeeds; there is no partial update. No lock
/// is taken around the read-then-write: the scheduler's one-invocation-per-
/// stream guarantee is what makes it safe.
#[derive(Debug)]
pub struct CursorStore<S> {
    store: S,
    scope: String,
}

impl<S: StateStore> CursorStore<S> {
    pub fn new(store: S, scope: impl Into<String>) -> Self {
        Self {
            store,
            scope: scope.into(),
        }
    }

    /// The stored cursor, or `None` when unset or empty.
    pub fn get_cursor(&self) -> Result<Option<String>, StateError> {
        let state = self.store.get(&self.scope)?;
        Ok(state
            .get(START_TIME_KEY)
            .filter(|v| !v.is_empty())
            .cloned())
    }

    /// Merge the cursor into the scope's map, preserving unrelated keys.
    pub fn set_cursor(&self, value: &str) -> Result<(), StateError> {
        let mut state = self.store.get(&self.scope)?;
        state.insert(START_TIME_KEY.to_string(), value.to_string());
        self.store.put(&self.scope, state)
    }
}

/// In-memory store for tests and embedding. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStateStore {
    inner: Arc<Mutex<HashMap<String, BTreeMap<String, String>>>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStateStore {
    fn get(&self, scope: &str) -> Result<BTreeMap<String, String>, StateError> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        Ok(inner.get(scope).cloned().unwrap_or_default())
    }

    fn put(&self, scope: &str, state: BTreeMap<String, String>) -> Result<(), StateError> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.insert(scope.to_string(), state);
        Ok(())
    }
}

/// File-backed store: one JSON document mapping scope to its flat map.
///
/// Every `put` re-reads the file before writing, so scopes written by other
/// handles of the same file survive. A missing file reads as empty.
#[derive(Debug)]
pub struct FileStateStore {
    path: PathBuf,
    guard: Mutex<()>,
}

impl FileStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }

    fn load(&self) -> Result<HashMap<String, BTreeMap<String, String>>, StateError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(err) => Err(StateError::Io(err)),
        }
    }
}

impl StateStore for FileStateStore {
    fn get(&self, scope: &str) -> Result<BTreeMap<String, String>, StateError> {
        let _guard = self.guard.lock().unwrap_or_else(|e| e.into_inner());
        let all = self.load()?;
        Ok(all.get(scope).cloned().unwrap_or_default())
    }

    fn put(&self, scope: &str, state: BTreeMap<String, String>) -> Result<(), StateError> {
        let _guard = self.guard.lock().unwrap_or_else(|e| e.into_inner());
        let mut all = self.load()?;
        all.insert(scope.to_string(), state);
        let json = serde_json::to_vec_pretty(&all)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryStateStore::new();
        let cursor = CursorStore::new(store, "dev1/temperature");

        assert_eq!(cursor.get_cursor().unwrap(), None);
        cursor.set_cursor("2014-09-30T23:59:59.000Z").unwrap();
        assert_eq!(
            cursor.get_cursor().unwrap(),
            Some("2014-09-30T23:59:59.000Z".to_string())
        );
    }

    #[test]
    fn set_cursor_preserves_unrelated_keys() {
        let store = MemoryStateStore::new();
        let mut seeded = BTreeMap::new();
        seeded.insert("other".to_string(), "kept".to_string());
        store.put("dev1/temperature", seeded).unwrap();

        let cursor = CursorStore::new(store.clone(), "dev1/temperature");
        cursor.set_cursor("2014-09-30T23:59:59.000Z").unwrap();

        let state = store.get("dev1/temperature").unwrap();
        assert_eq!(state.get("other").map(String::as_str), Some("kept"));
        assert_eq!(
            state.get(START_TIME_KEY).map(String::as_str),
            Some("2014-09-30T23:59:59.000Z")
        );
    }

    #[test]
    fn empty_cursor_value_reads_as_unset() {
        let store = MemoryStateStore::new();
        let mut seeded = BTreeMap::new();
        seeded.insert(START_TIME_KEY.to_string(), String::new());
        store.put("dev1/temperature", seeded).unwrap();

        let cursor = CursorStore::new(store, "dev1/temperature");
        assert_eq!(cursor.get_cursor().unwrap(), None);
    }

    #[test]
    fn scopes_are_independent() {
        let store = MemoryStateStore::new();
        let a = CursorStore::new(store.clone(), "dev1/temperature");
        let b = CursorStore::new(store, "dev1/humidity");

        a.set_cursor("2014-09-30T23:59:59.000Z").unwrap();
        assert_eq!(b.get_cursor().unwrap(), None);
    }

    #[test]
    fn file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let store = FileStateStore::new(&path);

        let cursor = CursorStore::new(store, "dev1/temperature");
        assert_eq!(cursor.get_cursor().unwrap(), None);
        cursor.set_cursor("2014-09-30T23:59:59.000Z").unwrap();

        // A fresh handle sees the persisted value.
        let reopened = CursorStore::new(FileStateStore::new(&path), "dev1/temperature");
        assert_eq!(
            reopened.get_cursor().unwrap(),
            Some("2014-09-30T23:59:59.000Z".to_string())
        );
    }

    #[test]
    fn file_store_keeps_other_scopes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        CursorStore::new(FileStateStore::new(&path), "dev1/temperature")
            .set_cursor("2014-09-30T23:59:59.000Z")
            .unwrap();
        CursorStore::new(FileStateStore::new(&path), "dev2/humidity")
            .set_cursor("2015-01-01T00:00:00.000Z")
            .unwrap();

        let store = FileStateStore::new(&path);
        assert_eq!(
            store.get("dev1/temperature").unwrap().get(START_TIME_KEY),
            Some(&"2014-09-30T23:59:59.000Z".to_string())
        );
        assert_eq!(
            store.get("dev2/humidity").unwrap().get(START_TIME_KEY),
            Some(&"2015-01-01T00:00:00.000Z".to_string())
        );
    }

    #[test]
    fn corrupt_state_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, b"not json").unwrap();

        let store = FileStateStore::new(&path);
        assert!(matches!(
            store.get("dev1/temperature"),
            Err(StateError::Format(_))
        ));
    }
}
