//! Comment store
//!
//! Free-text comments keyed by canonical record identifier. The store is a
//! plain value passed into enrichment and reconciliation; reading and
//! writing durable copies goes through a [`StoreBackend`].
//!
//! # Durable format
//!
//! ```text
//! {
//!   "100": "waiting on origin certificate",
//!   "101": ""
//! }
//! ```
//!
//! Pretty-printed UTF-8 JSON, keys sorted, non-ASCII text kept verbatim.

use crate::error::{PersistenceError, StoreLoadError};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::btree_map::{self, BTreeMap};
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Identifier → comment mapping
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentStore {
    entries: BTreeMap<String, String>,
}

impl CommentStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Comment for identifier
    #[inline]
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&str> {
        self.entries.get(id).map(String::as_str)
    }

    /// Set comment, returning the previous one
    pub fn insert(&mut self, id: impl Into<String>, comment: impl Into<String>) -> Option<String> {
        self.entries.insert(id.into(), comment.into())
    }

    /// Check if identifier has an entry (possibly empty)
    #[inline]
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Number of entries
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if store has no entries
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in identifier order
    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.entries.iter()
    }

    /// Parse durable JSON form
    ///
    /// # Errors
    /// Returns error unless the text is a JSON object of strings
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Render durable JSON form (pretty-printed, trailing newline)
    ///
    /// # Errors
    /// Returns error if serialization fails (not expected for string maps)
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }
}

impl<'a> IntoIterator for &'a CommentStore {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CommentStore {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Durable home of a [`CommentStore`]
///
/// `save` replaces the whole durable copy. Implementations must leave the
/// previous copy readable when a save fails.
pub trait StoreBackend: Send + Sync {
    /// Load the durable copy; a backend with nothing saved yields an empty store
    ///
    /// # Errors
    /// Returns error if a durable copy exists but cannot be read
    fn load(&self) -> Result<CommentStore, StoreLoadError>;

    /// Replace the durable copy
    ///
    /// # Errors
    /// Returns error if the copy could not be written
    fn save(&self, store: &CommentStore) -> Result<(), PersistenceError>;

    /// Human-readable location for logs
    fn location(&self) -> String;
}

/// JSON file on local disk
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    /// Create backend for file path
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File path
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StoreBackend for JsonFileBackend {
    fn load(&self) -> Result<CommentStore, StoreLoadError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No comment store at {}, starting empty", self.path.display());
                return Ok(CommentStore::new());
            }
            Err(e) => return Err(StoreLoadError::io_error(&self.path, e)),
        };
        let store = CommentStore::from_json(&text).map_err(|source| StoreLoadError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!("Loaded {} comments from {}", store.len(), self.path.display());
        Ok(store)
    }

    fn save(&self, store: &CommentStore) -> Result<(), PersistenceError> {
        let json = store.to_json_pretty()?;
        write_atomic(&self.path, json.as_bytes())?;
        tracing::debug!("Saved {} comments to {}", store.len(), self.path.display());
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Write `bytes` to a hidden sibling file, fsync it and rename it over `path`.
///
/// Readers observe either the old or the new content, never a partial
/// file. The temporary file is removed when any step fails.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), PersistenceError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("comments.json");
    let tmp = parent.join(format!(".{file_name}.tmp.{}", std::process::id()));

    let result = (|| {
        let mut file = std::fs::File::create(&tmp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        drop(file);
        std::fs::rename(&tmp, path)
    })();

    if let Err(source) = result {
        let _ = std::fs::remove_file(&tmp);
        return Err(PersistenceError::io_error(path, source));
    }
    if let Ok(dir) = std::fs::File::open(&parent) {
        let _ = dir.sync_all();
    }
    Ok(())
}

/// In-memory backend
///
/// Holds the last saved copy. Writes can be switched off to exercise the
/// persistence failure path.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    saved: Mutex<Option<CommentStore>>,
    reject_writes: AtomicBool,
    save_count: AtomicUsize,
}

impl MemoryBackend {
    /// Create empty backend
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create backend that already holds a saved copy
    #[must_use]
    pub fn with_store(store: CommentStore) -> Self {
        Self {
            saved: Mutex::new(Some(store)),
            ..Self::default()
        }
    }

    /// Make subsequent saves fail (or succeed again)
    pub fn reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }

    /// Last successfully saved copy
    #[must_use]
    pub fn saved(&self) -> Option<CommentStore> {
        self.saved.lock().clone()
    }

    /// Number of successful saves
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::SeqCst)
    }
}

impl StoreBackend for MemoryBackend {
    fn load(&self) -> Result<CommentStore, StoreLoadError> {
        Ok(self.saved.lock().clone().unwrap_or_default())
    }

    fn save(&self, store: &CommentStore) -> Result<(), PersistenceError> {
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(PersistenceError::Unavailable(
                "memory backend is rejecting writes".to_string(),
            ));
        }
        *self.saved.lock() = Some(store.clone());
        self.save_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get() {
        let mut store = CommentStore::new();
        assert!(store.insert("100", "note").is_none());
        assert_eq!(store.get("100"), Some("note"));
        assert_eq!(store.insert("100", "").as_deref(), Some("note"));
        assert_eq!(store.get("100"), Some(""));
        assert!(store.contains("100"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn json_is_pretty_and_keeps_unicode() {
        let store: CommentStore = [("2", "revisión pendiente"), ("1", "ok")].into_iter().collect();
        let json = store.to_json_pretty().unwrap();
        assert_eq!(json, "{\n  \"1\": \"ok\",\n  \"2\": \"revisión pendiente\"\n}\n");
        assert_eq!(CommentStore::from_json(&json).unwrap(), store);
    }

    #[test]
    fn rejects_non_string_values() {
        assert!(CommentStore::from_json(r#"{"1": 5}"#).is_err());
        assert!(CommentStore::from_json("[]").is_err());
    }

    #[test]
    fn file_backend_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::new(dir.path().join("comentarios.json"));
        assert!(backend.load().unwrap().is_empty());
    }

    #[test]
    fn file_backend_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("comentarios.json");
        let backend = JsonFileBackend::new(&path);

        let store: CommentStore = [("100", "note")].into_iter().collect();
        backend.save(&store).unwrap();

        let reloaded = JsonFileBackend::new(&path).load().unwrap();
        assert_eq!(reloaded, store);
        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().contains(".tmp."))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn file_backend_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("comentarios.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = JsonFileBackend::new(&path).load().unwrap_err();
        assert!(matches!(err, StoreLoadError::Corrupt { .. }));
    }

    #[test]
    fn file_backend_unwritable_location_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("comentarios.json");
        let err = JsonFileBackend::new(&path)
            .save(&CommentStore::new())
            .unwrap_err();
        assert!(matches!(err, PersistenceError::Io { .. }));
    }

    #[test]
    fn memory_backend_rejects_when_asked() {
        let backend = MemoryBackend::new();
        backend.save(&CommentStore::new()).unwrap();
        backend.reject_writes(true);
        assert!(backend.save(&CommentStore::new()).is_err());
        assert_eq!(backend.save_count(), 1);
    }
}
