//! Device record store
//!
//! The single source of truth mapping fingerprint -> device record, with an
//! in-memory mirror and a durable JSON document on disk. All mutation goes
//! through [`DeviceStore::upsert`], which holds one lock across the whole
//! read-modify-write-persist sequence so concurrent recognitions for the
//! same fingerprint can never lose an update.
//!
//! The full document is rewritten on every mutation. At the expected scale
//! (hundreds to low thousands of devices) this trades write amplification
//! for crash consistency: writes go to a temp file which is atomically
//! renamed over the live one, so a half-written store is never visible.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use vt_error::{Result, VisitrackError};
use vt_protocol::DeviceRecord;

use crate::constants::persistence::{MAX_STORE_SIZE, PERSIST_ATTEMPTS, PERSIST_BACKOFF_MS};
use crate::constants::paths;

// ============================================================================
// Store Document
// ============================================================================

/// The on-disk shape of the full store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreDocument {
    /// Document format version for migration
    pub version: u32,

    /// All known device records, keyed by fingerprint
    pub devices: HashMap<String, DeviceRecord>,

    /// Document creation timestamp, epoch milliseconds
    pub created_at: u64,

    /// Last mutation timestamp, epoch milliseconds
    pub last_modified_at: u64,
}

impl StoreDocument {
    pub const CURRENT_VERSION: u32 = 1;

    fn new() -> Self {
        let now = now_millis();
        Self {
            version: Self::CURRENT_VERSION,
            devices: HashMap::new(),
            created_at: now,
            last_modified_at: now,
        }
    }

    /// Migrate a document from an older format version
    fn migrate(mut doc: Self) -> Self {
        // Future migration logic goes here
        doc.version = Self::CURRENT_VERSION;
        doc
    }
}

impl Default for StoreDocument {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Device Store
// ============================================================================

/// Durable store of device records.
///
/// The store exclusively owns its records; callers get clones, never
/// mutable views. One instance per process, owned by the hosting
/// service's lifecycle and shared via `Arc`.
pub struct DeviceStore {
    path: PathBuf,
    inner: Mutex<StoreDocument>,
}

impl DeviceStore {
    /// Open the store backed by `path`, loading any existing document.
    ///
    /// A missing file starts an empty store. A corrupt or oversized file
    /// is logged and also starts empty: losing tracking history is
    /// preferred to failing the host process.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let doc = match load_document(&path) {
            Ok(Some(doc)) => {
                info!(devices = doc.devices.len(), path = ?path, "Loaded device store");
                doc
            }
            Ok(None) => {
                debug!(path = ?path, "No device store found, starting empty");
                StoreDocument::new()
            }
            Err(e) => {
                warn!(error = %e, path = ?path, "Could not load device store, starting empty");
                StoreDocument::new()
            }
        };
        Self {
            path,
            inner: Mutex::new(doc),
        }
    }

    /// Open the store at its default location under the user config dir
    pub fn open_default() -> Result<Self> {
        let path = paths::default_store_path()
            .ok_or_else(|| VisitrackError::config("Could not determine config directory"))?;
        Ok(Self::open(path))
    }

    /// Look up one record by fingerprint
    pub fn get(&self, fingerprint: &str) -> Option<DeviceRecord> {
        self.inner.lock().devices.get(fingerprint).cloned()
    }

    /// Snapshot of all records, taken under the store lock
    pub fn all(&self) -> Vec<DeviceRecord> {
        self.inner.lock().devices.values().cloned().collect()
    }

    /// Number of known devices
    pub fn len(&self) -> usize {
        self.inner.lock().devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().devices.is_empty()
    }

    /// The sole mutation entry point.
    ///
    /// Atomically looks up (or creates) the record for `fingerprint`,
    /// applies `mutate` to it, persists the store and returns a clone of
    /// the updated record together with the mutator's output. The mutator
    /// receives `created = true` when no record existed before this call.
    ///
    /// A failed durable write is logged and retried with backoff; after
    /// the last attempt the in-memory update still stands and is returned,
    /// because answering the request matters more than durability of one
    /// write.
    pub fn upsert<T, F>(&self, fingerprint: &str, mutate: F) -> (DeviceRecord, T)
    where
        F: FnOnce(&mut DeviceRecord, bool) -> T,
    {
        let mut doc = self.inner.lock();
        let now = now_millis();

        let created = !doc.devices.contains_key(fingerprint);
        let record = doc
            .devices
            .entry(fingerprint.to_string())
            .or_insert_with(|| DeviceRecord::new(fingerprint, now));
        let output = mutate(record, created);
        let snapshot = record.clone();

        doc.last_modified_at = now;
        if let Err(e) = self.persist(&doc) {
            error!(
                error = %e,
                fingerprint = %snapshot.short_fingerprint(),
                "Device store persist failed, continuing with in-memory state"
            );
        }

        (snapshot, output)
    }

    /// Explicitly persist the current document
    pub fn flush(&self) -> Result<()> {
        let doc = self.inner.lock();
        self.persist(&doc)
    }

    /// Administrative wipe of all records. Not part of the recognition
    /// contract; records are never deleted by normal operation.
    pub fn clear_all(&self) -> Result<()> {
        let mut doc = self.inner.lock();
        doc.devices.clear();
        doc.last_modified_at = now_millis();
        warn!("Cleared all device records");
        self.persist(&doc)
    }

    /// Serialize and write the document, with bounded retry
    fn persist(&self, doc: &StoreDocument) -> Result<()> {
        let json = serde_json::to_string_pretty(doc)?;

        let mut last_err = None;
        for attempt in 1..=PERSIST_ATTEMPTS {
            match write_atomic(&self.path, &json) {
                Ok(()) => {
                    debug!(path = ?self.path, devices = doc.devices.len(), "Saved device store");
                    return Ok(());
                }
                Err(e) => {
                    warn!(attempt, error = %e, "Device store write failed");
                    last_err = Some(e);
                    if attempt < PERSIST_ATTEMPTS {
                        std::thread::sleep(Duration::from_millis(
                            PERSIST_BACKOFF_MS * u64::from(attempt),
                        ));
                    }
                }
            }
        }
        Err(last_err.unwrap_or_else(|| VisitrackError::store("durable write failed")))
    }
}

// ============================================================================
// Persistence Helpers
// ============================================================================

/// Load the document from disk. `Ok(None)` means no file exists yet.
fn load_document(path: &Path) -> Result<Option<StoreDocument>> {
    if !path.exists() {
        return Ok(None);
    }

    let metadata = fs::metadata(path).map_err(|source| VisitrackError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    if metadata.len() > MAX_STORE_SIZE {
        return Err(VisitrackError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size: MAX_STORE_SIZE,
        });
    }

    let content = fs::read_to_string(path).map_err(|source| VisitrackError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let doc: StoreDocument = serde_json::from_str(&content)?;

    if doc.version > StoreDocument::CURRENT_VERSION {
        return Err(VisitrackError::UnsupportedStoreVersion {
            found: doc.version,
            current: StoreDocument::CURRENT_VERSION,
        });
    }
    if doc.version < StoreDocument::CURRENT_VERSION {
        warn!(
            old_version = doc.version,
            new_version = StoreDocument::CURRENT_VERSION,
            "Migrating device store"
        );
        return Ok(Some(StoreDocument::migrate(doc)));
    }

    Ok(Some(doc))
}

/// Write `json` to a temp file, fsync, then atomically rename over `path`
fn write_atomic(path: &Path, json: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| VisitrackError::FileWrite {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let temp_path = path.with_extension("json.tmp");

    let mut file = fs::File::create(&temp_path).map_err(|source| VisitrackError::FileWrite {
        path: temp_path.clone(),
        source,
    })?;
    file.write_all(json.as_bytes())
        .map_err(|source| VisitrackError::FileWrite {
            path: temp_path.clone(),
            source,
        })?;
    file.sync_all().map_err(|source| VisitrackError::FileWrite {
        path: temp_path.clone(),
        source,
    })?;
    drop(file);

    fs::rename(&temp_path, path).map_err(|source| VisitrackError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Current time as epoch milliseconds
pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_path(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join("device_history.json")
    }

    #[test]
    fn test_open_missing_file_starts_empty() {
        let dir = tempdir().unwrap();
        let store = DeviceStore::open(store_path(&dir));
        assert!(store.is_empty());
    }

    #[test]
    fn test_open_corrupt_file_starts_empty() {
        let dir = tempdir().unwrap();
        let path = store_path(&dir);
        fs::write(&path, "{ not json").unwrap();

        let store = DeviceStore::open(&path);
        assert!(store.is_empty());
    }

    #[test]
    fn test_open_future_version_starts_empty() {
        let dir = tempdir().unwrap();
        let path = store_path(&dir);
        fs::write(
            &path,
            r#"{"version": 99, "devices": {}, "created_at": 0, "last_modified_at": 0}"#,
        )
        .unwrap();

        let store = DeviceStore::open(&path);
        assert!(store.is_empty());
    }

    #[test]
    fn test_upsert_creates_record() {
        let dir = tempdir().unwrap();
        let store = DeviceStore::open(store_path(&dir));

        let (record, created) = store.upsert("fp1", |record, created| {
            record.record_visit("alice", "10.0.0.1", 1_000);
            created
        });
        assert!(created);
        assert_eq!(record.visit_count, 1);
        assert_eq!(store.len(), 1);

        let (_, created) = store.upsert("fp1", |_, created| created);
        assert!(!created);
    }

    #[test]
    fn test_get_returns_clone_not_view() {
        let dir = tempdir().unwrap();
        let store = DeviceStore::open(store_path(&dir));
        store.upsert("fp1", |record, _| {
            record.record_visit("alice", "10.0.0.1", 1_000);
        });

        let mut copy = store.get("fp1").unwrap();
        copy.names.push("mallory".to_string());
        assert_eq!(store.get("fp1").unwrap().names, vec!["alice"]);
    }

    #[test]
    fn test_persist_and_reload_round_trip() {
        let dir = tempdir().unwrap();
        let path = store_path(&dir);

        let store = DeviceStore::open(&path);
        store.upsert("fp1", |record, _| {
            record.record_visit("alice", "10.0.0.1", 1_000);
            record.record_visit("bob", "10.0.0.2", 2_000);
        });
        let before = store.get("fp1").unwrap();

        let reloaded = DeviceStore::open(&path);
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.get("fp1").unwrap(), before);
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let dir = tempdir().unwrap();
        let path = store_path(&dir);
        let store = DeviceStore::open(&path);
        store.upsert("fp1", |record, _| {
            record.record_visit("alice", "10.0.0.1", 1_000);
        });

        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_clear_all() {
        let dir = tempdir().unwrap();
        let path = store_path(&dir);
        let store = DeviceStore::open(&path);
        store.upsert("fp1", |record, _| {
            record.record_visit("alice", "10.0.0.1", 1_000);
        });

        store.clear_all().unwrap();
        assert!(store.is_empty());
        assert!(DeviceStore::open(&path).is_empty());
    }

    #[test]
    fn test_upsert_survives_unwritable_path() {
        // Persistence failure must not lose the in-memory update
        let store = DeviceStore::open("/proc/nonexistent/device_history.json");
        let (record, _) = store.upsert("fp1", |record, _| {
            record.record_visit("alice", "10.0.0.1", 1_000);
        });
        assert_eq!(record.visit_count, 1);
        assert_eq!(store.get("fp1").unwrap().visit_count, 1);
    }
}
