//! Durable key-value storage shared between contexts, and the watcher that
//! turns another context's writes into [`StorageEvent`]s.

use crate::error::StorageError;
use crate::result::StorageResult;
use log::{debug, warn};
use notify::{DebouncedEvent, RecommendedWatcher, RecursiveMode, Watcher};
use shared::StorageEvent;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

const WATCH_DEBOUNCE: Duration = Duration::from_millis(100);

pub trait Storage: Send {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;
    fn set_item(&mut self, key: &str, value: &str) -> StorageResult<()>;
}

/// One file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn open(dir: impl Into<PathBuf>) -> StorageResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| StorageError::CreateDirectory(dir.clone(), e))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn item_path(&self, key: &str) -> StorageResult<PathBuf> {
        if !is_valid_key(key) {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(key))
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.item_path(key)?;
        match std::fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Read {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.item_path(key)?;
        std::fs::write(&path, value).map_err(|source| StorageError::Write {
            key: key.to_string(),
            source,
        })
    }
}

/// Process-local storage. Nothing outside the process can observe it.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Watches a [`FileStorage`] directory for writes made by other processes.
///
/// Keys in `ignored` are the ones this context writes itself; like a browser's
/// storage event, a context is never told about its own writes.
pub struct StorageWatcher {
    ignored: Vec<String>,
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<DebouncedEvent>,
}

impl StorageWatcher {
    pub fn watch(dir: &Path, ignored: &[&str]) -> StorageResult<Self> {
        let (tx, rx) = mpsc::channel();
        let mut watcher: RecommendedWatcher = Watcher::new(tx, WATCH_DEBOUNCE)?;
        watcher.watch(dir, RecursiveMode::NonRecursive)?;
        Ok(Self {
            ignored: ignored.iter().map(|k| k.to_string()).collect(),
            _watcher: watcher,
            rx,
        })
    }

    /// Everything observed since the previous call. Never blocks.
    pub fn drain(&self) -> Vec<StorageEvent> {
        let mut events = vec![];
        for event in self.rx.try_iter() {
            use DebouncedEvent::*;
            match event {
                Create(path) | Write(path) | Rename(_, path) => {
                    if let Some(key) = storage_key(&path, &self.ignored) {
                        match std::fs::read_to_string(&path) {
                            Ok(value) => events.push(StorageEvent {
                                key,
                                new_value: Some(value),
                            }),
                            Err(e) => debug!("{} changed but could not be read: {}", key, e),
                        }
                    }
                }
                Remove(path) => {
                    if let Some(key) = storage_key(&path, &self.ignored) {
                        events.push(StorageEvent {
                            key,
                            new_value: None,
                        });
                    }
                }
                Error(e, path) => warn!("Storage watcher error on {:?}: {}", path, e),
                _ => {}
            }
        }
        events
    }
}

// The watch is non-recursive, so only the file name matters. Editor swap files
// and the like are skipped by the same rule FileStorage applies to keys.
fn storage_key(path: &Path, ignored: &[String]) -> Option<String> {
    let key = path.file_name()?.to_str()?.to_string();
    if !is_valid_key(&key) || ignored.contains(&key) {
        return None;
    }
    Some(key)
}

fn is_valid_key(key: &str) -> bool {
    !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "placement-storage-{}-{}-{}",
            name,
            std::process::id(),
            shared::now_millis()
        ))
    }

    #[test]
    fn file_storage_round_trips_values() {
        let dir = temp_dir("roundtrip");
        let mut storage = FileStorage::open(&dir).unwrap();
        assert_eq!(storage.get_item("truckTransform").unwrap(), None);
        storage.set_item("truckTransform", "{\"a\":1}").unwrap();
        assert_eq!(
            storage.get_item("truckTransform").unwrap().as_deref(),
            Some("{\"a\":1}")
        );
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn file_storage_rejects_path_like_keys() {
        let dir = temp_dir("keys");
        let mut storage = FileStorage::open(&dir).unwrap();
        assert!(matches!(
            storage.set_item("../escape", "x"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(storage.get_item(""), Err(StorageError::InvalidKey(_))));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn memory_storage_overwrites() {
        let mut storage = MemoryStorage::default();
        storage.set_item("logoTransform", "1").unwrap();
        storage.set_item("logoTransform", "2").unwrap();
        assert_eq!(storage.get_item("logoTransform").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn own_keys_and_stray_files_are_not_reported() {
        let dir = PathBuf::from("/tmp/storage");
        let ignored = vec!["mainAppLastUpdate".to_string()];
        assert_eq!(
            storage_key(&dir.join("truckTransform"), &ignored).as_deref(),
            Some("truckTransform")
        );
        assert_eq!(storage_key(&dir.join("mainAppLastUpdate"), &ignored), None);
        assert_eq!(storage_key(&dir.join(".truckTransform.swp"), &ignored), None);
    }

    fn drain_for(watcher: &StorageWatcher, wait: Duration) -> Vec<StorageEvent> {
        let deadline = std::time::Instant::now() + wait;
        let mut events = vec![];
        while std::time::Instant::now() < deadline {
            events.extend(watcher.drain());
            if !events.is_empty() {
                // Let the debouncer flush whatever belongs to the same write.
                std::thread::sleep(WATCH_DEBOUNCE * 3);
                events.extend(watcher.drain());
                break;
            }
            std::thread::sleep(Duration::from_millis(20));
        }
        events
    }

    #[test]
    fn watcher_reports_other_writers_and_skips_own_keys() {
        let dir = temp_dir("watch");
        let _ = FileStorage::open(&dir).unwrap();
        let watcher = StorageWatcher::watch(&dir, &["mainAppLastUpdate"]).unwrap();

        let mut other = FileStorage::open(&dir).unwrap();
        other.set_item("mainAppLastUpdate", "1700000000000").unwrap();
        other.set_item("truckTransform", "{\"position\":[1,2,3]}").unwrap();

        let events = drain_for(&watcher, Duration::from_secs(3));
        assert!(!events.is_empty(), "no storage event arrived");
        assert!(events.iter().all(|e| e.key == "truckTransform"), "{:?}", events);
        assert_eq!(
            events.last().and_then(|e| e.new_value.as_deref()),
            Some("{\"position\":[1,2,3]}")
        );

        std::fs::remove_file(dir.join("truckTransform")).unwrap();
        let events = drain_for(&watcher, Duration::from_secs(3));
        assert_eq!(
            events,
            vec![StorageEvent {
                key: "truckTransform".to_string(),
                new_value: None,
            }]
        );
        let _ = std::fs::remove_dir_all(&dir);
    }
}
