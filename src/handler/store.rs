use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::raster::EncodedImage;

// Largest span chrono accepts for a second-based duration.
const MAX_RETENTION_SECS: u64 = (i64::MAX / 1000) as u64;

/// A finished transformation waiting to be collected
#[derive(Debug, Clone, PartialEq)]
pub struct StoredResult {
    pub image: EncodedImage,
    pub style: String,
    pub created_at: DateTime<Utc>,
}

/// In-memory results keyed by generated id
///
/// Entries live until collected with [`ResultStore::remove`] or until
/// [`ResultStore::sweep_expired`] finds them older than the retention window.
#[derive(Debug)]
pub struct ResultStore {
    entries: Mutex<HashMap<String, StoredResult>>,
    retention: Duration,
    next_id: AtomicU64,
}

impl ResultStore {
    pub fn new(retention_secs: u64) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            retention: Duration::seconds(retention_secs.min(MAX_RETENTION_SECS) as i64),
            next_id: AtomicU64::new(1),
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, StoredResult>> {
        // The map holds plain data, so a poisoned lock is still consistent.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Store a result and return its id
    pub fn insert(&self, image: EncodedImage, style: &str) -> String {
        self.insert_at(image, style, Utc::now())
    }

    pub(crate) fn insert_at(&self, image: EncodedImage, style: &str, created_at: DateTime<Utc>) -> String {
        let sequence = self.next_id.fetch_add(1, Ordering::Relaxed);
        let id = format!("{:x}-{:06x}", created_at.timestamp_millis(), sequence);

        self.entries().insert(
            id.clone(),
            StoredResult { image, style: style.to_string(), created_at },
        );
        id
    }

    /// Look up a result without removing it
    pub fn get(&self, id: &str) -> Option<StoredResult> {
        self.entries().get(id).cloned()
    }

    /// Remove and return a result
    pub fn remove(&self, id: &str) -> Option<StoredResult> {
        self.entries().remove(id)
    }

    /// Drop every entry older than the retention window at `now`
    ///
    /// Returns how many entries were removed.
    pub fn sweep_expired(&self, now: DateTime<Utc>) -> usize {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|_, entry| now - entry.created_at <= self.retention);

        let removed = before - entries.len();
        if removed > 0 {
            debug!("Swept {} expired results, {} remain", removed, entries.len());
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image() -> EncodedImage {
        EncodedImage::new(vec![1, 2, 3])
    }

    #[test]
    fn test_insert_get_remove() {
        let store = ResultStore::new(600);
        let id = store.insert(image(), "anime");

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&id).unwrap().style, "anime");

        let removed = store.remove(&id).unwrap();
        assert_eq!(removed.image, image());
        assert!(store.is_empty());
        assert!(store.get(&id).is_none());
    }

    #[test]
    fn test_ids_are_unique() {
        let store = ResultStore::new(600);
        let now = Utc::now();
        let a = store.insert_at(image(), "anime", now);
        let b = store.insert_at(image(), "anime", now);
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_sweep_respects_retention() {
        let store = ResultStore::new(600);
        let now = Utc::now();

        let old = store.insert_at(image(), "anime", now - Duration::seconds(601));
        let edge = store.insert_at(image(), "anime", now - Duration::seconds(600));
        let fresh = store.insert_at(image(), "anime", now);

        assert_eq!(store.sweep_expired(now), 1);
        assert!(store.get(&old).is_none());
        assert!(store.get(&edge).is_some());
        assert!(store.get(&fresh).is_some());
    }

    #[test]
    fn test_zero_retention_sweeps_everything_past() {
        let store = ResultStore::new(0);
        let now = Utc::now();
        store.insert_at(image(), "anime", now - Duration::seconds(1));
        assert_eq!(store.sweep_expired(now), 1);
        assert!(store.is_empty());
    }
}
