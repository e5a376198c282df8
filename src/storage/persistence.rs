use tracing::{debug, info, warn};

use super::{KeyValueStore, StoreError};
use crate::domain::SubmittedStore;

/// Key the whole record collection lives under.
pub const STORAGE_KEY: &str = "submittedData";

/// Reads and writes the [`SubmittedStore`] as one JSON blob.
#[derive(Debug)]
pub struct Persistence<S> {
    backend: S,
}

impl<S: KeyValueStore> Persistence<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    /// Never fails: an absent, unreadable or undecodable blob loads as an
    /// empty collection.
    pub fn load(&self) -> SubmittedStore {
        let raw = match self.backend.get(STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = STORAGE_KEY, "no stored records");
                return SubmittedStore::new();
            }
            Err(err) => {
                warn!(key = STORAGE_KEY, error = %err, "failed to read stored records");
                return SubmittedStore::new();
            }
        };
        match serde_json::from_str::<SubmittedStore>(&raw) {
            Ok(store) => {
                debug!(records = store.total_records(), "loaded stored records");
                store
            }
            Err(err) => {
                warn!(key = STORAGE_KEY, error = %err, "discarding undecodable stored records");
                SubmittedStore::new()
            }
        }
    }

    pub fn save(&mut self, store: &SubmittedStore) -> Result<(), StoreError> {
        let encoded = serde_json::to_string(store)?;
        self.backend.set(STORAGE_KEY, &encoded)?;
        info!(records = store.total_records(), "saved records");
        Ok(())
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{domain::Record, storage::MemoryStore};

    fn sample() -> SubmittedStore {
        let mut store = SubmittedStore::new();
        let record: Record = [("firstName", "A"), ("lastName", "B"), ("age", "30")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        store.push("User Information", record);
        store
    }

    #[test]
    fn round_trips_through_backend() {
        let mut persistence = Persistence::new(MemoryStore::new());
        let store = sample();
        persistence.save(&store).unwrap();
        assert_eq!(persistence.load(), store);
    }

    #[test]
    fn missing_blob_loads_empty() {
        let persistence = Persistence::new(MemoryStore::new());
        assert!(persistence.load().is_empty());
    }

    #[test]
    fn corrupt_blob_loads_empty() {
        for raw in ["{oops", "null", "[1, 2]", r#"{"A": [{"x": 1}]}"#] {
            let persistence = Persistence::new(MemoryStore::new().with_entry(STORAGE_KEY, raw));
            assert_eq!(persistence.load(), SubmittedStore::new(), "blob {raw}");
        }
    }

    #[test]
    fn save_failure_propagates() {
        let mut persistence = Persistence::new(MemoryStore::new().read_only());
        assert!(matches!(
            persistence.save(&sample()),
            Err(StoreError::Rejected(_))
        ));
    }
}
