mod error;
mod file;
mod memory;
mod persistence;

pub use error::StoreError;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use persistence::{Persistence, STORAGE_KEY};

/// String-keyed blob storage the session persists into.
pub trait KeyValueStore {
    /// `Ok(None)` when nothing was ever written under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Overwrite whatever is stored under `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}
