#![deny(rust_2018_idioms)]

mod app;
pub mod domain;
pub mod form;
pub mod io;
mod presentation;
pub mod storage;

pub use app::{FormUI, UiOptions};
pub use domain::{Catalog, FieldSchema, FieldType, SubmittedStore};
pub use form::FormSession;
pub use storage::{FileStore, KeyValueStore, MemoryStore};

pub mod prelude {
    pub use super::{
        Catalog, FileStore, FormSession, FormUI, KeyValueStore, MemoryStore, SubmittedStore,
        UiOptions,
    };
}
