#![forbid(unsafe_code)]

pub mod keys;
pub mod repository;
pub mod sqlite;

pub use keys::StorageKey;
pub use repository::{InMemoryStore, KeyValueStore, Storage, StorageError};
