//! Durable key-value persistence for history and theme.

mod error;
mod kv;
mod repository;

pub use error::StorageError;
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use repository::{KvSessionRepository, SessionRepository, HISTORY_KEY};
