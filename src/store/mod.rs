//! Quote storage module
//!
//! The whole collection is the unit of persistence: `load_all` reads every
//! quote, `save_all` overwrites every quote. Neither reports errors to the
//! caller. A failed load degrades to an empty collection and a failed save
//! returns `false`; the cause goes to the error log.

mod file;
mod memory;

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::config::{StorageBackend, StorageConfig};
use crate::quotes::Quote;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

/// Storage backend shared by all request handlers
pub trait QuoteStore: Send + Sync {
    /// Read the full collection, or an empty one if it cannot be read
    fn load_all(&self) -> Vec<Quote>;

    /// Overwrite the full collection; `false` when it could not be written
    fn save_all(&self, quotes: &[Quote]) -> bool;

    /// Human-readable location, used in the startup banner
    fn describe(&self) -> String;
}

pub type SharedStore = Arc<dyn QuoteStore>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("{path}: record {index} is not a valid quote: {source}")]
    Record {
        path: PathBuf,
        index: usize,
        source: serde_json::Error,
    },
    #[error("refusing to overwrite {path}: record {index} is not a valid quote")]
    Overwrite { path: PathBuf, index: usize },
    #[error("failed to serialize quotes: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Build the store selected by configuration
///
/// The memory backend is seeded once from the data file, if readable, and
/// never writes back to it.
pub fn open(config: &StorageConfig) -> SharedStore {
    let file = JsonFileStore::new(&config.path);
    match config.backend {
        StorageBackend::File => Arc::new(file),
        StorageBackend::Memory => Arc::new(MemoryStore::new(file.load_all())),
    }
}
