//! DCE Store: durable persistence for the last edited data contract
//!
//! The editor keeps exactly two keys: the YAML text and the time it was last
//! written. [`ContractStore`] writes both as one batch through a
//! [`KeyValueStore`] port, so first-load detection can rely on the timestamp
//! alone.

pub mod contract_store;
pub mod file;
pub mod memory;
pub mod port;

pub use contract_store::{format_timestamp, ContractStore, UPDATED_KEY, YAML_KEY};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use port::KeyValueStore;

use dce_core::EditorError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store at {path} is unavailable: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("store file {path} is not a key/value document: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("store is unavailable: {0}")]
    Unavailable(String),

    #[error("stored timestamp {value:?} is not ISO-8601: {source}")]
    BadTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

impl From<StoreError> for EditorError {
    fn from(err: StoreError) -> Self {
        EditorError::StorageUnavailable(err.to_string())
    }
}
