//! DCE Core: shared data model, error taxonomy and ambient setup
//!
//! Everything the parse worker, the persistence store, the render service
//! and the HTTP surface agree on lives here.

pub mod config;
pub mod data_model;
pub mod error;
pub mod logging;

pub use config::{ConfigError, EditorConfig, WorkerConfig};
pub use data_model::{ErrorDetail, ParseOutcome, ParsedContract, RawContractText, SourceMark};
pub use error::EditorError;

/// Engine version reported by the health endpoint
pub const DCE_VERSION: &str = env!("CARGO_PKG_VERSION");
