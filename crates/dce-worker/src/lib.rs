//! DCE Worker: YAML parsing behind an asynchronous message boundary
//!
//! The worker runs on its own tokio task and talks to callers only through
//! channels. It answers `{command: "parse", dataContractYaml}` messages with
//! `{status: "success", json}` or `{status: "error", error}`, ignores every
//! other command, and never lets a parse failure escape as anything but a
//! reply.
//!
//! # Example
//!
//! ```ignore
//! use dce_core::WorkerConfig;
//! use dce_worker::ParseClient;
//!
//! let client = ParseClient::spawn(&WorkerConfig::default());
//! let outcome = client.parse("id: orders").await?;
//! assert!(outcome.is_success());
//! ```

pub mod client;
pub mod protocol;
pub mod worker;
pub mod yaml;

pub use client::ParseClient;
pub use protocol::{WorkerReply, WorkerRequest, PARSE_COMMAND};
pub use worker::{ParseWorker, WorkerPort};
pub use yaml::{parse_contract, parse_outcome, YamlError};

use dce_core::EditorError;
use std::time::Duration;
use thiserror::Error;

/// Failures of the channel plumbing, never of the YAML itself
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("worker inbox is closed")]
    Closed,
    #[error("no parse reply within {0:?}")]
    Timeout(Duration),
    #[error("worker went away before replying")]
    ReplyDropped,
}

impl From<WorkerError> for EditorError {
    fn from(err: WorkerError) -> Self {
        EditorError::Worker(err.to_string())
    }
}
