//! The parse worker: an isolated task reached only through channels.
//!
//! Each accepted message becomes a parse job on the blocking pool, so
//! replies for overlapping requests can come back in any order. At most
//! `max_in_flight` jobs run at once.

use std::sync::Arc;

use dce_core::{ErrorDetail, ParseOutcome, WorkerConfig};
use serde_json::Value;
use tokio::sync::{mpsc, Semaphore};

use crate::protocol::{ParseJob, WorkerReply, WorkerRequest};
use crate::WorkerError;

/// Sending half of a worker: posts messages into its inbox
#[derive(Debug, Clone)]
pub struct WorkerPort {
    pub(crate) tx: mpsc::Sender<Value>,
}

impl WorkerPort {
    /// Post any message. Messages the worker does not understand get no reply.
    pub async fn post_message(&self, message: Value) -> Result<(), WorkerError> {
        self.tx.send(message).await.map_err(|_| WorkerError::Closed)
    }

    pub async fn post(&self, request: &WorkerRequest) -> Result<(), WorkerError> {
        self.post_message(request.to_message()).await
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

pub struct ParseWorker;

impl ParseWorker {
    /// Spawn a worker on the current tokio runtime.
    ///
    /// The worker stops once every [`WorkerPort`] clone is dropped and the
    /// jobs already accepted have replied.
    pub fn spawn(config: &WorkerConfig) -> (WorkerPort, mpsc::Receiver<WorkerReply>) {
        let (in_tx, in_rx) = mpsc::channel(config.channel_capacity.max(1));
        let (out_tx, out_rx) = mpsc::channel(config.channel_capacity.max(1));
        let permits = Arc::new(Semaphore::new(config.max_in_flight.max(1)));

        tokio::spawn(run(in_rx, out_tx, permits));
        tracing::debug!(
            max_in_flight = config.max_in_flight,
            channel_capacity = config.channel_capacity,
            "parse worker started"
        );

        (WorkerPort { tx: in_tx }, out_rx)
    }
}

async fn run(
    mut inbox: mpsc::Receiver<Value>,
    outbox: mpsc::Sender<WorkerReply>,
    permits: Arc<Semaphore>,
) {
    while let Some(message) = inbox.recv().await {
        let Some(job) = ParseJob::from_message(&message) else {
            tracing::debug!(command = ?message.get("command"), "ignoring worker message");
            continue;
        };

        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };
        let outbox = outbox.clone();

        tokio::spawn(async move {
            let _permit = permit;
            let request_id = job.request_id.clone();

            let reply = match tokio::task::spawn_blocking(move || job.run()).await {
                Ok(reply) => reply,
                Err(join_error) => {
                    tracing::error!(error = %join_error, "parse job crashed");
                    WorkerReply {
                        outcome: ParseOutcome::Error {
                            error: ErrorDetail::worker(format!("parse job crashed: {}", join_error)),
                        },
                        request_id,
                    }
                }
            };

            if outbox.send(reply).await.is_err() {
                tracing::debug!("reply receiver dropped; discarding parse reply");
            }
        });
    }

    tracing::debug!("parse worker inbox closed");
}
