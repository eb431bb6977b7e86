//! Request/response client on top of the worker's message protocol.
//!
//! Every request is stamped with a fresh `requestId`; a dispatcher task
//! routes replies back to the caller waiting on that id. Replies that arrive
//! after their caller gave up are discarded.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use dce_core::{ParseOutcome, WorkerConfig};
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use crate::protocol::{WorkerReply, WorkerRequest};
use crate::worker::{ParseWorker, WorkerPort};
use crate::WorkerError;

type Pending = Arc<Mutex<HashMap<String, oneshot::Sender<ParseOutcome>>>>;

#[derive(Debug, Clone)]
pub struct ParseClient {
    port: WorkerPort,
    pending: Pending,
    timeout: Duration,
}

impl ParseClient {
    /// Spawn a dedicated worker and attach a client to it
    pub fn spawn(config: &WorkerConfig) -> Self {
        let (port, replies) = ParseWorker::spawn(config);
        Self::attach(port, replies, Duration::from_millis(config.parse_timeout_ms))
    }

    /// Attach to an existing worker. The client takes over its reply stream.
    pub fn attach(port: WorkerPort, replies: mpsc::Receiver<WorkerReply>, timeout: Duration) -> Self {
        let pending: Pending = Arc::default();
        tokio::spawn(dispatch(replies, pending.clone()));
        Self { port, pending, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Parse with the client's default timeout
    pub async fn parse(&self, yaml: &str) -> Result<ParseOutcome, WorkerError> {
        self.parse_with_timeout(yaml, self.timeout).await
    }

    /// Parse, giving up after `timeout`. The budget covers both the wait for
    /// room in the worker's inbox and the wait for the reply. The job is not
    /// cancelled; its reply is dropped when it eventually arrives.
    pub async fn parse_with_timeout(
        &self,
        yaml: &str,
        timeout: Duration,
    ) -> Result<ParseOutcome, WorkerError> {
        let request_id = Uuid::new_v4().to_string();
        let (tx, rx) = oneshot::channel();
        lock(&self.pending).insert(request_id.clone(), tx);
        // removes the entry on every exit, including a dropped caller future
        let _entry = PendingEntry {
            pending: &self.pending,
            request_id: &request_id,
        };

        let request = WorkerRequest::parse(yaml).with_request_id(request_id.clone());
        let exchange = async {
            self.port.post(&request).await?;
            let outcome = rx.await.map_err(|_| WorkerError::ReplyDropped)?;
            Ok::<_, WorkerError>(outcome)
        };

        match tokio::time::timeout(timeout, exchange).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(request_id = %request_id, ?timeout, "parse request timed out");
                Err(WorkerError::Timeout(timeout))
            }
        }
    }

    /// Requests still waiting for a reply
    pub fn in_flight(&self) -> usize {
        lock(&self.pending).len()
    }
}

struct PendingEntry<'a> {
    pending: &'a Pending,
    request_id: &'a str,
}

impl Drop for PendingEntry<'_> {
    fn drop(&mut self) {
        lock(self.pending).remove(self.request_id);
    }
}

async fn dispatch(mut replies: mpsc::Receiver<WorkerReply>, pending: Pending) {
    while let Some(reply) = replies.recv().await {
        let Some(request_id) = reply.request_id else {
            tracing::warn!("discarding parse reply without requestId");
            continue;
        };
        match lock(&pending).remove(&request_id) {
            Some(waiter) => {
                let _ = waiter.send(reply.outcome);
            }
            None => tracing::warn!(request_id = %request_id, "discarding late parse reply"),
        }
    }
    // worker gone: wake every waiter with ReplyDropped
    lock(&pending).clear();
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
