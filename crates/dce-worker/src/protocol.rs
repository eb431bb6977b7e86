//! Worker message protocol.
//!
//! Inbound messages are untyped JSON values, the way any caller can post
//! them; only `{command: "parse", ...}` is acted upon. Replies are typed.

use dce_core::{ErrorDetail, ParseOutcome};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::yaml;

/// The only command the worker answers
pub const PARSE_COMMAND: &str = "parse";

/// Typed form of a parse request, for callers that build messages in Rust
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerRequest {
    pub command: String,
    #[serde(rename = "dataContractYaml")]
    pub data_contract_yaml: String,
    /// Correlation id echoed back in the reply
    #[serde(rename = "requestId", default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl WorkerRequest {
    pub fn parse(yaml: impl Into<String>) -> Self {
        Self {
            command: PARSE_COMMAND.to_string(),
            data_contract_yaml: yaml.into(),
            request_id: None,
        }
    }

    pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }

    pub fn to_message(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Reply posted back for every accepted parse request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerReply {
    #[serde(flatten)]
    pub outcome: ParseOutcome,
    #[serde(rename = "requestId", default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// An accepted inbound message, ready to run on a parse job
#[derive(Debug, Clone)]
pub(crate) struct ParseJob {
    pub request_id: Option<String>,
    payload: Result<String, ErrorDetail>,
}

impl ParseJob {
    /// Classify an inbound message. `None` means "not for us": no reply.
    pub fn from_message(message: &Value) -> Option<Self> {
        let command = message.get("command").and_then(Value::as_str)?;
        if command != PARSE_COMMAND {
            return None;
        }

        let request_id = message
            .get("requestId")
            .and_then(Value::as_str)
            .map(str::to_string);

        let payload = match message.get("dataContractYaml") {
            Some(Value::String(text)) => Ok(text.clone()),
            Some(other) => Err(ErrorDetail::worker(format!(
                "dataContractYaml must be a string, got {}",
                json_type(other)
            ))),
            None => Err(ErrorDetail::worker("parse message is missing dataContractYaml")),
        };

        Some(Self { request_id, payload })
    }

    pub fn run(self) -> WorkerReply {
        let outcome = match self.payload {
            Ok(text) => yaml::parse_outcome(&text),
            Err(error) => ParseOutcome::Error { error },
        };
        WorkerReply {
            outcome,
            request_id: self.request_id,
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
