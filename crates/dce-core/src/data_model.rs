//! Data Model: contract text, parsed tree and parse outcomes
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// User-authored YAML source
pub type RawContractText = String;

/// Schema-less, order-preserving tree decoded from a contract document.
///
/// `serde_json` is built with `preserve_order`, so mapping keys keep the
/// order they had in the YAML source.
pub type ParsedContract = Value;

/// Result of one parse request, tagged by `status` on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ParseOutcome {
    Success { json: ParsedContract },
    Error { error: ErrorDetail },
}

impl ParseOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Parsed tree, if the parse succeeded
    pub fn json(&self) -> Option<&ParsedContract> {
        match self {
            Self::Success { json } => Some(json),
            Self::Error { .. } => None,
        }
    }

    /// Error detail, if the parse failed
    pub fn error(&self) -> Option<&ErrorDetail> {
        match self {
            Self::Success { .. } => None,
            Self::Error { error } => Some(error),
        }
    }
}

/// Structured description of a failed parse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Error family, `YAMLException` for parser failures
    pub name: String,
    /// Full human-readable message, location included
    pub message: String,
    /// Message without the location suffix
    pub reason: String,
    /// Where in the source the failure was detected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mark: Option<SourceMark>,
}

/// Family name used for YAML parser failures
pub const YAML_EXCEPTION: &str = "YAMLException";
/// Family name used for malformed worker messages and crashed parse jobs
pub const WORKER_EXCEPTION: &str = "WorkerError";

impl ErrorDetail {
    pub fn yaml(reason: impl Into<String>, message: impl Into<String>, mark: Option<SourceMark>) -> Self {
        Self {
            name: YAML_EXCEPTION.to_string(),
            message: message.into(),
            reason: reason.into(),
            mark,
        }
    }

    pub fn worker(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self {
            name: WORKER_EXCEPTION.to_string(),
            message: reason.clone(),
            reason,
            mark: None,
        }
    }
}

/// Zero-based source position of a parse failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceMark {
    pub line: usize,
    pub column: usize,
    /// Byte offset into the source text
    pub position: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_wire_shape() {
        let outcome = ParseOutcome::Success { json: json!({ "id": "orders" }) };
        let wire = serde_json::to_value(&outcome).unwrap();
        assert_eq!(wire, json!({ "status": "success", "json": { "id": "orders" } }));
    }

    #[test]
    fn test_error_wire_shape_omits_missing_mark() {
        let outcome = ParseOutcome::Error { error: ErrorDetail::worker("bad message") };
        let wire = serde_json::to_value(&outcome).unwrap();
        assert_eq!(wire["status"], "error");
        assert_eq!(wire["error"]["name"], WORKER_EXCEPTION);
        assert!(wire["error"].get("mark").is_none());
    }

    #[test]
    fn test_outcome_accessors() {
        let ok = ParseOutcome::Success { json: json!(1) };
        assert!(ok.is_success());
        assert_eq!(ok.json(), Some(&json!(1)));
        assert!(ok.error().is_none());
    }
}
