//! YAML decoding for contract documents.
//!
//! Parses with `serde_yaml`, applies `<<` merge keys, then lowers the YAML
//! tree into the JSON-shaped [`ParsedContract`]:
//! - tags are dropped, their inner value kept
//! - scalar mapping keys are stringified (`1` -> `"1"`, `~` -> `"null"`)
//! - sequence and mapping keys are rejected
//! - non-finite floats become `null`

use dce_core::{ErrorDetail, ParseOutcome, ParsedContract, SourceMark};
use serde_json::{Map, Number, Value};
use serde_yaml::Value as YamlValue;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum YamlError {
    #[error("{0}")]
    Syntax(#[from] serde_yaml::Error),
    #[error("unsupported mapping key: {0}")]
    UnsupportedKey(String),
}

/// Parse contract text into a tree
pub fn parse_contract(text: &str) -> Result<ParsedContract, YamlError> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    let mut document: YamlValue = serde_yaml::from_str(text)?;
    document.apply_merge()?;
    lower(document)
}

/// Parse contract text and fold the result into a wire outcome
pub fn parse_outcome(text: &str) -> ParseOutcome {
    match parse_contract(text) {
        Ok(json) => ParseOutcome::Success { json },
        Err(err) => ParseOutcome::Error {
            error: error_detail(&err, text),
        },
    }
}

/// Structured detail for a failed parse of `text`
pub fn error_detail(err: &YamlError, text: &str) -> ErrorDetail {
    let message = err.to_string();
    match err {
        YamlError::Syntax(inner) => {
            let mark = inner.location().map(|location| {
                // serde_yaml reports one-based lines and columns
                let line = location.line().saturating_sub(1);
                let column = location.column().saturating_sub(1);
                SourceMark {
                    line,
                    column,
                    position: location.index(),
                    snippet: snippet(text, line, column),
                }
            });
            let reason = message
                .split(" at line ")
                .next()
                .unwrap_or(&message)
                .to_string();
            ErrorDetail::yaml(reason, message, mark)
        }
        YamlError::UnsupportedKey(_) => ErrorDetail::yaml(message.clone(), message, None),
    }
}

fn lower(value: YamlValue) -> Result<Value, YamlError> {
    Ok(match value {
        YamlValue::Null => Value::Null,
        YamlValue::Bool(b) => Value::Bool(b),
        YamlValue::Number(n) => lower_number(&n),
        YamlValue::String(s) => Value::String(s),
        YamlValue::Sequence(items) => Value::Array(
            items
                .into_iter()
                .map(lower)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        YamlValue::Mapping(mapping) => {
            let mut object = Map::with_capacity(mapping.len());
            for (key, value) in mapping {
                object.insert(key_string(key)?, lower(value)?);
            }
            Value::Object(object)
        }
        YamlValue::Tagged(tagged) => lower(tagged.value)?,
    })
}

fn lower_number(n: &serde_yaml::Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::from(i)
    } else if let Some(u) = n.as_u64() {
        Value::from(u)
    } else {
        n.as_f64()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

fn key_string(key: YamlValue) -> Result<String, YamlError> {
    match key {
        YamlValue::String(s) => Ok(s),
        YamlValue::Number(n) => Ok(n.to_string()),
        YamlValue::Bool(b) => Ok(b.to_string()),
        YamlValue::Null => Ok("null".to_string()),
        YamlValue::Tagged(tagged) => key_string(tagged.value),
        other @ (YamlValue::Sequence(_) | YamlValue::Mapping(_)) => Err(YamlError::UnsupportedKey(
            serde_yaml::to_string(&other)
                .map(|s| s.trim_end().replace('\n', " "))
                .unwrap_or_else(|_| "<complex key>".to_string()),
        )),
    }
}

/// Offending line with a caret under the column, prefixed by its 1-based number
fn snippet(text: &str, line: usize, column: usize) -> Option<String> {
    let source_line = text.lines().nth(line)?;
    let number = (line + 1).to_string();
    let gutter = " ".repeat(number.len());
    let caret_pad = " ".repeat(column.min(source_line.chars().count()));
    Some(format!(
        "{number} | {source_line}\n{gutter} | {caret_pad}^"
    ))
}
