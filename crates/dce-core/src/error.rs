//! Unified Error Model
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum EditorError {
    /// Malformed YAML. Only produced when a caller explicitly escalates a
    /// parse outcome; the worker itself always answers with a reply.
    #[error("PARSE/{0}")]
    Parse(String),

    /// Missing or broken template. A deployment problem, not bad user data.
    #[error("TEMPLATE/{0}")]
    TemplateConfiguration(String),

    /// Well-formed YAML whose values a template cannot use, such as a
    /// string where `range` needs an integer
    #[error("CONTRACT/{0}")]
    InvalidContract(String),

    #[error("STORAGE/{0}")]
    StorageUnavailable(String),

    #[error("CONFIG/{0}")]
    Config(#[from] ConfigError),

    #[error("WORKER/{0}")]
    Worker(String),
}

impl EditorError {
    /// Short machine-readable code, the prefix of the display string
    pub fn code(&self) -> &'static str {
        match self {
            Self::Parse(_) => "PARSE",
            Self::TemplateConfiguration(_) => "TEMPLATE",
            Self::InvalidContract(_) => "CONTRACT",
            Self::StorageUnavailable(_) => "STORAGE",
            Self::Config(_) => "CONFIG",
            Self::Worker(_) => "WORKER",
        }
    }
}
