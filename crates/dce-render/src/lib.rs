//! DCE Render: parsed data contracts to HTML
//!
//! A [`RenderService`] is built once with its template root. Every `*.hbs`
//! file under the root is registered by its relative path without the
//! extension, so `datacontract.html.hbs` becomes `datacontract.html`.
//!
//! Output is not HTML-escaped. Contract content is trusted here; callers
//! that render untrusted documents must escape upstream.
//!
//! # Example
//!
//! ```ignore
//! use dce_render::{RenderOptions, RenderService};
//! use serde_json::json;
//!
//! let service = RenderService::new("templates", RenderOptions::default())?;
//! let html = service.render_data_contract(&json!({ "id": "orders" }))?;
//! ```

pub mod helpers;
pub mod service;

pub use helpers::range;
pub use service::{RenderOptions, RenderService, DATACONTRACT_TEMPLATE, TEMPLATE_EXTENSION};

use dce_core::EditorError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template not found: {0}")]
    MissingTemplate(String),
    #[error("template configuration error: {0}")]
    TemplateConfiguration(String),
    /// A helper rejected a value taken from the contract itself
    #[error("contract value rejected by template: {0}")]
    InvalidContract(String),
}

impl From<RenderError> for EditorError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::InvalidContract(_) => EditorError::InvalidContract(err.to_string()),
            _ => EditorError::TemplateConfiguration(err.to_string()),
        }
    }
}
