//! API Handlers
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use dce_core::{EditorError, ParseOutcome, DCE_VERSION};
use dce_store::{format_timestamp, StoreError};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::state::SharedStore;
use crate::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct ContractPayload {
    #[serde(rename = "dataContractYaml")]
    pub data_contract_yaml: String,
}

/// Parse only. Both outcomes are a 200: a YAML error is data for the editor.
pub async fn parse(
    State(state): State<AppState>,
    Json(payload): Json<ContractPayload>,
) -> Result<Json<ParseOutcome>, ApiError> {
    let outcome = state.parser.parse(&payload.data_contract_yaml).await?;
    Ok(Json(outcome))
}

/// Parse then render to HTML; malformed YAML comes back as a 422 outcome
pub async fn render(
    State(state): State<AppState>,
    Json(payload): Json<ContractPayload>,
) -> Result<Response, ApiError> {
    match state.parser.parse(&payload.data_contract_yaml).await? {
        ParseOutcome::Success { json } => {
            let html = state.renderer.render_data_contract(&json)?;
            Ok(Html(html).into_response())
        }
        outcome @ ParseOutcome::Error { .. } => {
            Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(outcome)).into_response())
        }
    }
}

/// Run a store operation on the blocking pool; file back ends do disk I/O
async fn with_store<T, F>(store: &SharedStore, op: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&SharedStore) -> Result<T, StoreError> + Send + 'static,
{
    let store = store.clone();
    let result = tokio::task::spawn_blocking(move || op(&store))
        .await
        .map_err(|e| EditorError::StorageUnavailable(format!("store task failed: {e}")))?;
    Ok(result?)
}

pub async fn load_contract(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let (first_load, stored, updated) = with_store(&state.store, |store| {
        Ok((store.is_first_load()?, store.load()?, store.last_updated()?))
    })
    .await?;
    let text = match (&state.starter_contract, first_load) {
        (Some(starter), true) => Some(starter.to_string()),
        _ => stored,
    };
    let updated = updated.map(|t| format_timestamp(&t));

    Ok(Json(json!({
        "dataContractYaml": text,
        "dataContractYamlUpdated": updated,
        "firstLoad": first_load,
    })))
}

pub async fn store_contract(
    State(state): State<AppState>,
    Json(payload): Json<ContractPayload>,
) -> Result<Json<Value>, ApiError> {
    let yaml = payload.data_contract_yaml;
    let updated = with_store(&state.store, move |store| store.store(&yaml)).await?;
    Ok(Json(json!({ "dataContractYamlUpdated": format_timestamp(&updated) })))
}

pub async fn health() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "ok", "version": DCE_VERSION })))
}
