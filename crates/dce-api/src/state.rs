//! Shared handler state, assembled from configuration.
use std::sync::Arc;

use dce_core::{EditorConfig, EditorError};
use dce_render::{RenderOptions, RenderService};
use dce_store::{ContractStore, FileStore, KeyValueStore, MemoryStore};
use dce_worker::ParseClient;

pub type SharedStore = Arc<ContractStore<Box<dyn KeyValueStore>>>;

#[derive(Clone)]
pub struct AppState {
    pub parser: ParseClient,
    pub renderer: Arc<RenderService>,
    pub store: SharedStore,
    /// Offered as the editor text until the first store
    pub starter_contract: Option<Arc<str>>,
}

impl AppState {
    pub fn new(
        parser: ParseClient,
        renderer: RenderService,
        backend: Box<dyn KeyValueStore>,
        starter_contract: Option<String>,
    ) -> Self {
        Self {
            parser,
            renderer: Arc::new(renderer),
            store: Arc::new(ContractStore::new(backend)),
            starter_contract: starter_contract.map(Arc::from),
        }
    }

    /// Build everything the config names. Must run inside a tokio runtime,
    /// since it spawns the parse worker.
    pub fn from_config(config: &EditorConfig) -> Result<Self, EditorError> {
        let renderer = RenderService::new(
            &config.templates_dir,
            RenderOptions {
                dev_mode: config.template_dev_mode,
            },
        )?;

        let backend: Box<dyn KeyValueStore> = match &config.store_path {
            Some(path) => {
                tracing::info!(path = %path.display(), "using file store");
                Box::new(FileStore::open(path)?)
            }
            None => {
                tracing::info!("using in-memory store; edits are lost on restart");
                Box::new(MemoryStore::new())
            }
        };

        let starter_contract = match &config.starter_contract {
            Some(path) => Some(std::fs::read_to_string(path).map_err(|e| {
                EditorError::Config(dce_core::ConfigError::Read {
                    path: path.clone(),
                    source: e,
                })
            })?),
            None => None,
        };

        let parser = ParseClient::spawn(&config.worker);
        Ok(Self::new(parser, renderer, backend, starter_contract))
    }
}
