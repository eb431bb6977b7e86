//! Binary entrypoint for the DCE API server.
use dce_api::run;
use dce_core::{logging, EditorConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();
    // DCE_CONFIG names an optional YAML file; DCE_* variables override it
    let config = EditorConfig::load()?;
    run(config).await
}
