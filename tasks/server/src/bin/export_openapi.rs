//! Writes the OpenAPI document to a YAML file for client generators.

use std::path::PathBuf;
use tasks_server::web::openapi::ApiDoc;
use utoipa::OpenApi;

const DEFAULT_OUTPUT: &str = "openapi/openapi.yaml";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();

    let output = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
    if let Some(parent) = output.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let yaml = serde_yaml::to_string(&ApiDoc::openapi())?;
    std::fs::write(&output, yaml)?;
    tracing::info!("OpenAPI document written to {}", output.display());
    Ok(())
}
