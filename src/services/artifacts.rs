//! One-shot download of the model and encoder artifacts.
//!
//! Run before first start (`pulse fetch-artifacts`); existing files are left
//! alone unless `force` is set.

use std::path::Path;

use tracing::info;

use crate::config::AppConfig;
use crate::error::{PulseError, Result};

/// Fetch both artifacts into the configured model/encoder paths.
pub async fn fetch_artifacts(config: &AppConfig, force: bool) -> Result<()> {
    let model_url = config.artifacts.model_url.as_deref().ok_or_else(|| {
        PulseError::Validation("artifacts.model_url is not configured".to_string())
    })?;
    let encoder_url = config.artifacts.encoder_url.as_deref().ok_or_else(|| {
        PulseError::Validation("artifacts.encoder_url is not configured".to_string())
    })?;

    let client = reqwest::Client::new();
    fetch_one(&client, model_url, &config.model.model_path, force).await?;
    fetch_one(&client, encoder_url, &config.model.encoder_path, force).await?;

    info!("Artifact download complete");
    Ok(())
}

async fn fetch_one(client: &reqwest::Client, url: &str, dest: &str, force: bool) -> Result<()> {
    let dest_path = Path::new(dest);
    if dest_path.exists() && !force {
        info!("{dest} already exists, skipping (use --force to re-download)");
        return Ok(());
    }

    info!("Downloading {url} -> {dest}");
    let response = client.get(url).send().await?.error_for_status()?;
    let bytes = response.bytes().await?;

    if let Some(parent) = dest_path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    tokio::fs::write(dest_path, &bytes).await?;

    info!("Saved {dest} ({} bytes)", bytes.len());
    Ok(())
}
