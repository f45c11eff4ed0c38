//! Startup asset bootstrap
//!
//! Downloads configured assets into the static root when they are missing.
//! Failures are logged and never stop the service.

use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use crate::config::{BootstrapAsset, BootstrapConfig};
use crate::logger;

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("asset path '{0}' must be relative and stay inside the static root")]
    InvalidPath(String),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("remote returned status {0}")]
    Status(u16),

    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// What happened to one configured asset
#[derive(Debug)]
pub enum AssetOutcome {
    AlreadyPresent,
    Downloaded { bytes: usize },
    Failed(BootstrapError),
}

/// Ensure every configured asset exists below `static_root`
///
/// Only building the HTTP client can fail as a whole; per-asset failures are
/// reported in the returned outcomes.
pub async fn ensure_assets(
    config: &BootstrapConfig,
    static_root: &str,
) -> Result<Vec<AssetOutcome>, BootstrapError> {
    if config.assets.is_empty() {
        return Ok(Vec::new());
    }

    let client = reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_millis(config.timeout_ms))
        .build()?;

    let mut outcomes = Vec::with_capacity(config.assets.len());
    for asset in &config.assets {
        let outcome = match ensure_asset(&client, asset, Path::new(static_root)).await {
            Ok(outcome) => outcome,
            Err(e) => {
                logger::log_warning(&format!(
                    "[Bootstrap] Could not fetch {} from {}: {e}",
                    asset.file, asset.url
                ));
                AssetOutcome::Failed(e)
            }
        };
        if let AssetOutcome::Downloaded { bytes } = &outcome {
            logger::log_info(&format!(
                "[Bootstrap] Saved {} ({bytes} bytes) from {}",
                asset.file, asset.url
            ));
        }
        outcomes.push(outcome);
    }
    Ok(outcomes)
}

async fn ensure_asset(
    client: &reqwest::Client,
    asset: &BootstrapAsset,
    static_root: &Path,
) -> Result<AssetOutcome, BootstrapError> {
    let target = asset_path(static_root, &asset.file)?;
    if tokio::fs::try_exists(&target).await? {
        logger::log_debug(&format!("[Bootstrap] {} already present", asset.file));
        return Ok(AssetOutcome::AlreadyPresent);
    }

    let response = client.get(&asset.url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(BootstrapError::Status(status.as_u16()));
    }
    let body = response.bytes().await?;

    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&target, &body).await?;
    Ok(AssetOutcome::Downloaded { bytes: body.len() })
}

/// Resolve an asset path, refusing anything that could escape the root
fn asset_path(static_root: &Path, file: &str) -> Result<PathBuf, BootstrapError> {
    let relative = Path::new(file);
    let is_plain = !file.is_empty()
        && relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if is_plain {
        Ok(static_root.join(relative))
    } else {
        Err(BootstrapError::InvalidPath(file.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_path() {
        let root = Path::new("/srv/public");
        assert_eq!(
            asset_path(root, "vendor/lib.js").unwrap(),
            PathBuf::from("/srv/public/vendor/lib.js")
        );
        assert!(asset_path(root, "../lib.js").is_err());
        assert!(asset_path(root, "/etc/passwd").is_err());
        assert!(asset_path(root, "").is_err());
    }

    #[tokio::test]
    async fn test_no_assets_is_noop() {
        let outcomes = ensure_assets(&BootstrapConfig::default(), "public")
            .await
            .unwrap();
        assert!(outcomes.is_empty());
    }
}
