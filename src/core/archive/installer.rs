use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::extract::extract_tar_gz;
use crate::core::downloader::Downloader;
use crate::core::error::{BootstrapError, BootstrapResult, Stage, StageContext};

/// A downloadable file attached to an upstream release.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseAsset {
    pub name: String,
    #[serde(rename = "browser_download_url")]
    pub download_url: String,
}

/// First asset whose name contains `marker` and ends with `suffix`.
pub fn select_asset<'a>(
    assets: &'a [ReleaseAsset],
    marker: &str,
    suffix: &str,
) -> Option<&'a ReleaseAsset> {
    assets
        .iter()
        .find(|asset| asset.name.contains(marker) && asset.name.ends_with(suffix))
}

/// Upstream-specific lookup of the archive to install.
#[async_trait]
pub trait ReleaseResolver: Send + Sync {
    /// Human-readable name of the upstream, for logs.
    fn describe(&self) -> String;

    async fn resolve(&self, downloader: &Downloader) -> BootstrapResult<ReleaseAsset>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    AlreadyInstalled,
    Installed,
}

/// Idempotent "resolve → download → extract → relocate" for `.tar.gz`
/// releases whose content sits under one root directory.
///
/// The target directory is its own marker: if it exists nothing is fetched.
/// Work happens in a staging directory next to the target and the archive
/// root is moved into place with a single rename, so the marker only appears
/// after a complete install.
pub struct ArchiveInstaller<'a> {
    downloader: &'a Downloader,
}

impl<'a> ArchiveInstaller<'a> {
    pub fn new(downloader: &'a Downloader) -> Self {
        Self { downloader }
    }

    #[instrument(skip(self, resolver), fields(upstream = %resolver.describe()))]
    pub async fn ensure_installed(
        &self,
        target: &Path,
        resolver: &dyn ReleaseResolver,
    ) -> BootstrapResult<InstallOutcome> {
        if is_installed(target).await {
            info!("Already installed at {:?}", target);
            return Ok(InstallOutcome::AlreadyInstalled);
        }

        let asset = resolver
            .resolve(self.downloader)
            .await
            .stage(Stage::ResolveRelease)?;
        info!("Downloading {} from {}", asset.name, asset.download_url);

        let parent = parent_dir(target);
        tokio::fs::create_dir_all(&parent)
            .await
            .map_err(|source| BootstrapError::Io {
                path: parent.clone(),
                source,
            })?;

        let staging = parent.join(format!(".staging-{}", Uuid::new_v4()));
        let result = self.install_via(&staging, target, &asset).await;

        if result.is_err() {
            if let Err(err) = tokio::fs::remove_dir_all(&staging).await {
                if err.kind() != std::io::ErrorKind::NotFound {
                    warn!("Failed to clean staging directory {:?}: {}", staging, err);
                }
            }
        }

        result.map(|()| InstallOutcome::Installed)
    }

    async fn install_via(
        &self,
        staging: &Path,
        target: &Path,
        asset: &ReleaseAsset,
    ) -> BootstrapResult<()> {
        tokio::fs::create_dir_all(staging)
            .await
            .map_err(|source| BootstrapError::Io {
                path: staging.to_path_buf(),
                source,
            })?;

        let archive_path = staging.join(archive_file_name(&asset.name));
        let extract_root = staging.join("extract");

        self.downloader
            .download_file(&asset.download_url, &archive_path)
            .await
            .stage(Stage::DownloadArchive)?;

        let root = {
            let archive_path = archive_path.clone();
            let extract_root = extract_root.clone();
            tokio::task::spawn_blocking(move || extract_tar_gz(&archive_path, &extract_root))
                .await
                .map_err(|e| BootstrapError::Other(format!("extraction task failed: {e}")))
                .and_then(|result| result)
                .stage(Stage::ExtractArchive)?
        };

        let Some(root) = root else {
            return Err(BootstrapError::MissingArchiveRoot(archive_path)).stage(Stage::ExtractArchive);
        };

        relocate(&extract_root.join(&root), target)
            .await
            .stage(Stage::RelocateArchiveRoot)?;

        tokio::fs::remove_dir_all(&extract_root)
            .await
            .map_err(|source| BootstrapError::Io {
                path: extract_root.clone(),
                source,
            })?;

        if let Err(err) = tokio::fs::remove_file(&archive_path).await {
            warn!("Failed to remove archive {:?}: {}", archive_path, err);
        }
        if let Err(err) = tokio::fs::remove_dir(staging).await {
            warn!("Failed to remove staging directory {:?}: {}", staging, err);
        }

        info!("Installed {} to {:?}", asset.name, target);
        Ok(())
    }
}

async fn is_installed(target: &Path) -> bool {
    tokio::fs::metadata(target)
        .await
        .map(|meta| meta.is_dir())
        .unwrap_or(false)
}

/// Move the extracted root onto `target`. Never replaces an existing path.
async fn relocate(extracted: &Path, target: &Path) -> BootstrapResult<()> {
    if tokio::fs::try_exists(target).await.unwrap_or(false) {
        return Err(BootstrapError::Io {
            path: target.to_path_buf(),
            source: std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                "install target appeared while extracting",
            ),
        });
    }

    debug!("Moving {:?} to {:?}", extracted, target);
    tokio::fs::rename(extracted, target)
        .await
        .map_err(|source| BootstrapError::Io {
            path: target.to_path_buf(),
            source,
        })
}

fn parent_dir(target: &Path) -> PathBuf {
    match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Asset names come from upstream; keep only the final component.
fn archive_file_name(asset_name: &str) -> String {
    Path::new(asset_name)
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "archive.tar.gz".to_string())
}
