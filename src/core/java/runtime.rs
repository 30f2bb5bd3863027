use std::path::{Path, PathBuf};

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::core::archive::{select_asset, ArchiveInstaller, InstallOutcome, ReleaseAsset, ReleaseResolver};
use crate::core::downloader::Downloader;
use crate::core::error::{BootstrapError, BootstrapResult};

const TEMURIN_OWNER: &str = "adoptium";
const RUNTIME_ARCHIVE_SUFFIX: &str = ".tar.gz";
const GITHUB_JSON: &str = "application/vnd.github+json";

/// Subset of GitHub's release payload.
#[derive(Debug, Deserialize)]
struct GitHubRelease {
    #[serde(default)]
    tag_name: Option<String>,
    #[serde(default)]
    assets: Vec<ReleaseAsset>,
}

/// Resolves the archive from a repository's "latest release".
#[derive(Debug, Clone)]
pub struct GitHubLatestRelease {
    api_base: String,
    owner: String,
    repo: String,
    marker: String,
    suffix: String,
}

impl GitHubLatestRelease {
    pub fn new(
        api_base: &str,
        owner: &str,
        repo: &str,
        marker: impl Into<String>,
        suffix: impl Into<String>,
    ) -> Self {
        Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
            marker: marker.into(),
            suffix: suffix.into(),
        }
    }

    /// Eclipse Temurin JDK for this host, e.g. `adoptium/temurin21-binaries`.
    pub fn temurin(api_base: &str, major: &str) -> Self {
        Self::new(
            api_base,
            TEMURIN_OWNER,
            &format!("temurin{major}-binaries"),
            platform::jdk_marker(),
            RUNTIME_ARCHIVE_SUFFIX,
        )
    }

    pub fn url(&self) -> String {
        format!(
            "{}/repos/{}/{}/releases/latest",
            self.api_base, self.owner, self.repo
        )
    }
}

#[async_trait]
impl ReleaseResolver for GitHubLatestRelease {
    fn describe(&self) -> String {
        format!("github:{}/{}", self.owner, self.repo)
    }

    async fn resolve(&self, downloader: &Downloader) -> BootstrapResult<ReleaseAsset> {
        let url = self.url();
        debug!("Fetching latest release from {}", url);

        let request = downloader.http_client().get(&url).header(ACCEPT, GITHUB_JSON);
        let release: GitHubRelease = downloader.get_json_with(request, &url).await?;

        let release_name = match &release.tag_name {
            Some(tag) => format!("{}/{} {}", self.owner, self.repo, tag),
            None => format!("{}/{}", self.owner, self.repo),
        };

        select_asset(&release.assets, &self.marker, &self.suffix)
            .cloned()
            .ok_or(BootstrapError::NoSuitableAsset {
                release: release_name,
                marker: self.marker.clone(),
                suffix: self.suffix.clone(),
            })
    }
}

/// An installed JDK under `<java_root>/jdk<major>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaRuntime {
    pub home: PathBuf,
}

impl JavaRuntime {
    pub fn bin_dir(&self) -> PathBuf {
        self.home.join("bin")
    }

    pub fn java_bin(&self) -> PathBuf {
        self.bin_dir().join(java_exe())
    }
}

/// Installs Temurin JDKs from GitHub releases.
pub struct JavaProvisioner<'a> {
    downloader: &'a Downloader,
    github_api: &'a str,
}

impl<'a> JavaProvisioner<'a> {
    pub fn new(downloader: &'a Downloader, github_api: &'a str) -> Self {
        Self {
            downloader,
            github_api,
        }
    }

    /// Make sure `<java_root>/jdk<major>` exists, downloading it if not.
    #[instrument(skip(self))]
    pub async fn ensure_java(&self, java_root: &Path, major: &str) -> BootstrapResult<JavaRuntime> {
        let runtime = JavaRuntime {
            home: java_root.join(format!("jdk{major}")),
        };

        let resolver = GitHubLatestRelease::temurin(self.github_api, major);
        match ArchiveInstaller::new(self.downloader)
            .ensure_installed(&runtime.home, &resolver)
            .await?
        {
            InstallOutcome::AlreadyInstalled => {
                info!("Java {} is already installed at {:?}", major, runtime.home)
            }
            InstallOutcome::Installed => info!("Java {} installation completed", major),
        }

        Ok(runtime)
    }
}

/// `chmod 0755` every regular file in `bin/`. The `java` launcher must exist.
pub async fn mark_binaries_executable(runtime: &JavaRuntime) -> BootstrapResult<()> {
    let bin_dir = runtime.bin_dir();
    let java_bin = runtime.java_bin();
    let launcher_present = tokio::fs::metadata(&java_bin)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false);
    if !launcher_present {
        return Err(BootstrapError::Io {
            path: java_bin,
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "java launcher missing"),
        });
    }

    let dir_err = |source: std::io::Error| BootstrapError::Io {
        path: bin_dir.clone(),
        source,
    };
    let mut entries = tokio::fs::read_dir(&bin_dir).await.map_err(dir_err)?;
    while let Some(entry) = entries.next_entry().await.map_err(dir_err)? {
        let path = entry.path();
        let is_file = tokio::fs::metadata(&path)
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false);
        if is_file {
            make_executable(&path).await?;
        }
    }

    debug!("Set executable permissions for Java binaries in {:?}", bin_dir);
    Ok(())
}

#[cfg(unix)]
async fn make_executable(path: &Path) -> BootstrapResult<()> {
    use std::os::unix::fs::PermissionsExt;
    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .await
        .map_err(|source| BootstrapError::Io {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(not(unix))]
async fn make_executable(_path: &Path) -> BootstrapResult<()> {
    Ok(())
}

fn java_exe() -> &'static str {
    if cfg!(windows) {
        "java.exe"
    } else {
        "java"
    }
}

pub mod platform {
    /// Architecture as spelled in Temurin asset names.
    pub fn platform_arch() -> &'static str {
        match std::env::consts::ARCH {
            "x86_64" => "x64",
            "aarch64" => "aarch64",
            "powerpc64" => "ppc64le",
            other => other,
        }
    }

    pub fn platform_os() -> &'static str {
        match std::env::consts::OS {
            "macos" => "mac",
            other => other,
        }
    }

    /// e.g. `jdk_x64_linux`.
    pub fn jdk_marker() -> String {
        format!("jdk_{}_{}", platform_arch(), platform_os())
    }
}
