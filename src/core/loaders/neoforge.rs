use std::path::Path;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::context::FlavorContext;
use super::installer::FlavorInstaller;
use crate::core::downloader::Downloader;
use crate::core::error::{BootstrapError, BootstrapResult, Stage, StageContext};
use crate::core::instance::{write_user_jvm_args, ServerLayout};
use crate::core::launch::{run_foreground, LaunchPlan};

const INSTALLER_JAR: &str = "neoforge-installer.jar";

/// NeoForge runs its official installer once, which lays down `libraries/`
/// and a `run.sh` that every later start goes through.
pub struct NeoForgeInstaller {
    maven_base: String,
    version_override: Option<String>,
}

impl NeoForgeInstaller {
    pub fn new(maven_base: &str, version_override: Option<String>) -> Self {
        Self {
            maven_base: maven_base.trim_end_matches('/').to_string(),
            version_override,
        }
    }

    fn metadata_url(&self) -> String {
        format!("{}/maven-metadata.xml", self.maven_base)
    }

    fn installer_url(&self, neoforge_version: &str) -> String {
        format!(
            "{base}/{v}/neoforge-{v}-installer.jar",
            base = self.maven_base,
            v = neoforge_version
        )
    }

    /// Newest NeoForge build for `minecraft_version`, from the maven metadata.
    pub async fn resolve_version(
        &self,
        downloader: &Downloader,
        minecraft_version: &str,
    ) -> BootstrapResult<String> {
        let url = self.metadata_url();
        debug!("Reading NeoForge versions from {}", url);
        let metadata = downloader.get_text(&url).await?;

        let filter = version_filter(minecraft_version);
        latest_matching_version(&metadata, filter).ok_or_else(|| {
            BootstrapError::UnsupportedVersion {
                flavor: "NeoForge".into(),
                version: minecraft_version.to_string(),
            }
        })
    }

    async fn install(&self, ctx: &FlavorContext<'_>, neoforge_version: &str) -> BootstrapResult<()> {
        let installer_path = ctx.server.jar_path(INSTALLER_JAR);
        let url = self.installer_url(neoforge_version);
        info!("Downloading NeoForge {} installer from {}", neoforge_version, url);
        ctx.downloader
            .download_file(&url, &installer_path)
            .await
            .stage(Stage::DownloadNeoForgeInstaller)?;

        let installer = LaunchPlan::new(
            "NeoForge installer",
            vec![
                "java".into(),
                "-jar".into(),
                INSTALLER_JAR.into(),
                "--installServer".into(),
            ],
            ctx.server.dir(),
            ctx.java.bin_dir(),
        )
        .without_stdin();
        run_foreground(&installer)
            .await
            .stage(Stage::RunNeoForgeInstaller)?;

        let run_script = ctx.server.run_script();
        if !run_script.exists() {
            return Err(BootstrapError::Io {
                path: run_script,
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "installer finished without writing run.sh",
                ),
            })
            .stage(Stage::RunNeoForgeInstaller);
        }

        if let Err(e) = tokio::fs::remove_file(&installer_path).await {
            warn!("Could not remove {:?}: {}", installer_path, e);
        }
        Ok(())
    }
}

#[async_trait]
impl FlavorInstaller for NeoForgeInstaller {
    async fn prepare(&self, ctx: &FlavorContext<'_>) -> BootstrapResult<LaunchPlan> {
        write_user_jvm_args(ctx.server, ctx.memory)
            .await
            .stage(Stage::WriteJvmArgs)?;

        // A pinned version that is not the one on disk invalidates the install.
        if let Some(pinned) = &self.version_override {
            if !ctx.server.neoforge_marker(pinned).exists() {
                info!("NeoForge {} is not installed, clearing previous install", pinned);
                reset_install(ctx.server)
                    .await
                    .stage(Stage::ResetNeoForgeInstall)?;
            }
        }

        if !ctx.server.run_script().exists() {
            let neoforge_version = match &self.version_override {
                Some(pinned) => pinned.clone(),
                None => self
                    .resolve_version(ctx.downloader, ctx.minecraft_version)
                    .await
                    .stage(Stage::ResolveNeoForgeVersion)?,
            };
            info!(
                "Installing NeoForge {} for Minecraft {}",
                neoforge_version, ctx.minecraft_version
            );
            self.install(ctx, &neoforge_version).await?;
        }

        Ok(LaunchPlan::new(
            "NeoForge server",
            vec!["./run.sh".into()],
            ctx.server.dir(),
            ctx.java.bin_dir(),
        ))
    }
}

/// NeoForge versions drop the leading `1.` of the Minecraft version
/// (`1.20.4` -> `20.4.x`).
pub fn version_filter(minecraft_version: &str) -> &str {
    minecraft_version
        .strip_prefix("1.")
        .unwrap_or(minecraft_version)
}

/// Last `<version>` line of `metadata` starting with `filter`.
///
/// Maven lists versions oldest first, one per line.
pub fn latest_matching_version(metadata: &str, filter: &str) -> Option<String> {
    let needle = format!("<version>{filter}");
    metadata
        .lines()
        .filter(|line| line.contains(&needle))
        .filter_map(|line| {
            let line = line.trim();
            let start = line.find("<version>")? + "<version>".len();
            let rest = &line[start..];
            let end = rest.find("</version>").unwrap_or(rest.len());
            Some(rest[..end].trim().to_string())
        })
        .filter(|version| !version.is_empty())
        .last()
}

/// Remove what a previous NeoForge install left behind. Missing pieces are fine.
pub async fn reset_install(server: &ServerLayout) -> BootstrapResult<()> {
    remove_dir_if_present(&server.libraries_dir()).await?;
    remove_dir_if_present(&server.logs_dir()).await?;

    let run_script = server.run_script();
    match tokio::fs::remove_file(&run_script).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(BootstrapError::Io {
            path: run_script,
            source,
        }),
    }
}

async fn remove_dir_if_present(path: &Path) -> BootstrapResult<()> {
    match tokio::fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(BootstrapError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}
