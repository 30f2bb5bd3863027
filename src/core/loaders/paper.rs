use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use super::context::FlavorContext;
use super::installer::FlavorInstaller;
use crate::core::downloader::Downloader;
use crate::core::error::{BootstrapError, BootstrapResult, Stage, StageContext};
use crate::core::launch::LaunchPlan;

const PAPER_PROJECT: &str = "paper";

/// Subset of `GET /v2/projects/paper/versions/{version}/builds`.
#[derive(Debug, Deserialize)]
struct BuildList {
    #[serde(default)]
    builds: Vec<BuildEntry>,
}

#[derive(Debug, Deserialize)]
struct BuildEntry {
    build: u64,
}

impl BuildList {
    fn latest(&self) -> Option<&BuildEntry> {
        self.builds.last()
    }
}

/// PaperMC: one jar per Minecraft version, latest build at first start.
pub struct PaperInstaller {
    api_base: String,
}

impl PaperInstaller {
    pub fn new(api_base: &str) -> Self {
        Self {
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    pub fn jar_name(minecraft_version: &str) -> String {
        format!("{PAPER_PROJECT}-{minecraft_version}.jar")
    }

    fn builds_url(&self, minecraft_version: &str) -> String {
        format!(
            "{}/v2/projects/{PAPER_PROJECT}/versions/{}/builds",
            self.api_base, minecraft_version
        )
    }

    fn download_url(&self, minecraft_version: &str, build: u64) -> String {
        format!(
            "{}/v2/projects/{PAPER_PROJECT}/versions/{mc}/builds/{build}/downloads/{PAPER_PROJECT}-{mc}-{build}.jar",
            self.api_base,
            mc = minecraft_version,
        )
    }

    /// Latest build for `minecraft_version`: the API lists builds oldest
    /// first, so the last entry wins.
    pub async fn latest_build(
        &self,
        downloader: &Downloader,
        minecraft_version: &str,
    ) -> BootstrapResult<u64> {
        let url = self.builds_url(minecraft_version);
        debug!("Fetching PaperMC builds from {}", url);

        let list: BuildList = downloader.get_json(&url).await?;
        list.latest()
            .map(|entry| entry.build)
            .ok_or_else(|| BootstrapError::UnsupportedVersion {
                flavor: "PaperMC".into(),
                version: minecraft_version.to_string(),
            })
    }
}

#[async_trait]
impl FlavorInstaller for PaperInstaller {
    async fn prepare(&self, ctx: &FlavorContext<'_>) -> BootstrapResult<LaunchPlan> {
        let jar_name = Self::jar_name(ctx.minecraft_version);
        let jar_path = ctx.server.jar_path(&jar_name);

        if !jar_path.exists() {
            info!("{} not found, downloading...", jar_name);
            let build = self
                .latest_build(ctx.downloader, ctx.minecraft_version)
                .await
                .stage(Stage::FetchBuildList)?;

            let url = self.download_url(ctx.minecraft_version, build);
            info!("Downloading PaperMC build {} from {}", build, url);
            ctx.downloader
                .download_file(&url, &jar_path)
                .await
                .stage(Stage::DownloadServerJar)?;
        }

        Ok(LaunchPlan::java_jar(
            "PaperMC server",
            ctx.memory.jvm_flags(),
            &jar_name,
            ctx.server.dir(),
            ctx.java.bin_dir(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_follow_paper_v2_api() {
        let paper = PaperInstaller::new("https://api.papermc.io/");
        assert_eq!(
            paper.builds_url("1.20.6"),
            "https://api.papermc.io/v2/projects/paper/versions/1.20.6/builds"
        );
        assert_eq!(
            paper.download_url("1.20.6", 151),
            "https://api.papermc.io/v2/projects/paper/versions/1.20.6/builds/151/downloads/paper-1.20.6-151.jar"
        );
        assert_eq!(PaperInstaller::jar_name("1.20.6"), "paper-1.20.6.jar");
    }

    #[test]
    fn build_list_ignores_extra_fields() {
        let json = r#"{
            "project_id": "paper",
            "version": "1.20.6",
            "builds": [
                {"build": 140, "channel": "default"},
                {"build": 151, "channel": "default"}
            ]
        }"#;
        let list: BuildList = serde_json::from_str(json).unwrap();
        let builds: Vec<u64> = list.builds.iter().map(|b| b.build).collect();
        assert_eq!(builds, vec![140, 151]);
    }

    #[test]
    fn latest_build_is_the_last_listed() {
        let list: BuildList =
            serde_json::from_str(r#"{"builds":[{"build":151},{"build":140}]}"#).unwrap();
        assert_eq!(list.latest().map(|b| b.build), Some(140));

        let empty: BuildList = serde_json::from_str(r#"{}"#).unwrap();
        assert!(empty.latest().is_none());
    }
}
