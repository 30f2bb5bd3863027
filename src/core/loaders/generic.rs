use async_trait::async_trait;
use tracing::info;

use super::context::FlavorContext;
use super::installer::FlavorInstaller;
use crate::core::error::{BootstrapResult, Stage, StageContext};
use crate::core::launch::LaunchPlan;

/// Any server type the jar mirror serves by name.
pub struct GenericJarInstaller {
    mirror_base: String,
    server_type: String,
}

impl GenericJarInstaller {
    pub fn new(mirror_base: &str, server_type: &str) -> Self {
        Self {
            mirror_base: mirror_base.trim_end_matches('/').to_string(),
            server_type: server_type.to_string(),
        }
    }

    pub fn jar_name(&self, minecraft_version: &str) -> String {
        format!("{}-{}.jar", self.server_type, minecraft_version)
    }

    fn download_url(&self, minecraft_version: &str) -> String {
        format!(
            "{}/api/server-jars/{}/{}/download",
            self.mirror_base, self.server_type, minecraft_version
        )
    }
}

#[async_trait]
impl FlavorInstaller for GenericJarInstaller {
    async fn prepare(&self, ctx: &FlavorContext<'_>) -> BootstrapResult<LaunchPlan> {
        let jar_name = self.jar_name(ctx.minecraft_version);
        let jar_path = ctx.server.jar_path(&jar_name);

        if !jar_path.exists() {
            let url = self.download_url(ctx.minecraft_version);
            info!("{} not found, downloading from {}", jar_name, url);
            ctx.downloader
                .download_file(&url, &jar_path)
                .await
                .stage(Stage::DownloadServerJar)?;
        }

        Ok(LaunchPlan::java_jar(
            format!("{} server", self.server_type),
            ctx.memory.jvm_flags(),
            &jar_name,
            ctx.server.dir(),
            ctx.java.bin_dir(),
        ))
    }
}
