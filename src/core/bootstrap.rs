// ─── Bootstrap ───
// One container start: Java, eula, flavor files, then the server itself.

use tracing::info;

use crate::core::config::Settings;
use crate::core::downloader::Downloader;
use crate::core::error::{BootstrapError, BootstrapResult, Stage, StageContext};
use crate::core::http::build_http_client;
use crate::core::instance::{ensure_eula, WorkspaceLayout};
use crate::core::java::{mark_binaries_executable, select_java_version, JavaProvisioner};
use crate::core::launch::{run_foreground, LaunchPlan};
use crate::core::loaders::{FlavorContext, FlavorHandler};

/// Prepare everything and run the server in the foreground.
///
/// Returns once the server exits cleanly. Any failure names the stage it
/// happened in.
pub async fn run(settings: &Settings) -> BootstrapResult<()> {
    let prepared = prepare(settings).await?;
    prepared.launch().await
}

/// Everything up to, but not including, starting the server.
pub async fn prepare(settings: &Settings) -> BootstrapResult<Prepared> {
    let flavor = settings.flavor()?;
    let downloader = Downloader::new(build_http_client()?);
    let layout = WorkspaceLayout::new(&settings.work_dir);

    let java_major = select_java_version(
        settings.java_version_override.as_deref(),
        settings.minecraft_version.as_deref(),
    );
    info!("Determined Java version: {}", java_major);

    let java = JavaProvisioner::new(&downloader, &settings.endpoints.github_api)
        .ensure_java(&layout.java_dir(), &java_major)
        .await
        .stage(Stage::InstallJava)?;

    let server = layout.server();
    tokio::fs::create_dir_all(server.dir())
        .await
        .map_err(|source| BootstrapError::Io {
            path: server.dir().to_path_buf(),
            source,
        })
        .stage(Stage::WriteEula)?;
    ensure_eula(&server).await.stage(Stage::WriteEula)?;

    mark_binaries_executable(&java)
        .await
        .stage(Stage::MarkJavaExecutable)?;

    info!("Preparing {} server", flavor.display_name());
    let handler = FlavorHandler::new(&flavor, settings);
    let ctx = FlavorContext {
        minecraft_version: settings.minecraft_version_or_empty(),
        server: &server,
        java: &java,
        memory: &settings.memory,
        downloader: &downloader,
    };
    let plan = handler
        .prepare(&ctx)
        .await
        .stage(Stage::HandleFlavor(flavor.display_name()))?;

    Ok(Prepared { plan })
}

/// A server ready to start.
#[derive(Debug)]
pub struct Prepared {
    pub plan: LaunchPlan,
}

impl Prepared {
    pub async fn launch(&self) -> BootstrapResult<()> {
        info!("Server files ready, handing over to {}", self.plan.description);
        run_foreground(&self.plan)
            .await
            .stage(Stage::LaunchServer)
    }
}
