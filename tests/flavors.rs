#![cfg(unix)]

mod common;

use std::path::Path;

use common::{release_path, MockUpstream};
use craftboot::core::bootstrap;
use craftboot::core::config::{Endpoints, MemoryLimits, Settings};
use craftboot::core::error::{BootstrapError, Stage};

const PAPER_BUILDS: &str = "/v2/projects/paper/versions/1.20.6/builds";
const PAPER_JAR: &str = "/v2/projects/paper/versions/1.20.6/builds/151/downloads/paper-1.20.6-151.jar";
const NEO_BASE: &str = "/releases/net/neoforged/neoforge";

fn settings(work_dir: &Path, upstream: &MockUpstream, server_type: &str, mc: &str) -> Settings {
    let mut settings = Settings::new(work_dir);
    settings.server_type = Some(server_type.to_string());
    settings.minecraft_version = Some(mc.to_string());
    settings.memory = MemoryLimits {
        min: Some("1G".into()),
        max: Some("2G".into()),
    };
    settings.endpoints = Endpoints::all_at(&upstream.base);
    settings
}

fn read(path: impl AsRef<Path>) -> String {
    std::fs::read_to_string(path).unwrap()
}

/// A NeoForge "installer" for the fake launcher: lays down the version's
/// libraries and a run.sh that records `banner`.
fn neoforge_installer(version: &str, banner: &str) -> String {
    format!(
        "[ \"$1\" = \"--installServer\" ] || exit 2\n\
         mkdir -p libraries/net/neoforged/neoforge/{version}\n\
         printf '#!/bin/sh\\necho {banner} > started.txt\\n' > run.sh\n\
         chmod +x run.sh\n"
    )
}

#[tokio::test]
async fn paper_downloads_latest_build_once_and_runs_it() {
    let upstream = MockUpstream::start().await;
    upstream.publish_jdk("21");
    upstream.route(
        PAPER_BUILDS,
        r#"{"builds":[{"build":140},{"build":151}]}"#,
    );
    upstream.route(PAPER_JAR, "echo \"paper $1\" > started.txt\n");
    let tmp = tempfile::tempdir().unwrap();
    let settings = settings(tmp.path(), &upstream, "paper", "1.20.6");

    bootstrap::run(&settings).await.unwrap();

    let server = tmp.path().join("server");
    assert_eq!(read(server.join("started.txt")), "paper nogui\n");
    assert_eq!(read(server.join("jvm_flags.txt")), "-Xms1G\n-Xmx2G\n");
    assert!(server.join("paper-1.20.6.jar").is_file());
    assert!(read(server.join("eula.txt")).ends_with("eula=true\n"));
    assert!(tmp.path().join("java/jdk21/bin/java").is_file());

    bootstrap::run(&settings).await.unwrap();
    assert_eq!(upstream.hits(PAPER_BUILDS), 1);
    assert_eq!(upstream.hits(PAPER_JAR), 1);
    assert_eq!(upstream.hits("/dl/jdk21.tar.gz"), 1);
}

#[tokio::test]
async fn paper_without_builds_is_unsupported() {
    let upstream = MockUpstream::start().await;
    upstream.publish_jdk("21");
    upstream.route(PAPER_BUILDS, r#"{"builds":[]}"#);
    let tmp = tempfile::tempdir().unwrap();

    let err = bootstrap::run(&settings(tmp.path(), &upstream, "paper", "1.20.6"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        BootstrapError::Stage {
            stage: Stage::HandleFlavor(_),
            ..
        }
    ));
    assert!(matches!(
        err.root_cause(),
        BootstrapError::UnsupportedVersion { .. }
    ));
    assert_eq!(err.exit_code(), 1);
    // Java and eula come first regardless.
    assert!(tmp.path().join("server/eula.txt").is_file());
}

#[tokio::test]
async fn other_types_come_from_the_jar_mirror() {
    let upstream = MockUpstream::start().await;
    upstream.publish_jdk("21");
    upstream.route(
        "/api/server-jars/purpur/1.21/download",
        "echo purpur > started.txt\nexit 3\n",
    );
    let tmp = tempfile::tempdir().unwrap();

    let err = bootstrap::run(&settings(tmp.path(), &upstream, "purpur", "1.21"))
        .await
        .unwrap_err();

    let server = tmp.path().join("server");
    assert!(server.join("purpur-1.21.jar").is_file());
    assert_eq!(read(server.join("started.txt")), "purpur\n");
    assert!(matches!(
        err,
        BootstrapError::Stage {
            stage: Stage::LaunchServer,
            ..
        }
    ));
    assert_eq!(err.exit_code(), 3);
}

#[tokio::test]
async fn failed_jar_download_leaves_no_marker_behind() {
    let upstream = MockUpstream::start().await;
    upstream.publish_jdk("21");
    let tmp = tempfile::tempdir().unwrap();
    let settings = settings(tmp.path(), &upstream, "purpur", "1.21");
    let server = tmp.path().join("server");

    let err = bootstrap::run(&settings).await.unwrap_err();

    assert!(matches!(
        err,
        BootstrapError::Stage {
            stage: Stage::HandleFlavor(_),
            ..
        }
    ));
    assert!(matches!(
        err.root_cause(),
        BootstrapError::HttpStatus { status: 404, .. }
    ));
    assert!(err.to_string().contains("download server jar failed"), "{err}");
    assert!(!server.join("purpur-1.21.jar").exists());
    assert!(!server.join("purpur-1.21.jar.part").exists());

    // Once the mirror has it, the next start downloads and runs it.
    upstream.route("/api/server-jars/purpur/1.21/download", "echo purpur > started.txt\n");
    bootstrap::run(&settings).await.unwrap();
    assert!(server.join("purpur-1.21.jar").is_file());
    assert!(!server.join("purpur-1.21.jar.part").exists());
    assert_eq!(read(server.join("started.txt")), "purpur\n");
    assert_eq!(upstream.hits("/api/server-jars/purpur/1.21/download"), 2);
}

#[tokio::test]
async fn failing_neoforge_installer_stops_before_launch() {
    let upstream = MockUpstream::start().await;
    upstream.publish_jdk("17");
    upstream.route(
        &format!("{NEO_BASE}/maven-metadata.xml"),
        "<versions>\n<version>20.4.237</version>\n</versions>\n",
    );
    upstream.route(
        &format!("{NEO_BASE}/20.4.237/neoforge-20.4.237-installer.jar"),
        "echo installing > installer.log\nexit 5\n",
    );
    let tmp = tempfile::tempdir().unwrap();
    let server = tmp.path().join("server");

    let err = bootstrap::run(&settings(tmp.path(), &upstream, "neoforge", "1.20.4"))
        .await
        .unwrap_err();

    assert!(
        err.to_string()
            .starts_with("handle NeoForge failed: run NeoForge installer failed: "),
        "{err}"
    );
    assert!(matches!(
        err.root_cause(),
        BootstrapError::ProcessExit { code: Some(5), .. }
    ));
    assert_eq!(err.exit_code(), 1);
    assert_eq!(read(server.join("installer.log")), "installing\n");
    assert!(!server.join("run.sh").exists());
    assert!(!server.join("started.txt").exists());
}

#[tokio::test]
async fn existing_eula_is_kept() {
    let upstream = MockUpstream::start().await;
    upstream.publish_jdk("21");
    upstream.route("/api/server-jars/vanilla/1.21/download", "true\n");
    let tmp = tempfile::tempdir().unwrap();
    let server = tmp.path().join("server");
    std::fs::create_dir_all(&server).unwrap();
    std::fs::write(server.join("eula.txt"), "eula=false\n").unwrap();

    bootstrap::run(&settings(tmp.path(), &upstream, "vanilla", "1.21"))
        .await
        .unwrap();

    assert_eq!(read(server.join("eula.txt")), "eula=false\n");
}

#[tokio::test]
async fn neoforge_installs_then_switches_pinned_version() {
    let upstream = MockUpstream::start().await;
    upstream.publish_jdk("17");
    let metadata = format!("{NEO_BASE}/maven-metadata.xml");
    upstream.route(
        &metadata,
        "<metadata>\n  <versioning>\n    <versions>\n\
         \x20     <version>20.2.86</version>\n\
         \x20     <version>20.4.80-beta</version>\n\
         \x20     <version>20.4.237</version>\n\
         \x20     <version>20.6.119</version>\n\
         \x20   </versions>\n  </versioning>\n</metadata>\n",
    );
    let first_installer = format!("{NEO_BASE}/20.4.237/neoforge-20.4.237-installer.jar");
    let pinned_installer = format!("{NEO_BASE}/20.4.240/neoforge-20.4.240-installer.jar");
    upstream.route(&first_installer, neoforge_installer("20.4.237", "neo237"));
    upstream.route(&pinned_installer, neoforge_installer("20.4.240", "neo240"));

    let tmp = tempfile::tempdir().unwrap();
    let server = tmp.path().join("server");
    let mut settings = settings(tmp.path(), &upstream, "neoforge", "1.20.4");

    // Newest 20.4 build from the metadata.
    bootstrap::run(&settings).await.unwrap();
    assert_eq!(read(server.join("started.txt")), "neo237\n");
    assert_eq!(read(server.join("user_jvm_args.txt")), "-Xms1G -Xmx2G");
    assert!(server.join("libraries/net/neoforged/neoforge/20.4.237").is_dir());
    assert!(!server.join("neoforge-installer.jar").exists());
    assert!(tmp.path().join("java/jdk17").is_dir());

    // Pinning another version wipes the old install.
    std::fs::create_dir_all(server.join("logs")).unwrap();
    std::fs::write(server.join("logs/latest.log"), "old\n").unwrap();
    settings.neoforge_version_override = Some("20.4.240".into());
    bootstrap::run(&settings).await.unwrap();
    assert_eq!(read(server.join("started.txt")), "neo240\n");
    assert!(!server.join("libraries/net/neoforged/neoforge/20.4.237").exists());
    assert!(server.join("libraries/net/neoforged/neoforge/20.4.240").is_dir());
    assert!(!server.join("logs").exists());

    // Same pin again: nothing is reinstalled.
    std::fs::create_dir_all(server.join("logs")).unwrap();
    std::fs::write(server.join("logs/latest.log"), "keep\n").unwrap();
    bootstrap::run(&settings).await.unwrap();
    assert_eq!(read(server.join("logs/latest.log")), "keep\n");

    assert_eq!(upstream.hits(&metadata), 1);
    assert_eq!(upstream.hits(&first_installer), 1);
    assert_eq!(upstream.hits(&pinned_installer), 1);
    assert_eq!(upstream.hits(&release_path("17")), 1);
}

#[tokio::test]
async fn neoforge_without_matching_build_is_unsupported() {
    let upstream = MockUpstream::start().await;
    upstream.publish_jdk("17");
    upstream.route(
        &format!("{NEO_BASE}/maven-metadata.xml"),
        "<versions>\n<version>20.4.237</version>\n</versions>\n",
    );
    let tmp = tempfile::tempdir().unwrap();

    let err = bootstrap::run(&settings(tmp.path(), &upstream, "neoforge", "1.19.2"))
        .await
        .unwrap_err();

    assert!(matches!(
        err.root_cause(),
        BootstrapError::UnsupportedVersion { .. }
    ));
    assert!(err.to_string().contains("resolve NeoForge version"), "{err}");
}

#[tokio::test]
async fn missing_server_type_fails_before_any_download() {
    let upstream = MockUpstream::start().await;
    let tmp = tempfile::tempdir().unwrap();
    let mut settings = settings(tmp.path(), &upstream, "paper", "1.20.6");
    settings.server_type = None;

    let err = bootstrap::run(&settings).await.unwrap_err();

    assert!(matches!(err, BootstrapError::Config(_)));
    assert_eq!(upstream.hits(&release_path("21")), 0);
}
