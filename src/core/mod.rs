// ─── craftboot Core ───
// Container entrypoint: provisions a JDK and starts a Minecraft server.
//
// Architecture:
//   core/
//     config/     — CLI/env settings, memory limits, upstream endpoints
//     version/    — Dotted version comparison
//     java/       — Java major selection + Temurin provisioning
//     archive/    — GitHub release lookup + staged tar.gz install
//     downloader/ — HTTP GET helpers + streamed file downloads
//     instance/   — Server directory layout, eula.txt, user_jvm_args.txt
//     loaders/    — Paper, NeoForge, generic jar mirror
//     launch/     — Foreground process runner
//     bootstrap   — The start sequence tying it together

pub mod archive;
pub mod bootstrap;
pub mod config;
pub mod downloader;
pub mod error;
pub mod http;
pub mod instance;
pub mod java;
pub mod launch;
pub mod loaders;
pub mod version;
