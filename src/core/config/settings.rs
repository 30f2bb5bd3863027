use std::path::PathBuf;

use crate::core::error::{BootstrapError, BootstrapResult};
use crate::core::loaders::ServerFlavor;

pub const DEFAULT_GITHUB_API: &str = "https://api.github.com";
pub const DEFAULT_PAPER_API: &str = "https://api.papermc.io";
pub const DEFAULT_NEOFORGE_MAVEN: &str = "https://maven.neoforged.net/releases/net/neoforged/neoforge";
pub const DEFAULT_JAR_MIRROR: &str = "https://mcutils.com";

/// Upstream base URLs. Overridable so mirrors (and tests) can stand in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub github_api: String,
    pub paper_api: String,
    pub neoforge_maven: String,
    pub jar_mirror: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            github_api: DEFAULT_GITHUB_API.to_string(),
            paper_api: DEFAULT_PAPER_API.to_string(),
            neoforge_maven: DEFAULT_NEOFORGE_MAVEN.to_string(),
            jar_mirror: DEFAULT_JAR_MIRROR.to_string(),
        }
    }
}

impl Endpoints {
    /// Every base URL pointed at one host, as used by a local mirror.
    pub fn all_at(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            github_api: base.to_string(),
            paper_api: base.to_string(),
            neoforge_maven: format!("{base}/releases/net/neoforged/neoforge"),
            jar_mirror: base.to_string(),
        }
    }
}

/// JVM heap limits, passed verbatim into `-Xms` / `-Xmx`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryLimits {
    pub min: Option<String>,
    pub max: Option<String>,
}

impl MemoryLimits {
    /// `-Xms<min>` and `-Xmx<max>`; an unset limit drops its flag.
    pub fn jvm_flags(&self) -> Vec<String> {
        let mut flags = Vec::with_capacity(2);
        if let Some(min) = &self.min {
            flags.push(format!("-Xms{min}"));
        }
        if let Some(max) = &self.max {
            flags.push(format!("-Xmx{max}"));
        }
        flags
    }
}

/// Everything the bootstrap needs, resolved once at the entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Directory holding `java/` and `server/`.
    pub work_dir: PathBuf,
    pub minecraft_version: Option<String>,
    pub java_version_override: Option<String>,
    pub neoforge_version_override: Option<String>,
    pub server_type: Option<String>,
    pub memory: MemoryLimits,
    pub endpoints: Endpoints,
}

impl Settings {
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
            minecraft_version: None,
            java_version_override: None,
            neoforge_version_override: None,
            server_type: None,
            memory: MemoryLimits::default(),
            endpoints: Endpoints::default(),
        }
    }

    /// Minecraft version, or `""` when unset.
    pub fn minecraft_version_or_empty(&self) -> &str {
        self.minecraft_version.as_deref().unwrap_or("")
    }

    pub fn flavor(&self) -> BootstrapResult<ServerFlavor> {
        match self.server_type.as_deref() {
            Some(value) => Ok(ServerFlavor::parse(value)),
            None => Err(BootstrapError::Config(
                "server type is not set (use --server-type or Type)".into(),
            )),
        }
    }
}

/// Blank values count as unset, matching how the container env is filled in.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
