use std::path::PathBuf;

use clap::Parser;

use super::settings::{
    non_blank, Endpoints, MemoryLimits, Settings, DEFAULT_GITHUB_API, DEFAULT_JAR_MIRROR,
    DEFAULT_NEOFORGE_MAVEN, DEFAULT_PAPER_API,
};
use crate::core::error::{BootstrapError, BootstrapResult};

/// Provision Java, install the requested Minecraft server and run it in the foreground.
///
/// Every option can also come from the environment, which is how container
/// images normally configure it.
#[derive(Debug, Parser)]
#[command(name = "craftboot", version, about)]
pub struct Cli {
    /// Minecraft version to provision (e.g. 1.20.6).
    #[arg(long, env = "MINECRAFT_VERSION")]
    pub minecraft_version: Option<String>,

    /// Force a Java major version instead of deriving it.
    #[arg(long = "java-version", env = "JAVA_VERSION_OVERRIDE")]
    pub java_version_override: Option<String>,

    /// Pin the NeoForge version; a change wipes the previous install.
    #[arg(long = "neoforge-version", env = "NEO_VERSION_OVERRIDE")]
    pub neoforge_version_override: Option<String>,

    /// Server flavor: paper, neoforge, or any type the jar mirror serves.
    #[arg(long, env = "Type")]
    pub server_type: Option<String>,

    /// Initial heap size passed as -Xms.
    #[arg(long, env = "Min_Ram")]
    pub min_ram: Option<String>,

    /// Maximum heap size passed as -Xmx.
    #[arg(long, env = "Max_Ram")]
    pub max_ram: Option<String>,

    /// Directory that holds java/ and server/ (defaults to the current directory).
    #[arg(long, env = "CRAFTBOOT_WORK_DIR")]
    pub work_dir: Option<PathBuf>,

    #[arg(long, env = "CRAFTBOOT_GITHUB_API", default_value = DEFAULT_GITHUB_API)]
    pub github_api: String,

    #[arg(long, env = "CRAFTBOOT_PAPER_API", default_value = DEFAULT_PAPER_API)]
    pub paper_api: String,

    #[arg(long, env = "CRAFTBOOT_NEOFORGE_MAVEN", default_value = DEFAULT_NEOFORGE_MAVEN)]
    pub neoforge_maven: String,

    #[arg(long, env = "CRAFTBOOT_JAR_MIRROR", default_value = DEFAULT_JAR_MIRROR)]
    pub jar_mirror: String,
}

impl Cli {
    pub fn into_settings(self) -> BootstrapResult<Settings> {
        let work_dir = match self.work_dir {
            Some(dir) => dir,
            None => std::env::current_dir().map_err(|source| BootstrapError::Io {
                path: PathBuf::from("."),
                source,
            })?,
        };

        Ok(Settings {
            work_dir,
            minecraft_version: non_blank(self.minecraft_version),
            java_version_override: non_blank(self.java_version_override),
            neoforge_version_override: non_blank(self.neoforge_version_override),
            server_type: non_blank(self.server_type),
            memory: MemoryLimits {
                min: non_blank(self.min_ram),
                max: non_blank(self.max_ram),
            },
            endpoints: Endpoints {
                github_api: trim_base(self.github_api),
                paper_api: trim_base(self.paper_api),
                neoforge_maven: trim_base(self.neoforge_maven),
                jar_mirror: trim_base(self.jar_mirror),
            },
        })
    }
}

fn trim_base(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}
