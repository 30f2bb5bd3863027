use std::path::{Path, PathBuf};

/// Top-level directories owned by the bootstrap.
///
/// - `java/`   — one `jdk<major>/` per installed runtime
/// - `server/` — the Minecraft server working directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceLayout {
    root: PathBuf,
}

impl WorkspaceLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn java_dir(&self) -> PathBuf {
        self.root.join("java")
    }

    pub fn server(&self) -> ServerLayout {
        ServerLayout::new(self.root.join("server"))
    }
}

/// Well-known files inside the server working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerLayout {
    dir: PathBuf,
}

impl ServerLayout {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn eula_path(&self) -> PathBuf {
        self.dir.join("eula.txt")
    }

    /// Read by the NeoForge `run.sh`.
    pub fn jvm_args_path(&self) -> PathBuf {
        self.dir.join("user_jvm_args.txt")
    }

    pub fn run_script(&self) -> PathBuf {
        self.dir.join("run.sh")
    }

    pub fn libraries_dir(&self) -> PathBuf {
        self.dir.join("libraries")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.dir.join("logs")
    }

    pub fn jar_path(&self, jar_name: &str) -> PathBuf {
        self.dir.join(jar_name)
    }

    /// Where the NeoForge installer leaves a given version's libraries.
    /// Its presence means that version is the one installed.
    pub fn neoforge_marker(&self, neoforge_version: &str) -> PathBuf {
        self.libraries_dir()
            .join("net")
            .join("neoforged")
            .join("neoforge")
            .join(neoforge_version)
    }
}
