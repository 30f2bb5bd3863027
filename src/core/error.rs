use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Central error type for the whole bootstrap.
/// Every module returns `Result<T, BootstrapError>`.
#[derive(Debug, Error)]
pub enum BootstrapError {
    // ── Configuration ───────────────────────────────────
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("unsupported version of Minecraft for {flavor}: {version}")]
    UnsupportedVersion { flavor: String, version: String },

    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Network ─────────────────────────────────────────
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request to {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    // ── JSON ────────────────────────────────────────────
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ── Release assets ──────────────────────────────────
    #[error("no suitable asset in {release}: nothing matches '{marker}' with suffix '{suffix}'")]
    NoSuitableAsset {
        release: String,
        marker: String,
        suffix: String,
    },

    // ── Archive ─────────────────────────────────────────
    #[error("archive error in {path:?}: {source}")]
    Archive {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not determine root directory from archive {0:?}")]
    MissingArchiveRoot(PathBuf),

    // ── Subprocess ──────────────────────────────────────
    #[error("failed to start {program}: {source}")]
    ProcessSpawn {
        program: String,
        source: std::io::Error,
    },

    #[error("{program} exited with {}", exit_description(*.code))]
    ProcessExit { program: String, code: Option<i32> },

    // ── Stage wrapper ───────────────────────────────────
    #[error("{stage} failed: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: Box<BootstrapError>,
    },

    // ── Generic ─────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type BootstrapResult<T> = Result<T, BootstrapError>;

impl From<std::io::Error> for BootstrapError {
    fn from(source: std::io::Error) -> Self {
        BootstrapError::Io {
            path: PathBuf::new(),
            source,
        }
    }
}

impl BootstrapError {
    /// Innermost error once all stage wrappers are peeled off.
    pub fn root_cause(&self) -> &BootstrapError {
        match self {
            BootstrapError::Stage { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Process exit code for this failure.
    ///
    /// A server that ran and exited non-zero hands its own code through;
    /// everything else, installers included, is `1`.
    pub fn exit_code(&self) -> i32 {
        let mut current = self;
        let mut launched = false;
        while let BootstrapError::Stage { stage, source } = current {
            launched |= *stage == Stage::LaunchServer;
            current = source.as_ref();
        }
        match current {
            BootstrapError::ProcessExit {
                code: Some(code), ..
            } if launched && *code != 0 => *code,
            _ => 1,
        }
    }
}

fn exit_description(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "no status (terminated by signal)".to_string(),
    }
}

/// Named stages of the bootstrap, used to tell the operator where a run broke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    ResolveRelease,
    DownloadArchive,
    ExtractArchive,
    RelocateArchiveRoot,
    InstallJava,
    WriteEula,
    MarkJavaExecutable,
    FetchBuildList,
    DownloadServerJar,
    ResolveNeoForgeVersion,
    DownloadNeoForgeInstaller,
    RunNeoForgeInstaller,
    ResetNeoForgeInstall,
    WriteJvmArgs,
    HandleFlavor(String),
    LaunchServer,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::ResolveRelease => write!(f, "resolve release"),
            Stage::DownloadArchive => write!(f, "download archive"),
            Stage::ExtractArchive => write!(f, "extract archive"),
            Stage::RelocateArchiveRoot => write!(f, "relocate archive root"),
            Stage::InstallJava => write!(f, "install Java"),
            Stage::WriteEula => write!(f, "write eula.txt"),
            Stage::MarkJavaExecutable => write!(f, "mark Java executable"),
            Stage::FetchBuildList => write!(f, "fetch build list"),
            Stage::DownloadServerJar => write!(f, "download server jar"),
            Stage::ResolveNeoForgeVersion => write!(f, "resolve NeoForge version"),
            Stage::DownloadNeoForgeInstaller => write!(f, "download NeoForge installer"),
            Stage::RunNeoForgeInstaller => write!(f, "run NeoForge installer"),
            Stage::ResetNeoForgeInstall => write!(f, "reset NeoForge install"),
            Stage::WriteJvmArgs => write!(f, "write user_jvm_args.txt"),
            Stage::HandleFlavor(name) => write!(f, "handle {name}"),
            Stage::LaunchServer => write!(f, "launch server"),
        }
    }
}

/// Attaches a [`Stage`] to any fallible step.
pub trait StageContext<T> {
    fn stage(self, stage: Stage) -> BootstrapResult<T>;
}

impl<T, E> StageContext<T> for Result<T, E>
where
    E: Into<BootstrapError>,
{
    fn stage(self, stage: Stage) -> BootstrapResult<T> {
        self.map_err(|err| BootstrapError::Stage {
            stage,
            source: Box::new(err.into()),
        })
    }
}
