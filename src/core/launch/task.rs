// ─── Launch Task ───
// Runs the server (or its installer) as a foreground child process.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tracing::{debug, info};

use crate::core::error::{BootstrapError, BootstrapResult};

/// A shell command to run inside the server directory with a JDK on `PATH`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    /// What is being run, for logs and errors ("PaperMC server").
    pub description: String,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
    /// Prepended to the inherited `PATH`, normally the JDK `bin/`.
    pub path_prefix: PathBuf,
    /// Installers run without a terminal; servers get the console.
    pub inherit_stdin: bool,
}

impl LaunchPlan {
    pub fn new(
        description: impl Into<String>,
        args: Vec<String>,
        working_dir: impl Into<PathBuf>,
        path_prefix: impl Into<PathBuf>,
    ) -> Self {
        Self {
            description: description.into(),
            args,
            working_dir: working_dir.into(),
            path_prefix: path_prefix.into(),
            inherit_stdin: true,
        }
    }

    /// `java <memory flags> -jar <jar> nogui`.
    pub fn java_jar(
        description: impl Into<String>,
        memory_flags: Vec<String>,
        jar_name: &str,
        working_dir: impl Into<PathBuf>,
        java_bin_dir: impl Into<PathBuf>,
    ) -> Self {
        let mut args = vec!["java".to_string()];
        args.extend(memory_flags);
        args.extend(["-jar".to_string(), jar_name.to_string(), "nogui".to_string()]);
        Self::new(description, args, working_dir, java_bin_dir)
    }

    pub fn without_stdin(mut self) -> Self {
        self.inherit_stdin = false;
        self
    }

    /// The argument list as one `sh -c` string.
    pub fn command_line(&self) -> String {
        self.args
            .iter()
            .map(|arg| shell_quote(arg))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Run `plan` through `sh -c` and wait for it to exit.
///
/// stdout and stderr (and stdin unless disabled) are the caller's own, so
/// this blocks for the child's whole lifetime. A non-zero exit is an error
/// carrying the child's code.
pub async fn run_foreground(plan: &LaunchPlan) -> BootstrapResult<()> {
    let path = prepend_path(&plan.path_prefix, std::env::var_os("PATH"))?;
    let command_line = plan.command_line();

    let mut cmd = tokio::process::Command::new("sh");
    cmd.arg("-c")
        .arg(&command_line)
        .current_dir(&plan.working_dir)
        .env("PATH", path)
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .stdin(if plan.inherit_stdin {
            Stdio::inherit()
        } else {
            Stdio::null()
        });

    info!("Starting {} in {:?}", plan.description, plan.working_dir);
    debug!("Command: sh -c {:?}", command_line);

    let status = cmd
        .status()
        .await
        .map_err(|source| BootstrapError::ProcessSpawn {
            program: plan.description.clone(),
            source,
        })?;

    if status.success() {
        info!("{} exited cleanly", plan.description);
        Ok(())
    } else {
        Err(BootstrapError::ProcessExit {
            program: plan.description.clone(),
            code: status.code(),
        })
    }
}

/// `prefix` followed by every entry of `current`.
fn prepend_path(prefix: &Path, current: Option<OsString>) -> BootstrapResult<OsString> {
    let mut entries = vec![prefix.to_path_buf()];
    if let Some(current) = current {
        entries.extend(std::env::split_paths(&current));
    }
    std::env::join_paths(entries).map_err(|err| {
        BootstrapError::Config(format!("cannot put {:?} on PATH: {}", prefix, err))
    })
}

/// Single-quote `arg` for `sh` unless it only holds obviously safe characters.
fn shell_quote(arg: &str) -> String {
    let safe = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:+@%,".contains(c));
    if safe {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}
