// ─── Server Config Files ───
// Text artifacts the server itself reads: eula.txt and user_jvm_args.txt.

use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::info;

use super::layout::ServerLayout;
use crate::core::config::MemoryLimits;
use crate::core::error::{BootstrapError, BootstrapResult};

/// Write `eula.txt` accepting the EULA, unless it already exists.
///
/// An existing file is left alone, whatever it says. Returns whether a
/// file was written.
pub async fn ensure_eula(server: &ServerLayout) -> BootstrapResult<bool> {
    ensure_eula_at(&server.eula_path(), Utc::now()).await
}

async fn ensure_eula_at(path: &Path, now: DateTime<Utc>) -> BootstrapResult<bool> {
    match tokio::fs::metadata(path).await {
        Ok(_) => {
            info!("eula.txt already exists.");
            return Ok(false);
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(BootstrapError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    info!("eula.txt not found, creating it.");
    tokio::fs::write(path, eula_contents(now))
        .await
        .map_err(|source| BootstrapError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(true)
}

fn eula_contents(now: DateTime<Utc>) -> String {
    format!(
        "# Created by craftboot\n{}\neula=true\n",
        now.format("# %a %b %d %I:%M:%S %p UTC %Y")
    )
}

/// (Re)write `user_jvm_args.txt` with the heap flags.
///
/// Always overwritten: limits may differ between container starts.
pub async fn write_user_jvm_args(
    server: &ServerLayout,
    memory: &MemoryLimits,
) -> BootstrapResult<()> {
    let path = server.jvm_args_path();
    tokio::fs::write(&path, memory.jvm_flags().join(" "))
        .await
        .map_err(|source| BootstrapError::Io { path, source })
}
