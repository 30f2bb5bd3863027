use std::fs::File;
use std::path::{Component, Path, PathBuf};

use flate2::read::GzDecoder;
use tar::Archive;
use tracing::debug;

use crate::core::error::{BootstrapError, BootstrapResult};

const DIR_MODE: u32 = 0o755;
const DEFAULT_FILE_MODE: u32 = 0o644;

/// Unpack a `.tar.gz` into `dest`, entry by entry.
///
/// Returns the first top-level name seen, which for release archives is the
/// single root directory (`jdk-21.0.4+7/`). `None` means the archive had no
/// usable entries.
///
/// Directories always end up `0755` so the tree stays traversable. Regular
/// files keep their declared mode, or `0644` when the header carries none.
/// Entries that would land outside `dest` abort the extraction.
pub fn extract_tar_gz(archive_path: &Path, dest: &Path) -> BootstrapResult<Option<String>> {
    let file = File::open(archive_path).map_err(|source| BootstrapError::Io {
        path: archive_path.to_path_buf(),
        source,
    })?;
    std::fs::create_dir_all(dest).map_err(|source| BootstrapError::Io {
        path: dest.to_path_buf(),
        source,
    })?;

    let archive_err = |source: std::io::Error| BootstrapError::Archive {
        path: archive_path.to_path_buf(),
        source,
    };

    let mut archive = Archive::new(GzDecoder::new(file));
    archive.set_preserve_permissions(false);
    archive.set_preserve_ownerships(false);

    let mut root: Option<String> = None;

    for entry in archive.entries().map_err(archive_err)? {
        let mut entry = entry.map_err(archive_err)?;
        let raw_path = entry.path().map_err(archive_err)?.into_owned();

        let Some(relative) = contained_path(&raw_path) else {
            return Err(archive_err(escape_error(&raw_path)));
        };
        if relative.as_os_str().is_empty() {
            continue;
        }

        let kind = entry.header().entry_type();
        if !(kind.is_dir() || kind.is_file() || kind.is_symlink() || kind.is_hard_link()) {
            debug!("Skipping special archive entry {:?} ({:?})", relative, kind);
            continue;
        }

        if root.is_none() {
            root = relative
                .components()
                .next()
                .map(|c| c.as_os_str().to_string_lossy().to_string());
        }

        let declared_mode = entry
            .header()
            .mode()
            .ok()
            .map(|mode| mode & 0o777)
            .filter(|mode| *mode != 0);

        let unpacked = entry.unpack_in(dest).map_err(archive_err)?;
        if !unpacked {
            return Err(archive_err(escape_error(&raw_path)));
        }

        let target = dest.join(&relative);
        if kind.is_dir() {
            set_mode(&target, DIR_MODE)?;
        } else if kind.is_file() && declared_mode.is_none() {
            set_mode(&target, DEFAULT_FILE_MODE)?;
        }
    }

    Ok(root)
}

/// Normalised relative path, or `None` if the entry points outside the root.
fn contained_path(path: &Path) -> Option<PathBuf> {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(out)
}

fn escape_error(path: &Path) -> std::io::Error {
    std::io::Error::new(
        std::io::ErrorKind::InvalidData,
        format!("entry {} escapes the extraction root", path.display()),
    )
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> BootstrapResult<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode)).map_err(|source| {
        BootstrapError::Io {
            path: path.to_path_buf(),
            source,
        }
    })
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> BootstrapResult<()> {
    Ok(())
}
