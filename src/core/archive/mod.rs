mod extract;
mod installer;

pub use installer::{select_asset, ArchiveInstaller, InstallOutcome, ReleaseAsset, ReleaseResolver};
