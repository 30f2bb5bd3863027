pub mod runtime;
mod select;

pub use runtime::mark_binaries_executable;
pub use runtime::GitHubLatestRelease;
pub use runtime::JavaProvisioner;
pub use runtime::JavaRuntime;
pub use select::{select_java_version, LEGACY_JAVA};
