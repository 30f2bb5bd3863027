pub mod core;

use tracing_subscriber::EnvFilter;

pub use crate::core::config::{Cli, Settings};
pub use crate::core::error::{BootstrapError, BootstrapResult};

/// Structured logging to stderr. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,craftboot=debug")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Provision and run the server described by `settings`.
pub async fn run(settings: Settings) -> BootstrapResult<()> {
    tracing::info!(
        "craftboot {} starting in {:?}",
        env!("CARGO_PKG_VERSION"),
        settings.work_dir
    );
    crate::core::bootstrap::run(&settings).await
}
