mod cli;
mod settings;

pub use cli::Cli;
pub use settings::{non_blank, Endpoints, MemoryLimits, Settings};
