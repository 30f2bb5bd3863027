pub mod context;
pub mod generic;
pub mod installer;
pub mod neoforge;
pub mod paper;

pub use context::FlavorContext;
pub use installer::{FlavorHandler, FlavorInstaller, ServerFlavor};
