use std::fmt;

use async_trait::async_trait;

use crate::core::config::Settings;
use crate::core::error::BootstrapResult;
use crate::core::launch::LaunchPlan;

use super::{
    context::FlavorContext, generic::GenericJarInstaller, neoforge::NeoForgeInstaller,
    paper::PaperInstaller,
};

/// Server distribution kinds, keyed by the `Type` setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerFlavor {
    /// PaperMC, fetched from its build API.
    Paper,
    /// NeoForge, built locally by its installer.
    NeoForge,
    /// Any other jar the mirror knows by name (vanilla, purpur, fabric, ...).
    Other(String),
}

impl ServerFlavor {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "paper" => ServerFlavor::Paper,
            "neoforge" => ServerFlavor::NeoForge,
            other => ServerFlavor::Other(other.to_string()),
        }
    }

    /// Name used in progress and failure messages.
    pub fn display_name(&self) -> String {
        match self {
            ServerFlavor::Paper => "PaperMC".to_string(),
            ServerFlavor::NeoForge => "NeoForge".to_string(),
            ServerFlavor::Other(name) => format!("{name} server"),
        }
    }
}

impl fmt::Display for ServerFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerFlavor::Paper => write!(f, "paper"),
            ServerFlavor::NeoForge => write!(f, "neoforge"),
            ServerFlavor::Other(name) => write!(f, "{name}"),
        }
    }
}

/// Makes sure a flavor's server files exist and says how to start it.
#[async_trait]
pub trait FlavorInstaller: Send + Sync {
    async fn prepare(&self, ctx: &FlavorContext<'_>) -> BootstrapResult<LaunchPlan>;
}

/// Dispatcher sin Box<dyn>
pub enum FlavorHandler {
    Paper(PaperInstaller),
    NeoForge(NeoForgeInstaller),
    Generic(GenericJarInstaller),
}

impl FlavorHandler {
    pub fn new(flavor: &ServerFlavor, settings: &Settings) -> Self {
        let endpoints = &settings.endpoints;
        match flavor {
            ServerFlavor::Paper => Self::Paper(PaperInstaller::new(&endpoints.paper_api)),
            ServerFlavor::NeoForge => Self::NeoForge(NeoForgeInstaller::new(
                &endpoints.neoforge_maven,
                settings.neoforge_version_override.clone(),
            )),
            ServerFlavor::Other(name) => {
                Self::Generic(GenericJarInstaller::new(&endpoints.jar_mirror, name))
            }
        }
    }

    pub async fn prepare(&self, ctx: &FlavorContext<'_>) -> BootstrapResult<LaunchPlan> {
        match self {
            FlavorHandler::Paper(i) => i.prepare(ctx).await,
            FlavorHandler::NeoForge(i) => i.prepare(ctx).await,
            FlavorHandler::Generic(i) => i.prepare(ctx).await,
        }
    }
}
