use crate::core::config::MemoryLimits;
use crate::core::downloader::Downloader;
use crate::core::instance::ServerLayout;
use crate::core::java::JavaRuntime;

/// Everything a flavor handler needs to get a server ready.
pub struct FlavorContext<'a> {
    pub minecraft_version: &'a str,
    pub server: &'a ServerLayout,
    pub java: &'a JavaRuntime,
    pub memory: &'a MemoryLimits,
    pub downloader: &'a Downloader,
}
