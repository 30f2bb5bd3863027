use crate::core::version::is_at_least;

/// Java major used when nothing more specific is known.
pub const LEGACY_JAVA: &str = "8";

/// Minimum Minecraft version → Java major, newest first.
///
/// Order matters: the first threshold the version reaches wins, so a newer
/// entry must never sit below an older one.
const JAVA_BY_MINECRAFT: &[(&str, &str)] = &[("1.20.5", "21"), ("1.18", "17"), ("1.17", "16")];

/// Pick the Java major for a server.
///
/// An override wins verbatim. Without a Minecraft version the legacy
/// runtime is used, as it is for anything older than every threshold.
pub fn select_java_version(java_override: Option<&str>, minecraft_version: Option<&str>) -> String {
    if let Some(version) = java_override.filter(|v| !v.is_empty()) {
        return version.to_string();
    }

    let Some(minecraft_version) = minecraft_version.filter(|v| !v.is_empty()) else {
        return LEGACY_JAVA.to_string();
    };

    JAVA_BY_MINECRAFT
        .iter()
        .find(|(threshold, _)| is_at_least(minecraft_version, threshold))
        .map(|(_, java)| java.to_string())
        .unwrap_or_else(|| LEGACY_JAVA.to_string())
}
