use crate::geometry::{Coordinate, Size};
use crate::keys::{VirtualKey, VK_BACKSLASH};
use crate::location_store::{resolve_location_path, LOCATION_FILE_NAME};
use crate::overlay::OverlaySettings;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_DEBUG: &str = "OVERLAY_TIMER_DEBUG";
pub const ENV_LOG_FILE: &str = "OVERLAY_TIMER_LOG_FILE";
pub const ENV_HOTKEY: &str = "OVERLAY_TIMER_HOTKEY";

/// Something odd found while building a [`Config`]. Kept until logging is
/// up, since it is initialised from the config itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// No per-user config directory; the location file sits in the
    /// working directory.
    NoConfigDir(String),
    UnknownHotkey(String),
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigWarning::NoConfigDir(reason) => write!(
                f,
                "falling back to working directory for overlay location: {reason}"
            ),
            ConfigWarning::UnknownHotkey(name) => {
                write!(f, "unknown hotkey name '{name}', keeping default")
            }
        }
    }
}

/// Runtime tunables. Nothing here is written back to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub default_duration: Duration,
    pub duration_presets: Vec<Duration>,
    pub overlay_size: Size,
    pub default_location: Coordinate,
    /// Constant window alpha, 0-255.
    pub opacity: u8,
    pub tick_interval: Duration,
    pub hotkey: VirtualKey,
    pub debug_logging: bool,
    pub log_file: Option<PathBuf>,
    pub location_file: PathBuf,
    pub warnings: Vec<ConfigWarning>,
}

impl Default for Config {
    fn default() -> Self {
        let mut warnings = Vec::new();
        let location_file = location_file_or_fallback(resolve_location_path(), &mut warnings);
        Self {
            default_duration: Duration::from_secs(90),
            duration_presets: vec![Duration::from_secs(75), Duration::from_secs(90)],
            overlay_size: Size::new(180, 60),
            default_location: Coordinate::new(100, 100),
            opacity: 204,
            tick_interval: Duration::from_secs(1),
            hotkey: VK_BACKSLASH,
            debug_logging: false,
            log_file: None,
            location_file,
            warnings,
        }
    }
}

fn location_file_or_fallback(
    resolved: anyhow::Result<PathBuf>,
    warnings: &mut Vec<ConfigWarning>,
) -> PathBuf {
    resolved.unwrap_or_else(|err| {
        warnings.push(ConfigWarning::NoConfigDir(err.to_string()));
        PathBuf::from(LOCATION_FILE_NAME)
    })
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if lookup(ENV_DEBUG).is_some() {
            config.debug_logging = true;
        }
        if let Some(path) = lookup(ENV_LOG_FILE).filter(|p| !p.trim().is_empty()) {
            config.log_file = Some(PathBuf::from(path));
        }
        if let Some(name) = lookup(ENV_HOTKEY) {
            match VirtualKey::from_name(&name) {
                Some(key) => config.hotkey = key,
                None => config.warnings.push(ConfigWarning::UnknownHotkey(name)),
            }
        }
        config
    }

    pub fn overlay_settings(&self) -> OverlaySettings {
        OverlaySettings {
            default_duration: self.default_duration,
            size: self.overlay_size,
            default_location: self.default_location,
            tick_interval: self.tick_interval,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_match_overlay_layout() {
        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(config.default_duration, Duration::from_secs(90));
        assert_eq!(
            config.duration_presets,
            vec![Duration::from_secs(75), Duration::from_secs(90)]
        );
        assert_eq!(config.hotkey, VK_BACKSLASH);
        assert_eq!(config.overlay_settings(), OverlaySettings::default());
        assert!(!config.debug_logging);
        assert!(config.location_file.ends_with(LOCATION_FILE_NAME));
    }

    #[test]
    fn env_overrides_are_applied() {
        let config = Config::from_lookup(lookup(&[
            (ENV_DEBUG, "1"),
            (ENV_LOG_FILE, "timer.log"),
            (ENV_HOTKEY, "f8"),
        ]));
        assert!(config.debug_logging);
        assert_eq!(config.log_file, Some(PathBuf::from("timer.log")));
        assert_eq!(config.hotkey, VirtualKey(0x77));
        assert!(!config
            .warnings
            .iter()
            .any(|w| matches!(w, ConfigWarning::UnknownHotkey(_))));
    }

    #[test]
    fn unknown_hotkey_name_keeps_default() {
        let config = Config::from_lookup(lookup(&[(ENV_HOTKEY, "NotAKey")]));
        assert_eq!(config.hotkey, VK_BACKSLASH);
        assert!(config
            .warnings
            .contains(&ConfigWarning::UnknownHotkey("NotAKey".to_string())));
    }

    #[test]
    fn missing_config_dir_is_reported_not_logged() {
        let mut warnings = Vec::new();
        let path = location_file_or_fallback(
            Err(anyhow::anyhow!("no per-user config directory")),
            &mut warnings,
        );
        assert_eq!(path, PathBuf::from(LOCATION_FILE_NAME));
        assert_eq!(
            warnings,
            vec![ConfigWarning::NoConfigDir(
                "no per-user config directory".to_string()
            )]
        );
        assert_eq!(
            warnings[0].to_string(),
            "falling back to working directory for overlay location: no per-user config directory"
        );
    }
}
