//! Application configuration: TOML-based, platform-aware paths.
//!
//! The file is only read. LED state is never written back to it.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Path to the SDK DLL. Empty = search the default names.
    #[serde(default)]
    pub sdk_path: String,

    /// Device type to select without prompting in interactive mode (e.g. `MSI_MB`).
    /// Empty = always prompt.
    #[serde(default)]
    pub device_type: String,
}

impl Config {
    /// Platform-specific config directory.
    pub fn dir() -> Option<PathBuf> {
        #[cfg(windows)]
        {
            dirs::config_dir().map(|p| p.join("MysticLight"))
        }
        #[cfg(not(windows))]
        {
            dirs::config_dir().map(|p| p.join("mysticlight"))
        }
    }

    /// Full path to config file.
    pub fn path() -> Option<PathBuf> {
        Self::dir().map(|d| d.join("config.toml"))
    }

    /// Load config from disk, or return defaults if not found.
    pub fn load() -> Self {
        let (config, warnings) = Self::load_with_warnings();
        for w in &warnings {
            log::warn!("{w}");
        }
        config
    }

    /// Load config from an arbitrary path, returning the config and any parse warnings.
    ///
    /// Returns `(defaults, [])` if the file doesn't exist.
    /// Returns `(defaults, [warning])` if the file exists but can't be parsed.
    pub fn load_from(path: &Path) -> (Self, Vec<String>) {
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => (config, vec![]),
                Err(e) => {
                    let warning = format!(
                        "config parse error ({}), using defaults: {e}",
                        path.display()
                    );
                    (Self::default(), vec![warning])
                }
            },
            Err(_) => (Self::default(), vec![]),
        }
    }

    /// Load config from the default path, returning the config and any parse warnings.
    pub fn load_with_warnings() -> (Self, Vec<String>) {
        let Some(path) = Self::path() else {
            return (Self::default(), vec![]);
        };
        Self::load_from(&path)
    }

    /// Configured SDK library path, if set.
    pub fn sdk_path(&self) -> Option<PathBuf> {
        let p = self.sdk_path.trim();
        (!p.is_empty()).then(|| PathBuf::from(p))
    }

    /// Preselected device type, if set.
    pub fn device_type(&self) -> Option<&str> {
        let t = self.device_type.trim();
        (!t.is_empty()).then_some(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_empty() {
        let c = Config::default();
        assert!(c.sdk_path().is_none());
        assert!(c.device_type().is_none());
    }

    #[test]
    fn load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (c, warnings) = Config::load_from(&dir.path().join("nope.toml"));
        assert_eq!(c, Config::default());
        assert!(warnings.is_empty());
    }

    #[test]
    fn load_full_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "sdk_path = 'C:\\SDK\\mlsdk64.dll'\ndevice_type = \"MSI_MB\"\n",
        )
        .unwrap();
        let (c, warnings) = Config::load_from(&path);
        assert!(warnings.is_empty());
        assert_eq!(c.sdk_path(), Some(PathBuf::from("C:\\SDK\\mlsdk64.dll")));
        assert_eq!(c.device_type(), Some("MSI_MB"));
    }

    #[test]
    fn load_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "device_type = \"MSI_VGA\"\n").unwrap();
        let (c, _) = Config::load_from(&path);
        assert_eq!(c.device_type(), Some("MSI_VGA"));
        assert!(c.sdk_path().is_none());
    }

    #[test]
    fn load_invalid_file_warns_and_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "sdk_path = [not toml").unwrap();
        let (c, warnings) = Config::load_from(&path);
        assert_eq!(c, Config::default());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("config parse error"));
    }

    #[test]
    fn whitespace_values_count_as_unset() {
        let c = Config {
            sdk_path: "   ".into(),
            device_type: " \t".into(),
        };
        assert!(c.sdk_path().is_none());
        assert!(c.device_type().is_none());
    }

    #[test]
    fn path_ends_with_config_toml() {
        if let Some(p) = Config::path() {
            assert!(p.ends_with("config.toml"));
        }
    }
}
