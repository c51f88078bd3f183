// SPDX-License-Identifier: GPL-3.0-only

//! Persisted defaults (last used devices and shell options)
//!
//! Stored as a small JSON object:
//!
//! ```json
//! { "cam1": "/dev/video0", "cam2": "/dev/video2", "out": "/dev/video10",
//!   "preview": true, "autoload": false }
//! ```
//!
//! Device entries are not checked against the current device list here; a
//! stale device simply fails validation when the user presses Start.

use crate::constants::settings::{CONFIG_DIR_NAME, DEFAULTS_FILE_NAME, TERMINAL_LOG_FILE_NAME};
use crate::errors::SettingsError;
use crate::selection::{DeviceRef, Selection};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Defaults {
    /// First input camera
    #[serde(default)]
    pub cam1: Option<DeviceRef>,
    /// Second input camera
    #[serde(default)]
    pub cam2: Option<DeviceRef>,
    /// Virtual output device
    #[serde(default)]
    pub out: Option<DeviceRef>,
    /// Show the preview sink
    #[serde(default = "default_preview")]
    pub preview: bool,
    /// Apply these defaults when the shell starts
    #[serde(default)]
    pub autoload: bool,
}

fn default_preview() -> bool {
    true
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            cam1: None,
            cam2: None,
            out: None,
            preview: default_preview(),
            autoload: false,
        }
    }
}

impl Defaults {
    pub fn from_selection(selection: &Selection, preview: bool, autoload: bool) -> Self {
        Self {
            cam1: selection.cam1.clone(),
            cam2: selection.cam2.clone(),
            out: selection.out.clone(),
            preview,
            autoload,
        }
    }

    pub fn selection(&self) -> Selection {
        Selection {
            cam1: self.cam1.clone(),
            cam2: self.cam2.clone(),
            out: self.out.clone(),
        }
    }
}

/// Reads and writes [`Defaults`] at a fixed path
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store under the user config dir (`~/.config/video-switcher/defaults.json`)
    pub fn user_default() -> Result<Self, SettingsError> {
        let dir = dirs::config_dir().ok_or(SettingsError::NoConfigDir)?;
        Ok(Self::new(dir.join(CONFIG_DIR_NAME).join(DEFAULTS_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load saved defaults; `Ok(None)` when nothing was saved yet
    pub fn load(&self) -> Result<Option<Defaults>, SettingsError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No saved defaults");
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&self.path)?;
        let defaults: Defaults = serde_json::from_str(&contents)?;
        debug!(path = %self.path.display(), ?defaults, "Loaded defaults");
        Ok(Some(defaults))
    }

    pub fn save(&self, defaults: &Defaults) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(defaults)?;
        std::fs::write(&self.path, json)?;
        info!(path = %self.path.display(), "Defaults saved");
        Ok(())
    }

    /// Remove saved defaults; clearing when nothing is saved is fine
    pub fn clear(&self) -> Result<(), SettingsError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "Defaults cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Terminal log location (`~/.cache/video-switcher/terminal.log`)
pub fn terminal_log_path() -> Result<PathBuf, SettingsError> {
    let dir = dirs::cache_dir().ok_or(SettingsError::NoConfigDir)?;
    Ok(log_path_in(&dir))
}

pub fn log_path_in(cache_dir: &Path) -> PathBuf {
    cache_dir.join(CONFIG_DIR_NAME).join(TERMINAL_LOG_FILE_NAME)
}

/// Open a log file for appending, creating its directory
pub fn open_log_file(path: &Path) -> Result<File, SettingsError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_flags_use_defaults() {
        let defaults: Defaults = serde_json::from_str(r#"{"cam1": "/dev/video0"}"#).unwrap();
        assert_eq!(defaults.cam1, Some(DeviceRef::from("/dev/video0")));
        assert_eq!(defaults.cam2, None);
        assert!(defaults.preview);
        assert!(!defaults.autoload);
    }

    #[test]
    fn test_null_devices_parse() {
        let defaults: Defaults = serde_json::from_str(
            r#"{"cam1": null, "cam2": null, "out": null, "preview": false, "autoload": true}"#,
        )
        .unwrap();
        assert_eq!(defaults.selection(), Selection::default());
        assert!(!defaults.preview);
        assert!(defaults.autoload);
    }

    #[test]
    fn test_log_path_under_app_dir() {
        let path = log_path_in(Path::new("/home/user/.cache"));
        assert_eq!(path, Path::new("/home/user/.cache/video-switcher/terminal.log"));
    }

    #[test]
    fn test_log_file_appends() {
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let path = log_path_in(dir.path());

        writeln!(open_log_file(&path).unwrap(), "first").unwrap();
        writeln!(open_log_file(&path).unwrap(), "second").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn test_serialized_keys() {
        let value = serde_json::to_value(Defaults::default()).unwrap();
        let object = value.as_object().unwrap();
        for key in ["cam1", "cam2", "out", "preview", "autoload"] {
            assert!(object.contains_key(key), "missing key {}", key);
        }
        assert_eq!(object.len(), 5);
    }
}
