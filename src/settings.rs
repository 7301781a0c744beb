//! User settings loaded from a YAML config file

use std::fs;
use std::path::PathBuf;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

pub const CURRENT_VERSION: u32 = 1;
const SETTINGS_FILENAME: &str = "config.yaml";
const APP_NAME: &str = "pdfsnap";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_version")]
    pub version: u32,

    /// Where artifacts go when --out is not given.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_version() -> u32 {
    CURRENT_VERSION
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            output_dir: default_output_dir(),
            log_filter: default_log_filter(),
        }
    }
}

impl Settings {
    fn settings_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_NAME).join(SETTINGS_FILENAME))
    }

    /// Load settings, falling back to defaults when the file is missing.
    /// A malformed file is reported and ignored, never fatal.
    #[must_use]
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            return Self::default();
        };

        match fs::read_to_string(&path) {
            Ok(raw) => match serde_yaml::from_str(&raw) {
                Ok(settings) => {
                    debug!("settings loaded from {}", path.display());
                    settings
                }
                Err(e) => {
                    warn!("ignoring malformed settings at {}: {e}", path.display());
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }
}
