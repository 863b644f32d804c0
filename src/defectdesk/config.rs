use crate::error::{DefectError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_BASE_DIR_NAME: &str = "DefectEvidence";

/// Configuration for defectdesk, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct DefectConfig {
    /// Directory name created under each candidate storage root
    #[serde(default = "default_base_dir_name")]
    pub base_dir_name: String,

    /// Whether public roots are restricted (scoped storage). When true the
    /// application-private root is preferred; when false the legacy public root is.
    #[serde(default = "default_scoped_storage")]
    pub scoped_storage: bool,
}

fn default_base_dir_name() -> String {
    DEFAULT_BASE_DIR_NAME.to_string()
}

fn default_scoped_storage() -> bool {
    true
}

impl Default for DefectConfig {
    fn default() -> Self {
        Self {
            base_dir_name: default_base_dir_name(),
            scoped_storage: default_scoped_storage(),
        }
    }
}

impl DefectConfig {
    pub const KEYS: [&'static str; 2] = ["base-dir-name", "scoped-storage"];

    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(DefectError::Io)?;
        let config: DefectConfig =
            serde_json::from_str(&content).map_err(DefectError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(DefectError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(DefectError::Serialization)?;
        fs::write(config_path, content).map_err(DefectError::Io)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "base-dir-name" => Some(self.base_dir_name.clone()),
            "scoped-storage" => Some(self.scoped_storage.to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        match key {
            "base-dir-name" => {
                let value = value.trim();
                if value.is_empty()
                    || value.contains(&['/', '\\'][..])
                    || value == "."
                    || value == ".."
                {
                    return Err(format!("Invalid directory name: '{}'", value));
                }
                self.base_dir_name = value.to_string();
                Ok(())
            }
            "scoped-storage" => {
                self.scoped_storage = match value.trim().to_ascii_lowercase().as_str() {
                    "true" | "yes" | "on" | "1" => true,
                    "false" | "no" | "off" | "0" => false,
                    other => return Err(format!("Expected true or false, got '{}'", other)),
                };
                Ok(())
            }
            _ => Err(format!("Unknown config key: {}", key)),
        }
    }
}
