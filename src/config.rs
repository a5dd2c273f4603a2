use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerialSettings {
    pub path: String,
    pub baud_rate: u32,    // SBUS pulses are 10us wide
    pub read_timeout_ms: u64,
}

impl Default for SerialSettings {
    fn default() -> Self {
        SerialSettings {
            path: String::from("/dev/serial0"),
            baud_rate: 100_000,
            read_timeout_ms: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(skip)]
    settings_path: PathBuf,
    #[serde(default)]
    pub serial: SerialSettings,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    String::from("info")
}

impl Settings {
    pub fn new<P: AsRef<Path>>(settings_path: P) -> Self {
        Settings {
            settings_path: settings_path.as_ref().to_path_buf(),
            serial: SerialSettings::default(),
            log_level: default_log_level(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.settings_path
    }

    /// Unknown names fall back to `Info`.
    pub fn level_filter(&self) -> LevelFilter {
        LevelFilter::from_str(&self.log_level).unwrap_or(LevelFilter::Info)
    }

    pub fn save(&self) -> Result<(), Error> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = fs::File::create(&self.settings_path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }

    pub fn load(&mut self) -> Result<(), Error> {
        let content = fs::read_to_string(&self.settings_path)?;
        let mut loaded: Settings = serde_json::from_str(&content)?;
        loaded.settings_path = self.settings_path.clone();
        *self = loaded;
        Ok(())
    }
}
