use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::LapsplitError;
use crate::segmentation::SegmentationConfig;

const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Driver name given to laps when none is passed on the command line
    pub driver: String,
    pub segmentation: SegmentationConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            driver: "Unknown".to_string(),
            segmentation: SegmentationConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn default_path() -> Result<PathBuf, LapsplitError> {
        Ok(dirs::config_dir()
            .ok_or(LapsplitError::NoConfigDir)?
            .join("lapsplit")
            .join(CONFIG_FILE_NAME))
    }

    /// Loads the config saved in the user's config directory, if there is one.
    pub fn from_local_file() -> Result<Option<Self>, LapsplitError> {
        let config_path = Self::default_path()?;
        if config_path.exists() {
            Self::from_file(&config_path).map(Some)
        } else {
            Ok(None)
        }
    }

    pub fn from_file(config_path: &Path) -> Result<Self, LapsplitError> {
        debug!("Reading config from {:?}", config_path);
        let file = std::fs::File::open(config_path)
            .map_err(|e| LapsplitError::ConfigIOError { source: e })?;
        serde_json::from_reader(file).map_err(|e| LapsplitError::ConfigParseError {
            path: format!("{:?}", config_path),
            source: e,
        })
    }

    pub fn save(&self) -> Result<(), LapsplitError> {
        self.save_to(&Self::default_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<(), LapsplitError> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| LapsplitError::ConfigIOError { source: e })?;
        }
        let file = std::fs::File::create(config_path)
            .map_err(|e| LapsplitError::ConfigIOError { source: e })?;
        serde_json::to_writer_pretty(file, self)
            .map_err(|e| LapsplitError::ConfigSerializeError { source: e })
    }
}
