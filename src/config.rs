//! Indicator settings file.

use crate::indicator::IndicatorConfig;
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Settings of one indicator, as stored on disk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Settings {
    /// Generator parameters.
    #[serde(default)]
    pub indicator: IndicatorConfig,
    /// If `true`, stopping hides the indicator instead of freezing it.
    #[serde(default = "default_hides_when_stopped")]
    pub hides_when_stopped: bool,
    /// Whether the indicator starts animating right away.
    #[serde(default)]
    pub animating: bool,
    /// Seed of the random source. Drawn from entropy when missing.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_hides_when_stopped() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            indicator: IndicatorConfig::default(),
            hides_when_stopped: default_hides_when_stopped(),
            animating: false,
            seed: None,
        }
    }
}

impl Settings {
    /// Loads the settings from a JSON file and validates the indicator
    /// configuration.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::info!("Loading settings from {}", path.display());
        let contents = fs::read_to_string(path)
            .wrap_err_with(|| format!("reading settings from {}", path.display()))?;
        log::debug!("Settings file contents: {contents:#?}");
        let settings: Self = serde_json::from_str(&contents)
            .wrap_err("settings loading failed due to malformed JSON")?;
        settings.indicator.validate()?;
        Ok(settings)
    }

    /// Stores the settings as pretty-printed JSON.
    pub fn store(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .wrap_err("settings storing failed due to unserializable format with serde_json")?;
        log::info!("Storing settings to {}", path.display());
        fs::write(path, json)?;
        Ok(())
    }
}
