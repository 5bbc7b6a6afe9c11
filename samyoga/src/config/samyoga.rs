//! Main SamyogaConfig and conversion methods.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::ConfigLoadError;
use super::registration::RegistrationSection;
use crate::registration::SelectorState;

/// Paths tried by [`SamyogaConfig::load_default`], in order.
pub const DEFAULT_CONFIG_PATHS: [&str; 2] = ["samyoga.toml", "/etc/samyoga.toml"];

/// Full samyoga configuration loaded from TOML
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
pub struct SamyogaConfig {
    /// Scan-matching registration settings
    #[serde(default)]
    pub registration: RegistrationSection,
}

impl SamyogaConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&contents)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load from the first existing default path, or use built-in defaults
    pub fn load_default() -> Result<Self, ConfigLoadError> {
        for path in DEFAULT_CONFIG_PATHS.iter().map(Path::new) {
            if path.exists() {
                return Self::load(path);
            }
        }
        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Parse from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigLoadError> {
        Ok(toml::from_str(toml)?)
    }

    /// Serialize to a TOML string
    pub fn to_toml(&self) -> Result<String, ConfigLoadError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<(), ConfigLoadError> {
        std::fs::write(path, self.to_toml()?)?;
        log::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Get the selector state, clamped into the slider ranges
    pub fn selector_state(&self) -> SelectorState {
        self.registration.to_selector_state()
    }

    /// Replace the registration section with the given selector state
    pub fn update_from_state(&mut self, state: &SelectorState) {
        self.registration = RegistrationSection::from_state(state);
    }
}
