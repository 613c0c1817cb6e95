//! Configuration file support for lpa.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/lpa/config.toml`. Every
//! section is optional; kit entries override built-in kits by name or add
//! new ones.

use crate::conversion::{DEFAULT_GENERIC_MASS_FACTOR, DEFAULT_LEGACY_MULTIPLIER};
use crate::registry::build_default_registry;
use crate::risk::DEFAULT_BOUNDS;
use crate::{ConversionModel, Error, KitProfile, Result, RiskClassifier};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub conversion: ConversionConfig,

    #[serde(default)]
    pub risk: RiskConfig,

    #[serde(default)]
    pub kits: Vec<KitProfile>,
}

/// Heuristic constants
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConversionConfig {
    #[serde(default = "default_legacy_multiplier")]
    pub legacy_multiplier: f64,

    #[serde(default = "default_generic_mass_factor")]
    pub generic_mass_factor: f64,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            legacy_multiplier: default_legacy_multiplier(),
            generic_mass_factor: default_generic_mass_factor(),
        }
    }
}

/// Risk band lower bounds in nmol/L
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RiskConfig {
    #[serde(default = "default_bounds")]
    pub bounds: [f64; 4],
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            bounds: default_bounds(),
        }
    }
}

// Default value functions
fn default_legacy_multiplier() -> f64 {
    DEFAULT_LEGACY_MULTIPLIER
}

fn default_generic_mass_factor() -> f64 {
    DEFAULT_GENERIC_MASS_FACTOR
}

fn default_bounds() -> [f64; 4] {
    DEFAULT_BOUNDS
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        match Self::default_config_path() {
            Some(config_path) if config_path.exists() => Self::load_from(&config_path),
            other => {
                tracing::debug!("No config file found at {:?}, using defaults", other);
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    ///
    /// `None` when the platform has no config directory.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|base| base.join("lpa").join("config.toml"))
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Conversion model: built-in kits with configured overrides applied
    pub fn build_model(&self) -> Result<ConversionModel> {
        let factors = [
            ("legacy_multiplier", self.conversion.legacy_multiplier),
            ("generic_mass_factor", self.conversion.generic_mass_factor),
        ];
        for (name, factor) in factors {
            if !factor.is_finite() || factor <= 0.0 {
                return Err(Error::Config(format!(
                    "{} must be a positive number, got {}",
                    name, factor
                )));
            }
        }

        let registry = self
            .kits
            .iter()
            .cloned()
            .fold(build_default_registry(), |registry, kit| {
                registry.with_override(kit)
            });
        registry.ensure_valid()?;

        Ok(ConversionModel::new(registry)
            .with_legacy_multiplier(self.conversion.legacy_multiplier)
            .with_generic_mass_factor(self.conversion.generic_mass_factor))
    }

    pub fn build_classifier(&self) -> Result<RiskClassifier> {
        RiskClassifier::with_bounds(self.risk.bounds)
    }
}
