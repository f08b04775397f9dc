//! Engine-level configuration support
//!
//! Loads scoring constants from `greenchrom.toml` (or a JSON file passed via
//! `--config`). Every field is optional; lookup tables are merged over the
//! built-in defaults rather than replacing them.
//!
//! # Configuration Format
//!
//! ```toml
//! # greenchrom.toml
//!
//! [energy]
//! low_kwh = 0.1     # P = 0 at or below
//! high_kwh = 1.5    # P = 100 at or above
//!
//! [power_kw]
//! standard = 1.2
//! cryo = 3.0
//!
//! [baseline_mass_g]
//! HPLC_UV = 45.0
//! Micro_LC = 1.0
//!
//! [rd]
//! normalization = "baseline"   # or "logarithmic"
//!
//! [defaults.schemes]
//! safety = "Personnel_Exposure"
//! final_composite = "Eco_Priority"
//! ```

use crate::models::SchemeSelection;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// File name searched for in the working directory
pub const CONFIG_FILE_NAME: &str = "greenchrom.toml";

/// Instrument class → rated power (kW)
pub const DEFAULT_POWER_KW: &[(&str, f64)] = &[("low", 0.5), ("standard", 1.0), ("high", 2.0)];

/// Chromatography class → typical reagent consumption per run (g)
pub const DEFAULT_BASELINE_MASS_G: &[(&str, f64)] = &[
    ("UPCC", 4.0),
    ("UPLC", 4.0),
    ("SFC", 4.0),
    ("HPLC_MS", 10.0),
    ("HPLC_UV", 45.0),
    ("Semi_prep", 250.0),
    ("PrepHPLC", 250.0),
];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to parse JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Scoring constants for one engine instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Energy thresholds for the power axis
    #[serde(default)]
    pub energy: EnergyThresholds,

    /// Instrument class → kW, merged over [`DEFAULT_POWER_KW`]
    #[serde(default)]
    pub power_kw: BTreeMap<String, f64>,

    /// Chromatography class → g, merged over [`DEFAULT_BASELINE_MASS_G`]
    #[serde(default)]
    pub baseline_mass_g: BTreeMap<String, f64>,

    /// Recyclability / disposal normalization
    #[serde(default)]
    pub rd: RdConfig,

    /// Defaults applied to method files
    #[serde(default)]
    pub defaults: MethodDefaults,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            energy: EnergyThresholds::default(),
            power_kw: BTreeMap::new(),
            baseline_mass_g: BTreeMap::new(),
            rd: RdConfig::default(),
            defaults: MethodDefaults::default(),
        }
        .with_builtin_tables()
    }
}

/// Linear ramp of the power axis between two energies
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyThresholds {
    /// kWh at or below which P = 0 (default: 0.1)
    #[serde(default = "default_low_kwh")]
    pub low_kwh: f64,

    /// kWh at or above which P = 100 (default: 1.5)
    #[serde(default = "default_high_kwh")]
    pub high_kwh: f64,
}

impl Default for EnergyThresholds {
    fn default() -> Self {
        Self {
            low_kwh: default_low_kwh(),
            high_kwh: default_high_kwh(),
        }
    }
}

fn default_low_kwh() -> f64 {
    0.1
}
fn default_high_kwh() -> f64 {
    1.5
}

/// How accumulated R/D masses become 0-100 scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RdNormalization {
    /// `min(Σ / baseline, 1) × 100`
    #[default]
    Baseline,
    /// `min(45 × log10(1 + 14 × Σ), 100)`, independent of the baseline
    Logarithmic,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct RdConfig {
    #[serde(default)]
    pub normalization: RdNormalization,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MethodDefaults {
    /// Schemes used when a method file omits them
    #[serde(default)]
    pub schemes: SchemeSelection,
}

impl EngineConfig {
    /// Fill missing lookup entries from the built-in tables
    pub fn with_builtin_tables(mut self) -> Self {
        for (class, kw) in DEFAULT_POWER_KW {
            if self.lookup_key(&self.power_kw, class).is_none() {
                self.power_kw.insert((*class).to_string(), *kw);
            }
        }
        for (class, grams) in DEFAULT_BASELINE_MASS_G {
            if self.lookup_key(&self.baseline_mass_g, class).is_none() {
                self.baseline_mass_g.insert((*class).to_string(), *grams);
            }
        }
        self
    }

    fn lookup_key(&self, table: &BTreeMap<String, f64>, key: &str) -> Option<f64> {
        table.get(key).copied().or_else(|| {
            table
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(key))
                .map(|(_, v)| *v)
        })
    }

    /// Rated power (kW) for an instrument class
    pub fn power_rating(&self, instrument_class: &str) -> Option<f64> {
        self.lookup_key(&self.power_kw, instrument_class.trim())
    }

    /// Baseline mass (g) for a chromatography class
    pub fn baseline_mass(&self, chromatography_type: &str) -> Option<f64> {
        self.lookup_key(&self.baseline_mass_g, chromatography_type.trim())
    }

    /// Reject thresholds and table values the engine cannot use
    pub fn validate(&self) -> Result<(), ConfigError> {
        let EnergyThresholds { low_kwh, high_kwh } = self.energy;
        if !low_kwh.is_finite() || !high_kwh.is_finite() || low_kwh < 0.0 || low_kwh >= high_kwh {
            return Err(ConfigError::Invalid(format!(
                "energy thresholds must satisfy 0 <= low_kwh < high_kwh (got {low_kwh}, {high_kwh})"
            )));
        }
        for (class, kw) in &self.power_kw {
            if !kw.is_finite() || *kw <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "power_kw.{class} must be > 0 (got {kw})"
                )));
            }
        }
        for (class, grams) in &self.baseline_mass_g {
            if !grams.is_finite() || *grams <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "baseline_mass_g.{class} must be > 0 (got {grams})"
                )));
            }
        }
        Ok(())
    }

    /// Load and validate a config file (JSON by extension, TOML otherwise)
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        let config = if is_json {
            Self::from_json_str(&content)?
        } else {
            Self::from_toml_str(&content)?
        };
        debug!("Loaded engine config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(content)?;
        let config = config.with_builtin_tables();
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(content)?;
        let config = config.with_builtin_tables();
        config.validate()?;
        Ok(config)
    }
}

/// Load engine configuration.
///
/// An explicit path must exist and parse. Without one, `greenchrom.toml` in
/// `dir` is used when present, otherwise the built-in defaults.
pub fn load_engine_config(explicit: Option<&Path>, dir: &Path) -> Result<EngineConfig, ConfigError> {
    if let Some(path) = explicit {
        return EngineConfig::load(path);
    }

    let discovered = dir.join(CONFIG_FILE_NAME);
    if discovered.exists() {
        return EngineConfig::load(&discovered);
    }

    debug!("No engine config found, using defaults");
    Ok(EngineConfig::default())
}
