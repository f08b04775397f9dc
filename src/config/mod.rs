//! Configuration module for greenchrom
//!
//! This module handles:
//! - Engine-level configuration (greenchrom.toml)
//! - Instrument power and chromatography baseline tables
//! - R/D normalization mode
//! - Default scheme selection for method files

mod engine_config;

pub use engine_config::{
    load_engine_config, ConfigError, EnergyThresholds, EngineConfig, MethodDefaults, RdConfig,
    RdNormalization, CONFIG_FILE_NAME, DEFAULT_BASELINE_MASS_G, DEFAULT_POWER_KW,
};
