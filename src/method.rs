//! Method files
//!
//! A method file describes one chromatographic method: its gradient
//! program, preparation volumes, instrument and chromatography classes,
//! scheme choices and optional reagent overrides. JSON or TOML, chosen by
//! file extension.

use crate::catalog::{CatalogError, ReagentCatalog, ReagentSpec};
use crate::config::EngineConfig;
use crate::models::{FinalScoreResult, GradientProgram, PreparationInput, SchemeSelection, ScoreRequest};
use crate::scoring::{ScoreError, ScoreResult, ScoringEngine};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MethodError {
    #[error("Failed to read method {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML method: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to parse JSON method: {0}")]
    Json(#[from] serde_json::Error),
}

/// Scheme names given in a method file. Missing entries come from the
/// engine configuration defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MethodSchemes {
    pub safety: Option<String>,
    pub health: Option<String>,
    pub environment: Option<String>,
    pub stage_merge: Option<String>,
    pub final_composite: Option<String>,
    pub instrument_stage: Option<String>,
    pub preparation_stage: Option<String>,
}

impl MethodSchemes {
    pub fn over(&self, defaults: &SchemeSelection) -> SchemeSelection {
        let pick = |own: &Option<String>, default: &String| own.clone().unwrap_or_else(|| default.clone());
        SchemeSelection {
            safety: pick(&self.safety, &defaults.safety),
            health: pick(&self.health, &defaults.health),
            environment: pick(&self.environment, &defaults.environment),
            stage_merge: pick(&self.stage_merge, &defaults.stage_merge),
            final_composite: pick(&self.final_composite, &defaults.final_composite),
            instrument_stage: self
                .instrument_stage
                .clone()
                .or_else(|| defaults.instrument_stage.clone()),
            preparation_stage: self
                .preparation_stage
                .clone()
                .or_else(|| defaults.preparation_stage.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodFile {
    #[serde(default)]
    pub name: Option<String>,
    pub chromatography_type: String,
    pub instrument_class: String,
    /// Minutes; defaults to the gradient span
    #[serde(default)]
    pub run_duration_min: Option<f64>,
    #[serde(default = "default_sample_count")]
    pub sample_count: u32,
    pub gradient: GradientProgram,
    #[serde(default)]
    pub preparation: PreparationInput,
    #[serde(default)]
    pub schemes: MethodSchemes,
    /// Per-method catalog overrides
    #[serde(default)]
    pub reagents: BTreeMap<String, ReagentSpec>,
}

fn default_sample_count() -> u32 {
    1
}

impl MethodFile {
    pub fn load(path: &Path) -> Result<Self, MethodError> {
        let content = std::fs::read_to_string(path).map_err(|source| MethodError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, MethodError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self, MethodError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Method name, or the file stem when the file does not set one
    pub fn display_name(&self, path: &Path) -> String {
        self.name.clone().unwrap_or_else(|| {
            path.file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string())
        })
    }

    pub fn to_request(&self, defaults: &SchemeSelection) -> ScoreRequest {
        ScoreRequest {
            gradient: self.gradient.clone(),
            preparation: self.preparation.clone(),
            instrument_class: self.instrument_class.clone(),
            run_duration_min: self
                .run_duration_min
                .unwrap_or_else(|| self.gradient.span_minutes()),
            sample_count: self.sample_count,
            chromatography_type: self.chromatography_type.clone(),
            schemes: self.schemes.over(defaults),
        }
    }

    /// `base` with this method's reagent overrides applied
    pub fn catalog<'c>(&self, base: &'c ReagentCatalog) -> ScoreResult<Cow<'c, ReagentCatalog>> {
        if self.reagents.is_empty() {
            return Ok(Cow::Borrowed(base));
        }
        base.with_overrides(&self.reagents)
            .map(Cow::Owned)
            .map_err(|e| match e {
                CatalogError::InvalidReagent { reagent, reason } => {
                    ScoreError::InvalidReagent { reagent, reason }
                }
                other => ScoreError::InvalidReagent {
                    reagent: String::new(),
                    reason: other.to_string(),
                },
            })
    }

    /// Score this method against a base catalog and engine configuration
    pub fn score(&self, base: &ReagentCatalog, config: &EngineConfig) -> ScoreResult<FinalScoreResult> {
        let catalog = self.catalog(base)?;
        let request = self.to_request(&config.defaults.schemes);
        ScoringEngine::new(&catalog, config).score(&request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const METHOD: &str = r#"
name = "Reverse phase screen"
chromatography_type = "HPLC_UV"
instrument_class = "standard"
sample_count = 4

[gradient]
time_points = [0.0, 10.0, 20.0]
flow_rate = 1.0
curves = ["linear", "weak-convex"]

[gradient.composition]
Water = [100.0, 50.0, 0.0]
Methanol = [0.0, 50.0, 100.0]

[preparation.volumes]
Methanol = 2.0

[schemes]
final_composite = "Eco_Priority"
"#;

    #[test]
    fn test_parse_toml_method() {
        let method = MethodFile::from_toml_str(METHOD).expect("parse");
        assert_eq!(method.name.as_deref(), Some("Reverse phase screen"));
        assert_eq!(method.sample_count, 4);
        assert_eq!(method.gradient.curves.len(), 2);

        let request = method.to_request(&SchemeSelection::default());
        assert_eq!(request.run_duration_min, 20.0);
        assert_eq!(request.schemes.final_composite, "Eco_Priority");
        assert_eq!(request.schemes.safety, "PBT_Balanced");
    }

    #[test]
    fn test_config_defaults_fill_missing_schemes() {
        let method = MethodFile::from_toml_str(METHOD).expect("parse");
        let defaults = SchemeSelection {
            safety: "Personnel_Exposure".to_string(),
            final_composite: "Safety_Priority".to_string(),
            ..SchemeSelection::default()
        };
        let request = method.to_request(&defaults);
        assert_eq!(request.schemes.safety, "Personnel_Exposure");
        assert_eq!(request.schemes.final_composite, "Eco_Priority");
    }

    #[test]
    fn test_parse_json_method() {
        let json = r#"{
            "chromatography_type": "UPLC",
            "instrument_class": "low",
            "run_duration_min": 5.0,
            "gradient": {
                "time_points": [0.0, 5.0],
                "flow_rate": 0.4,
                "composition": {"Acetonitrile": [20.0, 80.0]}
            }
        }"#;
        let method = MethodFile::from_json_str(json).expect("parse");
        assert_eq!(method.sample_count, 1);
        assert!(method.gradient.curves.is_empty());
        assert_eq!(method.display_name(Path::new("/tmp/fast.json")), "fast");
    }

    #[test]
    fn test_unknown_curve_rejected() {
        let bad = METHOD.replace("weak-convex", "wobbly");
        assert!(MethodFile::from_toml_str(&bad).is_err());
    }

    #[test]
    fn test_reagent_overrides() {
        let with_override = format!(
            "{METHOD}\n[reagents.MyBuffer]\ndensity = 1.02\nregeneration = 0.0\ndisposal = 0.2\nsub_factors = {{ S1 = 0.1 }}\n"
        );
        let method = MethodFile::from_toml_str(&with_override).expect("parse");
        let base = ReagentCatalog::builtin().expect("catalog");
        let catalog = method.catalog(&base).expect("overrides");
        assert!(catalog.contains("MyBuffer"));
        assert!(!base.contains("MyBuffer"));

        let invalid = with_override.replace("density = 1.02", "density = -1.0");
        let method = MethodFile::from_toml_str(&invalid).expect("parse");
        let err = method.catalog(&base).expect_err("negative density");
        assert!(matches!(err, ScoreError::InvalidReagent { .. }));
    }

    #[test]
    fn test_score_method() {
        let method = MethodFile::from_toml_str(METHOD).expect("parse");
        let base = ReagentCatalog::builtin().expect("catalog");
        let config = EngineConfig::default();
        let result = method.score(&base, &config).expect("score");
        assert!(result.composite > 0.0 && result.composite <= 100.0);
        assert_eq!(result.schemes.final_composite, "Eco_Priority");
    }
}
