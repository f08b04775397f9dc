//! Core data models for greenchrom
//!
//! These value objects flow through one scoring call: reagent reference
//! data, the two stage inputs, the intermediate per-stage scores and the
//! final six-axis result. None of them is cached between calls.

use crate::scoring::curve::CurveShape;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Fine-grained hazard dimension scored per reagent
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum SubFactor {
    /// Release potential
    S1,
    /// Fire / explosion
    S2,
    /// Reaction / decomposition
    S3,
    /// Acute toxicity
    S4,
    /// Chronic toxicity
    H1,
    /// Irritation
    H2,
    /// Persistency
    E1,
    /// Air hazard
    E2,
    /// Water hazard
    E3,
}

impl SubFactor {
    pub const ALL: [SubFactor; 9] = [
        SubFactor::S1,
        SubFactor::S2,
        SubFactor::S3,
        SubFactor::S4,
        SubFactor::H1,
        SubFactor::H2,
        SubFactor::E1,
        SubFactor::E2,
        SubFactor::E3,
    ];

    /// Major factor this sub-factor rolls up into
    pub fn major(self) -> MajorFactor {
        match self {
            SubFactor::S1 | SubFactor::S2 | SubFactor::S3 | SubFactor::S4 => MajorFactor::Safety,
            SubFactor::H1 | SubFactor::H2 => MajorFactor::Health,
            SubFactor::E1 | SubFactor::E2 | SubFactor::E3 => MajorFactor::Environment,
        }
    }

    /// Human readable label
    pub fn label(self) -> &'static str {
        match self {
            SubFactor::S1 => "Release potential",
            SubFactor::S2 => "Fire/explosion",
            SubFactor::S3 => "Reaction/decomposition",
            SubFactor::S4 => "Acute toxicity",
            SubFactor::H1 => "Chronic toxicity",
            SubFactor::H2 => "Irritation",
            SubFactor::E1 => "Persistency",
            SubFactor::E2 => "Air hazard",
            SubFactor::E3 => "Water hazard",
        }
    }
}

impl FromStr for SubFactor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        SubFactor::ALL
            .iter()
            .copied()
            .find(|f| f.to_string() == code)
            .ok_or_else(|| format!("unknown sub-factor '{s}' (expected S1-S4, H1-H2, E1-E3)"))
    }
}

impl fmt::Display for SubFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            SubFactor::S1 => "S1",
            SubFactor::S2 => "S2",
            SubFactor::S3 => "S3",
            SubFactor::S4 => "S4",
            SubFactor::H1 => "H1",
            SubFactor::H2 => "H2",
            SubFactor::E1 => "E1",
            SubFactor::E2 => "E2",
            SubFactor::E3 => "E3",
        };
        f.write_str(code)
    }
}

/// Roll-up of sub-factors: Safety, Health, Environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MajorFactor {
    Safety,
    Health,
    Environment,
}

impl MajorFactor {
    /// Sub-factors in the order scheme weight tables refer to them
    pub fn sub_factors(self) -> &'static [SubFactor] {
        match self {
            MajorFactor::Safety => &[SubFactor::S1, SubFactor::S2, SubFactor::S3, SubFactor::S4],
            MajorFactor::Health => &[SubFactor::H1, SubFactor::H2],
            MajorFactor::Environment => &[SubFactor::E1, SubFactor::E2, SubFactor::E3],
        }
    }
}

impl fmt::Display for MajorFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MajorFactor::Safety => write!(f, "safety"),
            MajorFactor::Health => write!(f, "health"),
            MajorFactor::Environment => write!(f, "environment"),
        }
    }
}

/// Process stage a reagent is consumed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Gradient-driven instrument analysis
    Instrument,
    /// Fixed-volume sample preparation
    Preparation,
    /// Request-level parameters not tied to one stage
    Request,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Instrument => write!(f, "instrument"),
            Stage::Preparation => write!(f, "preparation"),
            Stage::Request => write!(f, "request"),
        }
    }
}

/// Physical and hazard properties of one reagent
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reagent {
    pub name: String,
    /// Density in g/mL (> 0)
    pub density: f64,
    /// Sub-factor matrix, values in [0,1]. Missing entries read as 0.
    pub sub_factors: BTreeMap<SubFactor, f64>,
    /// Recyclability contribution in [0,1]
    pub regeneration: f64,
    /// Disposal burden in [0,1]
    pub disposal: f64,
}

impl Reagent {
    pub fn sub_factor(&self, factor: SubFactor) -> f64 {
        self.sub_factors.get(&factor).copied().unwrap_or(0.0)
    }

    /// Neutral entry used for reagents missing from the catalog
    pub fn neutral(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            density: 1.0,
            sub_factors: SubFactor::ALL.iter().map(|f| (*f, 0.5)).collect(),
            regeneration: 0.5,
            disposal: 0.5,
        }
    }
}

/// Time-stepped mobile-phase program for the instrument stage.
///
/// Time points are minutes, flow rate is mL/min and compositions are
/// percentages (0-100) of the total flow at each time point.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GradientProgram {
    pub time_points: Vec<f64>,
    pub flow_rate: f64,
    /// Reagent name → composition (%) at each time point
    #[serde(default)]
    pub composition: BTreeMap<String, Vec<f64>>,
    /// Curve shape per segment (len = time_points - 1). Empty means linear.
    #[serde(default)]
    pub curves: Vec<CurveShape>,
}

impl GradientProgram {
    /// Total programmed run time in minutes
    pub fn span_minutes(&self) -> f64 {
        match (self.time_points.first(), self.time_points.last()) {
            (Some(first), Some(last)) => (last - first).max(0.0),
            _ => 0.0,
        }
    }

    /// Shape governing segment `index`
    pub fn curve_for(&self, index: usize) -> CurveShape {
        self.curves.get(index).copied().unwrap_or_default()
    }
}

/// Sample-preparation stage: volumes consumed per sample
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreparationInput {
    /// Reagent name → mL per sample
    #[serde(default)]
    pub volumes: BTreeMap<String, f64>,
}

/// Consumed mass per reagent (g) for one stage
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MassRecord(BTreeMap<String, f64>);

impl MassRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add mass for a reagent, accumulating if already present
    pub fn add(&mut self, reagent: &str, mass_g: f64) {
        *self.0.entry(reagent.to_string()).or_insert(0.0) += mass_g;
    }

    pub fn get(&self, reagent: &str) -> f64 {
        self.0.get(reagent).copied().unwrap_or(0.0)
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() <= 0.0
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(name, mass)| (name.as_str(), *mass))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl FromIterator<(String, f64)> for MassRecord {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        let mut record = MassRecord::new();
        for (name, mass) in iter {
            record.add(&name, mass);
        }
        record
    }
}

/// Sub-factor scores on the 0-100 scale
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SubFactorScores(BTreeMap<SubFactor, f64>);

impl SubFactorScores {
    /// All nine sub-factors at zero
    pub fn zeros() -> Self {
        Self(SubFactor::ALL.iter().map(|f| (*f, 0.0)).collect())
    }

    pub fn get(&self, factor: SubFactor) -> f64 {
        self.0.get(&factor).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, factor: SubFactor, value: f64) {
        self.0.insert(factor, value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (SubFactor, f64)> + '_ {
        self.0.iter().map(|(f, v)| (*f, *v))
    }
}

impl FromIterator<(SubFactor, f64)> for SubFactorScores {
    fn from_iter<I: IntoIterator<Item = (SubFactor, f64)>>(iter: I) -> Self {
        let mut scores = SubFactorScores::zeros();
        for (factor, value) in iter {
            scores.set(factor, value);
        }
        scores
    }
}

/// Major factor scores on the 0-100 scale
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MajorFactorScores {
    pub safety: f64,
    pub health: f64,
    pub environment: f64,
}

/// The six radar axes. Higher means a larger footprint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AxisScores {
    pub safety: f64,
    pub health: f64,
    pub environment: f64,
    pub power: f64,
    pub recyclability: f64,
    pub disposal: f64,
}

impl AxisScores {
    /// Every axis clamped into [0,100]
    pub fn clamped(self) -> Self {
        let c = |v: f64| if v.is_finite() { v.clamp(0.0, 100.0) } else { 0.0 };
        Self {
            safety: c(self.safety),
            health: c(self.health),
            environment: c(self.environment),
            power: c(self.power),
            recyclability: c(self.recyclability),
            disposal: c(self.disposal),
        }
    }

    /// Axes in radar order: P, D, R, E, H, S
    pub fn radar(&self) -> [(&'static str, f64); 6] {
        [
            ("P", self.power),
            ("D", self.disposal),
            ("R", self.recyclability),
            ("E", self.environment),
            ("H", self.health),
            ("S", self.safety),
        ]
    }
}

/// Named schemes chosen for one scoring call (raw names, validated by the engine)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemeSelection {
    pub safety: String,
    pub health: String,
    pub environment: String,
    pub stage_merge: String,
    pub final_composite: String,
    /// Instrument stage composite (defaults to `Balanced`)
    pub instrument_stage: Option<String>,
    /// Preparation stage composite (defaults to `Balanced`)
    pub preparation_stage: Option<String>,
}

impl Default for SchemeSelection {
    fn default() -> Self {
        Self {
            safety: "PBT_Balanced".to_string(),
            health: "Absolute_Balance".to_string(),
            environment: "PBT_Balanced".to_string(),
            stage_merge: "Balanced".to_string(),
            final_composite: "Standard".to_string(),
            instrument_stage: None,
            preparation_stage: None,
        }
    }
}

/// Everything one scoring call needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRequest {
    pub gradient: GradientProgram,
    #[serde(default)]
    pub preparation: PreparationInput,
    /// Instrument power class (e.g. `low`, `standard`, `high`)
    pub instrument_class: String,
    /// Run duration in minutes, used for the power axis
    pub run_duration_min: f64,
    /// Preparation volumes are multiplied by this (>= 1)
    pub sample_count: u32,
    /// Chromatography class selecting the R/D baseline (e.g. `HPLC_UV`)
    pub chromatography_type: String,
    #[serde(default)]
    pub schemes: SchemeSelection,
}

/// Per-stage breakdown for transparency
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StageReport {
    pub masses: MassRecord,
    pub total_mass_g: f64,
    pub sub_factors: SubFactorScores,
    pub major_factors: MajorFactorScores,
    /// Stage-only recyclability score (0-100)
    pub recyclability: f64,
    /// Stage-only disposal score (0-100)
    pub disposal: f64,
    /// Stage composite under the stage scheme
    pub composite: f64,
    pub scheme: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StageBreakdown {
    pub instrument: StageReport,
    pub preparation: StageReport,
}

/// The engine's sole output
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FinalScoreResult {
    /// Six axis values, each in [0,100]
    pub axes: AxisScores,
    /// Merged sub-factor map for radar rendering
    pub sub_factors: SubFactorScores,
    /// Composite score in [0,100]
    pub composite: f64,
    /// Instrument and preparation stage composites blended with the stage weights
    pub stage_composite: f64,
    /// Energy per run (kWh) behind the power axis
    pub energy_kwh: f64,
    pub stages: StageBreakdown,
    /// Weights applied to instrument / preparation stages when merging
    pub stage_weights: (f64, f64),
    pub schemes: SchemeSelection,
}
