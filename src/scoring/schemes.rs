//! Named weighting schemes
//!
//! Every scheme family is a closed enum. Names are matched exactly; an
//! unrecognised name is an error, never a silent default.

use super::error::{SchemeKind, ScoreError, ScoreResult};
use crate::models::{MajorFactor, SchemeSelection, SubFactorScores};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

const THIRD: f64 = 1.0 / 3.0;

/// Axis labels for six-axis tables, in weight order
pub const SIX_AXIS_LABELS: [&str; 6] = ["S", "H", "E", "P", "R", "D"];

/// Axis labels for the preparation stage table (no power axis)
pub const PREPARATION_AXIS_LABELS: [&str; 5] = ["S", "H", "E", "R", "D"];

fn parse_scheme<T: Copy>(
    kind: SchemeKind,
    name: &str,
    all: &[T],
    name_of: fn(T) -> &'static str,
) -> ScoreResult<T> {
    all.iter()
        .copied()
        .find(|scheme| name_of(*scheme) == name)
        .ok_or_else(|| ScoreError::UnknownScheme {
            kind,
            name: name.to_string(),
            valid: all.iter().map(|s| name_of(*s)).collect::<Vec<_>>().join(", "),
        })
}

/// Weighting rule that rolls sub-factor scores up into one major factor
pub trait MajorFactorRule {
    fn factor(&self) -> MajorFactor;

    /// Weights aligned with `factor().sub_factors()`
    fn weights(&self) -> &'static [f64];

    fn combine(&self, scores: &SubFactorScores) -> f64 {
        self.factor()
            .sub_factors()
            .iter()
            .zip(self.weights())
            .map(|(sf, w)| scores.get(*sf) * w)
            .sum()
    }
}

// ============================================================================
// Safety (S1, S2, S3, S4)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SafetyScheme {
    PbtBalanced,
    AbsoluteBalance,
    FrontierFocus,
    PersonnelExposure,
    MaterialTransport,
}

impl SafetyScheme {
    pub const ALL: [SafetyScheme; 5] = [
        SafetyScheme::PbtBalanced,
        SafetyScheme::AbsoluteBalance,
        SafetyScheme::FrontierFocus,
        SafetyScheme::PersonnelExposure,
        SafetyScheme::MaterialTransport,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SafetyScheme::PbtBalanced => "PBT_Balanced",
            SafetyScheme::AbsoluteBalance => "Absolute_Balance",
            SafetyScheme::FrontierFocus => "Frontier_Focus",
            SafetyScheme::PersonnelExposure => "Personnel_Exposure",
            SafetyScheme::MaterialTransport => "Material_Transport",
        }
    }
}

impl MajorFactorRule for SafetyScheme {
    fn factor(&self) -> MajorFactor {
        MajorFactor::Safety
    }

    fn weights(&self) -> &'static [f64] {
        match self {
            SafetyScheme::PbtBalanced => &[0.25, 0.25, 0.25, 0.25],
            SafetyScheme::AbsoluteBalance => &[0.25, 0.25, 0.25, 0.25],
            SafetyScheme::FrontierFocus => &[0.10, 0.60, 0.15, 0.15],
            SafetyScheme::PersonnelExposure => &[0.10, 0.20, 0.20, 0.50],
            SafetyScheme::MaterialTransport => &[0.50, 0.20, 0.20, 0.10],
        }
    }
}

impl FromStr for SafetyScheme {
    type Err = ScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_scheme(SchemeKind::Safety, s, &Self::ALL, Self::name)
    }
}

// ============================================================================
// Health (H1, H2)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HealthScheme {
    AbsoluteBalance,
    OccupationalExposure,
    OperationProtection,
    StrictCompliance,
}

impl HealthScheme {
    pub const ALL: [HealthScheme; 4] = [
        HealthScheme::AbsoluteBalance,
        HealthScheme::OccupationalExposure,
        HealthScheme::OperationProtection,
        HealthScheme::StrictCompliance,
    ];

    pub fn name(self) -> &'static str {
        match self {
            HealthScheme::AbsoluteBalance => "Absolute_Balance",
            HealthScheme::OccupationalExposure => "Occupational_Exposure",
            HealthScheme::OperationProtection => "Operation_Protection",
            HealthScheme::StrictCompliance => "Strict_Compliance",
        }
    }
}

impl MajorFactorRule for HealthScheme {
    fn factor(&self) -> MajorFactor {
        MajorFactor::Health
    }

    fn weights(&self) -> &'static [f64] {
        match self {
            HealthScheme::AbsoluteBalance => &[0.5, 0.5],
            HealthScheme::OccupationalExposure => &[0.7, 0.3],
            HealthScheme::OperationProtection => &[0.3, 0.7],
            HealthScheme::StrictCompliance => &[0.9, 0.1],
        }
    }
}

impl FromStr for HealthScheme {
    type Err = ScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_scheme(SchemeKind::Health, s, &Self::ALL, Self::name)
    }
}

// ============================================================================
// Environment (E1, E2, E3)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnvironmentScheme {
    PbtBalanced,
    AbsoluteBalance,
    EmissionCompliance,
    DeepImpact,
    DegradationPriority,
}

impl EnvironmentScheme {
    pub const ALL: [EnvironmentScheme; 5] = [
        EnvironmentScheme::PbtBalanced,
        EnvironmentScheme::AbsoluteBalance,
        EnvironmentScheme::EmissionCompliance,
        EnvironmentScheme::DeepImpact,
        EnvironmentScheme::DegradationPriority,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EnvironmentScheme::PbtBalanced => "PBT_Balanced",
            EnvironmentScheme::AbsoluteBalance => "Absolute_Balance",
            EnvironmentScheme::EmissionCompliance => "Emission_Compliance",
            EnvironmentScheme::DeepImpact => "Deep_Impact",
            EnvironmentScheme::DegradationPriority => "Degradation_Priority",
        }
    }
}

impl MajorFactorRule for EnvironmentScheme {
    fn factor(&self) -> MajorFactor {
        MajorFactor::Environment
    }

    fn weights(&self) -> &'static [f64] {
        match self {
            EnvironmentScheme::PbtBalanced => &[0.334, 0.333, 0.333],
            EnvironmentScheme::AbsoluteBalance => &[THIRD, THIRD, THIRD],
            EnvironmentScheme::EmissionCompliance => &[0.1, 0.8, 0.1],
            EnvironmentScheme::DeepImpact => &[0.1, 0.1, 0.8],
            EnvironmentScheme::DegradationPriority => &[0.7, 0.15, 0.15],
        }
    }
}

impl FromStr for EnvironmentScheme {
    type Err = ScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_scheme(SchemeKind::Environment, s, &Self::ALL, Self::name)
    }
}

// ============================================================================
// Stage merge
// ============================================================================

/// How instrument and preparation results are blended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageMergeScheme {
    /// 0.5 / 0.5 (alias `Equal`)
    Balanced,
    /// 0.6 / 0.4
    Standard,
    /// Proportional to each stage's consumed mass
    MassWeighted,
    /// Instrument 1/(1+n), preparation n/(1+n)
    SampleWeighted,
    /// 0.3 / 0.7
    ComplexPrep,
    /// 0.8 / 0.2
    DirectOnline,
}

impl StageMergeScheme {
    pub const ALL: [StageMergeScheme; 6] = [
        StageMergeScheme::Balanced,
        StageMergeScheme::Standard,
        StageMergeScheme::MassWeighted,
        StageMergeScheme::SampleWeighted,
        StageMergeScheme::ComplexPrep,
        StageMergeScheme::DirectOnline,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StageMergeScheme::Balanced => "Balanced",
            StageMergeScheme::Standard => "Standard",
            StageMergeScheme::MassWeighted => "Mass_Weighted",
            StageMergeScheme::SampleWeighted => "Sample_Weighted",
            StageMergeScheme::ComplexPrep => "Complex_Prep",
            StageMergeScheme::DirectOnline => "Direct_Online",
        }
    }

    /// Raw (instrument, preparation) weights before absent stages are dropped
    pub fn raw_weights(self, instrument_mass: f64, preparation_mass: f64, sample_count: u32) -> (f64, f64) {
        match self {
            StageMergeScheme::Balanced => (0.5, 0.5),
            StageMergeScheme::Standard => (0.6, 0.4),
            StageMergeScheme::MassWeighted => {
                let total = instrument_mass + preparation_mass;
                if total > 0.0 {
                    (instrument_mass / total, preparation_mass / total)
                } else {
                    (0.0, 0.0)
                }
            }
            StageMergeScheme::SampleWeighted => {
                let n = f64::from(sample_count);
                (1.0 / (1.0 + n), n / (1.0 + n))
            }
            StageMergeScheme::ComplexPrep => (0.3, 0.7),
            StageMergeScheme::DirectOnline => (0.8, 0.2),
        }
    }

    /// Fixed weights, if the scheme has them
    pub fn fixed_weights(self) -> Option<(f64, f64)> {
        match self {
            StageMergeScheme::MassWeighted | StageMergeScheme::SampleWeighted => None,
            other => Some(other.raw_weights(0.0, 0.0, 1)),
        }
    }

    fn describe(self) -> Option<&'static str> {
        match self {
            StageMergeScheme::MassWeighted => Some("weights proportional to stage mass"),
            StageMergeScheme::SampleWeighted => Some("instrument 1/(1+n), preparation n/(1+n)"),
            _ => None,
        }
    }
}

impl FromStr for StageMergeScheme {
    type Err = ScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "Equal" {
            return Ok(StageMergeScheme::Balanced);
        }
        parse_scheme(SchemeKind::StageMerge, s, &Self::ALL, Self::name)
    }
}

// ============================================================================
// Final composite (S, H, E, P, R, D)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FinalScheme {
    Standard,
    SafetyPriority,
    EcoPriority,
    EfficiencyPriority,
}

const STANDARD_WEIGHTS: [f64; 6] = [0.25, 0.15, 0.15, 0.25, 0.10, 0.10];
const SAFETY_PRIORITY_WEIGHTS: [f64; 6] = [0.50, 0.20, 0.10, 0.10, 0.05, 0.05];
const ECO_PRIORITY_WEIGHTS: [f64; 6] = [0.15, 0.10, 0.45, 0.10, 0.10, 0.10];
const EFFICIENCY_PRIORITY_WEIGHTS: [f64; 6] = [0.10, 0.10, 0.10, 0.40, 0.15, 0.15];

impl FinalScheme {
    pub const ALL: [FinalScheme; 4] = [
        FinalScheme::Standard,
        FinalScheme::SafetyPriority,
        FinalScheme::EcoPriority,
        FinalScheme::EfficiencyPriority,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FinalScheme::Standard => "Standard",
            FinalScheme::SafetyPriority => "Safety_Priority",
            FinalScheme::EcoPriority => "Eco_Priority",
            FinalScheme::EfficiencyPriority => "Efficiency_Priority",
        }
    }

    /// Weights over (S, H, E, P, R, D)
    pub fn weights(self) -> [f64; 6] {
        match self {
            FinalScheme::Standard => STANDARD_WEIGHTS,
            FinalScheme::SafetyPriority => SAFETY_PRIORITY_WEIGHTS,
            FinalScheme::EcoPriority => ECO_PRIORITY_WEIGHTS,
            FinalScheme::EfficiencyPriority => EFFICIENCY_PRIORITY_WEIGHTS,
        }
    }
}

impl FromStr for FinalScheme {
    type Err = ScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_scheme(SchemeKind::FinalComposite, s, &Self::ALL, Self::name)
    }
}

// ============================================================================
// Stage composites
// ============================================================================

/// Instrument stage composite over (S, H, E, P, R, D)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InstrumentStageScheme {
    #[default]
    Balanced,
    SafetyPriority,
    EcoPriority,
    EfficiencyPriority,
}

impl InstrumentStageScheme {
    pub const ALL: [InstrumentStageScheme; 4] = [
        InstrumentStageScheme::Balanced,
        InstrumentStageScheme::SafetyPriority,
        InstrumentStageScheme::EcoPriority,
        InstrumentStageScheme::EfficiencyPriority,
    ];

    pub fn name(self) -> &'static str {
        match self {
            InstrumentStageScheme::Balanced => "Balanced",
            InstrumentStageScheme::SafetyPriority => "Safety_Priority",
            InstrumentStageScheme::EcoPriority => "Eco_Priority",
            InstrumentStageScheme::EfficiencyPriority => "Efficiency_Priority",
        }
    }

    pub fn weights(self) -> [f64; 6] {
        match self {
            InstrumentStageScheme::Balanced => STANDARD_WEIGHTS,
            InstrumentStageScheme::SafetyPriority => SAFETY_PRIORITY_WEIGHTS,
            InstrumentStageScheme::EcoPriority => ECO_PRIORITY_WEIGHTS,
            InstrumentStageScheme::EfficiencyPriority => EFFICIENCY_PRIORITY_WEIGHTS,
        }
    }
}

impl FromStr for InstrumentStageScheme {
    type Err = ScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_scheme(SchemeKind::InstrumentStage, s, &Self::ALL, Self::name)
    }
}

/// Preparation stage composite over (S, H, E, R, D)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PreparationStageScheme {
    #[default]
    Balanced,
    OperationProtection,
    CircularEconomy,
    EnvironmentalTower,
}

impl PreparationStageScheme {
    pub const ALL: [PreparationStageScheme; 4] = [
        PreparationStageScheme::Balanced,
        PreparationStageScheme::OperationProtection,
        PreparationStageScheme::CircularEconomy,
        PreparationStageScheme::EnvironmentalTower,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PreparationStageScheme::Balanced => "Balanced",
            PreparationStageScheme::OperationProtection => "Operation_Protection",
            PreparationStageScheme::CircularEconomy => "Circular_Economy",
            PreparationStageScheme::EnvironmentalTower => "Environmental_Tower",
        }
    }

    pub fn weights(self) -> [f64; 5] {
        match self {
            PreparationStageScheme::Balanced => [0.25, 0.20, 0.20, 0.175, 0.175],
            PreparationStageScheme::OperationProtection => [0.40, 0.30, 0.10, 0.10, 0.10],
            PreparationStageScheme::CircularEconomy => [0.10, 0.10, 0.20, 0.30, 0.30],
            PreparationStageScheme::EnvironmentalTower => [0.15, 0.15, 0.50, 0.10, 0.10],
        }
    }
}

impl FromStr for PreparationStageScheme {
    type Err = ScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_scheme(SchemeKind::PreparationStage, s, &Self::ALL, Self::name)
    }
}

impl fmt::Display for SafetyScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for HealthScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for EnvironmentScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for StageMergeScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for FinalScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for InstrumentStageScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for PreparationStageScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Resolution and listing
// ============================================================================

/// A [`SchemeSelection`] with every name validated
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedSchemes {
    pub safety: SafetyScheme,
    pub health: HealthScheme,
    pub environment: EnvironmentScheme,
    pub stage_merge: StageMergeScheme,
    pub final_composite: FinalScheme,
    pub instrument_stage: InstrumentStageScheme,
    pub preparation_stage: PreparationStageScheme,
}

impl ResolvedSchemes {
    /// Validate every name. The first unknown name is reported.
    pub fn resolve(selection: &SchemeSelection) -> ScoreResult<Self> {
        Ok(Self {
            safety: selection.safety.parse()?,
            health: selection.health.parse()?,
            environment: selection.environment.parse()?,
            stage_merge: selection.stage_merge.parse()?,
            final_composite: selection.final_composite.parse()?,
            instrument_stage: match &selection.instrument_stage {
                Some(name) => name.parse()?,
                None => InstrumentStageScheme::default(),
            },
            preparation_stage: match &selection.preparation_stage {
                Some(name) => name.parse()?,
                None => PreparationStageScheme::default(),
            },
        })
    }

    /// Canonical names, with stage schemes filled in
    pub fn selection(&self) -> SchemeSelection {
        SchemeSelection {
            safety: self.safety.name().to_string(),
            health: self.health.name().to_string(),
            environment: self.environment.name().to_string(),
            stage_merge: self.stage_merge.name().to_string(),
            final_composite: self.final_composite.name().to_string(),
            instrument_stage: Some(self.instrument_stage.name().to_string()),
            preparation_stage: Some(self.preparation_stage.name().to_string()),
        }
    }
}

/// One row of the scheme registry
#[derive(Debug, Clone, Serialize)]
pub struct SchemeListing {
    pub kind: String,
    pub name: &'static str,
    /// Label → weight; empty for data-dependent schemes
    pub weights: Vec<(String, f64)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<&'static str>,
}

fn labelled(labels: &[&str], weights: &[f64]) -> Vec<(String, f64)> {
    labels
        .iter()
        .zip(weights)
        .map(|(l, w)| ((*l).to_string(), *w))
        .collect()
}

fn major_listing<R: MajorFactorRule>(kind: SchemeKind, name: &'static str, rule: R) -> SchemeListing {
    let labels: Vec<String> = rule.factor().sub_factors().iter().map(|f| f.to_string()).collect();
    let labels: Vec<&str> = labels.iter().map(String::as_str).collect();
    SchemeListing {
        kind: kind.to_string(),
        name,
        weights: labelled(&labels, rule.weights()),
        note: None,
    }
}

/// Every scheme of every kind, in registry order
pub fn registry() -> Vec<SchemeListing> {
    let mut rows = Vec::new();

    for s in SafetyScheme::ALL {
        rows.push(major_listing(SchemeKind::Safety, s.name(), s));
    }
    for s in HealthScheme::ALL {
        rows.push(major_listing(SchemeKind::Health, s.name(), s));
    }
    for s in EnvironmentScheme::ALL {
        rows.push(major_listing(SchemeKind::Environment, s.name(), s));
    }
    for s in StageMergeScheme::ALL {
        let weights = s
            .fixed_weights()
            .map(|(i, p)| labelled(&["instrument", "preparation"], &[i, p]))
            .unwrap_or_default();
        rows.push(SchemeListing {
            kind: SchemeKind::StageMerge.to_string(),
            name: s.name(),
            weights,
            note: s.describe(),
        });
    }
    for s in FinalScheme::ALL {
        rows.push(SchemeListing {
            kind: SchemeKind::FinalComposite.to_string(),
            name: s.name(),
            weights: labelled(&SIX_AXIS_LABELS, &s.weights()),
            note: None,
        });
    }
    for s in InstrumentStageScheme::ALL {
        rows.push(SchemeListing {
            kind: SchemeKind::InstrumentStage.to_string(),
            name: s.name(),
            weights: labelled(&SIX_AXIS_LABELS, &s.weights()),
            note: None,
        });
    }
    for s in PreparationStageScheme::ALL {
        rows.push(SchemeListing {
            kind: SchemeKind::PreparationStage.to_string(),
            name: s.name(),
            weights: labelled(&PREPARATION_AXIS_LABELS, &s.weights()),
            note: None,
        });
    }

    rows
}
