//! Six-axis green chemistry scoring
//!
//! Scores a chromatographic method from the reagents it consumes in two
//! stages (instrument analysis and sample preparation).
//!
//! # Scoring Formula
//!
//! ```text
//! mass_r        = ∫ composition_r(t)/100 × flow dt × density_r      (instrument)
//!               = volume_r × samples × density_r                      (preparation)
//! sub_factor    = Σ (mass_r / M) × value_r × 100                      (per stage)
//! S, H, E       = scheme-weighted sub-factors, blended across stages
//! P             = ramp(power_kW × minutes / 60, 0.1 kWh → 1.5 kWh)
//! R, D          = min(Σ mass × factor / baseline, 1) × 100            (both stages)
//! composite     = Σ w_i × axis_i over (S, H, E, P, R, D)
//! ```
//!
//! Every axis and the composite are clamped to [0, 100]. Higher means a
//! larger footprint.
//!
//! # Schemes
//!
//! - **Safety / Health / Environment**: weights over each factor's sub-factors
//! - **Stage merge**: instrument vs preparation weights (stages that consume
//!   nothing drop out and the rest are renormalized)
//! - **Final composite**: weights over the six axes
//! - **Stage composites**: per-stage breakdown scores

mod aggregate;
mod auxiliary;
mod compose;
pub mod curve;
mod engine;
mod error;
mod mass;
mod merge;
pub mod schemes;

pub use aggregate::{combine_major_factors, SubFactorAggregator};
pub use auxiliary::{energy_kwh, normalize_rd, power_score, AuxiliaryFactorCalculator, RdTotals};
pub use compose::{compose, instrument_stage_composite, preparation_stage_composite};
pub use curve::CurveShape;
pub use engine::ScoringEngine;
pub use error::{SchemeKind, ScoreError, ScoreResult};
pub use mass::{validate_program, GradientMassIntegrator, StageMassModel, COMPOSITION_TOLERANCE};
pub use merge::{StageMerger, StageWeights};
pub use schemes::{
    registry, EnvironmentScheme, FinalScheme, HealthScheme, InstrumentStageScheme,
    MajorFactorRule, PreparationStageScheme, ResolvedSchemes, SafetyScheme, SchemeListing,
    StageMergeScheme,
};
