//! Weighted composites over the radar axes

use super::schemes::{FinalScheme, InstrumentStageScheme, PreparationStageScheme};
use crate::models::AxisScores;

fn clamp_score(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

fn weighted_six(axes: &AxisScores, w: [f64; 6]) -> f64 {
    let values = [
        axes.safety,
        axes.health,
        axes.environment,
        axes.power,
        axes.recyclability,
        axes.disposal,
    ];
    clamp_score(values.iter().zip(w).map(|(v, w)| v * w).sum())
}

/// Final composite in [0,100]
pub fn compose(axes: &AxisScores, scheme: FinalScheme) -> f64 {
    weighted_six(axes, scheme.weights())
}

/// Instrument stage composite, power included
pub fn instrument_stage_composite(axes: &AxisScores, scheme: InstrumentStageScheme) -> f64 {
    weighted_six(axes, scheme.weights())
}

/// Preparation stage composite; the power axis is ignored
pub fn preparation_stage_composite(axes: &AxisScores, scheme: PreparationStageScheme) -> f64 {
    let [s, h, e, r, d] = scheme.weights();
    clamp_score(
        axes.safety * s
            + axes.health * h
            + axes.environment * e
            + axes.recyclability * r
            + axes.disposal * d,
    )
}
