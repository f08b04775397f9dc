//! Blending instrument and preparation results

use super::schemes::StageMergeScheme;
use crate::models::{MajorFactorScores, SubFactor, SubFactorScores};

/// Effective (instrument, preparation) weights for one request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageWeights {
    pub instrument: f64,
    pub preparation: f64,
}

impl StageWeights {
    /// Scheme weights, renormalized over the stages that consumed any mass.
    /// Both stages empty gives zero weights.
    pub fn resolve(
        scheme: StageMergeScheme,
        instrument_mass: f64,
        preparation_mass: f64,
        sample_count: u32,
    ) -> Self {
        let (wi, wp) = scheme.raw_weights(instrument_mass, preparation_mass, sample_count);
        let wi = if instrument_mass > 0.0 { wi } else { 0.0 };
        let wp = if preparation_mass > 0.0 { wp } else { 0.0 };
        let sum = wi + wp;
        if sum <= 0.0 {
            return Self {
                instrument: 0.0,
                preparation: 0.0,
            };
        }
        Self {
            instrument: wi / sum,
            preparation: wp / sum,
        }
    }

    pub fn blend(&self, instrument: f64, preparation: f64) -> f64 {
        self.instrument * instrument + self.preparation * preparation
    }

    pub fn as_tuple(&self) -> (f64, f64) {
        (self.instrument, self.preparation)
    }
}

/// Merges per-stage results under one set of weights
pub struct StageMerger {
    weights: StageWeights,
}

impl StageMerger {
    pub fn new(weights: StageWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> StageWeights {
        self.weights
    }

    pub fn merge_major(&self, instrument: &MajorFactorScores, preparation: &MajorFactorScores) -> MajorFactorScores {
        MajorFactorScores {
            safety: self.weights.blend(instrument.safety, preparation.safety),
            health: self.weights.blend(instrument.health, preparation.health),
            environment: self.weights.blend(instrument.environment, preparation.environment),
        }
    }

    pub fn merge_sub_factors(&self, instrument: &SubFactorScores, preparation: &SubFactorScores) -> SubFactorScores {
        SubFactor::ALL
            .iter()
            .map(|f| (*f, self.weights.blend(instrument.get(*f), preparation.get(*f))))
            .collect()
    }
}
