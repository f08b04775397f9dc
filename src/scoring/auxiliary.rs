//! Power, recyclability and disposal axes
//!
//! These axes do not come from the hazard matrix. Power depends on the
//! instrument class and run time only; R and D accumulate mass-weighted
//! regeneration and disposal factors over both stages and normalize against
//! the chromatography-class baseline.

use super::error::{ScoreError, ScoreResult};
use crate::catalog::ReagentCatalog;
use crate::config::{EnergyThresholds, EngineConfig, RdNormalization};
use crate::models::{MassRecord, Stage};

/// Accumulated mass-weighted factors (g) before normalization
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RdTotals {
    pub regeneration: f64,
    pub disposal: f64,
}

impl std::ops::Add for RdTotals {
    type Output = RdTotals;

    fn add(self, rhs: RdTotals) -> RdTotals {
        RdTotals {
            regeneration: self.regeneration + rhs.regeneration,
            disposal: self.disposal + rhs.disposal,
        }
    }
}

/// Energy per run in kWh
pub fn energy_kwh(power_kw: f64, run_duration_min: f64) -> f64 {
    power_kw * run_duration_min / 60.0
}

/// 0 at or below `low_kwh`, 100 at or above `high_kwh`, linear between
pub fn power_score(energy: f64, thresholds: &EnergyThresholds) -> f64 {
    if energy <= thresholds.low_kwh {
        0.0
    } else if energy >= thresholds.high_kwh {
        100.0
    } else {
        (energy - thresholds.low_kwh) / (thresholds.high_kwh - thresholds.low_kwh) * 100.0
    }
}

/// Normalize an accumulated R or D mass into [0,100]
pub fn normalize_rd(total: f64, baseline_g: f64, mode: RdNormalization) -> f64 {
    if total <= 0.0 || !total.is_finite() {
        return 0.0;
    }
    match mode {
        RdNormalization::Baseline => (total / baseline_g).min(1.0) * 100.0,
        RdNormalization::Logarithmic => (45.0 * (1.0 + 14.0 * total).log10()).min(100.0),
    }
}

/// Resolves the request-level tables once, then scores stages against them
pub struct AuxiliaryFactorCalculator<'a> {
    catalog: &'a ReagentCatalog,
    config: &'a EngineConfig,
    baseline_g: f64,
}

impl<'a> AuxiliaryFactorCalculator<'a> {
    /// Fails on an unknown chromatography class
    pub fn new(
        catalog: &'a ReagentCatalog,
        config: &'a EngineConfig,
        chromatography_type: &str,
    ) -> ScoreResult<Self> {
        let baseline_g = config.baseline_mass(chromatography_type).ok_or_else(|| {
            ScoreError::invalid(
                Stage::Request,
                format!(
                    "unknown chromatography type '{}' (known: {})",
                    chromatography_type,
                    known_keys(config.baseline_mass_g.keys())
                ),
            )
        })?;
        Ok(Self {
            catalog,
            config,
            baseline_g,
        })
    }

    /// (energy kWh, P score)
    pub fn power(&self, instrument_class: &str, run_duration_min: f64) -> ScoreResult<(f64, f64)> {
        if !run_duration_min.is_finite() || run_duration_min < 0.0 {
            return Err(ScoreError::invalid(
                Stage::Request,
                format!("run duration must be a non-negative number of minutes, got {run_duration_min}"),
            ));
        }
        let kw = self.config.power_rating(instrument_class).ok_or_else(|| {
            ScoreError::invalid(
                Stage::Request,
                format!(
                    "unknown instrument class '{}' (known: {})",
                    instrument_class,
                    known_keys(self.config.power_kw.keys())
                ),
            )
        })?;
        let energy = energy_kwh(kw, run_duration_min);
        Ok((energy, power_score(energy, &self.config.energy)))
    }

    /// Σ mass × regeneration and Σ mass × disposal for one stage
    pub fn totals(&self, masses: &MassRecord) -> RdTotals {
        masses
            .iter()
            .map(|(name, mass)| {
                let reagent = self.catalog.lookup(name);
                RdTotals {
                    regeneration: mass * reagent.regeneration,
                    disposal: mass * reagent.disposal,
                }
            })
            .fold(RdTotals::default(), |acc, t| acc + t)
    }

    /// (R, D) scores for accumulated totals
    pub fn scores(&self, totals: RdTotals) -> (f64, f64) {
        let mode = self.config.rd.normalization;
        (
            normalize_rd(totals.regeneration, self.baseline_g, mode),
            normalize_rd(totals.disposal, self.baseline_g, mode),
        )
    }
}

fn known_keys<'k>(keys: impl Iterator<Item = &'k String>) -> String {
    keys.map(String::as_str).collect::<Vec<_>>().join(", ")
}
