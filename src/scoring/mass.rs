//! Consumed reagent mass per stage
//!
//! The instrument stage integrates the gradient program over time; the
//! preparation stage multiplies fixed per-sample volumes by the sample
//! count. Both convert volume to mass with the catalog density.

use super::error::{ScoreError, ScoreResult};
use crate::catalog::ReagentCatalog;
use crate::models::{GradientProgram, MassRecord, PreparationInput, Reagent, Stage};
use std::collections::BTreeMap;
use tracing::debug;

/// Slack allowed when compositions at one time point add up past 100 %
pub const COMPOSITION_TOLERANCE: f64 = 0.01;

/// mL × g/mL
pub(crate) fn mass_from_volume(volume_ml: f64, reagent: &Reagent) -> f64 {
    volume_ml * reagent.density
}

/// Reject programs the integrator cannot interpret
pub fn validate_program(program: &GradientProgram) -> ScoreResult<()> {
    let invalid = |reason: String| ScoreError::invalid(Stage::Instrument, reason);
    let times = &program.time_points;

    if times.is_empty() {
        return Err(invalid("gradient has no time points".to_string()));
    }
    for (i, t) in times.iter().enumerate() {
        if !t.is_finite() || *t < 0.0 {
            return Err(invalid(format!("time point {i} must be a non-negative number, got {t}")));
        }
    }
    for (i, pair) in times.windows(2).enumerate() {
        if pair[1] < pair[0] {
            return Err(invalid(format!(
                "time points must be non-decreasing: t[{}]={} is before t[{}]={}",
                i + 1,
                pair[1],
                i,
                pair[0]
            )));
        }
    }
    if !program.flow_rate.is_finite() || program.flow_rate < 0.0 {
        return Err(invalid(format!(
            "flow rate must be a non-negative number, got {}",
            program.flow_rate
        )));
    }

    let segments = times.len() - 1;
    if !program.curves.is_empty() && program.curves.len() != segments {
        return Err(invalid(format!(
            "expected {} curve shapes (one per segment), got {}",
            segments,
            program.curves.len()
        )));
    }

    for (reagent, values) in &program.composition {
        if values.len() != times.len() {
            return Err(invalid(format!(
                "composition for '{}' has {} values but there are {} time points",
                reagent,
                values.len(),
                times.len()
            )));
        }
        if let Some((i, v)) = values
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v < 0.0 || **v > 100.0)
        {
            return Err(invalid(format!(
                "composition for '{reagent}' at time point {i} must be within 0-100 %, got {v}"
            )));
        }
    }

    for i in 0..times.len() {
        let total: f64 = program.composition.values().map(|v| v[i]).sum();
        if total > 100.0 + COMPOSITION_TOLERANCE {
            return Err(invalid(format!(
                "compositions at time point {i} sum to {total:.2} %, above 100 %"
            )));
        }
    }

    Ok(())
}

/// Converts a gradient program into consumed mass per reagent
pub struct GradientMassIntegrator<'a> {
    catalog: &'a ReagentCatalog,
}

impl<'a> GradientMassIntegrator<'a> {
    pub fn new(catalog: &'a ReagentCatalog) -> Self {
        Self { catalog }
    }

    /// Consumed volume (mL) per reagent over the whole program
    pub fn volumes(program: &GradientProgram) -> ScoreResult<BTreeMap<String, f64>> {
        validate_program(program)?;

        let mut volumes: BTreeMap<String, f64> = program
            .composition
            .keys()
            .map(|name| (name.clone(), 0.0))
            .collect();

        for (index, pair) in program.time_points.windows(2).enumerate() {
            let duration = pair[1] - pair[0];
            let shape = program.curve_for(index);
            for (name, values) in &program.composition {
                let area = shape.integrate(values[index], values[index + 1], duration);
                if let Some(total) = volumes.get_mut(name) {
                    *total += area / 100.0 * program.flow_rate;
                }
            }
        }

        Ok(volumes)
    }

    /// Consumed mass (g) per reagent over the whole program
    pub fn integrate(&self, program: &GradientProgram) -> ScoreResult<MassRecord> {
        let volumes = Self::volumes(program)?;
        let masses: MassRecord = volumes
            .into_iter()
            .map(|(name, volume)| {
                let mass = mass_from_volume(volume, self.catalog.lookup(&name));
                (name, mass)
            })
            .collect();

        debug!(
            "Instrument stage: {} segments, {} reagents, {:.4} g total",
            program.time_points.len().saturating_sub(1),
            masses.len(),
            masses.total()
        );
        Ok(masses)
    }
}

/// Converts per-sample preparation volumes into consumed mass
pub struct StageMassModel<'a> {
    catalog: &'a ReagentCatalog,
}

impl<'a> StageMassModel<'a> {
    pub fn new(catalog: &'a ReagentCatalog) -> Self {
        Self { catalog }
    }

    pub fn masses(&self, input: &PreparationInput, sample_count: u32) -> ScoreResult<MassRecord> {
        if sample_count == 0 {
            return Err(ScoreError::invalid(
                Stage::Request,
                "sample count must be at least 1",
            ));
        }

        let mut masses = MassRecord::new();
        for (name, volume) in &input.volumes {
            if !volume.is_finite() || *volume < 0.0 {
                return Err(ScoreError::invalid(
                    Stage::Preparation,
                    format!("volume for '{name}' must be a non-negative number, got {volume}"),
                ));
            }
            let total_volume = volume * f64::from(sample_count);
            masses.add(name, mass_from_volume(total_volume, self.catalog.lookup(name)));
        }

        debug!(
            "Preparation stage: {} reagents x {} samples, {:.4} g total",
            masses.len(),
            sample_count,
            masses.total()
        );
        Ok(masses)
    }
}
