//! One scoring call, end to end

use super::aggregate::{combine_major_factors, SubFactorAggregator};
use super::auxiliary::{AuxiliaryFactorCalculator, RdTotals};
use super::compose::{compose, instrument_stage_composite, preparation_stage_composite};
use super::error::{ScoreError, ScoreResult};
use super::mass::{GradientMassIntegrator, StageMassModel};
use super::merge::{StageMerger, StageWeights};
use super::schemes::ResolvedSchemes;
use crate::catalog::ReagentCatalog;
use crate::config::EngineConfig;
use crate::models::{
    AxisScores, FinalScoreResult, MajorFactorScores, MassRecord, ScoreRequest, Stage,
    StageBreakdown, StageReport, SubFactorScores,
};
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// Stateless scorer over a shared catalog and configuration.
///
/// Holds only references, so one engine (or many) can score requests from
/// several threads at once.
pub struct ScoringEngine<'a> {
    catalog: &'a ReagentCatalog,
    config: &'a EngineConfig,
}

/// Everything computed for one stage before merging
struct StageScores {
    masses: MassRecord,
    sub_factors: SubFactorScores,
    major_factors: MajorFactorScores,
    totals: RdTotals,
}

impl<'a> ScoringEngine<'a> {
    pub fn new(catalog: &'a ReagentCatalog, config: &'a EngineConfig) -> Self {
        Self { catalog, config }
    }

    /// Score one request
    pub fn score(&self, request: &ScoreRequest) -> ScoreResult<FinalScoreResult> {
        if request.sample_count == 0 {
            return Err(ScoreError::invalid(
                Stage::Request,
                "sample count must be at least 1",
            ));
        }

        let schemes = ResolvedSchemes::resolve(&request.schemes)?;
        let aux = AuxiliaryFactorCalculator::new(self.catalog, self.config, &request.chromatography_type)?;
        let (energy_kwh, power) = aux.power(&request.instrument_class, request.run_duration_min)?;

        self.warn_unknown_reagents(request);

        let instrument_masses = GradientMassIntegrator::new(self.catalog).integrate(&request.gradient)?;
        let preparation_masses =
            StageMassModel::new(self.catalog).masses(&request.preparation, request.sample_count)?;

        let instrument = self.stage_scores(instrument_masses, &schemes, &aux);
        let preparation = self.stage_scores(preparation_masses, &schemes, &aux);

        let weights = StageWeights::resolve(
            schemes.stage_merge,
            instrument.masses.total(),
            preparation.masses.total(),
            request.sample_count,
        );
        debug!(
            "Stage weights ({}): instrument={:.3}, preparation={:.3}",
            schemes.stage_merge, weights.instrument, weights.preparation
        );

        let merger = StageMerger::new(weights);
        let major = merger.merge_major(&instrument.major_factors, &preparation.major_factors);
        let sub_factors = merger.merge_sub_factors(&instrument.sub_factors, &preparation.sub_factors);
        let (recyclability, disposal) = aux.scores(instrument.totals + preparation.totals);

        let axes = AxisScores {
            safety: major.safety,
            health: major.health,
            environment: major.environment,
            power,
            recyclability,
            disposal,
        }
        .clamped();
        let composite = compose(&axes, schemes.final_composite);

        info!(
            "Scored {} method: S={:.1} H={:.1} E={:.1} P={:.1} R={:.1} D={:.1} -> {:.1} ({})",
            request.chromatography_type,
            axes.safety,
            axes.health,
            axes.environment,
            axes.power,
            axes.recyclability,
            axes.disposal,
            composite,
            schemes.final_composite
        );

        let instrument_report = {
            let axes = stage_axes(&instrument, &aux, power);
            StageReport {
                composite: instrument_stage_composite(&axes, schemes.instrument_stage),
                scheme: schemes.instrument_stage.name().to_string(),
                ..stage_report(instrument, axes)
            }
        };
        let preparation_report = {
            let axes = stage_axes(&preparation, &aux, 0.0);
            StageReport {
                composite: preparation_stage_composite(&axes, schemes.preparation_stage),
                scheme: schemes.preparation_stage.name().to_string(),
                ..stage_report(preparation, axes)
            }
        };

        let stage_composite = merger
            .weights()
            .blend(instrument_report.composite, preparation_report.composite)
            .clamp(0.0, 100.0);
        debug!("Stage composite ({}): {:.1}", schemes.stage_merge, stage_composite);

        Ok(FinalScoreResult {
            axes,
            sub_factors,
            composite,
            stage_composite,
            energy_kwh,
            stages: StageBreakdown {
                instrument: instrument_report,
                preparation: preparation_report,
            },
            stage_weights: weights.as_tuple(),
            schemes: schemes.selection(),
        })
    }

    fn stage_scores(&self, masses: MassRecord, schemes: &ResolvedSchemes, aux: &AuxiliaryFactorCalculator<'_>) -> StageScores {
        let sub_factors = SubFactorAggregator::new(self.catalog).aggregate(&masses);
        let major_factors =
            combine_major_factors(&sub_factors, schemes.safety, schemes.health, schemes.environment);
        let totals = aux.totals(&masses);
        StageScores {
            masses,
            sub_factors,
            major_factors,
            totals,
        }
    }

    /// One warning per reagent name the catalog does not know
    fn warn_unknown_reagents(&self, request: &ScoreRequest) {
        let names: BTreeSet<&str> = request
            .gradient
            .composition
            .keys()
            .chain(request.preparation.volumes.keys())
            .map(String::as_str)
            .collect();
        for name in names {
            if !self.catalog.contains(name) {
                warn!("Reagent '{}' not in catalog, using fallback properties", name);
            }
        }
    }
}

fn stage_axes(stage: &StageScores, aux: &AuxiliaryFactorCalculator<'_>, power: f64) -> AxisScores {
    let (recyclability, disposal) = aux.scores(stage.totals);
    AxisScores {
        safety: stage.major_factors.safety,
        health: stage.major_factors.health,
        environment: stage.major_factors.environment,
        power,
        recyclability,
        disposal,
    }
    .clamped()
}

fn stage_report(stage: StageScores, axes: AxisScores) -> StageReport {
    StageReport {
        total_mass_g: stage.masses.total(),
        masses: stage.masses,
        sub_factors: stage.sub_factors,
        major_factors: stage.major_factors,
        recyclability: axes.recyclability,
        disposal: axes.disposal,
        composite: 0.0,
        scheme: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GradientProgram, PreparationInput, SchemeSelection, SubFactor};
    use crate::scoring::curve::CurveShape;
    use crate::scoring::error::SchemeKind;

    fn water_request() -> ScoreRequest {
        ScoreRequest {
            gradient: GradientProgram {
                time_points: vec![0.0, 10.0],
                flow_rate: 1.0,
                composition: [("Water".to_string(), vec![100.0, 100.0])].into_iter().collect(),
                curves: vec![CurveShape::Linear],
            },
            preparation: PreparationInput::default(),
            instrument_class: "standard".to_string(),
            run_duration_min: 10.0,
            sample_count: 1,
            chromatography_type: "HPLC_UV".to_string(),
            schemes: SchemeSelection::default(),
        }
    }

    #[test]
    fn test_water_only_method() {
        let catalog = ReagentCatalog::builtin().expect("catalog");
        let config = EngineConfig::default();
        let result = ScoringEngine::new(&catalog, &config)
            .score(&water_request())
            .expect("score");

        assert!((result.stages.instrument.total_mass_g - 10.0).abs() < 1e-9);
        assert_eq!(result.axes.safety, 0.0);
        assert_eq!(result.axes.health, 0.0);
        assert_eq!(result.axes.recyclability, 0.0);
        // 10 g x 0.1 disposal over a 45 g baseline
        assert!((result.axes.disposal - 1.0 / 45.0 * 100.0).abs() < 1e-9);
        assert_eq!(result.stage_weights, (1.0, 0.0));
        // 1 kW for 10 min = 1/6 kWh
        let expected_power = (1.0 / 6.0 - 0.1) / 1.4 * 100.0;
        assert!((result.energy_kwh - 1.0 / 6.0).abs() < 1e-12);
        assert!((result.axes.power - expected_power).abs() < 1e-9);
    }

    #[test]
    fn test_preparation_counts_toward_rd() {
        let catalog = ReagentCatalog::builtin().expect("catalog");
        let config = EngineConfig::default();
        let mut request = water_request();
        request.preparation.volumes.insert("Water".to_string(), 5.0);
        request.sample_count = 2;
        let result = ScoringEngine::new(&catalog, &config).score(&request).expect("score");

        assert!((result.stages.preparation.total_mass_g - 10.0).abs() < 1e-9);
        // (10 + 10) g x 0.1 over 45 g
        assert!((result.axes.disposal - 2.0 / 45.0 * 100.0).abs() < 1e-9);
        assert_eq!(result.stage_weights, (0.5, 0.5));
    }

    #[test]
    fn test_unknown_scheme_rejected() {
        let catalog = ReagentCatalog::builtin().expect("catalog");
        let config = EngineConfig::default();
        let mut request = water_request();
        request.schemes.health = "Nonexistent_Scheme".to_string();
        let err = ScoringEngine::new(&catalog, &config)
            .score(&request)
            .expect_err("unknown scheme");
        assert!(matches!(
            err,
            ScoreError::UnknownScheme { kind: SchemeKind::Health, .. }
        ));
    }

    #[test]
    fn test_request_validation() {
        let catalog = ReagentCatalog::builtin().expect("catalog");
        let config = EngineConfig::default();
        let engine = ScoringEngine::new(&catalog, &config);

        let mut request = water_request();
        request.sample_count = 0;
        assert!(engine.score(&request).is_err());

        let mut request = water_request();
        request.instrument_class = "turbo".to_string();
        assert!(engine.score(&request).is_err());

        let mut request = water_request();
        request.chromatography_type = "GC".to_string();
        assert!(engine.score(&request).is_err());

        let mut request = water_request();
        request.run_duration_min = -1.0;
        assert!(engine.score(&request).is_err());
    }

    #[test]
    fn test_unknown_reagent_scores_neutral() {
        let catalog = ReagentCatalog::builtin().expect("catalog");
        let config = EngineConfig::default();
        let mut request = water_request();
        request.gradient.composition = [("Unobtainium".to_string(), vec![100.0, 100.0])]
            .into_iter()
            .collect();
        let result = ScoringEngine::new(&catalog, &config).score(&request).expect("score");
        assert!((result.sub_factors.get(SubFactor::S1) - 50.0).abs() < 1e-9);
        assert!((result.axes.safety - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_stage_reports_carry_schemes() {
        let catalog = ReagentCatalog::builtin().expect("catalog");
        let config = EngineConfig::default();
        let mut request = water_request();
        request.schemes.preparation_stage = Some("Circular_Economy".to_string());
        let result = ScoringEngine::new(&catalog, &config).score(&request).expect("score");
        assert_eq!(result.stages.instrument.scheme, "Balanced");
        assert_eq!(result.stages.preparation.scheme, "Circular_Economy");
        assert_eq!(result.stages.preparation.composite, 0.0);
        assert_eq!(result.schemes.instrument_stage.as_deref(), Some("Balanced"));
    }

    #[test]
    fn test_stage_composite_blends_stage_scores() {
        let catalog = ReagentCatalog::builtin().expect("catalog");
        let config = EngineConfig::default();
        let mut request = water_request();
        request.preparation.volumes.insert("Methanol".to_string(), 2.0);
        request.schemes.stage_merge = "Standard".to_string();
        let result = ScoringEngine::new(&catalog, &config).score(&request).expect("score");

        let (wi, wp) = result.stage_weights;
        assert!((wi - 0.6).abs() < 1e-12 && (wp - 0.4).abs() < 1e-12);
        let expected =
            0.6 * result.stages.instrument.composite + 0.4 * result.stages.preparation.composite;
        assert!((result.stage_composite - expected).abs() < 1e-9);
        assert!(result.stages.preparation.composite > 0.0);
    }

    #[test]
    fn test_stage_composite_follows_present_stage() {
        let catalog = ReagentCatalog::builtin().expect("catalog");
        let config = EngineConfig::default();
        let mut request = water_request();
        request.schemes.stage_merge = "Standard".to_string();
        let result = ScoringEngine::new(&catalog, &config).score(&request).expect("score");

        assert_eq!(result.stage_weights, (1.0, 0.0));
        assert!((result.stage_composite - result.stages.instrument.composite).abs() < 1e-12);
    }
}
