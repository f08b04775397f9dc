//! Scoring property tests
//!
//! Exercises the engine through the public library API: integration
//! additivity, step shapes, axis bounds, stage symmetry and the reference
//! scenarios.

use greenchrom::catalog::ReagentCatalog;
use greenchrom::config::{EngineConfig, RdNormalization};
use greenchrom::models::{
    GradientProgram, PreparationInput, SchemeSelection, ScoreRequest, SubFactor,
};
use greenchrom::scoring::{
    CurveShape, FinalScheme, GradientMassIntegrator, SafetyScheme, SchemeKind, ScoreError,
    ScoringEngine, StageMergeScheme,
};

/// Water and Methanol, both at density 1.0
fn unit_density_catalog() -> ReagentCatalog {
    ReagentCatalog::from_toml_str(
        r#"
[reagents.Water]
density = 1.0
regeneration = 0.0
disposal = 0.1

[reagents.Methanol]
density = 1.0
regeneration = 0.6
disposal = 0.7
sub_factors = { S1 = 0.6 }
"#,
    )
    .expect("catalog")
}

fn gradient(times: &[f64], flow: f64, composition: &[(&str, &[f64])], curves: &[CurveShape]) -> GradientProgram {
    GradientProgram {
        time_points: times.to_vec(),
        flow_rate: flow,
        composition: composition
            .iter()
            .map(|(name, values)| (name.to_string(), values.to_vec()))
            .collect(),
        curves: curves.to_vec(),
    }
}

fn request(gradient: GradientProgram, preparation: &[(&str, f64)]) -> ScoreRequest {
    ScoreRequest {
        gradient,
        preparation: PreparationInput {
            volumes: preparation.iter().map(|(n, v)| (n.to_string(), *v)).collect(),
        },
        instrument_class: "standard".to_string(),
        run_duration_min: 10.0,
        sample_count: 1,
        chromatography_type: "HPLC_UV".to_string(),
        schemes: SchemeSelection::default(),
    }
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn integration_is_additive_under_resplitting() {
    let whole = gradient(&[0.0, 10.0], 1.5, &[("Methanol", &[10.0, 90.0])], &[CurveShape::Linear]);
    let split = gradient(
        &[0.0, 2.5, 10.0],
        1.5,
        &[("Methanol", &[10.0, 30.0, 90.0])],
        &[CurveShape::Linear, CurveShape::Linear],
    );
    let a = GradientMassIntegrator::volumes(&whole).expect("whole");
    let b = GradientMassIntegrator::volumes(&split).expect("split");
    assert!(close(a["Methanol"], b["Methanol"]));

    let whole = gradient(&[0.0, 10.0], 1.0, &[("Water", &[20.0, 80.0])], &[CurveShape::PreStep]);
    let split = gradient(
        &[0.0, 4.0, 10.0],
        1.0,
        &[("Water", &[20.0, 80.0, 80.0])],
        &[CurveShape::PreStep, CurveShape::PreStep],
    );
    let a = GradientMassIntegrator::volumes(&whole).expect("whole");
    let b = GradientMassIntegrator::volumes(&split).expect("split");
    assert!(close(a["Water"], b["Water"]));
}

#[test]
fn step_shapes_hold_one_endpoint() {
    let pre = gradient(&[0.0, 10.0], 2.0, &[("Water", &[20.0, 80.0])], &[CurveShape::PreStep]);
    let post = gradient(&[0.0, 10.0], 2.0, &[("Water", &[20.0, 80.0])], &[CurveShape::PostStep]);
    let pre = GradientMassIntegrator::volumes(&pre).expect("pre");
    let post = GradientMassIntegrator::volumes(&post).expect("post");
    assert!(close(pre["Water"], 0.8 * 2.0 * 10.0));
    assert!(close(post["Water"], 0.2 * 2.0 * 10.0));
}

#[test]
fn curve_family_orders_consumption() {
    // Rising composition: convex front-loads, concave back-loads
    let volume = |shape: CurveShape| {
        let g = gradient(&[0.0, 10.0], 1.0, &[("Water", &[0.0, 100.0])], &[shape]);
        GradientMassIntegrator::volumes(&g).expect("volumes")["Water"]
    };
    let order = [
        CurveShape::PreStep,
        CurveShape::UltraConvex,
        CurveShape::StrongConvex,
        CurveShape::MediumConvex,
        CurveShape::WeakConvex,
        CurveShape::Linear,
        CurveShape::WeakConcave,
        CurveShape::MediumConcave,
        CurveShape::StrongConcave,
        CurveShape::UltraConcave,
        CurveShape::PostStep,
    ];
    let volumes: Vec<f64> = order.iter().map(|s| volume(*s)).collect();
    assert!(volumes.windows(2).all(|w| w[0] > w[1]), "{volumes:?}");
    assert!(close(volumes[5], 5.0));
}

#[test]
fn water_only_scenario() {
    let catalog = unit_density_catalog();
    let config = EngineConfig::default();
    let g = gradient(&[0.0, 10.0], 1.0, &[("Water", &[100.0, 100.0])], &[CurveShape::Linear]);
    let result = ScoringEngine::new(&catalog, &config)
        .score(&request(g, &[]))
        .expect("score");

    assert!(close(result.stages.instrument.masses.get("Water"), 10.0));
    for factor in SubFactor::ALL {
        assert_eq!(result.sub_factors.get(factor), 0.0);
    }
    assert_eq!(result.axes.recyclability, 0.0);
    assert!(close(result.axes.disposal, 1.0 / 45.0 * 100.0));
}

#[test]
fn linear_crossover_scenario() {
    let catalog = unit_density_catalog();
    let config = EngineConfig::default();
    let g = gradient(
        &[0.0, 10.0],
        1.0,
        &[("Water", &[100.0, 0.0]), ("Methanol", &[0.0, 100.0])],
        &[CurveShape::Linear],
    );
    let result = ScoringEngine::new(&catalog, &config)
        .score(&request(g, &[]))
        .expect("score");

    let masses = &result.stages.instrument.masses;
    assert!(close(masses.get("Water"), 5.0));
    assert!(close(masses.get("Methanol"), 5.0));
    assert!(close(result.sub_factors.get(SubFactor::S1), 30.0));
    // PBT_Balanced safety: S1 only, weight 0.25
    assert!(close(result.axes.safety, 7.5));
}

#[test]
fn every_axis_stays_in_range() {
    let catalog = ReagentCatalog::builtin().expect("catalog");
    let heavy = EngineConfig::default();
    let log = EngineConfig::from_toml_str("[rd]\nnormalization = \"logarithmic\"\n").expect("config");
    assert_eq!(log.rd.normalization, RdNormalization::Logarithmic);

    let g = gradient(
        &[0.0, 30.0, 120.0],
        5.0,
        &[("Dichloromethane", &[50.0, 100.0, 100.0]), ("Hexane (n)", &[50.0, 0.0, 0.0])],
        &[CurveShape::StrongConcave, CurveShape::PreStep],
    );
    for config in [&heavy, &log] {
        for scheme in FinalScheme::ALL {
            for safety in SafetyScheme::ALL {
                for merge in StageMergeScheme::ALL {
                    let mut req = request(g.clone(), &[("Chloroform", 40.0), ("Unlisted", 3.0)]);
                    req.instrument_class = "high".to_string();
                    req.run_duration_min = 120.0;
                    req.sample_count = 12;
                    req.chromatography_type = "UPLC".to_string();
                    req.schemes.final_composite = scheme.name().to_string();
                    req.schemes.safety = safety.name().to_string();
                    req.schemes.stage_merge = merge.name().to_string();

                    let result = ScoringEngine::new(&catalog, config).score(&req).expect("score");
                    for (label, value) in result.axes.radar() {
                        assert!((0.0..=100.0).contains(&value), "{label} = {value}");
                    }
                    assert!((0.0..=100.0).contains(&result.composite));
                    let (wi, wp) = result.stage_weights;
                    assert!(close(wi + wp, 1.0));
                }
            }
        }
    }
}

#[test]
fn swapping_stages_under_balanced_is_symmetric() {
    let catalog = unit_density_catalog();
    let config = EngineConfig::default();
    let engine = ScoringEngine::new(&catalog, &config);

    // 10 g Water in the instrument, 5 g Methanol in preparation, and back
    let water_run = gradient(&[0.0, 10.0], 1.0, &[("Water", &[100.0, 100.0])], &[]);
    let methanol_run = gradient(&[0.0, 5.0], 1.0, &[("Methanol", &[100.0, 100.0])], &[]);
    let a = engine.score(&request(water_run, &[("Methanol", 5.0)])).expect("a");
    let b = engine.score(&request(methanol_run, &[("Water", 10.0)])).expect("b");

    for ((la, va), (_, vb)) in a.axes.radar().iter().zip(b.axes.radar().iter()) {
        assert!(close(*va, *vb), "{la}: {va} vs {vb}");
    }
    for factor in SubFactor::ALL {
        assert!(close(a.sub_factors.get(factor), b.sub_factors.get(factor)));
    }
    assert!(close(a.composite, b.composite));
}

#[test]
fn nonexistent_scheme_fails_for_every_kind() {
    let catalog = unit_density_catalog();
    let config = EngineConfig::default();
    let engine = ScoringEngine::new(&catalog, &config);
    let g = gradient(&[0.0, 10.0], 1.0, &[("Water", &[100.0, 100.0])], &[]);

    let setters: [(SchemeKind, fn(&mut SchemeSelection)); 7] = [
        (SchemeKind::Safety, |s| s.safety = "Nonexistent_Scheme".into()),
        (SchemeKind::Health, |s| s.health = "Nonexistent_Scheme".into()),
        (SchemeKind::Environment, |s| s.environment = "Nonexistent_Scheme".into()),
        (SchemeKind::StageMerge, |s| s.stage_merge = "Nonexistent_Scheme".into()),
        (SchemeKind::FinalComposite, |s| s.final_composite = "Nonexistent_Scheme".into()),
        (SchemeKind::InstrumentStage, |s| s.instrument_stage = Some("Nonexistent_Scheme".into())),
        (SchemeKind::PreparationStage, |s| s.preparation_stage = Some("Nonexistent_Scheme".into())),
    ];
    for (kind, set) in setters {
        let mut req = request(g.clone(), &[]);
        set(&mut req.schemes);
        match engine.score(&req) {
            Err(ScoreError::UnknownScheme { kind: got, name, .. }) => {
                assert_eq!(got, kind);
                assert_eq!(name, "Nonexistent_Scheme");
            }
            other => panic!("{kind}: expected UnknownScheme, got {other:?}"),
        }
    }
}

#[test]
fn empty_request_scores_zero_hazard() {
    let catalog = unit_density_catalog();
    let config = EngineConfig::default();
    let g = gradient(&[0.0], 1.0, &[("Methanol", &[100.0])], &[]);
    let mut req = request(g, &[]);
    req.run_duration_min = 0.0;
    let result = ScoringEngine::new(&catalog, &config).score(&req).expect("score");
    assert_eq!(result.composite, 0.0);
    assert_eq!(result.stage_weights, (0.0, 0.0));
}

#[test]
fn engine_is_shareable_across_threads() {
    let catalog = ReagentCatalog::builtin().expect("catalog");
    let config = EngineConfig::default();
    let engine = ScoringEngine::new(&catalog, &config);
    let g = gradient(&[0.0, 10.0], 1.0, &[("Acetonitrile", &[20.0, 80.0])], &[]);
    let expected = engine.score(&request(g.clone(), &[])).expect("score").composite;

    let composites: Vec<f64> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let g = g.clone();
                let engine = &engine;
                scope.spawn(move || engine.score(&request(g, &[])).expect("score").composite)
            })
            .collect();
        handles.into_iter().map(|h| h.join().expect("join")).collect()
    });
    assert!(composites.iter().all(|c| *c == expected));
}

#[test]
fn sample_weighted_merge_follows_sample_count() {
    let catalog = unit_density_catalog();
    let config = EngineConfig::default();
    let g = gradient(&[0.0, 10.0], 1.0, &[("Water", &[100.0, 100.0])], &[]);
    let mut req = request(g, &[("Methanol", 1.0)]);
    req.sample_count = 3;
    req.schemes.stage_merge = "Sample_Weighted".to_string();
    let result = ScoringEngine::new(&catalog, &config).score(&req).expect("score");
    let (wi, wp) = result.stage_weights;
    assert!(close(wi, 0.25));
    assert!(close(wp, 0.75));
    // S1 = 0.25 x 0 + 0.75 x 60
    assert!(close(result.sub_factors.get(SubFactor::S1), 45.0));
}
