//! Text (terminal) reporter with colors and formatting

use super::ScoredMethod;
use crate::models::{FinalScoreResult, StageReport};
use anyhow::Result;

/// Reset ANSI color
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

/// Footprint colors: higher scores are worse
fn score_color(score: f64) -> &'static str {
    if score < 20.0 {
        "\x1b[32m" // Green
    } else if score < 40.0 {
        "\x1b[92m" // Light green
    } else if score < 60.0 {
        "\x1b[33m" // Yellow
    } else if score < 80.0 {
        "\x1b[91m" // Light red
    } else {
        "\x1b[31m" // Red
    }
}

fn format_score(score: f64) -> String {
    format!("{}{:.1}{RESET}", score_color(score), score)
}

/// Fixed-width bar, one block per 5 points
fn bar(score: f64) -> String {
    let filled = (score / 5.0).round().clamp(0.0, 20.0) as usize;
    format!(
        "{}{}{RESET}{DIM}{}{RESET}",
        score_color(score),
        "█".repeat(filled),
        "·".repeat(20 - filled)
    )
}

/// Render one method as formatted terminal output
pub fn render(method: &ScoredMethod<'_>) -> Result<String> {
    let result = method.result;
    let mut out = String::new();

    out.push_str(&format!("\n{BOLD}{}{RESET}\n", method.name));
    out.push_str(&format!("{DIM}──────────────────────────────────────{RESET}\n"));
    out.push_str(&format!(
        "Composite: {BOLD}{}{RESET}/100  ({})\n\n",
        format_score(result.composite),
        result.schemes.final_composite
    ));

    out.push_str(&format!("{BOLD}AXES{RESET}\n"));
    for (label, value) in result.axes.radar() {
        out.push_str(&format!("  {label}  {}  {}\n", bar(value), format_score(value)));
    }
    out.push_str(&format!("  {DIM}energy {:.3} kWh per run{RESET}\n\n", result.energy_kwh));

    out.push_str(&format!("{BOLD}SUB-FACTORS{RESET}\n"));
    for (factor, value) in result.sub_factors.iter() {
        out.push_str(&format!(
            "  {factor} {value:.1}  {DIM}{}{RESET}\n",
            factor.label()
        ));
    }
    out.push('\n');

    let (wi, wp) = result.stage_weights;
    out.push_str(&format!(
        "{BOLD}STAGES{RESET} {DIM}({} merge: instrument {:.2} / preparation {:.2}){RESET}  stage composite {}\n",
        result.schemes.stage_merge,
        wi,
        wp,
        format_score(result.stage_composite)
    ));
    render_stage(&mut out, "Instrument", &result.stages.instrument);
    render_stage(&mut out, "Preparation", &result.stages.preparation);

    Ok(out)
}

fn render_stage(out: &mut String, label: &str, stage: &StageReport) {
    out.push_str(&format!(
        "  {label:<12} {:>9.3} g  S {:.1}  H {:.1}  E {:.1}  R {:.1}  D {:.1}  composite {} ({})\n",
        stage.total_mass_g,
        stage.major_factors.safety,
        stage.major_factors.health,
        stage.major_factors.environment,
        stage.recyclability,
        stage.disposal,
        format_score(stage.composite),
        stage.scheme
    ));
    for (name, mass) in stage.masses.iter() {
        out.push_str(&format!("  {DIM}  {name:<24} {mass:>9.3} g{RESET}\n"));
    }
}

/// Render several methods followed by a summary table
pub fn render_batch(methods: &[ScoredMethod<'_>]) -> Result<String> {
    let mut out = String::new();
    for method in methods {
        out.push_str(&render(method)?);
    }

    out.push_str(&format!("\n{BOLD}SUMMARY{RESET} ({} methods)\n", methods.len()));
    out.push_str(&format!(
        "{DIM}  METHOD                     S      H      E      P      R      D    SCORE{RESET}\n"
    ));
    for method in methods {
        out.push_str(&summary_row(method.name, method.result));
    }
    Ok(out)
}

fn summary_row(name: &str, result: &FinalScoreResult) -> String {
    let name: String = name.chars().take(24).collect();
    let a = &result.axes;
    format!(
        "  {name:<24} {:>6.1} {:>6.1} {:>6.1} {:>6.1} {:>6.1} {:>6.1}  {}\n",
        a.safety,
        a.health,
        a.environment,
        a.power,
        a.recyclability,
        a.disposal,
        format_score(result.composite)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_result;

    #[test]
    fn test_text_render_contains_axes() {
        let result = test_result();
        let out = render(&ScoredMethod {
            name: "Reverse phase screen",
            result: &result,
        })
        .expect("render text");
        assert!(out.contains("Reverse phase screen"));
        assert!(out.contains("27.4"));
        assert!(out.contains("Methanol"));
        assert!(out.contains("S1 30.0"));
        assert!(out.contains("Release potential"));
        assert!(out.contains("stage composite"));
    }

    #[test]
    fn test_bar_is_fixed_width() {
        let strip = |s: String| s.chars().filter(|c| *c == '█' || *c == '·').count();
        assert_eq!(strip(bar(0.0)), 20);
        assert_eq!(strip(bar(100.0)), 20);
        assert_eq!(strip(bar(150.0)), 20);
    }

    #[test]
    fn test_batch_has_summary() {
        let result = test_result();
        let methods = vec![ScoredMethod { name: "first", result: &result }];
        let out = render_batch(&methods).expect("render batch");
        assert!(out.contains("SUMMARY"));
        assert!(out.contains("first"));
    }
}
