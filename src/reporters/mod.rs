//! Output reporters for greenchrom scoring results
//!
//! Supports two output formats:
//! - `text` - Terminal output with colors
//! - `json` - Machine-readable JSON

mod json;
mod text;

use crate::models::FinalScoreResult;
use anyhow::{anyhow, Result};
use serde::Serialize;
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow!("Unknown format '{}'. Valid formats: text, json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// A scoring result labelled with the method it came from
#[derive(Debug, Clone, Serialize)]
pub struct ScoredMethod<'a> {
    pub name: &'a str,
    pub result: &'a FinalScoreResult,
}

/// Render one scored method
pub fn report(method: &ScoredMethod<'_>, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => text::render(method),
        OutputFormat::Json => json::render(method),
    }
}

/// Render several scored methods (batch mode)
pub fn report_batch(methods: &[ScoredMethod<'_>], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => text::render_batch(methods),
        OutputFormat::Json => json::render_batch(methods),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{AxisScores, MassRecord, SchemeSelection, SubFactor, SubFactorScores};

    /// Create a small result for testing
    pub(crate) fn test_result() -> FinalScoreResult {
        let mut result = FinalScoreResult {
            axes: AxisScores {
                safety: 30.0,
                health: 12.5,
                environment: 8.0,
                power: 28.6,
                recyclability: 40.0,
                disposal: 55.0,
            },
            sub_factors: [(SubFactor::S1, 30.0), (SubFactor::H1, 12.5)].into_iter().collect::<SubFactorScores>(),
            composite: 27.4,
            energy_kwh: 0.5,
            stage_weights: (1.0, 0.0),
            schemes: SchemeSelection::default(),
            ..Default::default()
        };
        result.stages.instrument.masses = [("Methanol".to_string(), 7.91)].into_iter().collect::<MassRecord>();
        result.stages.instrument.total_mass_g = 7.91;
        result.stages.instrument.scheme = "Balanced".to_string();
        result
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!(OutputFormat::from_str("text").unwrap(), OutputFormat::Text);
        assert_eq!(OutputFormat::from_str("JSON").unwrap(), OutputFormat::Json);
        assert!(OutputFormat::from_str("sarif").is_err());
    }
}
