//! Batch command - score many method files in parallel

use super::score::score_file;
use super::{emit, Workspace};
use anyhow::{bail, Result};
use console::style;
use greenchrom::reporters::{self, OutputFormat, ScoredMethod};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::info;

/// Run the batch command
pub fn run(workspace: &Workspace, paths: &[PathBuf], format: &str, output: Option<&Path>) -> Result<()> {
    let format: OutputFormat = format.parse()?;

    // Engine state is shared read-only; results keep input order
    let outcomes: Vec<_> = paths
        .par_iter()
        .map(|path| score_file(workspace, path))
        .collect();

    let mut scored = Vec::with_capacity(outcomes.len());
    let mut failures = 0usize;
    for outcome in outcomes {
        match outcome {
            Ok(pair) => scored.push(pair),
            Err(e) => {
                failures += 1;
                eprintln!("{} {:#}", style("error:").red().bold(), e);
            }
        }
    }

    info!("Scored {} of {} methods", scored.len(), paths.len());

    if !scored.is_empty() {
        let methods: Vec<ScoredMethod<'_>> = scored
            .iter()
            .map(|(name, result)| ScoredMethod { name, result })
            .collect();
        emit(&reporters::report_batch(&methods, format)?, output)?;
    }

    if failures > 0 {
        bail!("{} of {} methods failed to score", failures, paths.len());
    }
    Ok(())
}
