//! Score command - score one method file

use super::{emit, Workspace};
use anyhow::{Context, Result};
use greenchrom::method::MethodFile;
use greenchrom::models::FinalScoreResult;
use greenchrom::reporters::{self, OutputFormat, ScoredMethod};
use std::path::Path;

/// Load and score a method file, returning its display name and result
pub(crate) fn score_file(workspace: &Workspace, path: &Path) -> Result<(String, FinalScoreResult)> {
    let method = MethodFile::load(path)
        .with_context(|| format!("Failed to load method {}", path.display()))?;
    let name = method.display_name(path);
    let result = method
        .score(&workspace.catalog, &workspace.config)
        .with_context(|| format!("Failed to score {}", path.display()))?;
    Ok((name, result))
}

/// Run the score command
pub fn run(workspace: &Workspace, path: &Path, format: &str, output: Option<&Path>) -> Result<()> {
    let format: OutputFormat = format.parse()?;
    let (name, result) = score_file(workspace, path)?;
    let rendered = reporters::report(
        &ScoredMethod {
            name: &name,
            result: &result,
        },
        format,
    )?;
    emit(&rendered, output)
}
