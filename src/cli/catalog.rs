//! Catalog command - list the effective reagent catalog

use super::Workspace;
use anyhow::Result;
use console::style;
use greenchrom::models::{Reagent, SubFactor};
use greenchrom::reporters::OutputFormat;

/// Run the catalog command
pub fn run(workspace: &Workspace, format: &str) -> Result<()> {
    let reagents: Vec<&Reagent> = workspace.catalog.iter().collect();
    match format.parse::<OutputFormat>()? {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reagents)?),
        OutputFormat::Text => {
            let codes: Vec<String> = SubFactor::ALL.iter().map(|f| format!("{f:>5}")).collect();
            println!(
                "{}",
                style(format!(
                    "{:<24} {:>7} {:>5} {:>5} {}",
                    "REAGENT",
                    "DENSITY",
                    "REGEN",
                    "DISP",
                    codes.join("")
                ))
                .bold()
            );
            for reagent in reagents.iter().copied().chain(std::iter::once(workspace.catalog.fallback())) {
                let values: Vec<String> = SubFactor::ALL
                    .iter()
                    .map(|f| format!("{:>5.2}", reagent.sub_factor(*f)))
                    .collect();
                println!(
                    "{:<24} {:>7.3} {:>5.2} {:>5.2} {}",
                    reagent.name,
                    reagent.density,
                    reagent.regeneration,
                    reagent.disposal,
                    values.join("")
                );
            }
            println!(
                "\n{} reagents ({} used for unknown names)",
                style(reagents.len()).cyan(),
                style(&workspace.catalog.fallback().name).dim()
            );
        }
    }
    Ok(())
}
