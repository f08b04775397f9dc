//! Schemes command - list scheme names and weights

use anyhow::Result;
use console::style;
use greenchrom::reporters::OutputFormat;
use greenchrom::scoring::{registry, SchemeListing};

/// Run the schemes command
pub fn run(format: &str) -> Result<()> {
    let rows = registry();
    match format.parse::<OutputFormat>()? {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Text => print_text(&rows),
    }
    Ok(())
}

fn print_text(rows: &[SchemeListing]) {
    let mut current_kind = "";
    for row in rows {
        if row.kind != current_kind {
            println!("\n{}", style(row.kind.to_uppercase()).bold());
            current_kind = row.kind.as_str();
        }
        let detail = if row.weights.is_empty() {
            row.note.unwrap_or_default().to_string()
        } else {
            row.weights
                .iter()
                .map(|(label, w)| format!("{label} {w:.3}"))
                .collect::<Vec<_>>()
                .join("  ")
        };
        println!("  {:<24} {}", style(row.name).cyan(), style(detail).dim());
    }
}
