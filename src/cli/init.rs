//! Init command - write an example engine configuration

use anyhow::{Context, Result};
use console::style;
use greenchrom::config::CONFIG_FILE_NAME;

const EXAMPLE_CONFIG: &str = r#"# greenchrom engine configuration
# Every section is optional; tables are merged over the built-in defaults.

[energy]
# P = 0 at or below this energy per run (kWh)
low_kwh = 0.1
# P = 100 at or above this energy per run (kWh)
high_kwh = 1.5

[power_kw]
# Instrument class -> rated power (kW)
low = 0.5
standard = 1.0
high = 2.0

[baseline_mass_g]
# Chromatography class -> typical reagent consumption per run (g)
UPCC = 4.0
UPLC = 4.0
SFC = 4.0
HPLC_MS = 10.0
HPLC_UV = 45.0
Semi_prep = 250.0
PrepHPLC = 250.0

[rd]
# "baseline": min(sum / baseline, 1) x 100
# "logarithmic": min(45 x log10(1 + 14 x sum), 100)
normalization = "baseline"

[defaults.schemes]
# Used when a method file leaves a scheme out
safety = "PBT_Balanced"
health = "Absolute_Balance"
environment = "PBT_Balanced"
stage_merge = "Balanced"
final_composite = "Standard"
"#;

/// Run the init command
pub fn run(force: bool) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to read working directory")?;
    let config_path = cwd.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        println!(
            "{} Already exists: {} (use --force to overwrite)",
            style("✓").green(),
            style(config_path.display()).cyan()
        );
        return Ok(());
    }

    std::fs::write(&config_path, EXAMPLE_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!(
        "{} Created {}",
        style("✓").green(),
        style(config_path.display()).cyan()
    );
    Ok(())
}
