//! CLI command definitions and handlers

mod batch;
mod catalog;
mod init;
mod schemes;
mod score;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use greenchrom::catalog::ReagentCatalog;
use greenchrom::config::{load_engine_config, EngineConfig};
use std::path::{Path, PathBuf};
use tracing::debug;

/// greenchrom - green chemistry footprint of chromatographic methods
#[derive(Parser, Debug)]
#[command(name = "greenchrom")]
#[command(
    version,
    about = "Score the green chemistry footprint of chromatographic methods on six axes",
    long_about = "Scores a chromatographic method from the reagents it consumes during \
sample preparation and instrument analysis. Produces Safety, Health, Environment, \
Power, Recyclability and Disposal axes (0-100, higher is a larger footprint) and a \
weighted composite.",
    after_help = "\
Examples:
  greenchrom score method.toml                 Score one method
  greenchrom score method.json --format json   JSON output for scripting
  greenchrom batch methods/*.toml              Score many methods in parallel
  greenchrom schemes                           List scheme names and weights
  greenchrom catalog --catalog extra.toml      Show the effective reagent catalog
  greenchrom init                              Write an example greenchrom.toml"
)]
pub struct Cli {
    /// Engine config file (default: ./greenchrom.toml if present)
    #[arg(long, global = true, env = "GREENCHROM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Extra reagent catalog (TOML or JSON) layered over the built-in one
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score one method file
    #[command(after_help = "\
Examples:
  greenchrom score method.toml
  greenchrom score method.toml --format json -o result.json")]
    Score {
        /// Method file (TOML or JSON)
        method: PathBuf,

        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Score many method files in parallel
    Batch {
        /// Method files (TOML or JSON)
        #[arg(required = true)]
        methods: Vec<PathBuf>,

        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// List every scheme name per kind with its weights
    Schemes {
        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// List the effective reagent catalog
    Catalog {
        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// Write an example greenchrom.toml into the working directory
    Init {
        /// Overwrite an existing greenchrom.toml
        #[arg(long)]
        force: bool,
    },
}

/// Configuration and catalog shared by every command
pub struct Workspace {
    pub config: EngineConfig,
    pub catalog: ReagentCatalog,
}

impl Workspace {
    fn load(config: Option<&Path>, catalog: Option<&Path>) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to read working directory")?;
        let config = load_engine_config(config, &cwd).context("Failed to load engine config")?;

        let mut reagents = ReagentCatalog::builtin().context("Built-in reagent catalog is invalid")?;
        if let Some(path) = catalog {
            let extra = ReagentCatalog::from_path(path)
                .with_context(|| format!("Failed to load catalog {}", path.display()))?;
            debug!("Layering {} reagents from {}", extra.len(), path.display());
            reagents.merge(extra);
        }

        Ok(Self {
            config,
            catalog: reagents,
        })
    }
}

/// Write to a file, or print to stdout
pub(crate) fn emit(content: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            print!("{content}");
            if !content.ends_with('\n') {
                println!();
            }
            Ok(())
        }
    }
}

/// Run the CLI command
pub fn run(cli: Cli) -> Result<()> {
    let workspace = || Workspace::load(cli.config.as_deref(), cli.catalog.as_deref());

    match &cli.command {
        Commands::Score {
            method,
            format,
            output,
        } => score::run(&workspace()?, method, format, output.as_deref()),

        Commands::Batch {
            methods,
            format,
            output,
        } => batch::run(&workspace()?, methods, format, output.as_deref()),

        Commands::Schemes { format } => schemes::run(format),

        Commands::Catalog { format } => catalog::run(&workspace()?, format),

        Commands::Init { force } => init::run(*force),
    }
}
