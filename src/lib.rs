//! greenchrom - green chemistry footprint scoring for chromatography
//!
//! Scores a chromatographic method on six axes (Safety, Health,
//! Environment, Power, Recyclability, Disposal) plus a weighted composite,
//! from the reagents consumed during sample preparation and instrument
//! analysis.
//!
//! ```no_run
//! use greenchrom::catalog::ReagentCatalog;
//! use greenchrom::config::EngineConfig;
//! use greenchrom::method::MethodFile;
//!
//! # fn main() -> anyhow::Result<()> {
//! let catalog = ReagentCatalog::builtin()?;
//! let config = EngineConfig::default();
//! let method = MethodFile::load(std::path::Path::new("method.toml"))?;
//! let result = method.score(&catalog, &config)?;
//! println!("composite {:.1}", result.composite);
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod config;
pub mod method;
pub mod models;
pub mod reporters;
pub mod scoring;
