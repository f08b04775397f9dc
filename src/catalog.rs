//! Reagent reference data
//!
//! The catalog is immutable once built and is handed to the scoring engine
//! by reference, so concurrent scoring calls can share one instance.
//!
//! # Catalog format
//!
//! ```toml
//! [fallback]               # optional, replaces the neutral 0.5 entry
//! density = 1.0
//! regeneration = 0.5
//! disposal = 0.5
//! sub_factors = { S1 = 0.5, S2 = 0.5 }
//!
//! [reagents.Methanol]
//! density = 0.791
//! regeneration = 0.6
//! disposal = 0.7
//! sub_factors = { S1 = 0.6, S2 = 0.8, S3 = 0.2, S4 = 0.3, H1 = 0.4, H2 = 0.5, E1 = 0.3, E2 = 0.2, E3 = 0.1 }
//! ```

use crate::models::{Reagent, SubFactor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Built-in catalog shipped with the binary
const BUILTIN_CATALOG: &str = include_str!("../data/reagents.toml");

const FALLBACK_NAME: &str = "(unknown reagent)";

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML catalog: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to parse JSON catalog: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid reagent '{reagent}': {reason}")]
    InvalidReagent { reagent: String, reason: String },
}

/// Reagent properties as written in a catalog or method file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReagentSpec {
    /// g/mL
    pub density: f64,
    /// Sub-factor code (`S1`..`E3`) → value in [0,1]
    #[serde(default)]
    pub sub_factors: BTreeMap<String, f64>,
    #[serde(default)]
    pub regeneration: f64,
    #[serde(default)]
    pub disposal: f64,
}

impl ReagentSpec {
    pub fn into_reagent(self, name: &str) -> Result<Reagent, CatalogError> {
        let invalid = |reason: String| CatalogError::InvalidReagent {
            reagent: name.to_string(),
            reason,
        };
        let mut sub_factors = BTreeMap::new();
        for (code, value) in self.sub_factors {
            let factor: SubFactor = code.parse().map_err(invalid)?;
            sub_factors.insert(factor, value);
        }
        let reagent = Reagent {
            name: name.to_string(),
            density: self.density,
            sub_factors,
            regeneration: self.regeneration,
            disposal: self.disposal,
        };
        validate_reagent(&reagent).map_err(invalid)?;
        Ok(reagent)
    }
}

/// Check density and factor ranges
pub fn validate_reagent(reagent: &Reagent) -> Result<(), String> {
    if !reagent.density.is_finite() || reagent.density <= 0.0 {
        return Err(format!("density must be > 0 g/mL, got {}", reagent.density));
    }
    let unit = |label: &str, v: f64| {
        if v.is_finite() && (0.0..=1.0).contains(&v) {
            Ok(())
        } else {
            Err(format!("{label} must be within [0, 1], got {v}"))
        }
    };
    unit("regeneration", reagent.regeneration)?;
    unit("disposal", reagent.disposal)?;
    for (factor, value) in &reagent.sub_factors {
        unit(&format!("sub-factor {factor}"), *value)?;
    }
    Ok(())
}

#[derive(Debug, Deserialize, Default)]
struct CatalogFile {
    #[serde(default)]
    fallback: Option<ReagentSpec>,
    #[serde(default)]
    reagents: BTreeMap<String, ReagentSpec>,
}

/// Name-keyed reagent lookup with a neutral fallback
#[derive(Debug, Clone)]
pub struct ReagentCatalog {
    reagents: BTreeMap<String, Reagent>,
    fallback: Reagent,
    custom_fallback: bool,
}

impl Default for ReagentCatalog {
    fn default() -> Self {
        Self {
            reagents: BTreeMap::new(),
            fallback: Reagent::neutral(FALLBACK_NAME),
            custom_fallback: false,
        }
    }
}

impl ReagentCatalog {
    /// Empty catalog: every lookup resolves to the neutral entry
    pub fn new() -> Self {
        Self::default()
    }

    /// The catalog embedded in the binary
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_toml_str(BUILTIN_CATALOG)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(content)?;
        Self::from_file(file)
    }

    pub fn from_json_str(content: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(content)?;
        Self::from_file(file)
    }

    /// Load a catalog file, JSON if the extension says so, TOML otherwise
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        let catalog = if is_json {
            Self::from_json_str(&content)?
        } else {
            Self::from_toml_str(&content)?
        };
        debug!("Loaded {} reagents from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    fn from_file(file: CatalogFile) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        if let Some(spec) = file.fallback {
            catalog.fallback = spec.into_reagent(FALLBACK_NAME)?;
            catalog.custom_fallback = true;
        }
        for (name, spec) in file.reagents {
            let reagent = spec.into_reagent(&name)?;
            catalog.put(reagent);
        }
        Ok(catalog)
    }

    /// Add or replace one reagent
    pub fn insert(&mut self, reagent: Reagent) -> Result<(), CatalogError> {
        validate_reagent(&reagent).map_err(|reason| CatalogError::InvalidReagent {
            reagent: reagent.name.clone(),
            reason,
        })?;
        self.put(reagent);
        Ok(())
    }

    /// Insert under the reagent's own spelling, dropping any entry whose name
    /// differs only in ASCII case
    fn put(&mut self, reagent: Reagent) {
        self.reagents
            .retain(|name, _| !name.eq_ignore_ascii_case(&reagent.name));
        self.reagents.insert(reagent.name.clone(), reagent);
    }

    /// Layer `other` on top of this catalog; its entries win, whatever
    /// their letter case
    pub fn merge(&mut self, other: ReagentCatalog) {
        if other.custom_fallback {
            self.fallback = other.fallback;
            self.custom_fallback = true;
        }
        for reagent in other.reagents.into_values() {
            self.put(reagent);
        }
    }

    /// Copy of this catalog with per-method reagent overrides applied
    pub fn with_overrides(
        &self,
        overrides: &BTreeMap<String, ReagentSpec>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = self.clone();
        for (name, spec) in overrides {
            let reagent = spec.clone().into_reagent(name)?;
            catalog.put(reagent);
        }
        Ok(catalog)
    }

    /// Exact match first, then ASCII case-insensitive
    pub fn get(&self, name: &str) -> Option<&Reagent> {
        self.reagents.get(name).or_else(|| {
            self.reagents
                .values()
                .find(|r| r.name.eq_ignore_ascii_case(name))
        })
    }

    /// Never fails: unknown names resolve to the fallback entry
    pub fn lookup(&self, name: &str) -> &Reagent {
        self.get(name).unwrap_or(&self.fallback)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn fallback(&self) -> &Reagent {
        &self.fallback
    }

    pub fn iter(&self) -> impl Iterator<Item = &Reagent> {
        self.reagents.values()
    }

    pub fn len(&self) -> usize {
        self.reagents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reagents.is_empty()
    }
}
