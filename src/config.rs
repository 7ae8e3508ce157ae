//! Name mapping configuration for rNGSI-Adapter
//!
//! Handles the table that renames vendor metric and dimension names into
//! NGSI attribute names, and its optional loading from YAML files.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error reading the mapping file
    #[error("Failed to read mapping file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Error parsing the mapping file
    #[error("Failed to parse mapping file: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Mapping validation error
    #[error("Invalid mapping: {0}")]
    ValidationError(String),
}

/// Built-in rename table for the canonical Monasca metric schema
static DEFAULT_MAPPINGS: Lazy<BTreeMap<String, String>> = Lazy::new(|| {
    [
        ("region.allocated_ip", "ipAvailable"),
        ("region.pool_ip", "ipTot"),
        ("region.used_ip", "ipUsed"),
        ("compute.node.cpu.percent", "cpuPct"),
        ("compute.node.cpu.now", "cpuNow"),
        ("compute.node.cpu.tot", "cpuTot"),
        ("compute.node.cpu.max", "cpuMax"),
        ("compute.node.ram.now", "ramNow"),
        ("compute.node.ram.tot", "ramTot"),
        ("compute.node.ram.max", "ramMax"),
        ("compute.node.disk.now", "diskNow"),
        ("compute.node.disk.tot", "diskTot"),
        ("compute.node.disk.max", "diskMax"),
        ("instance_type", "flavor"),
        ("image_ref", "image"),
        ("project_id", "tenant_id"),
        ("host", "host_id"),
        ("nid", "catalogue_ge_id"),
    ]
    .into_iter()
    .map(|(source, target)| (source.to_string(), target.to_string()))
    .collect()
});

/// Mapping between vendor metric/dimension names and NGSI attribute names
///
/// The table is read-only at run time; parsers receive it at construction
/// and never mutate it. Names without an entry pass through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameMapping {
    /// Source name to NGSI attribute name entries
    #[serde(default)]
    mappings: BTreeMap<String, String>,
}

impl Default for NameMapping {
    fn default() -> Self {
        Self {
            mappings: DEFAULT_MAPPINGS.clone(),
        }
    }
}

impl NameMapping {
    /// Create a mapping with no entries (every name passes through)
    pub fn empty() -> Self {
        Self {
            mappings: BTreeMap::new(),
        }
    }

    /// Create a mapping from explicit entries
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            mappings: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Resolve a name through the table, returning the input when unmapped
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        self.mappings.get(name).map(String::as_str).unwrap_or(name)
    }

    /// Exact lookup, `None` when the name has no entry
    pub fn target(&self, name: &str) -> Option<&str> {
        self.mappings.get(name).map(String::as_str)
    }

    /// Number of entries in the table
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    /// Check if the table has no entries
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Load a mapping table from a YAML file
    ///
    /// # Arguments
    /// * `path` - Path to the mapping file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed or validated
    ///
    /// # Note
    /// - If the file doesn't exist, returns `ConfigError::ReadError`
    /// - Use `NameMapping::load_or_default()` if you want fallback to the
    ///   built-in table
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mapping: NameMapping = serde_yaml::from_str(&contents)?;
        mapping.validate()?;
        Ok(mapping)
    }

    /// Load a mapping table from a YAML file, falling back to the built-in
    /// table if the file is not found
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!(
                path = %path.display(),
                "Mapping file not found, using built-in table"
            );
            return Ok(Self::default());
        }

        Self::load(path)
    }

    /// Validate the mapping table
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (source, target) in &self.mappings {
            if source.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "Mapping source names cannot be empty".to_string(),
                ));
            }
            if target.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "Mapping target for '{}' cannot be empty",
                    source
                )));
            }
        }
        Ok(())
    }
}
