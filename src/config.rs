use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Switches between the tool's historical evaluation rules and stricter ones.
///
/// The defaults reproduce the historical behavior: `x ** 0 == x` and
/// dependencies detected by plain substring containment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Evaluate `**` as ordinary exponentiation (`x ** 0 == 1`).
    pub conventional_power: bool,
    /// Only record a dependency when the generic's name is a whole identifier.
    pub token_dependencies: bool,
}

impl ImportConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {:?}", path))?;
        serde_json::from_str(&content).context(format!("Invalid config file: {:?}", path))
    }
}
