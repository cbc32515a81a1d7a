//! Filesystem loading for step manifests
//!
//! Manifests can be written as JSON, YAML or TOML. The format is chosen from
//! the file extension. Loaded manifests never carry lifecycle hooks; callers
//! attach behaviour through step listeners instead.

use anyhow::{bail, Context, Result};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::debug;

use super::schema::Manifest;

/// Serialization formats accepted for manifest files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Json,
    Yaml,
    Toml,
}

impl ManifestFormat {
    /// Detect the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

impl fmt::Display for ManifestFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ManifestFormat::Json => "json",
            ManifestFormat::Yaml => "yaml",
            ManifestFormat::Toml => "toml",
        };
        f.write_str(s)
    }
}

/// Parse and validate a manifest from in-memory text
pub fn load_manifest_str(content: &str, format: ManifestFormat) -> Result<Manifest> {
    let manifest: Manifest = match format {
        ManifestFormat::Json => {
            serde_json::from_str(content).context("Failed to parse JSON manifest")?
        }
        ManifestFormat::Yaml => {
            serde_yaml::from_str(content).context("Failed to parse YAML manifest")?
        }
        ManifestFormat::Toml => toml::from_str(content).context("Failed to parse TOML manifest")?,
    };

    manifest.validate().context("Invalid manifest")?;
    Ok(manifest)
}

/// Load a manifest file, detecting its format from the extension
pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let Some(format) = ManifestFormat::from_path(path) else {
        bail!(
            "Unsupported manifest format: {} (expected .json, .yaml, .yml or .toml)",
            path.display()
        );
    };

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest file: {}", path.display()))?;

    let manifest = load_manifest_str(&content, format)
        .with_context(|| format!("Failed to load manifest: {}", path.display()))?;

    debug!(
        "Loaded {} manifest with {} steps from {}",
        format,
        manifest.len(),
        path.display()
    );
    Ok(manifest)
}
