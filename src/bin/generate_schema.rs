//! Writes the JSON schema of the manifest file format.
//!
//! Usage: generate_schema [OUTPUT]  (defaults to stdout)

use anyhow::{Context, Result};
use std::path::PathBuf;

use sale_tunnel::manifest::Manifest;

fn main() -> Result<()> {
    let schema = Manifest::json_schema();
    let json = serde_json::to_string_pretty(&schema).context("Failed to serialize schema")?;

    match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            std::fs::write(&path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Wrote manifest schema to {}", path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}
