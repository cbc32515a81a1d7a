//! Step manifests: the declarative description of a step process

pub mod error;
pub mod loader;
pub mod schema;

pub use error::ManifestError;
pub use loader::{load_manifest, load_manifest_str, ManifestFormat};
pub use schema::{Manifest, ManifestBuilder, StepDefinition, StepHook};
