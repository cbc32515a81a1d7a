//! Validation errors for step manifests

use thiserror::Error;

/// Reasons a manifest cannot drive a stepper or be projected into a breadcrumb
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManifestError {
    #[error("Manifest declares no steps")]
    EmptyManifest,

    #[error("Start step '{0}' is not declared in the manifest")]
    UnknownStart(String),

    #[error("Step '{step}' references unknown next step '{next}'")]
    UnknownNext { step: String, next: String },

    #[error("No root step found (every step is the next of another step)")]
    NoRoot,

    #[error("Ambiguous root: steps {0:?} are not referenced by any next")]
    AmbiguousRoot(Vec<String>),

    #[error("Step '{0}' is visited twice while walking from the root")]
    Cycle(String),

    #[error("Steps {0:?} are not reachable from the root")]
    Unreachable(Vec<String>),
}
