//! Schema definitions for step manifests

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use super::error::ManifestError;

/// Zero-argument callback fired when a step is entered or exited
#[derive(Clone)]
pub struct StepHook(Arc<dyn Fn() + Send + Sync>);

impl StepHook {
    pub fn new(callback: impl Fn() + Send + Sync + 'static) -> Self {
        Self(Arc::new(callback))
    }

    pub fn call(&self) {
        (self.0)();
    }
}

impl fmt::Debug for StepHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StepHook(..)")
    }
}

/// Declarative description of a linear step process
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Manifest {
    /// Step the process starts at
    pub start: String,
    /// Step definitions keyed by step identifier
    pub steps: HashMap<String, StepDefinition>,
}

/// Schema definition for a single step
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct StepDefinition {
    /// Identifier of the following step (None for the final step)
    #[serde(default)]
    pub next: Option<String>,
    /// Icon reference shown by display layers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Human-readable step label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip)]
    pub on_enter: Option<StepHook>,
    #[serde(skip)]
    pub on_exit: Option<StepHook>,
}

impl StepDefinition {
    /// A step followed by `next`
    pub fn to(next: impl Into<String>) -> Self {
        Self {
            next: Some(next.into()),
            ..Self::default()
        }
    }

    /// The final step of a process
    pub fn terminal() -> Self {
        Self::default()
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn on_enter(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_enter = Some(StepHook::new(callback));
        self
    }

    pub fn on_exit(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_exit = Some(StepHook::new(callback));
        self
    }

    /// Check if this step ends the process
    pub fn is_terminal(&self) -> bool {
        self.next.is_none()
    }
}

/// Incremental construction of a validated manifest
#[derive(Debug)]
pub struct ManifestBuilder {
    start: String,
    steps: HashMap<String, StepDefinition>,
}

impl ManifestBuilder {
    pub fn step(mut self, id: impl Into<String>, definition: StepDefinition) -> Self {
        self.steps.insert(id.into(), definition);
        self
    }

    pub fn build(self) -> Result<Manifest, ManifestError> {
        let manifest = Manifest {
            start: self.start,
            steps: self.steps,
        };
        manifest.validate()?;
        Ok(manifest)
    }
}

impl Manifest {
    pub fn builder(start: impl Into<String>) -> ManifestBuilder {
        ManifestBuilder {
            start: start.into(),
            steps: HashMap::new(),
        }
    }

    /// Parse a manifest from JSON without validating it
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// JSON schema of the manifest file format
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Manifest)
    }

    /// Get step by identifier
    pub fn get_step(&self, id: &str) -> Option<&StepDefinition> {
        self.steps.get(id)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Validate the manifest for consistency
    pub fn validate(&self) -> Result<(), ManifestError> {
        self.ordered_steps().map(|_| ())
    }

    /// Find the root: the only step that is not the `next` of another step
    pub fn root(&self) -> Result<&str, ManifestError> {
        if self.steps.is_empty() {
            return Err(ManifestError::EmptyManifest);
        }

        let referenced: HashSet<&str> = self
            .steps
            .values()
            .filter_map(|step| step.next.as_deref())
            .collect();

        let mut roots: Vec<&str> = self
            .steps
            .keys()
            .map(String::as_str)
            .filter(|id| !referenced.contains(id))
            .collect();

        match roots.len() {
            0 => Err(ManifestError::NoRoot),
            1 => Ok(roots[0]),
            _ => {
                roots.sort_unstable();
                Err(ManifestError::AmbiguousRoot(
                    roots.into_iter().map(str::to_string).collect(),
                ))
            }
        }
    }

    /// Reconstruct the canonical step order by walking `next` from the root
    pub fn ordered_steps(&self) -> Result<Vec<(&str, &StepDefinition)>, ManifestError> {
        if self.steps.is_empty() {
            return Err(ManifestError::EmptyManifest);
        }
        if !self.steps.contains_key(&self.start) {
            return Err(ManifestError::UnknownStart(self.start.clone()));
        }

        // Sorted so the reported dangling reference does not depend on hash order
        let mut ids: Vec<&String> = self.steps.keys().collect();
        ids.sort_unstable();
        for id in ids {
            if let Some(next) = self.steps.get(id).and_then(|s| s.next.as_ref()) {
                if !self.steps.contains_key(next) {
                    return Err(ManifestError::UnknownNext {
                        step: id.clone(),
                        next: next.clone(),
                    });
                }
            }
        }

        let root = self.root()?;
        let mut ordered = Vec::with_capacity(self.steps.len());
        let mut visited = HashSet::new();
        let mut cursor = Some(root);

        while let Some(id) = cursor {
            if !visited.insert(id) {
                return Err(ManifestError::Cycle(id.to_string()));
            }
            let Some((key, definition)) = self.steps.get_key_value(id) else {
                return Err(ManifestError::UnknownStart(id.to_string()));
            };
            ordered.push((key.as_str(), definition));
            cursor = definition.next.as_deref();
        }

        if ordered.len() != self.steps.len() {
            let mut unreachable: Vec<String> = self
                .steps
                .keys()
                .filter(|id| !visited.contains(id.as_str()))
                .cloned()
                .collect();
            unreachable.sort_unstable();
            return Err(ManifestError::Unreachable(unreachable));
        }

        Ok(ordered)
    }

    /// Step identifiers in canonical order
    pub fn step_order(&self) -> Result<Vec<&str>, ManifestError> {
        Ok(self.ordered_steps()?.into_iter().map(|(id, _)| id).collect())
    }
}
