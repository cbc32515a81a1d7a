//! Stepper for handling step transitions through a manifest

use std::fmt;
use tracing::debug;

use super::listener::StepListener;
use crate::breadcrumb::{self, Breadcrumb};
use crate::manifest::{Manifest, ManifestError, StepDefinition};

/// Tracks progress through a manifest-declared process.
///
/// The current step is `None` once the final step has been left. Manifest
/// hooks and registered listeners fire exit-before-enter for each transition.
pub struct Stepper {
    manifest: Manifest,
    current: Option<String>,
    listeners: Vec<Box<dyn StepListener>>,
}

impl fmt::Debug for Stepper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stepper")
            .field("start", &self.manifest.start)
            .field("current", &self.current)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Builder used to register listeners before the initial step is entered
pub struct StepperBuilder {
    manifest: Manifest,
    listeners: Vec<Box<dyn StepListener>>,
}

impl StepperBuilder {
    pub fn listener(mut self, listener: impl StepListener + 'static) -> Self {
        self.listeners.push(Box::new(listener));
        self
    }

    /// Validate the manifest and enter its start step
    pub fn build(self) -> Result<Stepper, ManifestError> {
        self.manifest.validate()?;

        let start = self.manifest.start.clone();
        let stepper = Stepper {
            manifest: self.manifest,
            current: Some(start.clone()),
            listeners: self.listeners,
        };
        debug!(step = %start, "Stepper created");
        stepper.enter(&start);
        Ok(stepper)
    }
}

impl Stepper {
    /// Create a stepper positioned at the manifest's start step
    pub fn new(manifest: Manifest) -> Result<Self, ManifestError> {
        Self::builder(manifest).build()
    }

    pub fn builder(manifest: Manifest) -> StepperBuilder {
        StepperBuilder {
            manifest,
            listeners: Vec::new(),
        }
    }

    /// Register a listener for subsequent transitions
    pub fn subscribe(&mut self, listener: impl StepListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Identifier of the current step, `None` once the process is complete
    pub fn current_step(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Definition of the current step
    pub fn current_definition(&self) -> Option<&StepDefinition> {
        self.manifest.get_step(self.current.as_deref()?)
    }

    pub fn is_complete(&self) -> bool {
        self.current.is_none()
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Move to the next declared step. Does nothing once complete.
    pub fn advance(&mut self) -> Option<&str> {
        let Some(left) = self.current.take() else {
            debug!("Advance ignored, process already complete");
            return None;
        };

        self.current = self
            .manifest
            .get_step(&left)
            .and_then(|step| step.next.clone());

        debug!(from = %left, to = ?self.current, "Advancing step");
        self.exit(&left);
        if let Some(entered) = self.current.as_deref() {
            self.enter(entered);
        }

        self.current_step()
    }

    /// Return to the start step, re-entering it even if it is current
    pub fn reset(&mut self) {
        let start = self.manifest.start.clone();
        let left = self.current.replace(start.clone());

        debug!(from = ?left, to = %start, "Resetting stepper");
        if let Some(left) = left {
            self.exit(&left);
        }
        self.enter(&start);
    }

    /// Project the current progress into breadcrumb entries
    pub fn breadcrumb(&self) -> Result<Breadcrumb, ManifestError> {
        breadcrumb::project(&self.manifest, self.current_step())
    }

    fn enter(&self, step: &str) {
        if let Some(hook) = self.manifest.get_step(step).and_then(|s| s.on_enter.as_ref()) {
            hook.call();
        }
        for listener in &self.listeners {
            listener.on_enter(step);
        }
    }

    fn exit(&self, step: &str) {
        if let Some(hook) = self.manifest.get_step(step).and_then(|s| s.on_exit.as_ref()) {
            hook.call();
        }
        for listener in &self.listeners {
            listener.on_exit(step);
        }
    }
}
