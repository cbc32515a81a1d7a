//! Breadcrumb projection of step progress
//!
//! A breadcrumb is derived from a manifest and the current step on every
//! query. The manifest's step map carries no order, so the canonical order is
//! rebuilt by walking `next` from the root each time.

pub mod render;

use serde::Serialize;
use tracing::warn;

use crate::manifest::{Manifest, ManifestError, StepDefinition};

pub use render::{render_line, BreadcrumbStyle};

/// Display state of the separator following a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Separator {
    pub active: bool,
}

/// Display record for one step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreadcrumbEntry {
    /// Zero-based position in canonical order
    pub index: usize,
    /// One-based number shown when the step has no icon
    pub position: usize,
    pub step_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Step is reached or passed
    pub active: bool,
    /// Step is the current one
    pub current: bool,
    /// Separator towards the next step (None for the last step)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub separator: Option<Separator>,
}

/// Ordered display records for a process
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    /// Position of the current step, `entries.len()` once complete
    pub active_index: Option<usize>,
    pub entries: Vec<BreadcrumbEntry>,
}

impl Breadcrumb {
    /// Entry marked as current, if any
    pub fn current(&self) -> Option<&BreadcrumbEntry> {
        self.entries.iter().find(|e| e.current)
    }

    pub fn active_count(&self) -> usize {
        self.entries.iter().filter(|e| e.active).count()
    }

    /// Check if every step has been passed
    pub fn is_complete(&self) -> bool {
        self.active_index == Some(self.entries.len())
    }

    pub fn step_ids(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.step_id.as_str()).collect()
    }
}

/// Position of the current step in canonical order.
///
/// The terminal marker maps to the number of steps so every step reads as
/// passed. An undeclared step has no position.
pub fn active_index(ordered: &[(&str, &StepDefinition)], current: Option<&str>) -> Option<usize> {
    match current {
        None => Some(ordered.len()),
        Some(step) => ordered.iter().position(|(id, _)| *id == step),
    }
}

/// Project a manifest and the current step into breadcrumb entries
pub fn project(manifest: &Manifest, current: Option<&str>) -> Result<Breadcrumb, ManifestError> {
    let ordered = manifest.ordered_steps()?;
    let active = active_index(&ordered, current);

    if active.is_none() {
        warn!(
            step = current.unwrap_or_default(),
            "Current step is not declared in the manifest, no step is active"
        );
    }

    let last = ordered.len().saturating_sub(1);
    let entries = ordered
        .iter()
        .enumerate()
        .map(|(index, (id, step))| BreadcrumbEntry {
            index,
            position: index + 1,
            step_id: (*id).to_string(),
            label: step.label.clone(),
            icon: step.icon.clone(),
            active: active.is_some_and(|a| index <= a),
            current: active == Some(index),
            separator: (index < last).then(|| Separator {
                active: active.is_some_and(|a| index < a),
            }),
        })
        .collect();

    Ok(Breadcrumb {
        active_index: active,
        entries,
    })
}
