//! Plain-text rendering of breadcrumbs for terminal output

use super::{Breadcrumb, BreadcrumbEntry};
use crate::config::BreadcrumbConfig;

/// Markers used when rendering a breadcrumb as a single line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreadcrumbStyle {
    pub separator: String,
    pub current_marker: String,
    pub active_marker: String,
    pub pending_marker: String,
}

impl From<&BreadcrumbConfig> for BreadcrumbStyle {
    fn from(config: &BreadcrumbConfig) -> Self {
        Self {
            separator: config.separator.clone(),
            current_marker: config.current_marker.clone(),
            active_marker: config.active_marker.clone(),
            pending_marker: config.pending_marker.clone(),
        }
    }
}

impl Default for BreadcrumbStyle {
    fn default() -> Self {
        Self::from(&BreadcrumbConfig::default())
    }
}

fn entry_text(entry: &BreadcrumbEntry, style: &BreadcrumbStyle) -> String {
    let marker = if entry.current {
        &style.current_marker
    } else if entry.active {
        &style.active_marker
    } else {
        &style.pending_marker
    };

    match entry.label.as_deref() {
        Some(label) => format!("{marker} {label}"),
        None => format!("{marker} {}", entry.position),
    }
}

/// Render a breadcrumb as one line.
/// Returns something like: "● Validation ── ▶ Payment ── ○ Resume"
pub fn render_line(breadcrumb: &Breadcrumb, style: &BreadcrumbStyle) -> String {
    let mut line = String::new();
    for entry in &breadcrumb.entries {
        line.push_str(&entry_text(entry, style));
        if entry.separator.is_some() {
            line.push_str(&style.separator);
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breadcrumb::project;
    use crate::manifest::{Manifest, StepDefinition};

    fn style() -> BreadcrumbStyle {
        BreadcrumbStyle {
            separator: " > ".to_string(),
            current_marker: "[x]".to_string(),
            active_marker: "[v]".to_string(),
            pending_marker: "[ ]".to_string(),
        }
    }

    fn manifest() -> Manifest {
        Manifest::builder("validation")
            .step("validation", StepDefinition::to("payment").label("Validation"))
            .step("payment", StepDefinition::to("resume").label("Payment"))
            .step("resume", StepDefinition::terminal())
            .build()
            .unwrap()
    }

    #[test]
    fn test_render_current_step() {
        let crumb = project(&manifest(), Some("payment")).unwrap();
        assert_eq!(
            render_line(&crumb, &style()),
            "[v] Validation > [x] Payment > [ ] 3"
        );
    }

    #[test]
    fn test_render_complete() {
        let crumb = project(&manifest(), None).unwrap();
        assert_eq!(
            render_line(&crumb, &style()),
            "[v] Validation > [v] Payment > [v] 3"
        );
    }

    #[test]
    fn test_default_style_uses_config_defaults() {
        let style = BreadcrumbStyle::default();
        assert_eq!(style.separator, BreadcrumbConfig::default().separator);
    }
}
