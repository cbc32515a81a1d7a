//! Integration tests for the stepper and breadcrumb projector
//!
//! Exercises the public API the way a display layer does: build a manifest,
//! drive a stepper, and project its current step after every move.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use sale_tunnel::breadcrumb::project;
use sale_tunnel::manifest::{load_manifest_str, Manifest, ManifestFormat, StepDefinition};
use sale_tunnel::steps::{StepListener, Stepper};

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn scenario_manifest() -> Manifest {
    load_manifest_str(
        r#"{"start": "step0", "steps": {"step0": {"next": "step1"}, "step1": {"next": null}}}"#,
        ManifestFormat::Json,
    )
    .unwrap()
}

fn chain(len: usize, start: usize) -> Manifest {
    let mut builder = Manifest::builder(format!("s{start}"));
    for i in 0..len {
        let definition = if i + 1 == len {
            StepDefinition::terminal()
        } else {
            StepDefinition::to(format!("s{}", i + 1))
        };
        builder = builder.step(format!("s{i}"), definition.label(format!("Step {i}")));
    }
    builder.build().unwrap()
}

/// Counts transitions per direction
#[derive(Default)]
struct Counter {
    enters: AtomicUsize,
    exits: AtomicUsize,
}

struct Counting(Arc<Counter>);

impl StepListener for Counting {
    fn on_enter(&self, _step: &str) {
        self.0.enters.fetch_add(1, Ordering::SeqCst);
    }

    fn on_exit(&self, _step: &str) {
        self.0.exits.fetch_add(1, Ordering::SeqCst);
    }
}

// ─── Stepper ─────────────────────────────────────────────────────────────────

#[test]
fn starts_at_manifest_start() {
    for start in 0..4 {
        let manifest = chain(4, start);
        let stepper = Stepper::new(manifest.clone()).unwrap();
        assert_eq!(stepper.current_step(), Some(manifest.start.as_str()));
    }
}

#[test]
fn advance_follows_next_pointers() {
    let manifest = chain(5, 0);
    let mut stepper = Stepper::new(manifest.clone()).unwrap();

    while let Some(step) = stepper.current_step().map(str::to_string) {
        let expected = manifest.get_step(&step).unwrap().next.clone();
        stepper.advance();
        assert_eq!(stepper.current_step().map(str::to_string), expected);
    }
    assert!(stepper.is_complete());
}

#[test]
fn two_step_scenario() {
    let mut stepper = Stepper::new(scenario_manifest()).unwrap();
    assert_eq!(stepper.current_step(), Some("step0"));
    stepper.advance();
    assert_eq!(stepper.current_step(), Some("step1"));
    stepper.advance();
    assert_eq!(stepper.current_step(), None);
    stepper.advance();
    assert_eq!(stepper.current_step(), None);
}

#[test]
fn reset_always_returns_to_start() {
    let manifest = chain(3, 1);
    for moves in 0..4 {
        let mut stepper = Stepper::new(manifest.clone()).unwrap();
        for _ in 0..moves {
            stepper.advance();
        }
        stepper.reset();
        assert_eq!(stepper.current_step(), Some("s1"), "after {moves} moves");
    }
}

#[test]
fn each_reset_counts_one_exit_and_one_enter() {
    let counter = Arc::new(Counter::default());
    let mut stepper = Stepper::builder(scenario_manifest())
        .listener(Counting(Arc::clone(&counter)))
        .build()
        .unwrap();
    assert_eq!(counter.enters.load(Ordering::SeqCst), 1);

    for round in 1..=3 {
        stepper.reset();
        assert_eq!(counter.enters.load(Ordering::SeqCst), 1 + round);
        assert_eq!(counter.exits.load(Ordering::SeqCst), round);
    }
}

#[test]
fn hooks_from_manifest_and_listeners_agree() {
    let hook_enters = Arc::new(AtomicUsize::new(0));
    let counter = Arc::new(Counter::default());

    let enters = Arc::clone(&hook_enters);
    let manifest = Manifest::builder("a")
        .step(
            "a",
            StepDefinition::to("b").on_enter(move || {
                enters.fetch_add(1, Ordering::SeqCst);
            }),
        )
        .step("b", StepDefinition::terminal())
        .build()
        .unwrap();

    let mut stepper = Stepper::builder(manifest)
        .listener(Counting(Arc::clone(&counter)))
        .build()
        .unwrap();
    stepper.advance();
    stepper.advance();
    stepper.reset();

    assert_eq!(hook_enters.load(Ordering::SeqCst), 2);
    assert_eq!(counter.enters.load(Ordering::SeqCst), 3);
    assert_eq!(counter.exits.load(Ordering::SeqCst), 2);
}

// ─── Breadcrumb ──────────────────────────────────────────────────────────────

#[test]
fn breadcrumb_order_ignores_declaration_order() {
    let manifest = load_manifest_str(
        r#"{"start": "step1", "steps": {"step0": {"next": null}, "step1": {"next": "step0"}}}"#,
        ManifestFormat::Json,
    )
    .unwrap();
    let stepper = Stepper::new(manifest.clone()).unwrap();

    let crumb = project(&manifest, stepper.current_step()).unwrap();
    assert_eq!(crumb.step_ids(), vec!["step1", "step0"]);
    assert!(crumb.entries[0].current);
    assert!(!crumb.entries[1].active);
}

#[test]
fn breadcrumb_follows_stepper_to_completion() {
    let manifest = chain(4, 0);
    let mut stepper = Stepper::new(manifest.clone()).unwrap();

    for expected_index in 0..4 {
        let crumb = stepper.breadcrumb().unwrap();
        assert_eq!(crumb.active_index, Some(expected_index));
        assert_eq!(crumb.active_count(), expected_index + 1);
        assert_eq!(crumb.current().unwrap().index, expected_index);
        stepper.advance();
    }

    let crumb = project(&manifest, stepper.current_step()).unwrap();
    assert!(crumb.entries.iter().all(|e| e.active && !e.current));
}

#[test]
fn projected_order_covers_every_step_once() {
    for len in 1..6 {
        let manifest = chain(len, len / 2);
        let crumb = project(&manifest, None).unwrap();

        let ids = crumb.step_ids();
        let unique: HashSet<&str> = ids.iter().copied().collect();
        assert_eq!(ids.len(), manifest.len());
        assert_eq!(unique.len(), manifest.len());

        // Walking next pointers along the projection lands on each following entry
        for pair in ids.windows(2) {
            assert_eq!(
                manifest.get_step(pair[0]).unwrap().next.as_deref(),
                Some(pair[1])
            );
        }
        assert!(manifest.get_step(ids[ids.len() - 1]).unwrap().is_terminal());
    }
}
