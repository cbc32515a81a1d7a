//! Sale tunnel - manifest-driven step engine for checkout flows
//!
//! A [`manifest::Manifest`] declares the steps of a process. A
//! [`steps::Stepper`] walks it and fires lifecycle hooks, and
//! [`breadcrumb::project`] turns the same manifest plus the current step into
//! display records.

pub mod breadcrumb;
pub mod checkout;
pub mod config;
pub mod manifest;
pub mod steps;

pub use breadcrumb::{project, Breadcrumb, BreadcrumbEntry};
pub use manifest::{Manifest, ManifestError, StepDefinition};
pub use steps::{StepListener, Stepper};
