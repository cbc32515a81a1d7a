//! Purchase dialog driven by the validation → payment → resume manifest

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use super::session::{OrderCache, Session};
use crate::breadcrumb::Breadcrumb;
use crate::config::CheckoutConfig;
use crate::manifest::{Manifest, ManifestError, StepDefinition};
use crate::steps::{StepListener, Stepper};

pub const STEP_VALIDATION: &str = "validation";
pub const STEP_PAYMENT: &str = "payment";
pub const STEP_RESUME: &str = "resume";

/// Errors raised by the checkout tunnel
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Login required to purchase '{0}'")]
    LoginRequired(String),
    #[error("Sale tunnel is not open")]
    NotOpen,
    #[error("Invalid tunnel manifest: {0}")]
    Manifest(#[from] ManifestError),
}

/// Product offered through the tunnel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: String,
    pub title: String,
    pub call_to_action: String,
}

/// Build the three-step tunnel manifest.
///
/// `on_complete` runs when the final step is left.
pub fn tunnel_manifest(
    labels: &CheckoutConfig,
    on_complete: impl Fn() + Send + Sync + 'static,
) -> Result<Manifest, ManifestError> {
    Manifest::builder(STEP_VALIDATION)
        .step(
            STEP_VALIDATION,
            StepDefinition::to(STEP_PAYMENT)
                .icon("#icon-checklist")
                .label(&labels.validation_label),
        )
        .step(
            STEP_PAYMENT,
            StepDefinition::to(STEP_RESUME)
                .icon("#icon-creditCard")
                .label(&labels.payment_label),
        )
        .step(
            STEP_RESUME,
            StepDefinition::terminal()
                .icon("#icon-check")
                .label(&labels.resume_label)
                .on_exit(on_complete),
        )
        .build()
}

/// Purchase dialog for one product
pub struct SaleTunnel {
    product: Product,
    session: Arc<dyn Session>,
    stepper: Stepper,
    open: bool,
    completed: Arc<AtomicBool>,
}

impl SaleTunnel {
    /// Create a closed tunnel positioned at the validation step.
    ///
    /// Leaving the resume step refetches orders through `orders`.
    pub fn new(
        product: Product,
        session: Arc<dyn Session>,
        orders: Arc<dyn OrderCache>,
        labels: &CheckoutConfig,
    ) -> Result<Self, CheckoutError> {
        let completed = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&completed);
        let manifest = tunnel_manifest(labels, move || {
            orders.invalidate();
            flag.store(true, Ordering::SeqCst);
        })?;

        Ok(Self {
            product,
            session,
            stepper: Stepper::new(manifest)?,
            open: false,
            completed,
        })
    }

    /// Observe the tunnel's step transitions
    pub fn subscribe(&mut self, listener: impl StepListener + 'static) {
        self.stepper.subscribe(listener);
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn step(&self) -> Option<&str> {
        self.stepper.current_step()
    }

    pub fn breadcrumb(&self) -> Result<Breadcrumb, CheckoutError> {
        Ok(self.stepper.breadcrumb()?)
    }

    /// Open the dialog. Anonymous visitors are sent to login instead.
    pub fn open(&mut self) -> Result<(), CheckoutError> {
        if self.session.user().is_none() {
            info!(product = %self.product.id, "Login required before purchase");
            self.session.login();
            return Err(CheckoutError::LoginRequired(self.product.title.clone()));
        }

        self.open = true;
        debug!(product = %self.product.id, "Sale tunnel opened");
        Ok(())
    }

    /// Advance to the next step, closing the dialog once the tunnel is done
    pub fn next(&mut self) -> Result<Option<&str>, CheckoutError> {
        if !self.open {
            return Err(CheckoutError::NotOpen);
        }

        self.stepper.advance();
        if self.completed.swap(false, Ordering::SeqCst) {
            info!(product = %self.product.id, "Purchase completed");
            self.close();
        }

        Ok(self.stepper.current_step())
    }

    /// Close the dialog and rewind the tunnel
    pub fn close(&mut self) {
        self.stepper.reset();
        self.completed.store(false, Ordering::SeqCst);
        self.open = false;
        debug!(product = %self.product.id, "Sale tunnel closed");
    }
}
