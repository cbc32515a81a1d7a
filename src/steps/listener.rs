//! Observers notified of step transitions

use tracing::info;

/// Receives step transitions from a [`Stepper`](super::Stepper).
///
/// For a single transition every `on_exit` notification is delivered before
/// any `on_enter` notification. Calls happen synchronously, before `advance`
/// or `reset` returns.
pub trait StepListener: Send + Sync {
    /// Called when `step` becomes the current step
    fn on_enter(&self, _step: &str) {}

    /// Called when `step` stops being the current step
    fn on_exit(&self, _step: &str) {}
}

/// Logs every transition through `tracing`
#[derive(Debug, Default, Clone)]
pub struct TracingListener {
    /// Name of the process, attached to each event
    pub process: String,
}

impl TracingListener {
    pub fn new(process: impl Into<String>) -> Self {
        Self {
            process: process.into(),
        }
    }
}

impl StepListener for TracingListener {
    fn on_enter(&self, step: &str) {
        info!(process = %self.process, step, "Entered step");
    }

    fn on_exit(&self, step: &str) {
        info!(process = %self.process, step, "Exited step");
    }
}
