//! Step management: driving a process through its manifest

pub mod listener;
pub mod stepper;

pub use listener::{StepListener, TracingListener};
pub use stepper::{Stepper, StepperBuilder};
