//! Checkout tunnel: the purchase dialog built on the stepper
//!
//! Session and order-cache handles are passed in explicitly; the tunnel never
//! reaches for application-wide state.

pub mod session;
pub mod tunnel;

pub use session::{OrderCache, Session, User};
pub use tunnel::{
    tunnel_manifest, CheckoutError, Product, SaleTunnel, STEP_PAYMENT, STEP_RESUME,
    STEP_VALIDATION,
};
