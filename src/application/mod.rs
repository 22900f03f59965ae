//! Application layer containing the checkout orchestration.
//!
//! `CheckoutOrchestrator` intercepts form submissions and runs intent
//! confirmation against the domain ports. `CheckoutSession` owns the
//! submission state of one page and dispatches browser events to it.

pub mod authentication;
pub mod orchestrator;
pub mod session;
