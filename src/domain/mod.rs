//! Domain types of the checkout flow and the ports the orchestrator talks to.

pub mod confirmation;
pub mod form;
pub mod instrument;
pub mod notice;
pub mod payment_method;
pub mod ports;
pub mod submission;
