//! Adapters implementing the domain ports without a browser.

pub mod in_memory;
pub mod scripted_sdk;
