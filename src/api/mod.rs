//! API Layer
//!
//! HTTP client wrapper and session/token state.

pub mod client;
pub mod session;
