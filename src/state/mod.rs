//! State Management
//!
//! Global application state and the inline registration editor.

pub mod editor;
pub mod global;

pub use global::{provide_global_state, GlobalState};
