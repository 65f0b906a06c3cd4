//! Regatta Portal
//!
//! Event-registration frontend built with Leptos (WASM).
//!
//! # Features
//!
//! - Event catalog with filters and search
//! - OTP-based login and signup completion
//! - Team registration with an inline member editor
//! - Registration summary and admin dashboard
//! - Floating FAQ/query chat widget
//!
//! # Architecture
//!
//! This is a client-side rendered (CSR) Leptos application that compiles to
//! WebAssembly. It talks to the portal backend over its `/api` HTTP surface
//! and keeps session state in a bearer token plus an `auth_token` cookie.

use leptos::*;

mod api;
mod app;
mod components;
mod pages;
mod state;
mod utils;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    // Mount the app to the document body
    mount_to_body(|| view! { <app::App /> });
}
