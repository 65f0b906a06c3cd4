//! App Root Component
//!
//! Main application component with routing and global providers.

use gloo_timers::callback::Timeout;
use leptos::*;
use leptos_router::*;

use crate::api::{client, session};
use crate::components::{ChatWidget, Nav, Toast};
use crate::pages::{Admin, Complete, EventDetail, Events, Login, Summary};
use crate::state::global::{provide_global_state, GlobalState};

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    // Provide global state to all components
    provide_global_state();

    let state = use_context::<GlobalState>().expect("GlobalState not found");
    init_session(state);

    view! {
        <Router>
            <div class="min-h-screen bg-gray-900 text-white flex flex-col">
                // Navigation header
                <Nav />

                // Main content area
                <main class="flex-1 container mx-auto px-4 py-8 pb-24">
                    <Routes>
                        <Route path="/" view=Events />
                        <Route path="/events" view=Events />
                        <Route path="/events/:id" view=EventDetail />
                        <Route path="/login" view=Login />
                        <Route path="/complete" view=Complete />
                        <Route path="/summary" view=Summary />
                        <Route path="/admin" view=Admin />
                        <Route path="/*any" view=NotFound />
                    </Routes>
                </main>

                // Floating help widget
                <ChatWidget />

                // Toast notifications
                <Toast />
            </div>
        </Router>
    }
}

/// Restore the session on startup: load the profile for the stored token
/// and fetch the admin allow-list. A token the server no longer accepts
/// is discarded; an account that never finished signup is parked on the
/// completion page.
fn init_session(state: GlobalState) {
    if !session::is_authenticated() {
        state.profile_loaded.set(true);
        return;
    }
    spawn_local(async move {
        match client::fetch_auth_profile().await {
            Ok(profile) => {
                state.profile.set(Some(profile));
                state.ensure_admin_config().await;
            }
            Err(e) if e.to_lowercase().contains("complete signup") => {
                Timeout::new(500, move || {
                    if let Some(window) = web_sys::window() {
                        let _ = window.location().set_href("/complete");
                    }
                })
                .forget();
            }
            Err(e) if client::is_auth_error(&e) => {
                // Stale or revoked token
                session::clear_token();
            }
            Err(e) => {
                web_sys::console::warn_1(&format!("Profile load failed: {}", e).into());
            }
        }
        state.profile_loaded.set(true);
    });
}

/// 404 Not Found page
#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center min-h-[60vh] text-center">
            <div class="text-6xl mb-4">"🔍"</div>
            <h1 class="text-3xl font-bold mb-2">"Page Not Found"</h1>
            <p class="text-gray-400 mb-6">"The page you're looking for doesn't exist."</p>
            <A
                href="/"
                class="px-6 py-3 bg-blue-600 hover:bg-blue-700 rounded-lg font-medium transition-colors"
            >
                "Browse events"
            </A>
        </div>
    }
}
