//! Navigation Component
//!
//! Header navigation bar with auth-aware links, an admin-only entry,
//! and a collapsible mobile menu.

use gloo_timers::callback::Timeout;
use leptos::*;
use leptos_router::*;

use crate::api::{client, session};
use crate::state::global::GlobalState;

/// Navigation header component
#[component]
pub fn Nav() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let (menu_open, set_menu_open) = create_signal(false);

    let authenticated = create_memo(move |_| {
        // Reading the profile keeps this reactive to login/logout
        state.profile.get().is_some() || session::is_authenticated()
    });
    let is_admin = create_memo(move |_| state.is_admin());
    let display_name = create_memo(move |_| {
        state
            .profile
            .get()
            .and_then(|p| p.name)
            .or_else(|| session::current_user().and_then(|claims| claims.name))
    });

    let navigate = use_navigate();
    let logout = Callback::new(move |_: ()| {
        set_menu_open.set(false);
        let navigate = navigate.clone();
        spawn_local(async move {
            if let Err(e) = client::logout().await {
                web_sys::console::warn_1(&format!("Logout request failed: {}", e).into());
            }
            session::clear_token();
            state.profile.set(None);
            state.show_success("Logged out");
            Timeout::new(300, move || navigate("/", Default::default())).forget();
        });
    });

    view! {
        <nav class="bg-gray-800 border-b border-gray-700">
            <div class="container mx-auto px-4">
                <div class="flex items-center justify-between h-16">
                    // Logo and brand
                    <A href="/" class="flex items-center space-x-3">
                        <span class="text-2xl">"⛵"</span>
                        <span class="text-xl font-bold text-white">"Regatta"</span>
                    </A>

                    // Desktop links; auth-dependent entries wait for the
                    // session restore so Login does not flash for users
                    // who are already signed in
                    <div class="hidden md:flex items-center space-x-1">
                        <NavLink href="/events" label="Events" />
                        {move || authenticated.get().then(|| view! {
                            <NavLink href="/summary" label="My Summary" />
                        })}
                        {move || is_admin.get().then(|| view! {
                            <NavLink href="/admin" label="Admin" />
                        })}
                        {move || display_name.get().map(|name| view! {
                            <span class="px-2 text-sm text-gray-400">{name}</span>
                        })}
                        {move || {
                            if !state.profile_loaded.get() && !authenticated.get() {
                                view! {}.into_view()
                            } else if authenticated.get() {
                                view! {
                                    <button
                                        class="ml-2 px-4 py-2 rounded-lg text-gray-300 hover:text-white hover:bg-gray-700 transition-colors"
                                        on:click=move |_| logout.call(())
                                    >
                                        "Logout"
                                    </button>
                                }.into_view()
                            } else {
                                view! { <NavLink href="/login" label="Login" /> }.into_view()
                            }
                        }}
                    </div>

                    // Mobile menu toggle
                    <button
                        class="md:hidden p-2 rounded-lg text-gray-300 hover:bg-gray-700"
                        on:click=move |_| set_menu_open.update(|open| *open = !*open)
                    >
                        {move || if menu_open.get() { "✕" } else { "☰" }}
                    </button>
                </div>
            </div>

            // Mobile menu panel
            {move || menu_open.get().then(|| view! {
                <div
                    class="md:hidden border-t border-gray-700 px-4 py-3 space-y-1"
                    on:click=move |_| set_menu_open.set(false)
                >
                    <NavLink href="/events" label="Events" />
                    {authenticated.get().then(|| view! {
                        <NavLink href="/summary" label="My Summary" />
                    })}
                    {is_admin.get().then(|| view! {
                        <NavLink href="/admin" label="Admin" />
                    })}
                    {if authenticated.get() {
                        view! {
                            <button
                                class="block w-full text-left px-4 py-2 rounded-lg text-gray-300 hover:bg-gray-700"
                                on:click=move |_| logout.call(())
                            >
                                "Logout"
                            </button>
                        }.into_view()
                    } else {
                        view! { <NavLink href="/login" label="Login" /> }.into_view()
                    }}
                </div>
            })}
        </nav>
    }
}

/// Individual navigation link
#[component]
fn NavLink(
    href: &'static str,
    label: &'static str,
) -> impl IntoView {
    view! {
        <A
            href=href
            class="block md:inline-block px-4 py-2 rounded-lg text-gray-300 hover:text-white hover:bg-gray-700 transition-colors"
            active_class="bg-gray-700 text-white"
        >
            {label}
        </A>
    }
}
