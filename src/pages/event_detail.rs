//! Event Detail Page
//!
//! Full description of one event plus the inline registration editor.
//! The event is addressed by id or name slug, taken from the route path
//! or, for old bookmarked links, the `?id=` query parameter.

use gloo_timers::callback::Timeout;
use leptos::*;
use leptos_router::*;

use crate::api::{client, session};
use crate::components::{Loading, MemberEditorPanel};
use crate::state::editor::MemberEditor;
use crate::state::global::{Event, GlobalState};
use crate::utils::{
    format_date, format_eligibility, format_event_mode, format_participants,
};

/// Event detail page
#[component]
pub fn EventDetail() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let params = use_params_map();
    let query = use_query_map();
    let navigate = use_navigate();

    let event_id = create_memo(move |_| {
        params
            .with(|p| p.get("id").cloned())
            .or_else(|| query.with(|q| q.get("id").cloned()))
            .unwrap_or_default()
    });

    let (event, set_event) = create_signal(None::<Event>);
    let (loading, set_loading) = create_signal(true);
    let editor = create_rw_signal(None::<MemberEditor>);
    let (opening, set_opening) = create_signal(false);

    create_effect(move |_| {
        let id = event_id.get();
        if id.is_empty() {
            set_loading.set(false);
            return;
        }
        set_loading.set(true);
        editor.set(None);
        spawn_local(async move {
            let found = match client::fetch_event(&id).await {
                Ok(event) => Some(event),
                Err(e) => {
                    web_sys::console::warn_1(
                        &format!("Event API unavailable, using fallback: {}", e).into(),
                    );
                    client::fetch_fallback_events()
                        .await
                        .ok()
                        .and_then(|events| {
                            events.into_iter().find(|ev| {
                                ev.key() == id || ev.id.as_deref() == Some(id.as_str())
                            })
                        })
                }
            };
            if found.is_none() {
                state.show_error("Event not found");
            }
            set_event.set(found);
            set_loading.set(false);
        });
    });

    let open_editor = {
        let navigate = navigate.clone();
        move |current: Event| {
            if !session::is_authenticated() {
                state.show_error("Please log in to register");
                let navigate = navigate.clone();
                Timeout::new(1000, move || navigate("/login", Default::default())).forget();
                return;
            }
            set_opening.set(true);
            spawn_local(async move {
                // Seed from the existing registration, if there is one
                let existing = match client::fetch_summary().await {
                    Ok(registrations) => registrations
                        .into_iter()
                        .find(|reg| reg.is_for_event(&current)),
                    Err(e) => {
                        web_sys::console::warn_1(
                            &format!("Could not load existing registration: {}", e).into(),
                        );
                        None
                    }
                };
                let capacity = existing
                    .as_ref()
                    .and_then(|reg| reg.capacity)
                    .unwrap_or(current.participants);
                let members = existing.map(|reg| reg.team_members).unwrap_or_default();
                editor.set(Some(MemberEditor::open(&members, capacity)));
                set_opening.set(false);
            });
        }
    };

    let on_saved = {
        let navigate = navigate.clone();
        Callback::new(move |_| {
            let navigate = navigate.clone();
            Timeout::new(600, move || navigate("/summary", Default::default())).forget();
        })
    };

    view! {
        <div class="max-w-3xl mx-auto space-y-6">
            <A href="/events" class="text-sm text-blue-400 hover:text-blue-300">
                "← Back to events"
            </A>

            {move || {
                if loading.get() {
                    return view! { <Loading /> }.into_view();
                }
                let Some(ev) = event.get() else {
                    return view! {
                        <p class="text-gray-500 text-center py-12">"Event not found"</p>
                    }.into_view();
                };
                let ev_for_open = ev.clone();
                let open_editor = open_editor.clone();
                view! {
                    <div class="bg-gray-800 rounded-lg overflow-hidden">
                        {ev.image.clone().map(|src| view! {
                            <img class="w-full h-64 object-cover" src=src alt=ev.name.clone() />
                        })}
                        <div class="p-6 space-y-4">
                            <div>
                                <h1 class="text-2xl font-bold text-white">{ev.name.clone()}</h1>
                                {ev.subtitle.clone().map(|s| view! {
                                    <p class="text-gray-400">{s}</p>
                                })}
                            </div>

                            <div class="flex flex-wrap gap-2 text-sm">
                                <span class="px-3 py-1 rounded-full bg-gray-700 text-gray-300">
                                    {format_event_mode(&ev.mode)}
                                </span>
                                <span class="px-3 py-1 rounded-full bg-gray-700 text-gray-300">
                                    {format_participants(ev.participants)}
                                </span>
                                <span class="px-3 py-1 rounded-full bg-gray-700 text-gray-300">
                                    {format_eligibility(ev.eligibility.as_deref(), ev.open_to_all)}
                                </span>
                                {ev.individual.then(|| view! {
                                    <span class="px-3 py-1 rounded-full bg-gray-700 text-gray-300">
                                        "Individual event"
                                    </span>
                                })}
                                {(ev.points > 0).then(|| view! {
                                    <span class="px-3 py-1 rounded-full bg-gray-700 text-gray-300">
                                        {format!("{} points", ev.points)}
                                    </span>
                                })}
                                {ev.dates.clone().map(|d| view! {
                                    <span class="px-3 py-1 rounded-full bg-gray-700 text-gray-300">
                                        {format_date(&d)}
                                    </span>
                                })}
                            </div>

                            {ev.description_long
                                .clone()
                                .or_else(|| ev.description_short.clone())
                                .map(|desc| view! {
                                    <div class="space-y-3">
                                        {desc.split("\n\n")
                                            .filter(|p| !p.trim().is_empty())
                                            .map(|p| view! {
                                                <p class="text-gray-300 leading-relaxed">
                                                    {p.trim().to_string()}
                                                </p>
                                            })
                                            .collect_view()}
                                    </div>
                                })}

                            {move || editor.get().is_none().then(|| {
                                let ev = ev_for_open.clone();
                                let open_editor = open_editor.clone();
                                view! {
                                    <button
                                        class="px-6 py-3 bg-blue-600 hover:bg-blue-700 disabled:opacity-50 text-white rounded-lg font-semibold"
                                        disabled=opening
                                        on:click=move |_| open_editor(ev.clone())
                                    >
                                        {move || if opening.get() { "Loading..." } else { "Register" }}
                                    </button>
                                }
                            })}

                            <MemberEditorPanel
                                event_key=ev.key()
                                editor=editor
                                on_saved=on_saved
                            />
                        </div>
                    </div>
                }.into_view()
            }}
        </div>
    }
}
