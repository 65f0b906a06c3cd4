//! Events Page
//!
//! Browsable event catalog with category filters and debounced search.
//! Falls back to the bundled static catalog when the API is unreachable.

use leptos::*;
use leptos_router::*;

use crate::api::client;
use crate::components::CardSkeleton;
use crate::state::global::{Event, GlobalState};
use crate::utils::{debounce, format_eligibility, format_event_mode, format_participants};

/// Event catalog page
#[component]
pub fn Events() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let (events, set_events) = create_signal(Vec::<Event>::new());
    let (loading, set_loading) = create_signal(true);
    let (category, set_category) = create_signal("all".to_string());
    let (search, set_search) = create_signal(String::new());

    create_effect(move |_| {
        spawn_local(async move {
            let loaded = match client::fetch_events().await {
                Ok(events) => Some(events),
                Err(e) => {
                    // API down: the bundled catalog keeps the page usable
                    web_sys::console::warn_1(
                        &format!("Event API unavailable, using fallback: {}", e).into(),
                    );
                    client::fetch_fallback_events().await.ok()
                }
            };
            match loaded {
                Some(events) => set_events.set(events),
                None => state.show_error("Failed to load events"),
            }
            set_loading.set(false);
        });
    });

    // Distinct category keys, in first-seen order
    let categories = create_memo(move |_| {
        let mut keys: Vec<String> = Vec::new();
        for event in events.get() {
            if let Some(key) = event.category_key() {
                if !keys.contains(&key) {
                    keys.push(key);
                }
            }
        }
        keys
    });

    let filtered = create_memo(move |_| {
        let category = category.get();
        let term = search.get().trim().to_lowercase();
        events
            .get()
            .into_iter()
            .filter(|event| {
                category == "all" || event.category_key().as_deref() == Some(category.as_str())
            })
            .filter(|event| {
                if term.is_empty() {
                    return true;
                }
                let haystack = format!(
                    "{} {} {}",
                    event.name,
                    event.description_short.as_deref().unwrap_or(""),
                    event.description_long.as_deref().unwrap_or(""),
                );
                haystack.to_lowercase().contains(&term)
            })
            .collect::<Vec<_>>()
    });

    let on_search = debounce(250, move |value: String| set_search.set(value));

    view! {
        <div class="space-y-6">
            <div>
                <h1 class="text-2xl font-bold text-white">"Events"</h1>
                <p class="text-gray-400">"Browse and register for upcoming events"</p>
            </div>

            // Search and category filters
            <div class="flex flex-col md:flex-row md:items-center gap-3">
                <input
                    type="search"
                    class="bg-gray-800 border border-gray-600 rounded-lg px-4 py-2 text-white md:w-72"
                    placeholder="Search events..."
                    on:input=move |ev| on_search(event_target_value(&ev))
                />
                <div class="flex flex-wrap gap-2">
                    <FilterChip key="all".to_string() label="All".to_string()
                        category=category set_category=set_category />
                    {move || categories.get().into_iter().map(|key| view! {
                        <FilterChip
                            key=key.clone()
                            label=format_event_mode(&key)
                            category=category
                            set_category=set_category
                        />
                    }).collect_view()}
                </div>
            </div>

            // Event grid
            {move || {
                if loading.get() {
                    view! {
                        <div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-4">
                            <CardSkeleton /><CardSkeleton /><CardSkeleton />
                        </div>
                    }.into_view()
                } else if filtered.get().is_empty() {
                    view! {
                        <p class="text-gray-500 text-center py-12">"No events match your search"</p>
                    }.into_view()
                } else {
                    view! {
                        <div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-4">
                            {filtered.get().into_iter().map(|event| view! {
                                <EventCard event=event />
                            }).collect_view()}
                        </div>
                    }.into_view()
                }
            }}
        </div>
    }
}

#[component]
fn FilterChip(
    key: String,
    label: String,
    category: ReadSignal<String>,
    set_category: WriteSignal<String>,
) -> impl IntoView {
    let select_key = key.clone();
    view! {
        <button
            class=move || {
                if category.get() == key {
                    "px-3 py-1 rounded-full text-sm bg-blue-600 text-white"
                } else {
                    "px-3 py-1 rounded-full text-sm bg-gray-800 text-gray-300 hover:bg-gray-700"
                }
            }
            on:click=move |_| set_category.set(select_key.clone())
        >
            {label}
        </button>
    }
}

#[component]
fn EventCard(event: Event) -> impl IntoView {
    let href = format!("/events/{}", event.key());
    view! {
        <A href=href class="block bg-gray-800 rounded-lg overflow-hidden hover:ring-2 hover:ring-blue-500 transition-all">
            {event.image.clone().map(|src| view! {
                <img class="w-full h-40 object-cover" src=src alt=event.name.clone() />
            })}
            <div class="p-4 space-y-2">
                <h3 class="text-lg font-semibold text-white">{event.name.clone()}</h3>
                {event.subtitle.clone().map(|s| view! {
                    <p class="text-sm text-gray-400">{s}</p>
                })}
                {event.description_short.clone().map(|d| view! {
                    <p class="text-sm text-gray-500 line-clamp-2">{d}</p>
                })}
                <div class="flex flex-wrap gap-2 pt-2 text-xs">
                    <span class="px-2 py-1 rounded bg-gray-700 text-gray-300">
                        {format_event_mode(&event.mode)}
                    </span>
                    <span class="px-2 py-1 rounded bg-gray-700 text-gray-300">
                        {format_participants(event.participants)}
                    </span>
                    <span class="px-2 py-1 rounded bg-gray-700 text-gray-300">
                        {format_eligibility(event.eligibility.as_deref(), event.open_to_all)}
                    </span>
                </div>
            </div>
        </A>
    }
}
