//! Admin Page
//!
//! Tabbed console: overview stats, event management with JSON import,
//! user search with CSV export, and the registration listing. Access is
//! decided by the server; a 401 on the stats load sends the visitor to
//! the login page.

use gloo_timers::callback::Timeout;
use leptos::*;
use leptos_router::use_navigate;
use wasm_bindgen::JsCast;

use crate::api::client::{self, NewEvent};
use crate::state::global::{AdminStats, AdminUser, Event, GlobalState, Registration};
use crate::utils::{debounce, format_date, REDIRECT_DELAY_MS};

#[derive(Clone, Copy, PartialEq, Eq)]
enum AdminTab {
    Overview,
    Events,
    Users,
    Registrations,
}

impl AdminTab {
    const ALL: [AdminTab; 4] = [
        AdminTab::Overview,
        AdminTab::Events,
        AdminTab::Users,
        AdminTab::Registrations,
    ];

    fn label(self) -> &'static str {
        match self {
            AdminTab::Overview => "Overview",
            AdminTab::Events => "Events",
            AdminTab::Users => "Users",
            AdminTab::Registrations => "Registrations",
        }
    }
}

/// Admin console page
#[component]
pub fn Admin() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let navigate = use_navigate();

    let (tab, set_tab) = create_signal(AdminTab::Overview);
    let (stats, set_stats) = create_signal(None::<AdminStats>);
    let (denied, set_denied) = create_signal(false);

    // The stats endpoint doubles as the access check
    create_effect(move |_| {
        let navigate = navigate.clone();
        spawn_local(async move {
            match client::fetch_admin_stats().await {
                Ok(loaded) => set_stats.set(Some(loaded)),
                Err(e) if client::is_auth_error(&e) => {
                    set_denied.set(true);
                    state.show_error("Access denied. Admin privileges required.");
                    Timeout::new(REDIRECT_DELAY_MS, move || {
                        navigate("/login", Default::default())
                    })
                    .forget();
                }
                Err(e) => state.show_error(&format!("Failed to load admin data: {}", e)),
            }
        });
    });

    view! {
        <div class="space-y-6">
            <div>
                <h1 class="text-2xl font-bold text-white">"Admin"</h1>
                <p class="text-gray-400">"Events, users and registrations"</p>
            </div>

            {move || {
                if denied.get() {
                    return view! {
                        <p class="text-gray-500 text-center py-12">"Redirecting to login..."</p>
                    }.into_view();
                }
                view! {
                    <div class="flex space-x-1 border-b border-gray-700">
                        {AdminTab::ALL.into_iter().map(|t| view! {
                            <button
                                class=move || {
                                    if tab.get() == t {
                                        "px-4 py-2 text-sm border-b-2 border-blue-500 text-white"
                                    } else {
                                        "px-4 py-2 text-sm text-gray-400 hover:text-white"
                                    }
                                }
                                on:click=move |_| set_tab.set(t)
                            >
                                {t.label()}
                            </button>
                        }).collect_view()}
                    </div>

                    {move || match tab.get() {
                        AdminTab::Overview => view! { <OverviewTab stats=stats /> }.into_view(),
                        AdminTab::Events => view! { <EventsTab /> }.into_view(),
                        AdminTab::Users => view! { <UsersTab /> }.into_view(),
                        AdminTab::Registrations => view! { <RegistrationsTab /> }.into_view(),
                    }}
                }.into_view()
            }}
        </div>
    }
}

#[component]
fn OverviewTab(stats: ReadSignal<Option<AdminStats>>) -> impl IntoView {
    let card = |label: &'static str, value: u64| {
        view! {
            <div class="bg-gray-800 rounded-lg p-4">
                <p class="text-sm text-gray-400">{label}</p>
                <p class="text-2xl font-bold text-white">{value.to_string()}</p>
            </div>
        }
    };
    view! {
        {move || match stats.get() {
            None => view! { <crate::components::ListSkeleton count=2 /> }.into_view(),
            Some(s) => view! {
                <div class="grid grid-cols-2 md:grid-cols-3 gap-4">
                    {card("Total events", s.total_events)}
                    {card("Total users", s.total_users)}
                    {card("Total registrations", s.total_registrations)}
                    {card("Active events", s.active_events)}
                    {card("Registrations today", s.today_registrations)}
                    {card("Active sessions", s.active_sessions)}
                </div>
            }.into_view(),
        }}
    }
}

#[component]
fn EventsTab() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let (events, set_events) = create_signal(Vec::<Event>::new());
    let (loading, set_loading) = create_signal(true);
    let (show_create, set_show_create) = create_signal(false);
    let reload = create_rw_signal(0u32);

    create_effect(move |_| {
        reload.get();
        set_loading.set(true);
        spawn_local(async move {
            match client::fetch_events().await {
                Ok(loaded) => set_events.set(loaded),
                Err(e) => state.show_error(&format!("Failed to load events: {}", e)),
            }
            set_loading.set(false);
        });
    });

    // Bulk import: a JSON file holding an array of events
    let handle_import = move |ev: web_sys::Event| {
        let Some(input) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        else {
            return;
        };
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return;
        };
        let Ok(file_reader) = web_sys::FileReader::new() else {
            return;
        };

        let onload = {
            let file_reader = file_reader.clone();
            wasm_bindgen::closure::Closure::wrap(Box::new(move |_: web_sys::Event| {
                let text = file_reader
                    .result()
                    .ok()
                    .and_then(|r| r.as_string())
                    .unwrap_or_default();
                match serde_json::from_str::<serde_json::Value>(&text) {
                    Ok(payload) if payload.is_array() => {
                        spawn_local(async move {
                            match client::import_events(&payload).await {
                                Ok(()) => {
                                    state.show_success("Events imported");
                                    reload.update(|n| *n += 1);
                                }
                                Err(e) => {
                                    state.show_error(&format!("Import failed: {}", e))
                                }
                            }
                        });
                    }
                    _ => state.show_error("Import file must be a JSON array of events"),
                }
            }) as Box<dyn FnMut(_)>)
        };

        file_reader.set_onload(Some(onload.as_ref().unchecked_ref()));
        onload.forget();

        let _ = file_reader.read_as_text(&file);
    };

    view! {
        <div class="space-y-4">
            <div class="flex items-center justify-between">
                <h2 class="text-lg font-semibold text-white">"Events"</h2>
                <div class="flex items-center space-x-3">
                    <label class="px-4 py-2 rounded-lg bg-gray-800 hover:bg-gray-700 text-gray-300 text-sm cursor-pointer">
                        "Import JSON"
                        <input
                            type="file"
                            accept=".json,application/json"
                            class="hidden"
                            on:change=handle_import
                        />
                    </label>
                    <button
                        class="px-4 py-2 rounded-lg bg-blue-600 hover:bg-blue-700 text-white text-sm"
                        on:click=move |_| set_show_create.set(true)
                    >
                        "New event"
                    </button>
                </div>
            </div>

            {move || {
                if loading.get() {
                    return view! { <crate::components::ListSkeleton count=4 /> }.into_view();
                }
                view! {
                    <div class="bg-gray-800 rounded-lg overflow-x-auto">
                        <table class="w-full text-sm text-left">
                            <thead class="text-gray-400 border-b border-gray-700">
                                <tr>
                                    <th class="px-4 py-3">"Name"</th>
                                    <th class="px-4 py-3">"Mode"</th>
                                    <th class="px-4 py-3">"Capacity"</th>
                                    <th class="px-4 py-3">"Registrations"</th>
                                </tr>
                            </thead>
                            <tbody class="text-gray-300">
                                {events.get().into_iter().map(|event| view! {
                                    <tr class="border-b border-gray-700/50">
                                        <td class="px-4 py-3">{event.name.clone()}</td>
                                        <td class="px-4 py-3">{event.mode.clone()}</td>
                                        <td class="px-4 py-3">{event.participants}</td>
                                        <td class="px-4 py-3">
                                            {event.registrations.map(|n| n.to_string()).unwrap_or_else(|| "-".to_string())}
                                        </td>
                                    </tr>
                                }).collect_view()}
                            </tbody>
                        </table>
                    </div>
                }.into_view()
            }}

            {move || show_create.get().then(|| view! {
                <CreateEventModal
                    on_close=Callback::new(move |_| set_show_create.set(false))
                    on_created=Callback::new(move |_| {
                        set_show_create.set(false);
                        reload.update(|n| *n += 1);
                    })
                />
            })}
        </div>
    }
}

#[component]
fn CreateEventModal(
    on_close: Callback<()>,
    on_created: Callback<()>,
) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let (name, set_name) = create_signal(String::new());
    let (mode, set_mode) = create_signal("offline".to_string());
    let (participants, set_participants) = create_signal("1".to_string());
    let (description, set_description) = create_signal(String::new());
    let (min_class, set_min_class) = create_signal("6".to_string());
    let (max_class, set_max_class) = create_signal("12".to_string());
    let (open_to_all, set_open_to_all) = create_signal(false);
    let (saving, set_saving) = create_signal(false);

    let submit = move |_| {
        let name_value = name.get_untracked().trim().to_string();
        if name_value.is_empty() {
            state.show_error("Event name is required");
            return;
        }
        let capacity = participants.get_untracked().trim().parse::<u32>().unwrap_or(1).max(1);
        let min = min_class.get_untracked().trim().parse::<u32>().unwrap_or(6);
        let max = max_class.get_untracked().trim().parse::<u32>().unwrap_or(12);
        let event = NewEvent {
            name: name_value,
            mode: mode.get_untracked(),
            participants: capacity,
            description: description.get_untracked().trim().to_string(),
            eligibility: [min.min(max), min.max(max)],
            open_to_all: open_to_all.get_untracked(),
        };
        set_saving.set(true);
        spawn_local(async move {
            match client::create_event(&event).await {
                Ok(()) => {
                    state.show_success("Event created");
                    on_created.call(());
                }
                Err(e) => state.show_error(&format!("Could not create event: {}", e)),
            }
            set_saving.set(false);
        });
    };

    let text_input = move |value: ReadSignal<String>, setter: WriteSignal<String>| {
        view! {
            <input
                type="text"
                class="w-full bg-gray-900 border border-gray-600 rounded-lg px-3 py-2 text-white text-sm"
                prop:value=value
                on:input=move |ev| setter.set(event_target_value(&ev))
            />
        }
    };

    view! {
        <div
            class="fixed inset-0 z-50 bg-gray-900/70 flex items-center justify-center px-4"
            on:click=move |_| on_close.call(())
        >
            <div
                class="bg-gray-800 rounded-lg shadow-xl max-w-lg w-full p-6 space-y-4"
                on:click=|ev| ev.stop_propagation()
            >
                <h3 class="text-lg font-semibold text-white">"New event"</h3>

                <div>
                    <label class="block text-sm text-gray-400 mb-1">"Name"</label>
                    {text_input(name, set_name)}
                </div>
                <div class="grid grid-cols-2 gap-3">
                    <div>
                        <label class="block text-sm text-gray-400 mb-1">"Mode"</label>
                        <select
                            class="w-full bg-gray-900 border border-gray-600 rounded-lg px-3 py-2 text-white text-sm"
                            on:change=move |ev| set_mode.set(event_target_value(&ev))
                            prop:value=mode
                        >
                            <option value="offline">"Offline"</option>
                            <option value="online">"Online"</option>
                        </select>
                    </div>
                    <div>
                        <label class="block text-sm text-gray-400 mb-1">"Team capacity"</label>
                        {text_input(participants, set_participants)}
                    </div>
                </div>
                <div>
                    <label class="block text-sm text-gray-400 mb-1">"Description"</label>
                    <textarea
                        class="w-full bg-gray-900 border border-gray-600 rounded-lg px-3 py-2 text-white text-sm h-24"
                        prop:value=description
                        on:input=move |ev| set_description.set(event_target_value(&ev))
                    />
                </div>
                <div class="grid grid-cols-2 gap-3">
                    <div>
                        <label class="block text-sm text-gray-400 mb-1">"Eligible from class"</label>
                        {text_input(min_class, set_min_class)}
                    </div>
                    <div>
                        <label class="block text-sm text-gray-400 mb-1">"To class"</label>
                        {text_input(max_class, set_max_class)}
                    </div>
                </div>
                <label class="flex items-center space-x-2 text-sm text-gray-300">
                    <input
                        type="checkbox"
                        prop:checked=open_to_all
                        on:change=move |ev| set_open_to_all.set(event_target_checked(&ev))
                    />
                    <span>"Open to all (no class restriction)"</span>
                </label>

                <div class="flex justify-end space-x-3 pt-2">
                    <button
                        class="px-4 py-2 rounded-lg text-gray-300 hover:bg-gray-700 text-sm"
                        on:click=move |_| on_close.call(())
                    >
                        "Cancel"
                    </button>
                    <button
                        class="px-4 py-2 rounded-lg bg-blue-600 hover:bg-blue-700 disabled:opacity-50 text-white text-sm"
                        disabled=saving
                        on:click=submit
                    >
                        {move || if saving.get() { "Creating..." } else { "Create" }}
                    </button>
                </div>
            </div>
        </div>
    }
}

#[component]
fn UsersTab() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let (users, set_users) = create_signal(Vec::<AdminUser>::new());
    let (loading, set_loading) = create_signal(true);
    let (search, set_search) = create_signal(String::new());
    let (exporting, set_exporting) = create_signal(false);

    create_effect(move |_| {
        let term = search.get();
        set_loading.set(true);
        spawn_local(async move {
            match client::fetch_admin_users(&term).await {
                Ok(loaded) => set_users.set(loaded),
                Err(e) => state.show_error(&format!("Failed to load users: {}", e)),
            }
            set_loading.set(false);
        });
    });

    let on_search = debounce(300, move |value: String| set_search.set(value));

    let export_csv = move |_| {
        set_exporting.set(true);
        spawn_local(async move {
            match client::export_users_csv().await {
                Ok(csv) => {
                    trigger_download("users.csv", &csv);
                    state.show_success("User export downloaded");
                }
                Err(e) => state.show_error(&format!("Export failed: {}", e)),
            }
            set_exporting.set(false);
        });
    };

    view! {
        <div class="space-y-4">
            <div class="flex items-center justify-between">
                <input
                    type="search"
                    class="bg-gray-800 border border-gray-600 rounded-lg px-4 py-2 text-white text-sm md:w-72"
                    placeholder="Search by name, email or school..."
                    on:input=move |ev| on_search(event_target_value(&ev))
                />
                <button
                    class="px-4 py-2 rounded-lg bg-gray-800 hover:bg-gray-700 disabled:opacity-50 text-gray-300 text-sm"
                    disabled=exporting
                    on:click=export_csv
                >
                    {move || if exporting.get() { "Exporting..." } else { "Export CSV" }}
                </button>
            </div>

            {move || {
                if loading.get() {
                    return view! { <crate::components::ListSkeleton count=5 /> }.into_view();
                }
                if users.get().is_empty() {
                    return view! {
                        <p class="text-gray-500 text-center py-8">"No users found"</p>
                    }.into_view();
                }
                view! {
                    <div class="bg-gray-800 rounded-lg overflow-x-auto">
                        <table class="w-full text-sm text-left">
                            <thead class="text-gray-400 border-b border-gray-700">
                                <tr>
                                    <th class="px-4 py-3">"Name"</th>
                                    <th class="px-4 py-3">"Email"</th>
                                    <th class="px-4 py-3">"School"</th>
                                    <th class="px-4 py-3">"Registrations"</th>
                                    <th class="px-4 py-3">"Joined"</th>
                                </tr>
                            </thead>
                            <tbody class="text-gray-300">
                                {users.get().into_iter().map(|user| view! {
                                    <tr class="border-b border-gray-700/50">
                                        <td class="px-4 py-3">{user.name.clone().unwrap_or_else(|| "-".to_string())}</td>
                                        <td class="px-4 py-3">{user.email.clone()}</td>
                                        <td class="px-4 py-3">{user.school.clone().unwrap_or_else(|| "-".to_string())}</td>
                                        <td class="px-4 py-3">{user.registration_count}</td>
                                        <td class="px-4 py-3">
                                            {user.created_at.as_deref().map(format_date).unwrap_or_else(|| "-".to_string())}
                                        </td>
                                    </tr>
                                }).collect_view()}
                            </tbody>
                        </table>
                    </div>
                }.into_view()
            }}
        </div>
    }
}

#[component]
fn RegistrationsTab() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let (registrations, set_registrations) = create_signal(Vec::<Registration>::new());
    let (loading, set_loading) = create_signal(true);

    create_effect(move |_| {
        spawn_local(async move {
            match client::fetch_event_registrations(None).await {
                Ok(loaded) => set_registrations.set(loaded),
                Err(e) => state.show_error(&format!("Failed to load registrations: {}", e)),
            }
            set_loading.set(false);
        });
    });

    view! {
        {move || {
            if loading.get() {
                return view! { <crate::components::ListSkeleton count=5 /> }.into_view();
            }
            if registrations.get().is_empty() {
                return view! {
                    <p class="text-gray-500 text-center py-8">"No registrations yet"</p>
                }.into_view();
            }
            view! {
                <div class="bg-gray-800 rounded-lg overflow-x-auto">
                    <table class="w-full text-sm text-left">
                        <thead class="text-gray-400 border-b border-gray-700">
                            <tr>
                                <th class="px-4 py-3">"Event"</th>
                                <th class="px-4 py-3">"User"</th>
                                <th class="px-4 py-3">"Status"</th>
                                <th class="px-4 py-3">"Members"</th>
                                <th class="px-4 py-3">"Created"</th>
                            </tr>
                        </thead>
                        <tbody class="text-gray-300">
                            {registrations.get().into_iter().map(|reg| view! {
                                <tr class="border-b border-gray-700/50">
                                    <td class="px-4 py-3">{reg.event_name.clone()}</td>
                                    <td class="px-4 py-3">{reg.user_email.clone().unwrap_or_else(|| "-".to_string())}</td>
                                    <td class="px-4 py-3">
                                        <span class=reg.status.badge_class()>{reg.status.label()}</span>
                                    </td>
                                    <td class="px-4 py-3">
                                        {reg.member_count
                                            .map(|n| n as usize)
                                            .unwrap_or(reg.team_members.len())}
                                    </td>
                                    <td class="px-4 py-3">
                                        {reg.created_at.as_deref().map(format_date).unwrap_or_else(|| "-".to_string())}
                                    </td>
                                </tr>
                            }).collect_view()}
                        </tbody>
                    </table>
                </div>
            }.into_view()
        }}
    }
}

/// Hand the browser a text file to download.
fn trigger_download(filename: &str, content: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Ok(blob) =
        web_sys::Blob::new_with_str_sequence(&js_sys::Array::of1(&content.into()))
    else {
        return;
    };
    let Ok(url) = web_sys::Url::create_object_url_with_blob(&blob) else {
        return;
    };
    if let Some(document) = window.document() {
        if let Ok(a) = document.create_element("a") {
            let _ = a.set_attribute("href", &url);
            let _ = a.set_attribute("download", filename);
            if let Some(el) = a.dyn_ref::<web_sys::HtmlElement>() {
                el.click();
            }
        }
    }
    let _ = web_sys::Url::revoke_object_url(&url);
}
