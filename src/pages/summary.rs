//! Summary Page
//!
//! The signed-in user's profile and registrations. Profile and summary
//! are fetched concurrently; either half may fail without taking down
//! the other.

use gloo_timers::callback::Timeout;
use leptos::*;
use leptos_router::use_navigate;

use crate::api::{client, session};
use crate::components::{Loading, MemberEditorPanel};
use crate::state::editor::MemberEditor;
use crate::state::global::{GlobalState, Registration, RegistrationStatus, UserProfile};
use crate::utils::{format_date, slugify, REDIRECT_DELAY_MS};

/// Combine the two concurrent loads. Partial failure is tolerated;
/// only a double failure is an error, reported as the summary's.
fn merge_loads(
    profile: Result<UserProfile, String>,
    registrations: Result<Vec<Registration>, String>,
) -> Result<(Option<UserProfile>, Vec<Registration>), String> {
    match (profile, registrations) {
        (Err(_), Err(summary_err)) => Err(summary_err),
        (profile, registrations) => {
            Ok((profile.ok(), registrations.unwrap_or_default()))
        }
    }
}

/// Account-state errors that warrant leaving the page
fn stale_account_route(errors: &[&str]) -> Option<&'static str> {
    for error in errors {
        let lower = error.to_lowercase();
        if lower.contains("complete signup") {
            return Some("/complete");
        }
        if lower.contains("user not found") {
            return Some("/login");
        }
    }
    None
}

/// User summary page
#[component]
pub fn Summary() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let navigate = use_navigate();

    let (profile, set_profile) = create_signal(None::<UserProfile>);
    let (registrations, set_registrations) = create_signal(Vec::<Registration>::new());
    let (loading, set_loading) = create_signal(true);
    let reload = create_rw_signal(0u32);

    {
        let navigate = navigate.clone();
        create_effect(move |_| {
            reload.get();
            if !session::is_authenticated() {
                state.show_error("Please log in to view your summary");
                let navigate = navigate.clone();
                Timeout::new(REDIRECT_DELAY_MS, move || {
                    navigate("/login", Default::default())
                })
                .forget();
                set_loading.set(false);
                return;
            }
            set_loading.set(true);
            let navigate = navigate.clone();
            spawn_local(async move {
                let (profile_result, summary_result) =
                    futures::join!(client::fetch_user_profile(), client::fetch_summary());

                let mut errors: Vec<&str> = Vec::new();
                if let Err(e) = &profile_result {
                    errors.push(e);
                }
                if let Err(e) = &summary_result {
                    errors.push(e);
                }
                if let Some(route) = stale_account_route(&errors) {
                    if route == "/login" {
                        session::clear_token();
                    }
                    let route = route.to_string();
                    Timeout::new(1000, move || navigate(&route, Default::default())).forget();
                    set_loading.set(false);
                    return;
                }

                match merge_loads(profile_result, summary_result) {
                    Ok((loaded_profile, loaded_registrations)) => {
                        if let Some(p) = loaded_profile.clone() {
                            state.profile.set(Some(p));
                        }
                        set_profile.set(loaded_profile);
                        set_registrations.set(loaded_registrations);
                    }
                    Err(e) => {
                        state.show_error(&format!("Failed to load summary: {}", e));
                    }
                }
                set_loading.set(false);
            });
        });
    }

    let on_saved = Callback::new(move |_| reload.update(|n| *n += 1));

    let total_members = create_memo(move |_| {
        registrations
            .get()
            .iter()
            .map(|r| r.team_members.len().max(r.member_count.unwrap_or(0) as usize))
            .sum::<usize>()
    });

    view! {
        <div class="space-y-6">
            <div class="flex items-center justify-between">
                <div>
                    <h1 class="text-2xl font-bold text-white">"My Summary"</h1>
                    <p class="text-gray-400">"Your profile and event registrations"</p>
                </div>
                <button
                    class="px-4 py-2 rounded-lg bg-gray-800 hover:bg-gray-700 text-gray-300 text-sm"
                    on:click=move |_| reload.update(|n| *n += 1)
                >
                    "Refresh"
                </button>
            </div>

            {move || {
                if loading.get() {
                    return view! { <Loading /> }.into_view();
                }
                view! {
                    // Stats strip
                    <div class="grid grid-cols-2 md:grid-cols-3 gap-4">
                        <StatCard label="Registrations" value=registrations.get().len().to_string() />
                        <StatCard label="Team members" value=total_members.get().to_string() />
                        <StatCard
                            label="Confirmed"
                            value=registrations.get().iter()
                                .filter(|r| matches!(r.status, RegistrationStatus::Confirmed))
                                .count()
                                .to_string()
                        />
                    </div>

                    // Profile card
                    {profile.get().map(|p| view! { <ProfileCard profile=p /> })}

                    // Registrations
                    <div class="space-y-4">
                        <h2 class="text-lg font-semibold text-white">"Registrations"</h2>
                        {if registrations.get().is_empty() {
                            view! {
                                <p class="text-gray-500 py-6">
                                    "No registrations yet. Browse the events to get started."
                                </p>
                            }.into_view()
                        } else {
                            registrations.get().into_iter().map(|reg| view! {
                                <RegistrationCard registration=reg on_saved=on_saved />
                            }).collect_view()
                        }}
                    </div>
                }.into_view()
            }}
        </div>
    }
}

#[component]
fn StatCard(
    label: &'static str,
    value: String,
) -> impl IntoView {
    view! {
        <div class="bg-gray-800 rounded-lg p-4">
            <p class="text-sm text-gray-400">{label}</p>
            <p class="text-2xl font-bold text-white">{value}</p>
        </div>
    }
}

#[component]
fn ProfileCard(profile: UserProfile) -> impl IntoView {
    let row = |label: &'static str, value: Option<String>| {
        value.map(|v| {
            view! {
                <div>
                    <dt class="text-xs text-gray-500 uppercase tracking-wide">{label}</dt>
                    <dd class="text-sm text-gray-200">{v}</dd>
                </div>
            }
        })
    };
    view! {
        <div class="bg-gray-800 rounded-lg p-6">
            <h2 class="text-lg font-semibold text-white mb-4">
                {profile.name.clone().unwrap_or_else(|| profile.email.clone())}
            </h2>
            <dl class="grid grid-cols-2 md:grid-cols-3 gap-4">
                {row("Email", Some(profile.email.clone()))}
                {row(
                    "School",
                    if profile.individual {
                        Some("Individual participant".to_string())
                    } else {
                        profile.school.clone()
                    },
                )}
                {row("Class", profile.class.clone())}
                {row("Phone", profile.phone.clone())}
                {row("City", profile.city.clone())}
                {row("Principal", profile.principal.clone())}
            </dl>
        </div>
    }
}

#[component]
fn RegistrationCard(
    registration: Registration,
    on_saved: Callback<()>,
) -> impl IntoView {
    let editor = create_rw_signal(None::<MemberEditor>);
    let event_key = registration
        .event_id
        .clone()
        .unwrap_or_else(|| slugify(&registration.event_name));
    let capacity = registration
        .capacity
        .unwrap_or_else(|| (registration.team_members.len() as u32).max(1));
    let members = registration.team_members.clone();

    let open = move |_| {
        editor.set(Some(MemberEditor::open(&members, capacity)));
    };

    view! {
        <div class="bg-gray-800 rounded-lg p-5">
            <div class="flex items-start justify-between">
                <div>
                    <h3 class="font-semibold text-white">{registration.event_name.clone()}</h3>
                    {registration.team_name.clone().map(|team| view! {
                        <p class="text-sm text-gray-400">{format!("Team {}", team)}</p>
                    })}
                    <div class="flex items-center gap-2 mt-1 text-sm">
                        <span class=registration.status.badge_class()>
                            {registration.status.label()}
                        </span>
                        {registration.event_mode.clone().map(|m| view! {
                            <span class="text-gray-500">{m}</span>
                        })}
                        {registration.created_at.clone().map(|d| view! {
                            <span class="text-gray-500">{format_date(&d)}</span>
                        })}
                        {registration.registration_id.clone().map(|id| view! {
                            <span class="text-gray-600">{format!("Ref {}", id)}</span>
                        })}
                    </div>
                </div>
                {move || editor.get().is_none().then(|| {
                    let open = open.clone();
                    view! {
                        <button
                            class="px-3 py-1 rounded-lg text-sm bg-gray-700 hover:bg-gray-600 text-gray-200"
                            on:click=open
                        >
                            "Edit"
                        </button>
                    }
                })}
            </div>

            {(!registration.team_members.is_empty()).then(|| view! {
                <ul class="mt-3 text-sm text-gray-400 space-y-1">
                    {registration.team_members.iter().map(|member| view! {
                        <li>
                            {member.name.clone()}
                            {(!member.class.is_empty())
                                .then(|| format!(" · Class {}", member.class))}
                        </li>
                    }).collect_view()}
                </ul>
            })}

            <MemberEditorPanel event_key=event_key editor=editor on_saved=on_saved />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> UserProfile {
        serde_json::from_str(r#"{"email": "sailor@school.edu"}"#)
            .unwrap()
    }

    #[test]
    fn merge_tolerates_one_failed_half() {
        let merged = merge_loads(Err("profile down".to_string()), Ok(Vec::new()));
        let (profile, registrations) = merged.unwrap();
        assert!(profile.is_none());
        assert!(registrations.is_empty());

        let merged = merge_loads(Ok(self::profile()), Err("summary down".to_string()));
        let (profile, registrations) = merged.unwrap();
        assert_eq!(profile.unwrap().email, "sailor@school.edu");
        assert!(registrations.is_empty());
    }

    #[test]
    fn merge_fails_only_when_both_fail() {
        let merged = merge_loads(
            Err("profile down".to_string()),
            Err("summary down".to_string()),
        );
        assert_eq!(merged.unwrap_err(), "summary down");
    }

    #[test]
    fn stale_account_errors_route_away() {
        assert_eq!(
            stale_account_route(&["Please complete signup first"]),
            Some("/complete")
        );
        assert_eq!(stale_account_route(&["User not found"]), Some("/login"));
        assert_eq!(stale_account_route(&["HTTP error! status: 500"]), None);
    }
}
