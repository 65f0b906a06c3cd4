//! Signup Completion Page
//!
//! Reached after OTP verification for a verified-but-unfinished account:
//! the user picks a username and password, then lands on the login form.

use gloo_timers::callback::Timeout;
use leptos::*;
use leptos_router::use_navigate;

use crate::api::client;
use crate::state::global::GlobalState;

const MIN_PASSWORD_LEN: usize = 8;

/// Field-level validation for the completion form.
fn validate_completion(
    username: &str,
    password: &str,
    confirm: &str,
) -> Result<(), &'static str> {
    if username.trim().len() < 3 {
        return Err("Username must be at least 3 characters");
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err("Password must be at least 8 characters");
    }
    if password != confirm {
        return Err("Passwords do not match");
    }
    Ok(())
}

/// Signup completion page
#[component]
pub fn Complete() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let navigate = use_navigate();

    let (username, set_username) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let (confirm, set_confirm) = create_signal(String::new());
    let (field_error, set_field_error) = create_signal(None::<&'static str>);
    let (submitting, set_submitting) = create_signal(false);

    let submit = move |_| {
        let username_value = username.get_untracked().trim().to_string();
        let password_value = password.get_untracked();
        if let Err(msg) =
            validate_completion(&username_value, &password_value, &confirm.get_untracked())
        {
            set_field_error.set(Some(msg));
            return;
        }
        set_field_error.set(None);
        set_submitting.set(true);
        let navigate = navigate.clone();
        spawn_local(async move {
            match client::complete_signup(&username_value, &password_value).await {
                Ok(()) => {
                    state.show_success("Account ready. Log in to continue");
                    Timeout::new(1000, move || navigate("/login", Default::default())).forget();
                }
                Err(e) => state.show_error(&format!("Could not complete signup: {}", e)),
            }
            set_submitting.set(false);
        });
    };

    view! {
        <div class="max-w-md mx-auto mt-12 bg-gray-800 rounded-lg p-8 space-y-6">
            <div class="text-center">
                <h1 class="text-2xl font-bold text-white">"Almost there"</h1>
                <p class="text-gray-400 mt-1">"Choose a username and password for your account"</p>
            </div>

            <div class="space-y-4">
                <div>
                    <label class="block text-sm text-gray-400 mb-1">"Username"</label>
                    <input
                        type="text"
                        class="w-full bg-gray-900 border border-gray-600 rounded-lg px-4 py-2 text-white"
                        prop:value=username
                        on:input=move |ev| set_username.set(event_target_value(&ev))
                    />
                </div>
                <div>
                    <label class="block text-sm text-gray-400 mb-1">"Password"</label>
                    <input
                        type="password"
                        class="w-full bg-gray-900 border border-gray-600 rounded-lg px-4 py-2 text-white"
                        prop:value=password
                        on:input=move |ev| set_password.set(event_target_value(&ev))
                    />
                </div>
                <div>
                    <label class="block text-sm text-gray-400 mb-1">"Confirm password"</label>
                    <input
                        type="password"
                        class="w-full bg-gray-900 border border-gray-600 rounded-lg px-4 py-2 text-white"
                        prop:value=confirm
                        on:input=move |ev| set_confirm.set(event_target_value(&ev))
                    />
                </div>

                {move || field_error.get().map(|msg| view! {
                    <p class="text-sm text-red-400">{msg}</p>
                })}

                <button
                    class="w-full py-3 bg-blue-600 hover:bg-blue-700 disabled:opacity-50 text-white rounded-lg font-semibold"
                    disabled=submitting
                    on:click=submit
                >
                    {move || if submitting.get() { "Saving..." } else { "Finish signup" }}
                </button>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_a_well_formed_completion() {
        assert!(validate_completion("sailor", "anchors-away", "anchors-away").is_ok());
    }

    #[test]
    fn rejects_short_username_and_password() {
        assert!(validate_completion("ab", "anchors-away", "anchors-away").is_err());
        assert!(validate_completion("sailor", "short", "short").is_err());
    }

    #[test]
    fn rejects_mismatched_passwords() {
        assert_eq!(
            validate_completion("sailor", "anchors-away", "anchors-awry"),
            Err("Passwords do not match")
        );
    }
}
