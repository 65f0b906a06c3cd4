//! Login Page
//!
//! Password login plus OTP-based registration: six single-digit inputs
//! with auto-advance, backspace, paste handling, and a resend countdown.

use gloo_timers::callback::{Interval, Timeout};
use leptos::html::Input;
use leptos::*;
use leptos_router::use_navigate;
use wasm_bindgen::JsCast;

use crate::api::{client, session};
use crate::state::global::GlobalState;
use crate::utils::validate_email;

const OTP_LENGTH: usize = 6;
const RESEND_COOLDOWN_SECS: u32 = 60;

/// Joined OTP code, present only when every slot holds one digit.
fn otp_code(digits: &[String]) -> Option<String> {
    if digits.len() == OTP_LENGTH && digits.iter().all(|d| d.len() == 1) {
        Some(digits.concat())
    } else {
        None
    }
}

/// Distribute pasted text across the OTP slots starting at `start`.
/// Returns the slot that should receive focus next.
fn apply_paste(digits: &mut [String], start: usize, text: &str) -> usize {
    let mut index = start;
    for ch in text.chars().filter(char::is_ascii_digit) {
        if index >= digits.len() {
            break;
        }
        digits[index] = ch.to_string();
        index += 1;
    }
    index.min(digits.len() - 1)
}

/// Login and registration page
#[component]
pub fn Login() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let navigate = use_navigate();

    let (register_mode, set_register_mode) = create_signal(false);
    let (email, set_email) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let (email_error, set_email_error) = create_signal(None::<String>);
    let (password_error, set_password_error) = create_signal(None::<String>);
    let (show_otp, set_show_otp) = create_signal(false);
    let (submitting, set_submitting) = create_signal(false);

    let digits = create_rw_signal(vec![String::new(); OTP_LENGTH]);
    let resend_seconds = create_rw_signal(0u32);
    let countdown = store_value(None::<Interval>);

    let input_refs: Vec<NodeRef<Input>> = (0..OTP_LENGTH).map(|_| create_node_ref()).collect();

    // Stop the ticker once the cooldown expires
    create_effect(move |_| {
        if resend_seconds.get() == 0 {
            countdown.set_value(None);
        }
    });
    on_cleanup(move || countdown.set_value(None));

    let start_countdown = move || {
        resend_seconds.set(RESEND_COOLDOWN_SECS);
        countdown.set_value(Some(Interval::new(1000, move || {
            let left = resend_seconds.get_untracked();
            if left > 0 {
                resend_seconds.set(left - 1);
            }
        })));
    };

    let finish_login = {
        let navigate = navigate.clone();
        move |token: String| {
            session::set_token(&token);
            spawn_local(async move {
                if let Ok(profile) = client::fetch_auth_profile().await {
                    state.profile.set(Some(profile));
                }
                state.refresh_admin_config().await;
            });
            state.show_success("Logged in");
            let navigate = navigate.clone();
            Timeout::new(1000, move || navigate("/summary", Default::default())).forget();
        }
    };

    let submit_login = {
        let finish_login = finish_login.clone();
        move || {
            let email_value = email.get_untracked().trim().to_string();
            let password_value = password.get_untracked();
            set_email_error.set(
                (!validate_email(&email_value)).then(|| "Enter a valid email address".to_string()),
            );
            set_password_error
                .set(password_value.is_empty().then(|| "Password is required".to_string()));
            if email_error.get_untracked().is_some() || password_error.get_untracked().is_some() {
                return;
            }
            set_submitting.set(true);
            let finish_login = finish_login.clone();
            spawn_local(async move {
                match client::login(&email_value, &password_value).await {
                    Ok(token) => finish_login(token),
                    Err(e) => state.show_error(&format!("Login failed: {}", e)),
                }
                set_submitting.set(false);
            });
        }
    };

    let request_otp = move || {
        let email_value = email.get_untracked().trim().to_string();
        if !validate_email(&email_value) {
            set_email_error.set(Some("Enter a valid email address".to_string()));
            return;
        }
        set_email_error.set(None);
        set_submitting.set(true);
        spawn_local(async move {
            match client::send_otp(&email_value).await {
                Ok(()) => {
                    digits.set(vec![String::new(); OTP_LENGTH]);
                    set_show_otp.set(true);
                    start_countdown();
                    state.show_success("Verification code sent to your email");
                }
                Err(e) => state.show_error(&format!("Could not send code: {}", e)),
            }
            set_submitting.set(false);
        });
    };

    let resend_otp = move || {
        if resend_seconds.get_untracked() > 0 {
            return;
        }
        request_otp();
    };

    let submit_otp = {
        let finish_login = finish_login.clone();
        let navigate = navigate.clone();
        move || {
            let Some(code) = digits.with_untracked(|d| otp_code(d)) else {
                state.show_error("Please enter all 6 digits");
                return;
            };
            let email_value = email.get_untracked().trim().to_string();
            set_submitting.set(true);
            let finish_login = finish_login.clone();
            let navigate = navigate.clone();
            spawn_local(async move {
                match client::verify_otp(&email_value, &code).await {
                    Ok(outcome) if outcome.needs_signup => {
                        state.show_success("Code verified. Finish setting up your account");
                        Timeout::new(1000, move || navigate("/complete", Default::default()))
                            .forget();
                    }
                    Ok(outcome) => match outcome.token {
                        Some(token) => finish_login(token),
                        None => state.show_error("Unexpected response from server"),
                    },
                    Err(e) => {
                        state.show_error(&format!("Verification failed: {}", e));
                        digits.set(vec![String::new(); OTP_LENGTH]);
                    }
                }
                set_submitting.set(false);
            });
        }
    };

    let focus_slot = {
        let refs = input_refs.clone();
        move |index: usize| {
            if let Some(el) = refs.get(index).and_then(|r| r.get_untracked()) {
                let _ = el.focus();
            }
        }
    };

    let otp_inputs = {
        let focus_slot = focus_slot.clone();
        input_refs
            .iter()
            .copied()
            .enumerate()
            .map(|(i, node_ref)| {
                let focus_next = focus_slot.clone();
                let focus_prev = focus_slot.clone();
                let focus_paste = focus_slot.clone();
                view! {
                    <input
                        type="text"
                        inputmode="numeric"
                        maxlength="1"
                        class="w-12 h-14 text-center text-xl bg-gray-900 border border-gray-600 rounded-lg text-white focus:border-blue-500"
                        node_ref=node_ref
                        prop:value=move || digits.with(|d| d[i].clone())
                        on:input=move |ev| {
                            let value: String = event_target_value(&ev)
                                .chars()
                                .filter(char::is_ascii_digit)
                                .take(1)
                                .collect();
                            let advance = !value.is_empty();
                            digits.update(|d| d[i] = value);
                            if advance && i + 1 < OTP_LENGTH {
                                focus_next(i + 1);
                            }
                        }
                        on:keydown=move |ev| {
                            if ev.key() == "Backspace"
                                && digits.with_untracked(|d| d[i].is_empty())
                                && i > 0
                            {
                                focus_prev(i - 1);
                            }
                        }
                        on:paste=move |ev| {
                            ev.prevent_default();
                            let text = ev
                                .dyn_ref::<web_sys::ClipboardEvent>()
                                .and_then(|e| e.clipboard_data())
                                .and_then(|d| d.get_data("text").ok())
                                .unwrap_or_default();
                            let mut next = i;
                            digits.update(|d| next = apply_paste(d, i, &text));
                            focus_paste(next);
                        }
                    />
                }
            })
            .collect_view()
    };

    view! {
        <div class="max-w-md mx-auto mt-12 bg-gray-800 rounded-lg p-8 space-y-6">
            {move || {
                if show_otp.get() {
                    view! {
                        <div class="text-center">
                            <h1 class="text-2xl font-bold text-white">"Check your email"</h1>
                            <p class="text-gray-400 mt-1">
                                {format!("We sent a 6-digit code to {}", email.get_untracked())}
                            </p>
                        </div>
                    }.into_view()
                } else {
                    view! {
                        <div class="text-center">
                            <h1 class="text-2xl font-bold text-white">
                                {move || if register_mode.get() { "Create account" } else { "Welcome back" }}
                            </h1>
                            <p class="text-gray-400 mt-1">
                                {move || if register_mode.get() {
                                    "Register with your school email"
                                } else {
                                    "Log in to manage your registrations"
                                }}
                            </p>
                        </div>
                    }.into_view()
                }
            }}

            // OTP entry stage
            <div class=move || if show_otp.get() { "space-y-5" } else { "hidden" }>
                <div class="flex justify-center gap-2">
                    {otp_inputs}
                </div>
                <button
                    class="w-full py-3 bg-blue-600 hover:bg-blue-700 disabled:opacity-50 text-white rounded-lg font-semibold"
                    disabled=submitting
                    on:click=move |_| submit_otp()
                >
                    "Verify"
                </button>
                <div class="text-center text-sm text-gray-400">
                    {move || {
                        let left = resend_seconds.get();
                        if left > 0 {
                            view! {
                                <span>{format!("Resend code in {}s", left)}</span>
                            }.into_view()
                        } else {
                            view! {
                                <button
                                    class="text-blue-400 hover:text-blue-300"
                                    on:click=move |_| resend_otp()
                                >
                                    "Resend code"
                                </button>
                            }.into_view()
                        }
                    }}
                </div>
            </div>

            // Email / password stage
            <div class=move || if show_otp.get() { "hidden" } else { "space-y-4" }>
                <div>
                    <label class="block text-sm text-gray-400 mb-1">"Email"</label>
                    <input
                        type="email"
                        class="w-full bg-gray-900 border border-gray-600 rounded-lg px-4 py-2 text-white"
                        placeholder="you@school.edu"
                        prop:value=email
                        on:input=move |ev| set_email.set(event_target_value(&ev))
                    />
                    {move || email_error.get().map(|msg| view! {
                        <p class="text-sm text-red-400 mt-1">{msg}</p>
                    })}
                </div>

                {move || (!register_mode.get()).then(|| view! {
                    <div>
                        <label class="block text-sm text-gray-400 mb-1">"Password"</label>
                        <input
                            type="password"
                            class="w-full bg-gray-900 border border-gray-600 rounded-lg px-4 py-2 text-white"
                            prop:value=password
                            on:input=move |ev| set_password.set(event_target_value(&ev))
                        />
                        {move || password_error.get().map(|msg| view! {
                            <p class="text-sm text-red-400 mt-1">{msg}</p>
                        })}
                    </div>
                })}

                <button
                    class="w-full py-3 bg-blue-600 hover:bg-blue-700 disabled:opacity-50 text-white rounded-lg font-semibold"
                    disabled=submitting
                    on:click={
                        let submit_login = submit_login.clone();
                        move |_| {
                            if register_mode.get_untracked() {
                                request_otp();
                            } else {
                                submit_login();
                            }
                        }
                    }
                >
                    {move || if register_mode.get() { "Send code" } else { "Log in" }}
                </button>

                <p class="text-center text-sm text-gray-400">
                    {move || if register_mode.get() { "Already have an account? " } else { "New here? " }}
                    <button
                        class="text-blue-400 hover:text-blue-300"
                        on:click=move |_| {
                            set_register_mode.update(|m| *m = !*m);
                            set_email_error.set(None);
                            set_password_error.set(None);
                        }
                    >
                        {move || if register_mode.get() { "Log in" } else { "Register" }}
                    </button>
                </p>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slots(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn otp_code_joins_six_full_slots() {
        let digits = slots(&["1", "2", "3", "4", "5", "6"]);
        assert_eq!(otp_code(&digits), Some("123456".to_string()));
    }

    #[test]
    fn otp_code_rejects_partial_entry() {
        let digits = slots(&["1", "2", "", "4", "5", "6"]);
        assert_eq!(otp_code(&digits), None);
        assert_eq!(otp_code(&slots(&["1", "2", "3"])), None);
    }

    #[test]
    fn paste_fills_from_start_slot() {
        let mut digits = vec![String::new(); 6];
        let focus = apply_paste(&mut digits, 0, "123456");
        assert_eq!(otp_code(&digits), Some("123456".to_string()));
        assert_eq!(focus, 5);
    }

    #[test]
    fn paste_skips_non_digits_and_stops_at_the_end() {
        let mut digits = vec![String::new(); 6];
        let focus = apply_paste(&mut digits, 4, "9a8b7");
        assert_eq!(digits[4], "9");
        assert_eq!(digits[5], "8");
        assert_eq!(focus, 5);
        assert!(digits[..4].iter().all(String::is_empty));
    }
}
