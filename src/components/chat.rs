//! Chat Widget Component
//!
//! Floating help widget: shows FAQ entries until the first question is
//! asked, then a message thread answered by the query endpoint.

use leptos::*;

use crate::api::client;
use crate::state::global::FaqItem;
use crate::utils::strip_markdown;

#[derive(Clone, Debug, PartialEq)]
struct ChatMessage {
    text: String,
    from_user: bool,
}

/// Floating chat/help widget
#[component]
pub fn ChatWidget() -> impl IntoView {
    let (open, set_open) = create_signal(false);
    let messages = create_rw_signal(Vec::<ChatMessage>::new());
    let faq = create_rw_signal(Vec::<FaqItem>::new());
    let faq_requested = store_value(false);
    let (input, set_input) = create_signal(String::new());
    let (pending, set_pending) = create_signal(false);

    let toggle = move |_| {
        let now_open = !open.get_untracked();
        set_open.set(now_open);
        // FAQ is fetched once, on first open
        if now_open && !faq_requested.get_value() {
            faq_requested.set_value(true);
            spawn_local(async move {
                match client::fetch_faq().await {
                    Ok(items) => faq.set(items),
                    Err(e) => {
                        web_sys::console::warn_1(&format!("FAQ unavailable: {}", e).into());
                    }
                }
            });
        }
    };

    let send = move || {
        let question = input.get_untracked().trim().to_string();
        if question.is_empty() || pending.get_untracked() {
            return;
        }
        set_input.set(String::new());
        messages.update(|m| {
            m.push(ChatMessage {
                text: question.clone(),
                from_user: true,
            })
        });
        set_pending.set(true);
        spawn_local(async move {
            let reply = match client::send_query(&question).await {
                Ok(answer) => strip_markdown(&answer),
                Err(e) => {
                    web_sys::console::error_1(&format!("Query failed: {}", e).into());
                    "Sorry, something went wrong. Please try again.".to_string()
                }
            };
            messages.update(|m| {
                m.push(ChatMessage {
                    text: reply,
                    from_user: false,
                })
            });
            set_pending.set(false);
        });
    };

    view! {
        <div class="fixed bottom-4 right-4 z-40">
            // Popup panel
            {move || open.get().then(|| view! {
                <div class="w-80 h-96 bg-gray-800 border border-gray-700 rounded-lg shadow-xl flex flex-col mb-3">
                    <div class="flex items-center justify-between px-4 py-3 border-b border-gray-700">
                        <span class="font-semibold text-white">"Ask about events"</span>
                        <button
                            class="text-gray-400 hover:text-white"
                            on:click=move |_| set_open.set(false)
                        >
                            "✕"
                        </button>
                    </div>

                    <div class="flex-1 overflow-y-auto p-4 space-y-3">
                        // FAQ shown until the first question
                        {move || messages.get().is_empty().then(|| view! {
                            <div class="space-y-2">
                                <p class="text-xs text-gray-500 uppercase tracking-wide">
                                    "Frequently asked"
                                </p>
                                {move || faq.get().into_iter().map(|item| {
                                    let question = item.question.clone();
                                    view! {
                                        <button
                                            class="block w-full text-left text-sm text-blue-400 hover:text-blue-300"
                                            on:click=move |_| {
                                                set_input.set(question.clone());
                                                send();
                                            }
                                        >
                                            {item.question}
                                        </button>
                                    }
                                }).collect_view()}
                            </div>
                        })}

                        {move || messages.get().into_iter().map(|msg| {
                            let bubble = if msg.from_user {
                                "ml-8 bg-blue-600 text-white"
                            } else {
                                "mr-8 bg-gray-700 text-gray-200"
                            };
                            view! {
                                <div class=format!("rounded-lg px-3 py-2 text-sm whitespace-pre-wrap {}", bubble)>
                                    {msg.text}
                                </div>
                            }
                        }).collect_view()}

                        {move || pending.get().then(|| view! {
                            <div class="mr-8 bg-gray-700 text-gray-400 rounded-lg px-3 py-2 text-sm italic">
                                "Thinking..."
                            </div>
                        })}
                    </div>

                    <div class="flex items-center space-x-2 p-3 border-t border-gray-700">
                        <input
                            type="text"
                            class="flex-1 bg-gray-900 border border-gray-600 rounded-lg px-3 py-2 text-sm text-white"
                            placeholder="Type a question..."
                            prop:value=input
                            on:input=move |ev| set_input.set(event_target_value(&ev))
                            on:keydown=move |ev| {
                                if ev.key() == "Enter" {
                                    send();
                                }
                            }
                        />
                        <button
                            class="px-3 py-2 bg-blue-600 hover:bg-blue-700 disabled:opacity-50 text-white rounded-lg text-sm"
                            disabled=move || pending.get() || input.get().trim().is_empty()
                            on:click=move |_| send()
                        >
                            "Send"
                        </button>
                    </div>
                </div>
            })}

            // Launcher button
            {move || (!open.get()).then(|| view! {
                <button
                    class="w-14 h-14 rounded-full bg-blue-600 hover:bg-blue-700 text-white text-2xl shadow-lg"
                    on:click=toggle
                >
                    "💬"
                </button>
            })}
        </div>
    }
}
