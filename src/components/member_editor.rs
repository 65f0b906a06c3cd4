//! Member Editor Component
//!
//! Inline team-member editor rendered on the event detail and summary
//! pages. The state machine lives in `state::editor`; this component
//! binds it to the DOM, guards close against unsaved changes, and
//! submits the member list.

use leptos::*;

use crate::api::client;
use crate::components::confirm::ConfirmDialog;
use crate::state::editor::{MemberEditor, RemoveOutcome, RowField};
use crate::state::global::GlobalState;

/// Inline editor panel for one registration.
///
/// `editor` is `None` while closed; the parent opens it by setting a
/// seeded [`MemberEditor`]. `on_saved` fires after a successful submit,
/// once the editor has closed.
#[component]
pub fn MemberEditorPanel(
    #[prop(into)]
    event_key: String,
    editor: RwSignal<Option<MemberEditor>>,
    on_saved: Callback<()>,
) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let (confirm_discard, set_confirm_discard) = create_signal(false);
    let (saving, set_saving) = create_signal(false);

    let request_close = move || {
        let dirty = editor
            .with_untracked(|e| e.as_ref().map(MemberEditor::is_dirty))
            .unwrap_or(false);
        if dirty {
            set_confirm_discard.set(true);
        } else {
            editor.set(None);
        }
    };

    let remove_row = move |index: usize| {
        let mut outcome = RemoveOutcome::Removed;
        editor.update(|e| {
            if let Some(e) = e {
                outcome = e.remove_row(index);
            }
        });
        // Removing the sole remaining row means "never mind": close
        // without touching the server, no discard prompt
        if outcome == RemoveOutcome::Close {
            editor.set(None);
        }
    };

    let save = move |event_key: String| {
        if let Some(msg) =
            editor.with_untracked(|e| e.as_ref().and_then(MemberEditor::validation_error))
        {
            state.show_error(msg);
            return;
        }
        let payload = editor
            .with_untracked(|e| e.as_ref().map(MemberEditor::well_formed_payload))
            .unwrap_or_default();
        if payload.is_empty() {
            state.show_error("Please add at least one participant name");
            return;
        }
        set_saving.set(true);
        spawn_local(async move {
            match client::submit_registration(&event_key, payload).await {
                Ok(()) => {
                    state.show_success("Registration saved");
                    editor.set(None);
                    on_saved.call(());
                }
                Err(e) => state.show_error(&format!("Failed to save: {}", e)),
            }
            set_saving.set(false);
        });
    };

    let save_key = event_key.clone();

    view! {
        {move || editor.get().map(|ed| {
            let save_key = save_key.clone();
            view! {
                <div class="mt-4 bg-gray-900 border border-gray-700 rounded-lg p-4 space-y-3">
                    <div class="flex items-center justify-between">
                        <span class="text-sm font-semibold text-white">
                            "Participants "
                            <span class="text-gray-500 font-normal">
                                {format!("({}/{})", ed.rows().len(), ed.capacity())}
                            </span>
                        </span>
                        <button
                            class="text-gray-400 hover:text-white text-sm"
                            on:click=move |_| request_close()
                        >
                            "✕"
                        </button>
                    </div>

                    {ed.rows().iter().enumerate().map(|(i, row)| view! {
                        <div class="grid grid-cols-2 md:grid-cols-5 gap-2 items-center">
                            <MemberField index=i field=RowField::Name value=row.name.clone()
                                placeholder="Name" editor=editor />
                            <MemberField index=i field=RowField::Email value=row.email.clone()
                                placeholder="Email" editor=editor />
                            <MemberField index=i field=RowField::Class value=row.class.clone()
                                placeholder="Class" editor=editor />
                            <MemberField index=i field=RowField::Phone value=row.phone.clone()
                                placeholder="Phone" editor=editor />
                            <button
                                class="px-2 py-2 text-red-400 hover:text-red-300 text-sm text-left"
                                on:click=move |_| remove_row(i)
                            >
                                "Remove"
                            </button>
                        </div>
                    }).collect_view()}

                    <div class="flex items-center justify-between pt-2">
                        <button
                            class="px-3 py-2 rounded-lg text-sm text-blue-400 hover:text-blue-300 disabled:opacity-50 disabled:hover:text-blue-400"
                            disabled=!ed.can_add()
                            on:click=move |_| editor.update(|e| {
                                if let Some(e) = e {
                                    e.add_row();
                                }
                            })
                        >
                            "+ Add participant"
                        </button>
                        <div class="space-x-2">
                            <button
                                class="px-4 py-2 rounded-lg text-sm text-gray-300 hover:bg-gray-700"
                                on:click=move |_| request_close()
                            >
                                "Cancel"
                            </button>
                            <button
                                class="px-4 py-2 rounded-lg text-sm bg-blue-600 hover:bg-blue-700 disabled:opacity-50 text-white"
                                disabled=saving
                                on:click=move |_| save(save_key.clone())
                            >
                                {move || if saving.get() { "Saving..." } else { "Save" }}
                            </button>
                        </div>
                    </div>
                </div>
            }
        })}

        <ConfirmDialog
            visible=confirm_discard
            title="Discard changes?"
            message="You have unsaved changes to this registration. Discard them?"
            on_confirm=Callback::new(move |_| {
                set_confirm_discard.set(false);
                editor.set(None);
            })
            on_cancel=Callback::new(move |_| set_confirm_discard.set(false))
        />
    }
}

/// One bound input cell of a member row.
///
/// Commits on `change` rather than `input`: the row list re-renders when
/// the editor state mutates, and committing per keystroke would rebuild
/// the input mid-typing and drop focus.
#[component]
fn MemberField(
    index: usize,
    field: RowField,
    value: String,
    placeholder: &'static str,
    editor: RwSignal<Option<MemberEditor>>,
) -> impl IntoView {
    view! {
        <input
            type="text"
            class="bg-gray-800 border border-gray-600 rounded-lg px-3 py-2 text-sm text-white"
            placeholder=placeholder
            prop:value=value
            on:change=move |ev| {
                let value = event_target_value(&ev);
                editor.update(|e| {
                    if let Some(e) = e {
                        e.set_field(index, field, value.clone());
                    }
                });
            }
        />
    }
}
