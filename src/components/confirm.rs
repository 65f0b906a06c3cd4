//! Confirm Dialog Component
//!
//! Modal used before discarding unsaved editor changes.

use leptos::*;

/// Modal confirmation dialog
#[component]
pub fn ConfirmDialog(
    #[prop(into)]
    visible: Signal<bool>,
    #[prop(into)]
    title: String,
    #[prop(into)]
    message: String,
    #[prop(into, default = "Discard".to_string())]
    confirm_label: String,
    on_confirm: Callback<()>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    view! {
        {move || {
            if !visible.get() {
                return view! {}.into_view();
            }
            let title = title.clone();
            let message = message.clone();
            let confirm_label = confirm_label.clone();
            view! {
                <div
                    class="fixed inset-0 z-50 bg-gray-900/70 flex items-center justify-center px-4"
                    on:click=move |_| on_cancel.call(())
                >
                    <div
                        class="bg-gray-800 rounded-lg shadow-xl max-w-sm w-full p-6"
                        on:click=|ev| ev.stop_propagation()
                    >
                        <h3 class="text-lg font-semibold text-white mb-2">{title}</h3>
                        <p class="text-sm text-gray-400 mb-6">{message}</p>
                        <div class="flex justify-end space-x-3">
                            <button
                                class="px-4 py-2 rounded-lg text-gray-300 hover:bg-gray-700 transition-colors"
                                on:click=move |_| on_cancel.call(())
                            >
                                "Keep editing"
                            </button>
                            <button
                                class="px-4 py-2 rounded-lg bg-red-600 hover:bg-red-700 text-white transition-colors"
                                on:click=move |_| on_confirm.call(())
                            >
                                {confirm_label}
                            </button>
                        </div>
                    </div>
                </div>
            }
            .into_view()
        }}
    }
}
