use leptos::prelude::*;
use thaw::*;

/// Modal asking the user to confirm a destructive action.
#[component]
pub fn ConfirmDialog(
    open: RwSignal<bool>,
    #[prop(into)] title: String,
    #[prop(into)] message: Signal<String>,
    #[prop(optional, into)] confirm_label: Option<String>,
    on_confirm: Callback<()>,
) -> impl IntoView {
    let confirm_label = confirm_label.unwrap_or_else(|| "Delete".to_string());

    view! {
        <Dialog open=open>
            <DialogSurface class="max-w-md">
                <DialogBody>
                    <DialogTitle>{title}</DialogTitle>
                    <DialogContent>
                        <p class="text-ctp-subtext1">{move || message.get()}</p>
                    </DialogContent>
                    <DialogActions>
                        <button
                            on:click=move |_| open.set(false)
                            class="px-4 py-2 rounded border border-ctp-surface1 text-ctp-text hover:border-ctp-blue"
                        >
                            "Cancel"
                        </button>
                        <button
                            on:click=move |_| {
                                open.set(false);
                                on_confirm.run(());
                            }
                            class="px-4 py-2 rounded bg-ctp-red text-ctp-base font-medium hover:opacity-90"
                        >
                            {confirm_label}
                        </button>
                    </DialogActions>
                </DialogBody>
            </DialogSurface>
        </Dialog>
    }
}
