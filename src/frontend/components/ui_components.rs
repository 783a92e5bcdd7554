use leptos::prelude::*;
use patients_care::table::PaginationView;
use thaw::Spinner;

/// Table footer: page-size selector, item range and previous/next buttons.
///
/// Pages are zero-indexed here; the owner converts back.
#[component]
pub fn Pagination(
    #[prop(into)] pagination: Signal<PaginationView>,
    on_page: Callback<u32>,
    on_rows_per_page: Callback<u32>,
) -> impl IntoView {
    let summary = move || {
        pagination.with(|p| match p.item_range {
            Some((first, last)) => format!("{}-{} of {}", first, last, p.total_items),
            None => format!("0 of {}", p.total_items),
        })
    };

    view! {
        <div class="flex justify-end items-center gap-4 px-4 py-3 text-sm text-ctp-subtext0">
            <label class="flex items-center gap-2">
                "Rows per page:"
                <select
                    class="bg-ctp-surface0 border border-ctp-surface1 rounded px-2 py-1 text-ctp-text"
                    on:change=move |ev| {
                        if let Ok(size) = event_target_value(&ev).parse::<u32>() {
                            on_rows_per_page.run(size);
                        }
                    }
                >
                    {move || {
                        pagination
                            .with(|p| {
                                p.page_sizes
                                    .iter()
                                    .map(|size| {
                                        let size = *size;
                                        view! {
                                            <option value=size.to_string() selected={size == p.page_size}>
                                                {size}
                                            </option>
                                        }
                                    })
                                    .collect_view()
                            })
                    }}
                </select>
            </label>

            <span>{summary}</span>

            <button
                on:click=move |_| {
                    let p = pagination.get_untracked();
                    if p.has_previous {
                        on_page.run(p.display_page - 1);
                    }
                }
                disabled=move || !pagination.with(|p| p.has_previous)
                class="px-3 py-1 bg-ctp-surface0 border border-ctp-surface1 rounded text-ctp-text disabled:opacity-50 disabled:cursor-not-allowed hover:border-ctp-blue"
            >
                "←"
            </button>

            <span>
                "Page " {move || pagination.with(|p| p.display_page + 1)} " of "
                {move || pagination.with(|p| p.page_count.max(1))}
            </span>

            <button
                on:click=move |_| {
                    let p = pagination.get_untracked();
                    if p.has_next {
                        on_page.run(p.display_page + 1);
                    }
                }
                disabled=move || !pagination.with(|p| p.has_next)
                class="px-3 py-1 bg-ctp-surface0 border border-ctp-surface1 rounded text-ctp-text disabled:opacity-50 disabled:cursor-not-allowed hover:border-ctp-blue"
            >
                "→"
            </button>
        </div>
    }
}

/// Blocks interaction with whatever it is placed over.
#[component]
pub fn LoadingOverlay(#[prop(into)] visible: Signal<bool>) -> impl IntoView {
    view! {
        <Show when=move || visible.get()>
            <div class="absolute inset-0 z-10 flex items-center justify-center bg-ctp-base/60">
                <Spinner/>
            </div>
        </Show>
    }
}

#[component]
pub fn NotFoundView(#[prop(optional, into)] message: Option<String>) -> impl IntoView {
    let message = message.unwrap_or_else(|| "Nothing to show here.".to_string());
    view! {
        <div class="flex flex-col items-center justify-center py-16 text-ctp-subtext0">
            <h2 class="text-2xl font-bold text-ctp-text mb-2">"Not found"</h2>
            <p>{message}</p>
            <a href="/start" class="mt-4 text-ctp-blue hover:text-ctp-lavender underline">
                "Back to start"
            </a>
        </div>
    }
}
