//! Leptos rendering of [`patients_care::table::Table`].
//!
//! All decisions (sort cycling, selection, page events) are delegated to the
//! core table; this component only draws its projection and forwards intents.

use leptos::children::ViewFn;
use leptos::prelude::*;
use patients_care::table::{
    CheckState, Columns, Pagination as PageState, Sort, Table, TableIntent, TableProps, TableRow,
    TableView,
};

use super::ui_components::{LoadingOverlay, Pagination};

#[component]
pub fn DataTable<T>(
    /// Toolbar title while nothing is selected
    #[prop(into)]
    name: String,
    #[prop(optional)] selectable: bool,
    columns: Columns<T>,
    /// Rows of the current page
    #[prop(into)]
    data: Signal<Vec<T>>,
    #[prop(into)] is_loading: Signal<bool>,
    #[prop(into)] pagination: Signal<PageState>,
    #[prop(into)] sort: Signal<Sort>,
    on_intent: Callback<TableIntent>,
    /// Shown below the toolbar while the filter area is open
    #[prop(optional, into)]
    filter: Option<ViewFn>,
    /// Bulk actions for the selected rows
    #[prop(optional)]
    selected_items_options: Option<Callback<Vec<T>, AnyView>>,
    /// Trailing per-row cell, given the row id
    #[prop(optional)]
    row_actions: Option<Callback<String, AnyView>>,
) -> impl IntoView
where
    T: TableRow + Clone + PartialEq + Send + Sync + 'static,
{
    let table = RwSignal::new(Table::new(name).selectable(selectable));
    let columns = StoredValue::new(columns);
    let has_actions = row_actions.is_some();

    // New rows prune the selection to ids still shown.
    Effect::new(move || {
        data.with(|rows| table.update(|t| t.sync_rows(rows)));
    });

    let view_model = Memo::new(move |_| -> TableView<String> {
        let is_loading = is_loading.get();
        let pagination = pagination.get();
        table.with(|t| {
            data.with(|rows| {
                sort.with(|sort| {
                    columns.with_value(|columns| {
                        t.project(&TableProps {
                            is_loading,
                            columns,
                            data: rows,
                            pagination,
                            sort,
                        })
                    })
                })
            })
        })
    });

    let on_header_click = move |key: String| {
        let intent = table.with_untracked(|t| {
            sort.with_untracked(|sort| {
                columns.with_value(|columns| t.click_header_key(columns, &key, sort))
            })
        });
        if let Some(intent) = intent {
            on_intent.run(intent);
        }
    };

    let on_page = Callback::new(move |display_index: u32| {
        on_intent.run(table.with_untracked(|t| t.page_event(display_index)));
    });

    let on_rows_per_page = Callback::new(move |size: u32| {
        if let Some(intent) = table.with_untracked(|t| t.rows_per_page_event(size)) {
            on_intent.run(intent);
        }
    });

    let selection_actions = move || {
        let callback = selected_items_options?;
        if !view_model.with(|v| v.show_selection_actions) {
            return None;
        }
        let selected = data.with(|rows| {
            table.with(|t| t.selected_rows(rows).into_iter().cloned().collect::<Vec<T>>())
        });
        Some(callback.run(selected))
    };

    let header_checkbox = move || {
        view_model.with(|v| v.header_checkbox).map(|state| {
            view! {
                <th class="w-10 px-4 py-3">
                    <input
                        type="checkbox"
                        prop:checked={state == CheckState::Checked}
                        prop:indeterminate={state == CheckState::Indeterminate}
                        on:change=move |_| {
                            data.with_untracked(|rows| table.update(|t| t.toggle_all(rows)));
                        }
                    />
                </th>
            }
        })
    };

    let headers = move || {
        view_model.with(|v| {
            v.headers
                .iter()
                .map(|header| {
                    let key = header.key.clone();
                    let arrow = header.direction.map(|d| d.arrow()).unwrap_or("");
                    let sortable = header.sortable;
                    view! {
                        <th
                            class="px-4 py-3 text-left font-semibold text-ctp-subtext1 select-none"
                            class:cursor-pointer=sortable
                            class:text-ctp-blue={header.is_active()}
                            on:click=move |_| on_header_click(key.clone())
                        >
                            {header.title.clone()} " " {arrow}
                        </th>
                    }
                })
                .collect_view()
        })
    };

    let rows = move || {
        view_model.with(|v| {
            v.rows
                .iter()
                .map(|row| {
                    let id = row.id.clone();
                    let checkbox = row.selected.map(|checked| {
                        let id = id.clone();
                        view! {
                            <td class="px-4 py-2">
                                <input
                                    type="checkbox"
                                    prop:checked=checked
                                    on:change=move |_| table.update(|t| t.toggle_row(&id))
                                />
                            </td>
                        }
                    });
                    let actions = row_actions.map(|callback| {
                        view! { <td class="px-4 py-2 text-right">{callback.run(id.clone())}</td> }
                    });
                    view! {
                        <tr
                            class="border-t border-ctp-surface1 hover:bg-ctp-surface0"
                            class:bg-ctp-surface0={row.selected == Some(true)}
                        >
                            {checkbox}
                            {row
                                .cells
                                .iter()
                                .map(|cell| view! { <td class="px-4 py-2 text-ctp-text">{cell.clone()}</td> })
                                .collect_view()}
                            {actions}
                        </tr>
                    }
                })
                .collect_view()
        })
    };

    let filter_area = move || {
        let filter = filter.clone()?;
        view_model.with(|v| v.filter_open).then(|| {
            view! { <div class="px-4 pb-3">{filter.run()}</div> }
        })
    };

    view! {
        <div class="relative rounded-lg border border-ctp-surface1 bg-ctp-mantle">
            <div class="flex justify-between items-center px-4 py-3">
                <h3
                    class="text-lg font-semibold"
                    class:text-ctp-mauve=move || view_model.with(|v| v.show_selection_actions)
                    class:text-ctp-text=move || !view_model.with(|v| v.show_selection_actions)
                >
                    {move || view_model.with(|v| v.title.to_string())}
                </h3>
                <div class="flex items-center gap-2">
                    {selection_actions}
                    <button
                        on:click=move |_| table.update(|t| t.toggle_filter())
                        class="px-3 py-1 rounded border border-ctp-surface1 text-ctp-subtext1 hover:border-ctp-blue"
                    >
                        "Filter"
                    </button>
                </div>
            </div>

            {filter_area}

            <div class="overflow-x-auto">
                <table class="w-full text-sm">
                    <thead>
                        <tr>
                            {header_checkbox}
                            {headers}
                            {has_actions.then(|| view! { <th class="px-4 py-3"></th> })}
                        </tr>
                    </thead>
                    <tbody>{rows}</tbody>
                </table>
            </div>

            <Pagination
                pagination=Signal::derive(move || view_model.with(|v| v.pagination.clone()))
                on_page
                on_rows_per_page
            />

            <LoadingOverlay visible=Signal::derive(move || view_model.with(|v| v.loading_overlay))/>
        </div>
    }
}
