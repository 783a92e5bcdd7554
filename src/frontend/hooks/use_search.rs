use leptos::prelude::*;

/// Return type for use_search hook
pub struct UseSearchReturn {
    pub search_input: ReadSignal<String>,
    pub on_immediate_change: Callback<String>,
    pub on_debounced_change: Callback<String>,
}

/// Hook for managing the text of a debounced search box.
///
/// `initial` seeds the box, so a search restored from the store shows up
/// again after navigation. `on_search` receives debounced values only.
///
/// # Example
/// ```rust
/// let search = use_search(query.search.clone(), list.on_search);
///
/// view! {
///     <SearchInput
///         value=search.search_input
///         on_change=search.on_debounced_change
///         on_immediate_change=search.on_immediate_change
///     />
/// }
/// ```
pub fn use_search(initial: String, on_search: Callback<String>) -> UseSearchReturn {
    let (search_input, set_search_input) = signal(initial);

    let on_immediate_change = Callback::new(move |value: String| {
        set_search_input.set(value);
    });

    let on_debounced_change = Callback::new(move |value: String| {
        on_search.run(value);
    });

    UseSearchReturn {
        search_input,
        on_immediate_change,
        on_debounced_change,
    }
}
