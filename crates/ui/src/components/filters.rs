//! Category tabs and the search box.

use std::collections::BTreeMap;

use leptos::prelude::*;
use playdeck_core::Selection;

/// One tab: the category value it selects and its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabOption {
    pub value: &'static str,
    pub label: &'static str,
}

impl TabOption {
    pub const ALL: Self = Self {
        value: "all",
        label: "All",
    };

    #[must_use]
    pub const fn new(value: &'static str, label: &'static str) -> Self {
        Self { value, label }
    }

    /// Tab label with its item count, when counts are known.
    #[must_use]
    pub fn caption(&self, counts: Option<&BTreeMap<String, usize>>) -> String {
        let count = counts.map(|counts| {
            if self.value == Self::ALL.value {
                counts.values().sum()
            } else {
                counts.get(self.value).copied().unwrap_or_default()
            }
        });
        match count {
            Some(count) => format!("{} ({count})", self.label),
            None => self.label.to_string(),
        }
    }
}

/// A row of tabs bound to a category selection.
#[component]
pub fn FilterTabs(
    options: Vec<TabOption>,
    selection: RwSignal<Selection>,
    #[prop(optional, into)] counts: Option<Signal<BTreeMap<String, usize>>>,
) -> impl IntoView {
    view! {
        <div class="filter-tabs">
            {options
                .into_iter()
                .map(|option| {
                    let is_active = move || {
                        selection.with(|current| current.as_str().eq_ignore_ascii_case(option.value))
                    };
                    view! {
                        <button
                            class:active=is_active
                            on:click=move |_| selection.set(Selection::parse(option.value))
                        >
                            {move || {
                                let counts = counts.map(|counts| counts.get());
                                option.caption(counts.as_ref())
                            }}
                        </button>
                    }
                })
                .collect_view()}
        </div>
    }
}

/// Free text search bound to a string signal.
#[component]
pub fn SearchBox(
    value: RwSignal<String>,
    #[prop(default = "Search...")] placeholder: &'static str,
) -> impl IntoView {
    view! {
        <input
            type="search"
            class="search-box"
            placeholder=placeholder
            prop:value=move || value.get()
            on:input=move |ev| value.set(event_target_value(&ev))
        />
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caption_with_and_without_counts() {
        let counts: BTreeMap<String, usize> =
            [("online".to_string(), 2), ("offline".to_string(), 1)].into();
        let online = TabOption::new("online", "Online");

        assert_eq!(online.caption(None), "Online");
        assert_eq!(online.caption(Some(&counts)), "Online (2)");
        assert_eq!(TabOption::ALL.caption(Some(&counts)), "All (3)");
        assert_eq!(TabOption::new("staging", "Staging").caption(Some(&counts)), "Staging (0)");
    }
}
