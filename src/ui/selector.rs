use std::hash::Hash;

use eframe::egui::{self, RichText};

const DEFAULT_PLACEHOLDER: &str = "No elements";

/// A named checkbox toggle paired with its inclusion test. The meaning of
/// the off state belongs to each filter's predicate, not to the widget.
pub struct ListSelectorFilter<E> {
    name: String,
    predicate: Box<dyn Fn(bool, &E) -> bool>,
}

impl<E> ListSelectorFilter<E> {
    pub fn new(name: impl Into<String>, predicate: impl Fn(bool, &E) -> bool + 'static) -> Self {
        Self {
            name: name.into(),
            predicate: Box::new(predicate),
        }
    }

    /// Whether the filter, in the given toggle state, keeps the element.
    #[must_use]
    pub fn accepts(&self, state: bool, element: &E) -> bool {
        (self.predicate)(state, element)
    }
}

struct FilterState<E> {
    filter: ListSelectorFilter<E>,
    enabled: bool,
}

type SearchPredicate<E> = Box<dyn Fn(&str, &E) -> bool>;

/// Filterable, searchable single-selection list over an arbitrary element
/// type. The widget owns its UI state (selection, search text, filter
/// toggles); the element list, labels, and placeholder are supplied on
/// every frame and never mutate that state. A changed element list leaves
/// the selection untouched, even when it no longer matches any row.
///
/// Elements need value equality and a stable hash: equality drives the
/// selected-row comparison, the hash keys row interaction ids.
pub struct ListSelector<E> {
    selected: Option<E>,
    search: String,
    filters: Vec<FilterState<E>>,
    search_predicate: Option<SearchPredicate<E>>,
}

impl<E: Clone + PartialEq + Hash> ListSelector<E> {
    pub fn new(filters: Vec<ListSelectorFilter<E>>) -> Self {
        Self {
            selected: None,
            search: String::new(),
            filters: filters
                .into_iter()
                .map(|filter| FilterState {
                    filter,
                    enabled: false,
                })
                .collect(),
            search_predicate: None,
        }
    }

    /// Seed the selection. This takes effect exactly once, here; the widget
    /// owns the selection afterwards.
    #[must_use]
    pub fn with_initial_selection(mut self, selection: Option<E>) -> Self {
        self.selected = selection;
        self
    }

    /// Replace the default search test (case-insensitive substring match
    /// against the display name).
    #[must_use]
    pub fn with_search_predicate(
        mut self,
        predicate: impl Fn(&str, &E) -> bool + 'static,
    ) -> Self {
        self.search_predicate = Some(Box::new(predicate));
        self
    }

    #[must_use]
    pub fn selected(&self) -> Option<&E> {
        self.selected.as_ref()
    }

    /// Render the widget and report the element clicked this frame, if any.
    /// A click also becomes the new selection before this returns.
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        elements: &[E],
        name_of: impl Fn(&E) -> String,
        placeholder: Option<&str>,
    ) -> Option<E> {
        let mut clicked = None;

        for state in &mut self.filters {
            ui.checkbox(&mut state.enabled, state.filter.name.as_str());
        }
        ui.add(
            egui::TextEdit::singleline(&mut self.search)
                .hint_text("Search...")
                .desired_width(f32::INFINITY),
        );
        ui.add_space(4.0);

        if elements.is_empty() {
            ui.vertical_centered(|ui| {
                ui.label(placeholder.unwrap_or(DEFAULT_PLACEHOLDER));
            });
            return None;
        }

        let visible = self.visible(elements, &name_of);
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for &element in &visible {
                    let is_selected = self.selected.as_ref() == Some(element);
                    let name = name_of(element);
                    let label = if is_selected {
                        RichText::new(name).strong()
                    } else {
                        RichText::new(name)
                    };
                    let row = ui
                        .push_id(element, |ui| ui.selectable_label(is_selected, label))
                        .inner;
                    if row.clicked() {
                        clicked = Some(self.choose(element));
                    }
                }
            });

        clicked
    }

    /// The elements that survive the current search string and filter
    /// toggles, in their original order. Search and filters combine by
    /// logical AND; a blank search string disables the search test.
    fn visible<'a>(&self, elements: &'a [E], name_of: &dyn Fn(&E) -> String) -> Vec<&'a E> {
        elements
            .iter()
            .filter(|element| self.passes_search(element, name_of))
            .filter(|element| {
                self.filters
                    .iter()
                    .all(|state| state.filter.accepts(state.enabled, element))
            })
            .collect()
    }

    fn passes_search(&self, element: &E, name_of: &dyn Fn(&E) -> String) -> bool {
        if self.search.trim().is_empty() {
            return true;
        }
        match &self.search_predicate {
            Some(predicate) => predicate(&self.search, element),
            None => name_of(element)
                .to_lowercase()
                .contains(&self.search.to_lowercase()),
        }
    }

    fn choose(&mut self, element: &E) -> E {
        self.selected = Some(element.clone());
        element.clone()
    }
}
