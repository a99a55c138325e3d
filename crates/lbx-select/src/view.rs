#![forbid(unsafe_code)]

//! Render-ready projection of a [`Select`].
//!
//! [`Select::view`] flattens everything a host needs to draw the control
//! into plain data: the trigger text, the listbox rows with their element
//! ids, and the ARIA attributes. Hosts (terminal widgets, HTML templates,
//! test assertions) consume the view instead of re-deriving it from the
//! engine state.

use crate::machine::Select;
use crate::option::{Options, SelectOption};

/// ARIA attributes of the combobox trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AriaState {
    /// Always `"combobox"`.
    pub role: &'static str,
    /// Always `"listbox"`.
    pub haspopup: &'static str,
    /// `aria-expanded`.
    pub expanded: bool,
    /// `aria-controls`: the listbox id while open.
    pub controls: Option<String>,
    /// `aria-activedescendant`: the focused row id.
    pub active_descendant: Option<String>,
    /// `aria-required`: enabled and not optional.
    pub required: bool,
    /// `aria-disabled`.
    pub disabled: bool,
    /// `aria-invalid`: the last notification carried an error.
    pub invalid: bool,
    /// `aria-errormessage`: the error element id while invalid.
    pub error_message: Option<String>,
}

/// One row of the listbox.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "row", rename_all = "snake_case"))]
pub enum ListRow {
    /// A non-navigable group heading.
    GroupHeader {
        /// Group label.
        label: String,
    },
    /// A navigable option (or the pseudo-option).
    Option {
        /// Flattened position.
        index: usize,
        /// Element id, `option-{index}`.
        id: String,
        /// Option value (`""` for the pseudo-option).
        value: String,
        /// Display label.
        label: String,
        /// Part of the current value.
        selected: bool,
        /// Has visual focus.
        focused: bool,
        /// Cannot be committed.
        disabled: bool,
        /// The synthetic "no selection" row.
        pseudo: bool,
    },
}

/// Everything a host draws for one select control.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SelectView {
    /// Trigger text: selected label(s) or the placeholder.
    pub display_label: String,
    /// The trigger text is a placeholder or sits behind an open search.
    pub dimmed: bool,
    /// Whether the trigger text is shown at all (hidden while searching).
    pub show_selected_label: bool,
    /// Count badge in multiple mode; `None` when nothing is selected.
    pub selection_count: Option<usize>,
    /// Clear-selection action title, when the action is shown.
    pub clear_selection: Option<String>,
    /// Clear-search action title, when the action is shown.
    pub clear_search: Option<String>,
    /// The search matched nothing; the listbox shows an empty state.
    pub no_matches: bool,
    /// Listbox visibility.
    pub open: bool,
    /// Current search text.
    pub search: String,
    /// Marker for the field label of optional controls.
    pub optional_marker: Option<String>,
    /// Error message to show below the control.
    pub error: Option<String>,
    /// Hidden form field name; `None` when unnamed.
    pub form_name: Option<String>,
    /// Hidden form field value.
    pub form_value: String,
    /// Listbox element id.
    pub listbox_id: String,
    /// Listbox rows in display order (empty while closed).
    pub rows: Vec<ListRow>,
    /// Trigger ARIA attributes.
    pub aria: AriaState,
}

impl SelectView {
    /// Rows that can take focus, in order.
    pub fn option_rows(&self) -> impl Iterator<Item = &ListRow> {
        self.rows
            .iter()
            .filter(|row| matches!(row, ListRow::Option { .. }))
    }

    /// The row with visual focus.
    #[must_use]
    pub fn focused_row(&self) -> Option<&ListRow> {
        self.rows
            .iter()
            .find(|row| matches!(row, ListRow::Option { focused: true, .. }))
    }
}

/// Element id of the row at flattened position `index`.
#[must_use]
pub fn option_id(index: usize) -> String {
    format!("option-{index}")
}

impl Select {
    /// Trigger text: the selected label(s) joined by `", "`, or the
    /// placeholder when nothing is selected.
    #[must_use]
    pub fn display_label(&self) -> String {
        let selection = self.selection();
        if selection.placeholder || selection.options.is_empty() {
            return self.config().placeholder.clone();
        }
        let labels: Vec<&str> = selection
            .options
            .iter()
            .map(|option| option.label.as_str())
            .collect();
        labels.join(", ")
    }

    /// Build the render-ready view.
    #[must_use]
    pub fn view(&self) -> SelectView {
        let config = self.config();
        let value = self.value();
        let state = self.state();
        let error = self.last_error().filter(|_| !config.disabled);
        let searching = config.searchable && !state.search.is_empty();
        // Entries that match no option are not counted.
        let selected = self.selection().options.len();
        let has_selection = config.multiple && selected > 0;

        SelectView {
            display_label: self.display_label(),
            dimmed: value.is_empty() || (config.searchable && state.open),
            show_selected_label: !searching,
            selection_count: has_selection.then_some(selected),
            clear_selection: has_selection.then(|| config.labels.clear_selection_title.clone()),
            clear_search: searching.then(|| config.labels.clear_search_title.clone()),
            no_matches: config.searchable && self.index().is_empty(),
            open: state.open,
            search: state.search.clone(),
            optional_marker: config
                .optional
                .then(|| config.labels.optional_label.clone()),
            error: error.map(|e| e.message().to_owned()),
            form_name: (!config.name.is_empty()).then(|| config.name.clone()),
            form_value: value.form_value(),
            listbox_id: config.listbox_id(),
            rows: if state.open { self.rows() } else { Vec::new() },
            aria: AriaState {
                role: "combobox",
                haspopup: "listbox",
                expanded: state.open,
                controls: state.open.then(|| config.listbox_id()),
                active_descendant: state.focus.map(option_id),
                required: !config.disabled && !config.optional,
                disabled: config.disabled,
                invalid: error.is_some(),
                error_message: error.map(|_| config.error_id()),
            },
        }
    }

    fn rows(&self) -> Vec<ListRow> {
        let displayed = self.displayed();
        let value = self.value();
        let focus = self.visual_focus();
        let mut rows = Vec::with_capacity(self.index().len() + displayed_groups(displayed));
        let mut next = 0usize;

        let mut push = |rows: &mut Vec<ListRow>, option: &SelectOption, pseudo: bool| {
            let index = next;
            next += 1;
            rows.push(ListRow::Option {
                index,
                id: option_id(index),
                value: option.value.clone(),
                label: option.label.clone(),
                selected: value.contains(&option.value),
                focused: focus == Some(index),
                disabled: option.disabled,
                pseudo,
            });
        };

        if self.index().has_pseudo() {
            push(&mut rows, self.pseudo_option(), true);
        }
        match displayed {
            Options::Flat(options) => {
                for option in options {
                    push(&mut rows, option, false);
                }
            }
            Options::Grouped(groups) => {
                for group in groups.iter().filter(|g| !g.options.is_empty()) {
                    rows.push(ListRow::GroupHeader {
                        label: group.label.clone(),
                    });
                    for option in &group.options {
                        push(&mut rows, option, false);
                    }
                }
            }
        }
        rows
    }
}

fn displayed_groups(options: &Options) -> usize {
    match options {
        Options::Flat(_) => 0,
        Options::Grouped(groups) => groups.len(),
    }
}
