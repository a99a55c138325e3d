#![forbid(unsafe_code)]

//! Value resolution: selection values, ownership, and commit semantics.
//!
//! # Ownership
//!
//! A control either owns its value ([`ValueSource::Owned`], mutated on each
//! commit) or observes a value owned by the host ([`ValueSource::Observed`],
//! never mutated by the engine; commits are only proposed through change
//! notifications and come back via [`ValueSource::observe`]). The variant is
//! chosen at construction and cannot change afterwards.

use crate::option::{Options, SelectOption};

/// The committed selection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum SelectionValue {
    /// One option's value, or `""` for nothing.
    Single(String),
    /// Selected values in click order, without duplicates.
    Multiple(Vec<String>),
}

impl Default for SelectionValue {
    fn default() -> Self {
        Self::Single(String::new())
    }
}

impl SelectionValue {
    /// A single-mode value.
    pub fn single(value: impl Into<String>) -> Self {
        Self::Single(value.into())
    }

    /// A multiple-mode value. Later duplicates are dropped.
    pub fn multiple<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        let mut out: Vec<String> = Vec::new();
        for value in values {
            let value = value.into();
            if !out.contains(&value) {
                out.push(value);
            }
        }
        Self::Multiple(out)
    }

    /// The empty value for the given mode.
    #[must_use]
    pub fn empty(multiple: bool) -> Self {
        if multiple {
            Self::Multiple(Vec::new())
        } else {
            Self::Single(String::new())
        }
    }

    /// Whether this is a multiple-mode value.
    #[must_use]
    pub fn is_multiple(&self) -> bool {
        matches!(self, Self::Multiple(_))
    }

    /// `""` in single mode, no entries in multiple mode.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(value) => value.is_empty(),
            Self::Multiple(values) => values.is_empty(),
        }
    }

    /// Whether `value` is (one of) the selected values.
    #[must_use]
    pub fn contains(&self, value: &str) -> bool {
        match self {
            Self::Single(current) => current == value,
            Self::Multiple(values) => values.iter().any(|v| v == value),
        }
    }

    /// Number of selected values (0 or 1 in single mode).
    #[must_use]
    pub fn count(&self) -> usize {
        match self {
            Self::Single(value) => usize::from(!value.is_empty()),
            Self::Multiple(values) => values.len(),
        }
    }

    /// The single-mode value.
    #[must_use]
    pub fn as_single(&self) -> Option<&str> {
        match self {
            Self::Single(value) => Some(value),
            Self::Multiple(_) => None,
        }
    }

    /// The multiple-mode values.
    #[must_use]
    pub fn as_multiple(&self) -> Option<&[String]> {
        match self {
            Self::Single(_) => None,
            Self::Multiple(values) => Some(values),
        }
    }

    /// Reshape a value supplied for the wrong mode.
    ///
    /// A single value becomes a one-element set (or the empty set for `""`);
    /// a set collapses to its first entry.
    #[must_use]
    pub fn conform(self, multiple: bool) -> Self {
        match (self, multiple) {
            (Self::Single(value), true) if value.is_empty() => Self::Multiple(Vec::new()),
            (Self::Single(value), true) => Self::Multiple(vec![value]),
            (Self::Multiple(values), false) => {
                Self::Single(values.into_iter().next().unwrap_or_default())
            }
            (value, _) => value,
        }
    }

    /// The value after committing `option`.
    ///
    /// Single mode replaces the value wholesale. Multiple mode toggles: an
    /// already-selected value is removed, anything else is appended, so
    /// committing the same option twice restores the previous set.
    #[must_use]
    pub fn committed(&self, option: &SelectOption) -> Self {
        match self {
            Self::Single(_) => Self::Single(option.value.clone()),
            Self::Multiple(values) => {
                if values.iter().any(|v| *v == option.value) {
                    Self::Multiple(
                        values
                            .iter()
                            .filter(|v| **v != option.value)
                            .cloned()
                            .collect(),
                    )
                } else {
                    let mut next = values.clone();
                    next.push(option.value.clone());
                    Self::Multiple(next)
                }
            }
        }
    }

    /// Value submitted with a form: the single value, or the set joined by `,`.
    #[must_use]
    pub fn form_value(&self) -> String {
        match self {
            Self::Single(value) => value.clone(),
            Self::Multiple(values) => values.join(","),
        }
    }
}

impl From<&str> for SelectionValue {
    fn from(value: &str) -> Self {
        Self::single(value)
    }
}

impl From<String> for SelectionValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<String>> for SelectionValue {
    fn from(values: Vec<String>) -> Self {
        Self::multiple(values)
    }
}

impl From<Vec<&str>> for SelectionValue {
    fn from(values: Vec<&str>) -> Self {
        Self::multiple(values)
    }
}

/// Apply `option` to `current` under single/multiple semantics.
#[must_use]
pub fn commit(current: &SelectionValue, option: &SelectOption) -> SelectionValue {
    current.committed(option)
}

/// Who owns the selection value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Uncontrolled: the engine holds and mutates the value.
    Owned(SelectionValue),
    /// Controlled: the host owns the value; the engine only reads it.
    Observed(SelectionValue),
}

impl ValueSource {
    /// The value transitions read.
    #[must_use]
    pub fn current(&self) -> &SelectionValue {
        match self {
            Self::Owned(value) | Self::Observed(value) => value,
        }
    }

    /// Whether the host owns the value.
    #[must_use]
    pub fn is_controlled(&self) -> bool {
        matches!(self, Self::Observed(_))
    }

    /// Store a committed value. Returns `false` for observed values, which
    /// only change when the host calls [`ValueSource::observe`].
    pub fn apply(&mut self, next: SelectionValue) -> bool {
        match self {
            Self::Owned(value) => {
                *value = next;
                true
            }
            Self::Observed(_) => false,
        }
    }

    /// Accept a new value from the host. Returns `false` for owned values.
    pub fn observe(&mut self, next: SelectionValue) -> bool {
        match self {
            Self::Observed(value) => {
                *value = next;
                true
            }
            Self::Owned(_) => false,
        }
    }
}

/// The option(s) a value currently points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection<'a> {
    /// Selected options in display order (at most one in single mode).
    pub options: Vec<&'a SelectOption>,
    /// Navigation index of the single selection, pseudo-option offset
    /// included. Always `None` in multiple mode.
    pub single_index: Option<usize>,
    /// True when the pseudo-option stands in for "nothing selected".
    pub placeholder: bool,
}

impl Selection<'_> {
    /// Index an arrow key may jump to: a real single selection only.
    #[must_use]
    pub fn jump_target(&self) -> Option<usize> {
        if self.placeholder {
            None
        } else {
            self.single_index
        }
    }
}

/// Resolve `value` against the full (unfiltered) option tree.
///
/// Single mode scans the flattened options for a value match; with none and
/// `optional`, the pseudo-option is selected at index 0. Multiple mode
/// returns every option whose value is in the set and no single index.
#[must_use]
pub fn selected_option<'a>(
    value: &SelectionValue,
    options: &'a Options,
    optional: bool,
    pseudo: &'a SelectOption,
) -> Selection<'a> {
    match value {
        SelectionValue::Multiple(values) => Selection {
            options: options
                .iter()
                .filter(|option| values.contains(&option.value))
                .collect(),
            single_index: None,
            placeholder: false,
        },
        SelectionValue::Single(current) => {
            let found = if current.is_empty() {
                None
            } else {
                options.find(current)
            };
            match found {
                Some((pos, option)) => Selection {
                    options: vec![option],
                    single_index: Some(pos + usize::from(optional)),
                    placeholder: false,
                },
                None if optional => Selection {
                    options: vec![pseudo],
                    single_index: Some(0),
                    placeholder: true,
                },
                None => Selection {
                    options: Vec::new(),
                    single_index: None,
                    placeholder: false,
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two() -> Options {
        vec![SelectOption::new("a", "Alpha"), SelectOption::new("b", "Beta")].into()
    }

    #[test]
    fn single_commit_replaces() {
        let next = SelectionValue::single("a").committed(&SelectOption::new("b", "Beta"));
        assert_eq!(next, SelectionValue::single("b"));
    }

    #[test]
    fn multiple_commit_toggles_in_click_order() {
        let alpha = SelectOption::new("a", "Alpha");
        let beta = SelectOption::new("b", "Beta");
        let value = SelectionValue::empty(true).committed(&beta).committed(&alpha);
        assert_eq!(value, SelectionValue::multiple(["b", "a"]));
        assert_eq!(commit(&value, &beta), SelectionValue::multiple(["a"]));
    }

    #[test]
    fn multiple_constructor_drops_duplicates() {
        assert_eq!(
            SelectionValue::multiple(["a", "b", "a"]),
            SelectionValue::Multiple(vec!["a".into(), "b".into()])
        );
    }

    #[test]
    fn conform_reshapes_between_modes() {
        assert_eq!(SelectionValue::single("a").conform(true), SelectionValue::multiple(["a"]));
        assert_eq!(SelectionValue::single("").conform(true), SelectionValue::empty(true));
        assert_eq!(
            SelectionValue::multiple(["b", "a"]).conform(false),
            SelectionValue::single("b")
        );
        assert_eq!(SelectionValue::empty(true).conform(false), SelectionValue::empty(false));
    }

    #[test]
    fn form_value_joins_sets() {
        assert_eq!(SelectionValue::multiple(["a", "b"]).form_value(), "a,b");
        assert_eq!(SelectionValue::single("a").form_value(), "a");
    }

    #[test]
    fn owned_applies_observed_does_not() {
        let mut owned = ValueSource::Owned(SelectionValue::single(""));
        assert!(owned.apply(SelectionValue::single("a")));
        assert_eq!(owned.current(), &SelectionValue::single("a"));
        assert!(!owned.observe(SelectionValue::single("b")));

        let mut observed = ValueSource::Observed(SelectionValue::single("a"));
        assert!(observed.is_controlled());
        assert!(!observed.apply(SelectionValue::single("b")));
        assert_eq!(observed.current(), &SelectionValue::single("a"));
        assert!(observed.observe(SelectionValue::single("b")));
        assert_eq!(observed.current(), &SelectionValue::single("b"));
    }

    #[test]
    fn selected_single_reports_flattened_index() {
        let options = two();
        let pseudo = SelectOption::new("", "None");
        let selection = selected_option(&SelectionValue::single("b"), &options, false, &pseudo);
        assert_eq!(selection.options[0].value, "b");
        assert_eq!(selection.single_index, Some(1));
        assert_eq!(selection.jump_target(), Some(1));
    }

    #[test]
    fn optional_shifts_index_and_falls_back_to_pseudo() {
        let options = two();
        let pseudo = SelectOption::new("", "None");
        let selection = selected_option(&SelectionValue::single("b"), &options, true, &pseudo);
        assert_eq!(selection.single_index, Some(2));

        let selection = selected_option(&SelectionValue::single(""), &options, true, &pseudo);
        assert!(selection.placeholder);
        assert_eq!(selection.single_index, Some(0));
        assert_eq!(selection.options, vec![&pseudo]);
        assert_eq!(selection.jump_target(), None);
    }

    #[test]
    fn required_without_match_selects_nothing() {
        let options = two();
        let pseudo = SelectOption::new("", "");
        let selection = selected_option(&SelectionValue::single("zz"), &options, false, &pseudo);
        assert!(selection.options.is_empty());
        assert_eq!(selection.single_index, None);
    }

    #[test]
    fn multiple_selection_in_display_order() {
        let options = two();
        let pseudo = SelectOption::new("", "");
        let value = SelectionValue::multiple(["b", "a"]);
        let selection = selected_option(&value, &options, false, &pseudo);
        let values: Vec<&str> = selection.options.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, ["a", "b"]);
        assert_eq!(selection.single_index, None);
    }
}
