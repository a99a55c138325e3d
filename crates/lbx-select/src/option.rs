#![forbid(unsafe_code)]

//! Option model.
//!
//! A collection is either a flat list of [`SelectOption`]s or a list of
//! [`OptionGroup`]s. Mixing the two shapes is a caller contract violation;
//! the [`Options`] enum makes it unrepresentable instead of checking for it.
//!
//! Grouping is kept for display. The flattened order (groups in order, then
//! options within each group) is only an indexing aid for keyboard focus,
//! see [`crate::index::FlatIndex`].

/// A single selectable entry.
///
/// Identity is `value`. Uniqueness is assumed, not enforced.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectOption {
    /// Value committed when the option is chosen.
    pub value: String,
    /// Pre-resolved display label; also the search target.
    pub label: String,
    /// Disabled options are navigable but cannot be committed.
    #[cfg_attr(feature = "serde", serde(default))]
    pub disabled: bool,
}

impl SelectOption {
    /// Create an enabled option.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            disabled: false,
        }
    }

    /// Set the disabled flag (builder).
    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

/// A labelled group of options.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptionGroup {
    /// Group header label.
    pub label: String,
    /// Options in display order.
    pub options: Vec<SelectOption>,
}

impl OptionGroup {
    /// Create a group.
    pub fn new(label: impl Into<String>, options: impl IntoIterator<Item = SelectOption>) -> Self {
        Self {
            label: label.into(),
            options: options.into_iter().collect(),
        }
    }
}

/// An option collection: flat or grouped, never mixed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Options {
    /// A plain sequence of options.
    Flat(Vec<SelectOption>),
    /// A sequence of option groups.
    Grouped(Vec<OptionGroup>),
}

impl Default for Options {
    fn default() -> Self {
        Self::Flat(Vec::new())
    }
}

impl Options {
    /// Whether the collection uses the group shape.
    #[must_use]
    pub fn is_grouped(&self) -> bool {
        matches!(self, Self::Grouped(_))
    }

    /// Number of options after flattening (group headers do not count).
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Flat(options) => options.len(),
            Self::Grouped(groups) => groups.iter().map(|g| g.options.len()).sum(),
        }
    }

    /// True when there is no option at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True iff at least one option exists (some group is non-empty).
    ///
    /// The listbox refuses to open when this is false.
    #[must_use]
    pub fn has_any_selectable(&self) -> bool {
        match self {
            Self::Flat(options) => !options.is_empty(),
            Self::Grouped(groups) => groups.iter().any(|g| !g.options.is_empty()),
        }
    }

    /// Iterate options in flattened display order.
    pub fn iter(&self) -> impl Iterator<Item = &SelectOption> + '_ {
        let (flat, grouped) = match self {
            Self::Flat(options) => (Some(options.iter()), None),
            Self::Grouped(groups) => (None, Some(groups.iter().flat_map(|g| g.options.iter()))),
        };
        flat.into_iter().flatten().chain(grouped.into_iter().flatten())
    }

    /// Flattened view of the collection, preserving group order.
    #[must_use]
    pub fn flatten(&self) -> Vec<&SelectOption> {
        self.iter().collect()
    }

    /// Find an option by value, returning its flattened position.
    #[must_use]
    pub fn find(&self, value: &str) -> Option<(usize, &SelectOption)> {
        self.iter().enumerate().find(|(_, option)| option.value == value)
    }
}

impl From<Vec<SelectOption>> for Options {
    fn from(options: Vec<SelectOption>) -> Self {
        Self::Flat(options)
    }
}

impl From<Vec<OptionGroup>> for Options {
    fn from(groups: Vec<OptionGroup>) -> Self {
        Self::Grouped(groups)
    }
}

impl FromIterator<SelectOption> for Options {
    fn from_iter<I: IntoIterator<Item = SelectOption>>(iter: I) -> Self {
        Self::Flat(iter.into_iter().collect())
    }
}

impl FromIterator<OptionGroup> for Options {
    fn from_iter<I: IntoIterator<Item = OptionGroup>>(iter: I) -> Self {
        Self::Grouped(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grouped() -> Options {
        Options::Grouped(vec![
            OptionGroup::new(
                "Greek",
                [SelectOption::new("a", "Alpha"), SelectOption::new("b", "Beta")],
            ),
            OptionGroup::new("Empty", []),
            OptionGroup::new("Latin", [SelectOption::new("x", "Ex")]),
        ])
    }

    #[test]
    fn flat_shape_is_not_grouped() {
        let options: Options = vec![SelectOption::new("a", "Alpha")].into();
        assert!(!options.is_grouped());
        assert_eq!(options.len(), 1);
    }

    #[test]
    fn grouped_len_counts_options_not_headers() {
        let options = grouped();
        assert!(options.is_grouped());
        assert_eq!(options.len(), 3);
    }

    #[test]
    fn flatten_preserves_group_order() {
        let options = grouped();
        let values: Vec<&str> = options.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, ["a", "b", "x"]);
        assert_eq!(options.flatten().len(), 3);
    }

    #[test]
    fn find_reports_flattened_position() {
        let options = grouped();
        let (pos, option) = options.find("x").expect("x exists");
        assert_eq!(pos, 2);
        assert_eq!(option.label, "Ex");
        assert!(options.find("zz").is_none());
    }

    #[test]
    fn selectable_requires_a_non_empty_group() {
        assert!(grouped().has_any_selectable());
        let empty_groups = Options::Grouped(vec![OptionGroup::new("Empty", [])]);
        assert!(!empty_groups.has_any_selectable());
        assert!(!Options::default().has_any_selectable());
    }

    #[test]
    fn disabled_builder() {
        let option = SelectOption::new("a", "Alpha").disabled(true);
        assert!(option.disabled);
    }
}
