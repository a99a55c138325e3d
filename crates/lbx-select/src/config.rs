#![forbid(unsafe_code)]

//! Construction-time configuration for a select control.

use crate::labels::Labels;
use crate::option::SelectOption;

/// Behaviour flags and presentation strings for one control.
///
/// `Default` is a single-select, required, non-searchable, enabled control
/// with id `"select"`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SelectConfig {
    /// Select a set of values instead of one.
    pub multiple: bool,
    /// An empty value is acceptable. In single mode this also shows the
    /// "no selection" pseudo-option.
    pub optional: bool,
    /// Show a search field that filters options by label.
    pub searchable: bool,
    /// Ignore all interaction except blur.
    pub disabled: bool,
    /// Shown when nothing is selected; also the pseudo-option's label.
    pub placeholder: String,
    /// Element id; listbox and error ids derive from it.
    pub id: String,
    /// Form field name for the submitted value.
    pub name: String,
    /// Localized strings.
    pub labels: Labels,
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self {
            multiple: false,
            optional: false,
            searchable: false,
            disabled: false,
            placeholder: String::new(),
            id: "select".to_owned(),
            name: String::new(),
            labels: Labels::default(),
        }
    }
}

impl SelectConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set multiple selection (builder).
    #[must_use]
    pub fn multiple(mut self, multiple: bool) -> Self {
        self.multiple = multiple;
        self
    }

    /// Set optional (builder).
    #[must_use]
    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    /// Set searchable (builder).
    #[must_use]
    pub fn searchable(mut self, searchable: bool) -> Self {
        self.searchable = searchable;
        self
    }

    /// Set disabled (builder).
    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Set the placeholder (builder).
    #[must_use]
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Set the element id (builder).
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the form field name (builder).
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the localized strings (builder).
    #[must_use]
    pub fn labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    /// Whether the pseudo-option applies to this control at all.
    #[must_use]
    pub fn has_pseudo_option(&self) -> bool {
        self.optional && !self.multiple
    }

    /// The synthetic "no selection" option.
    #[must_use]
    pub fn pseudo_option(&self) -> SelectOption {
        SelectOption::new("", self.placeholder.clone())
    }

    /// Id of the popup listbox element.
    #[must_use]
    pub fn listbox_id(&self) -> String {
        format!("{}-listbox", self.id)
    }

    /// Id of the error message element.
    #[must_use]
    pub fn error_id(&self) -> String {
        format!("error-{}", self.id)
    }
}
