#![forbid(unsafe_code)]

//! Pre-resolved localized strings.
//!
//! The engine consumes these as opaque text and never parses them. Hosts
//! resolve them from whatever translation system they use.

/// Localized strings a select control displays or attaches to errors.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Labels {
    /// Message carried by the required-value error.
    pub required_value_error: String,
    /// Title of the clear-selection action (multiple mode).
    pub clear_selection_title: String,
    /// Title of the clear-search action (searchable mode).
    pub clear_search_title: String,
    /// Marker appended to the field label of optional controls.
    pub optional_label: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            required_value_error: "This field is required. Please, enter a value.".to_owned(),
            clear_selection_title: "Clear selection".to_owned(),
            clear_search_title: "Clear search".to_owned(),
            optional_label: "(Optional)".to_owned(),
        }
    }
}

impl Labels {
    /// Set the required-value error message (builder).
    #[must_use]
    pub fn required_value_error(mut self, message: impl Into<String>) -> Self {
        self.required_value_error = message.into();
        self
    }

    /// Set the clear-selection title (builder).
    #[must_use]
    pub fn clear_selection_title(mut self, title: impl Into<String>) -> Self {
        self.clear_selection_title = title.into();
        self
    }

    /// Set the clear-search title (builder).
    #[must_use]
    pub fn clear_search_title(mut self, title: impl Into<String>) -> Self {
        self.clear_search_title = title.into();
        self
    }

    /// Set the optional marker (builder).
    #[must_use]
    pub fn optional_label(mut self, label: impl Into<String>) -> Self {
        self.optional_label = label.into();
        self
    }
}
