#![forbid(unsafe_code)]

//! Transition effects.
//!
//! Every transition reports what happened as an ordered list of effects
//! instead of poking several state cells behind the host's back. Hosts act
//! on the ones they care about: forward notifications to the consumer,
//! move DOM/terminal focus, stop event propagation.

use smallvec::SmallVec;

use crate::error::SelectError;
use crate::value::SelectionValue;

/// Payload of change and blur notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValueEvent {
    /// The committed (or, on blur, current) value.
    pub value: SelectionValue,
    /// Required-value error, if the value violates it.
    pub error: Option<SelectError>,
}

/// One observable consequence of a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "effect", rename_all = "snake_case"))]
pub enum Effect {
    /// The listbox became visible.
    Opened,
    /// The listbox was hidden; visual focus is cleared with it.
    Closed,
    /// Visual focus moved (`None` = no focused row).
    FocusMoved {
        /// New flattened position.
        index: Option<usize>,
    },
    /// The search text changed.
    SearchChanged {
        /// New search text.
        text: String,
    },
    /// A selection change was committed (controlled: proposed).
    Changed(ValueEvent),
    /// Focus left the control.
    Blurred(ValueEvent),
    /// The host must not let the triggering key reach outer handlers.
    StopPropagation,
    /// The host should move input focus to the search field.
    FocusSearchInput,
}

impl Effect {
    /// Short stable name, used in logs and transcripts.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Opened => "opened",
            Self::Closed => "closed",
            Self::FocusMoved { .. } => "focus_moved",
            Self::SearchChanged { .. } => "search_changed",
            Self::Changed(_) => "changed",
            Self::Blurred(_) => "blurred",
            Self::StopPropagation => "stop_propagation",
            Self::FocusSearchInput => "focus_search_input",
        }
    }
}

/// Ordered effects of one transition. Most transitions emit at most a few.
pub type Effects = SmallVec<[Effect; 4]>;

/// Result of handling one event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transition {
    /// Effects in the order they happened.
    pub effects: Effects,
    /// Whether the control consumed the event. Unconsumed events (Enter on
    /// a closed listbox, Tab, unknown keys) belong to the host.
    pub handled: bool,
}

impl Transition {
    /// The change notification, if one was emitted.
    #[must_use]
    pub fn change(&self) -> Option<&ValueEvent> {
        self.effects.iter().find_map(|effect| match effect {
            Effect::Changed(event) => Some(event),
            _ => None,
        })
    }

    /// The blur notification, if one was emitted.
    #[must_use]
    pub fn blur(&self) -> Option<&ValueEvent> {
        self.effects.iter().find_map(|effect| match effect {
            Effect::Blurred(event) => Some(event),
            _ => None,
        })
    }

    /// Whether `effect` occurred.
    #[must_use]
    pub fn contains(&self, effect: &Effect) -> bool {
        self.effects.contains(effect)
    }
}
