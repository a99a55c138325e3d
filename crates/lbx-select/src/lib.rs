#![forbid(unsafe_code)]

//! Interaction engine for select (combobox/listbox) controls.
//!
//! The crate decides, for every input event, how the selection value, the
//! listbox visibility, the keyboard-focused row, and the search text
//! change. It draws nothing: [`Select::view`] hands hosts a render-ready
//! projection and every transition reports its consequences as ordered
//! [`Effect`]s.
//!
//! # Layers
//!
//! - [`option`], [`filter`], [`index`], [`nav`]: the option tree, search
//!   filtering, flattened positions and focus stepping.
//! - [`value`], [`error`]: value commit semantics, ownership, and the
//!   required-value check.
//! - [`machine`]: the pure transition function and the [`Select`] control.
//! - [`view`]: display label, listbox rows, ARIA state.

pub mod config;
pub mod effect;
pub mod error;
pub mod filter;
pub mod index;
pub mod labels;
pub mod machine;
pub mod nav;
pub mod option;
pub mod value;
pub mod view;

pub use config::SelectConfig;
pub use effect::{Effect, Effects, Transition, ValueEvent};
pub use error::{ERROR_CODE_REQUIRED, SelectError, check_required, required_value_violated};
pub use filter::filter_by_search;
pub use index::{FlatIndex, Resolved, Slot};
pub use labels::Labels;
pub use machine::{Context, InteractionState, Select, SelectEvent, Step, transition};
pub use nav::{last_selectable_index, next_index, previous_index, shows_pseudo_option};
pub use option::{OptionGroup, Options, SelectOption};
pub use value::{Selection, SelectionValue, ValueSource, commit, selected_option};
pub use view::{AriaState, ListRow, SelectView};

pub use lbx_core::event::{Event, KeyCode, KeyEvent, KeyEventKind, Modifiers, PasteEvent};

/// Everything a host needs to drive a control.
pub mod prelude {
    pub use crate::{
        Effect, Event, KeyCode, KeyEvent, Labels, ListRow, Modifiers, OptionGroup, Options,
        Select, SelectConfig, SelectError, SelectEvent, SelectOption, SelectView, SelectionValue,
        Transition,
    };
}
