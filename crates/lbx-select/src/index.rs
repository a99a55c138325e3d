#![forbid(unsafe_code)]

//! Flattened index table over a (possibly grouped) option tree.
//!
//! Keyboard focus is a single integer addressing the Nth navigable row in
//! display order. [`FlatIndex`] is built once per displayed tree and maps
//! every position to its [`Slot`], so resolving the focused row on Enter is
//! a lookup instead of a rescan of the groups.
//!
//! When the optional pseudo-option is shown it always owns position 0 and
//! every real option shifts by one.

use crate::option::{Options, SelectOption};

/// What lives at a flattened position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// The synthetic "no selection" entry.
    Pseudo,
    /// A real option. `group` is `None` for flat collections.
    Option {
        /// Owning group, if the tree is grouped.
        group: Option<usize>,
        /// Position within the group (or within the flat list).
        offset: usize,
    },
}

/// A resolved flattened position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved<'a> {
    /// The pseudo-option.
    Pseudo,
    /// A real option from the tree the index was built from.
    Option(&'a SelectOption),
}

/// Position → slot table for one displayed option tree.
///
/// The table does not borrow the tree; [`FlatIndex::resolve`] must be given
/// the same tree that was passed to [`FlatIndex::build`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatIndex {
    slots: Vec<Slot>,
}

impl FlatIndex {
    /// Build the table for `options`.
    ///
    /// `with_pseudo` requests the pseudo-option at position 0. It is only
    /// placed when the tree has at least one option: an empty listbox shows
    /// no rows at all.
    #[must_use]
    pub fn build(options: &Options, with_pseudo: bool) -> Self {
        let mut slots = Vec::with_capacity(options.len() + usize::from(with_pseudo));
        if with_pseudo && !options.is_empty() {
            slots.push(Slot::Pseudo);
        }
        match options {
            Options::Flat(list) => {
                slots.extend((0..list.len()).map(|offset| Slot::Option {
                    group: None,
                    offset,
                }));
            }
            Options::Grouped(groups) => {
                for (group, g) in groups.iter().enumerate() {
                    slots.extend((0..g.options.len()).map(|offset| Slot::Option {
                        group: Some(group),
                        offset,
                    }));
                }
            }
        }
        Self { slots }
    }

    /// Number of navigable positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True when nothing is navigable.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Last navigable position, or `None` when the table is empty.
    #[must_use]
    pub fn last(&self) -> Option<usize> {
        self.slots.len().checked_sub(1)
    }

    /// Whether position 0 is the pseudo-option.
    #[must_use]
    pub fn has_pseudo(&self) -> bool {
        matches!(self.slots.first(), Some(Slot::Pseudo))
    }

    /// Slot at `position`.
    #[must_use]
    pub fn slot(&self, position: usize) -> Option<Slot> {
        self.slots.get(position).copied()
    }

    /// Resolve `position` against the tree the table was built from.
    #[must_use]
    pub fn resolve<'a>(&self, options: &'a Options, position: usize) -> Option<Resolved<'a>> {
        match (self.slot(position)?, options) {
            (Slot::Pseudo, _) => Some(Resolved::Pseudo),
            (Slot::Option { group: None, offset }, Options::Flat(list)) => {
                list.get(offset).map(Resolved::Option)
            }
            (
                Slot::Option {
                    group: Some(group),
                    offset,
                },
                Options::Grouped(groups),
            ) => groups
                .get(group)
                .and_then(|g| g.options.get(offset))
                .map(Resolved::Option),
            _ => None,
        }
    }

    /// Flattened position of the option with `value`, pseudo offset included.
    #[must_use]
    pub fn position_of(&self, options: &Options, value: &str) -> Option<usize> {
        options
            .find(value)
            .map(|(pos, _)| pos + usize::from(self.has_pseudo()))
    }
}
