#![forbid(unsafe_code)]

//! Navigation index calculator.
//!
//! Visual focus is `Option<usize>`: `None` means "no keyboard focus", which
//! behaves as "before the first slot" for stepping. Both step functions are
//! total over `None ∪ [0, last]` and wrap at the edges.

use crate::option::Options;

/// Whether the optional pseudo-option is displayed above `displayed`.
///
/// Only single-select optional controls have one, and only while the
/// displayed collection has rows.
#[must_use]
pub fn shows_pseudo_option(displayed: &Options, optional: bool, multiple: bool) -> bool {
    optional && !multiple && !displayed.is_empty()
}

/// Last navigable flattened position.
///
/// Counts `filtered` when `searchable`, `options` otherwise, plus one slot
/// for the pseudo-option. Returns `None` when nothing is navigable; callers
/// check this before dispatching Enter or arrow handling.
#[must_use]
pub fn last_selectable_index(
    options: &Options,
    filtered: &Options,
    searchable: bool,
    optional: bool,
    multiple: bool,
) -> Option<usize> {
    let displayed = if searchable { filtered } else { options };
    let count = displayed.len();
    if count == 0 {
        return None;
    }
    Some(count + usize::from(shows_pseudo_option(displayed, optional, multiple)) - 1)
}

/// Step focus forward, wrapping from `last` to 0.
#[must_use]
pub fn next_index(current: Option<usize>, last: usize) -> usize {
    match current {
        Some(i) if i < last => i + 1,
        Some(_) => 0,
        None => 0,
    }
}

/// Step focus backward, wrapping from 0 (or no focus) to `last`.
#[must_use]
pub fn previous_index(current: Option<usize>, last: usize) -> usize {
    match current {
        Some(0) | None => last,
        Some(i) => (i - 1).min(last),
    }
}
