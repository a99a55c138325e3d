//! Property-based invariant tests for the select engine.
//!
//! 1. Single-mode commit selects the committed option at its flattened index.
//! 2. Multiple-mode toggle is its own inverse.
//! 3. `previous_index` undoes `next_index` away from the wrap boundary.
//! 4. Filtering is idempotent.
//! 5. Optional controls never violate the required-value check.
//! 6. Arbitrary event sequences keep focus in range, keep closed state at
//!    the baseline, and keep multiple values duplicate-free.
//! 7. A disabled control never opens or changes value.

use lbx_select::prelude::*;
use lbx_select::{
    FlatIndex, commit, filter_by_search, next_index, previous_index, required_value_violated,
    selected_option,
};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

/// Options with unique values `v0..vN` and short random labels.
fn labels_to_flat(labels: Vec<String>) -> Options {
    labels
        .into_iter()
        .enumerate()
        .map(|(i, label)| SelectOption::new(format!("v{i}"), label))
        .collect()
}

fn labels_to_grouped(groups: Vec<Vec<String>>) -> Options {
    let mut next = 0usize;
    groups
        .into_iter()
        .enumerate()
        .map(|(g, labels)| {
            let options: Vec<SelectOption> = labels
                .into_iter()
                .map(|label| {
                    let option = SelectOption::new(format!("v{next}"), label);
                    next += 1;
                    option
                })
                .collect();
            OptionGroup::new(format!("group {g}"), options)
        })
        .collect()
}

fn options_strategy() -> impl Strategy<Value = Options> {
    let label = "[a-dA-D]{1,4}";
    prop_oneof![
        prop::collection::vec(label, 1..8).prop_map(labels_to_flat),
        prop::collection::vec(prop::collection::vec(label, 0..4), 1..4)
            .prop_map(labels_to_grouped),
    ]
}

fn config_strategy() -> impl Strategy<Value = SelectConfig> {
    (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(multiple, optional, searchable)| {
        SelectConfig::new()
            .multiple(multiple)
            .optional(optional)
            .searchable(searchable)
            .placeholder("None")
    })
}

fn event_strategy() -> impl Strategy<Value = SelectEvent> {
    let fixed = vec![
        SelectEvent::Activate,
        SelectEvent::key(KeyCode::Down),
        SelectEvent::key(KeyCode::Up),
        SelectEvent::key(KeyCode::Home),
        SelectEvent::key(KeyCode::End),
        SelectEvent::key(KeyCode::Tab),
        SelectEvent::key(KeyCode::Enter),
        SelectEvent::key(KeyCode::Escape),
        SelectEvent::key(KeyCode::Backspace),
        SelectEvent::click(""),
        SelectEvent::ClearSelection,
        SelectEvent::ClearSearch,
        SelectEvent::Focus,
        SelectEvent::Blur,
    ];
    prop_oneof![
        4 => prop::sample::select(fixed),
        1 => "[a-d]".prop_map(SelectEvent::SearchInput),
        1 => prop::char::range('a', 'd').prop_map(|c| SelectEvent::key(KeyCode::Char(c))),
        2 => (0usize..10).prop_map(|i| SelectEvent::click(format!("v{i}"))),
    ]
}

fn value_strategy() -> impl Strategy<Value = SelectionValue> {
    prop_oneof![
        "[a-c]{0,2}".prop_map(SelectionValue::single),
        prop::collection::vec("[a-c]{1,2}", 0..4).prop_map(SelectionValue::multiple),
    ]
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Single-mode commit
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn single_commit_selects_committed_option(
        options in options_strategy(),
        pick in any::<prop::sample::Index>(),
        optional in any::<bool>(),
    ) {
        let flat = options.flatten();
        prop_assume!(!flat.is_empty());
        let position = pick.index(flat.len());
        let option = flat[position];
        let pseudo = SelectOption::new("", "None");

        let value = commit(&SelectionValue::single(""), option);
        let selection = selected_option(&value, &options, optional, &pseudo);

        prop_assert_eq!(&selection.options, &vec![option]);
        prop_assert_eq!(selection.single_index, Some(position + usize::from(optional)));

        let index = FlatIndex::build(&options, optional);
        prop_assert_eq!(index.position_of(&options, &option.value), selection.single_index);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Toggle is its own inverse
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn multiple_toggle_is_involution(
        options in options_strategy(),
        picks in prop::collection::vec(any::<prop::sample::Index>(), 0..6),
        toggle in any::<prop::sample::Index>(),
    ) {
        let flat = options.flatten();
        prop_assume!(!flat.is_empty());
        let mut value = SelectionValue::empty(true);
        for pick in picks {
            value = commit(&value, flat[pick.index(flat.len())]);
        }
        let option = flat[toggle.index(flat.len())];

        let toggled = commit(&value, option);
        prop_assert_ne!(toggled.contains(&option.value), value.contains(&option.value));
        let restored = commit(&toggled, option);
        // Same set; a re-added value moves to the end of click order.
        let mut before = value.as_multiple().unwrap_or_default().to_vec();
        let mut after = restored.as_multiple().unwrap_or_default().to_vec();
        before.sort();
        after.sort();
        prop_assert_eq!(before, after);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. next/previous inverse
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn previous_undoes_next(last in 1usize..200, i in 0usize..200) {
        let i = i % last;
        prop_assert_eq!(previous_index(Some(next_index(Some(i), last)), last), i);
    }

    #[test]
    fn steps_stay_in_range(last in 0usize..200, current in proptest::option::of(0usize..200)) {
        let current = current.map(|c| c.min(last));
        prop_assert!(next_index(current, last) <= last);
        prop_assert!(previous_index(current, last) <= last);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Filter idempotence
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn filter_is_idempotent(options in options_strategy(), search in "[a-dA-D]{0,3}") {
        let once = filter_by_search(&options, &search);
        let twice = filter_by_search(&once, &search);
        prop_assert_eq!(&once, &twice);
        prop_assert_eq!(once.is_grouped(), options.is_grouped());
        prop_assert!(once.len() <= options.len());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Optional never violates
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn optional_never_violates(value in value_strategy()) {
        prop_assert!(!required_value_violated(&value, true));
        prop_assert_eq!(required_value_violated(&value, false), value.is_empty());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Event sequences preserve state invariants
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn event_sequences_preserve_invariants(
        options in options_strategy(),
        config in config_strategy(),
        events in prop::collection::vec(event_strategy(), 0..40),
    ) {
        let multiple = config.multiple;
        let mut select = Select::new(options, config);

        for event in events {
            let name = event.name();
            let transition = select.handle(event);
            let state = select.state();

            match (state.focus, select.last_index()) {
                (Some(focus), Some(last)) => prop_assert!(focus <= last, "{}: {} > {}", name, focus, last),
                (Some(focus), None) => prop_assert!(false, "{}: focus {} with nothing navigable", name, focus),
                (None, _) => {}
            }
            if !state.open {
                prop_assert_eq!(state.focus, None, "{}: closed with focus", name);
                prop_assert_eq!(state.search.as_str(), "", "{}: closed with search", name);
            }
            prop_assert_eq!(select.value().is_multiple(), multiple);
            if let Some(values) = select.value().as_multiple() {
                let mut unique = values.to_vec();
                unique.sort();
                unique.dedup();
                prop_assert_eq!(unique.len(), values.len(), "{}: duplicate values", name);
            }
            if let Some(change) = transition.change() {
                prop_assert_eq!(&change.value, select.value());
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. Disabled controls are inert
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn disabled_control_is_inert(
        options in options_strategy(),
        config in config_strategy(),
        events in prop::collection::vec(event_strategy(), 0..20),
    ) {
        let mut select = Select::new(options, config.disabled(true));
        let initial = select.value().clone();
        for event in events {
            let transition = select.handle(event);
            prop_assert!(!select.is_open());
            prop_assert!(transition.change().is_none());
        }
        prop_assert_eq!(select.value(), &initial);
    }
}
