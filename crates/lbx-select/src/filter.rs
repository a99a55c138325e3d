#![forbid(unsafe_code)]

//! Search-driven filter projection.

use crate::option::{OptionGroup, Options, SelectOption};

/// Project `options` onto the entries whose label contains `search`.
///
/// Matching is a case-insensitive substring test on the label. The output
/// keeps the input shape: a group survives with only its matching options,
/// and a group left with no options is dropped rather than emitted empty.
///
/// This never touches the visual focus. Positions computed against the
/// previous projection are meaningless afterwards; the caller resets focus.
#[must_use]
pub fn filter_by_search(options: &Options, search: &str) -> Options {
    let needle = search.to_lowercase();
    let keep = |option: &&SelectOption| option.label.to_lowercase().contains(&needle);

    match options {
        Options::Flat(list) => Options::Flat(list.iter().filter(keep).cloned().collect()),
        Options::Grouped(groups) => Options::Grouped(
            groups
                .iter()
                .filter_map(|group| {
                    let matching: Vec<SelectOption> =
                        group.options.iter().filter(keep).cloned().collect();
                    (!matching.is_empty()).then(|| OptionGroup {
                        label: group.label.clone(),
                        options: matching,
                    })
                })
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat() -> Options {
        vec![
            SelectOption::new("a", "Alpha"),
            SelectOption::new("b", "Beta"),
            SelectOption::new("g", "Gamma"),
        ]
        .into()
    }

    fn values(options: &Options) -> Vec<&str> {
        options.iter().map(|o| o.value.as_str()).collect()
    }

    #[test]
    fn case_insensitive_substring() {
        let filtered = filter_by_search(&flat(), "AL");
        assert_eq!(values(&filtered), ["a"]);
        let filtered = filter_by_search(&flat(), "a");
        assert_eq!(values(&filtered), ["a", "b", "g"]);
    }

    #[test]
    fn empty_search_keeps_everything() {
        assert_eq!(filter_by_search(&flat(), ""), flat());
    }

    #[test]
    fn groups_without_matches_are_dropped() {
        let options = Options::Grouped(vec![
            OptionGroup::new("Greek", [SelectOption::new("a", "Alpha")]),
            OptionGroup::new("Latin", [SelectOption::new("x", "Ex")]),
        ]);
        let filtered = filter_by_search(&options, "ex");
        match filtered {
            Options::Grouped(groups) => {
                assert_eq!(groups.len(), 1);
                assert_eq!(groups[0].label, "Latin");
            }
            Options::Flat(_) => panic!("shape changed"),
        }
    }

    #[test]
    fn no_match_yields_empty_same_shape() {
        let filtered = filter_by_search(&flat(), "zzz");
        assert!(!filtered.is_grouped());
        assert!(filtered.is_empty());
    }

    #[test]
    fn non_ascii_labels_fold_case() {
        let options: Options = vec![SelectOption::new("e", "Émile")].into();
        assert_eq!(values(&filter_by_search(&options, "émi")), ["e"]);
    }
}
