//! Property-based tests for rule matching and name normalization.

#![allow(clippy::unwrap_used)]

use packlet_core::InclusionRules;
use packlet_core::bundle::CaseMatching;
use packlet_core::bundle::rules::archive_name;
use packlet_core::bundle::rules::is_file_included;
use packlet_core::bundle::rules::is_included;
use packlet_core::copy::CopyBuffer;
use packlet_core::copy::copy_with_buffer;
use proptest::prelude::*;
use std::path::PathBuf;

proptest! {
    /// Empty rules include every name.
    #[test]
    fn prop_empty_rules_include_everything(name in "[a-zA-Z0-9_./-]{0,60}") {
        prop_assert!(is_included(&name, &InclusionRules::new()));
    }

    /// The empty name is always included.
    #[test]
    fn prop_empty_name_always_included(
        fragments in prop::collection::vec("[a-z.]{1,8}", 0..4),
        suffixes in prop::collection::vec("[a-z.]{1,8}", 0..4)
    ) {
        let rules = InclusionRules::new()
            .exclude_fragments(fragments)
            .exclude_suffixes(suffixes);
        prop_assert!(is_included("", &rules));
    }

    /// A name containing an excluded fragment is never included.
    #[test]
    fn prop_fragment_excludes(
        before in "[a-z/]{0,20}",
        fragment in "[a-z.]{1,10}",
        after in "[a-z/]{0,20}"
    ) {
        let name = format!("{before}{fragment}{after}");
        let rules = InclusionRules::new().exclude_fragment(fragment);
        prop_assert!(!is_included(&name, &rules));
    }

    /// A name ending in an excluded suffix is never included.
    #[test]
    fn prop_suffix_excludes(stem in "[a-z/]{0,20}", suffix in "\\.[a-z]{1,5}") {
        let name = format!("{stem}{suffix}");
        let rules = InclusionRules::new().exclude_suffix(suffix);
        prop_assert!(!is_included(&name, &rules));
    }

    /// Insensitive matching agrees with sensitive matching on lower-cased input.
    #[test]
    fn prop_insensitive_equals_lowercased(
        name in "[a-zA-Z/.]{1,30}",
        fragment in "[a-zA-Z.]{1,6}"
    ) {
        let insensitive = InclusionRules::new()
            .exclude_fragment(fragment.clone())
            .with_case(CaseMatching::Insensitive);
        let lowered = InclusionRules::new().exclude_fragment(fragment.to_lowercase());
        prop_assert_eq!(
            is_included(&name, &insensitive),
            is_included(&name.to_lowercase(), &lowered)
        );
    }

    /// File inclusion is never looser than general inclusion.
    #[test]
    fn prop_file_rules_are_stricter(name in "[a-z/.]{1,30}", suffix in "\\.[a-z]{1,3}") {
        let rules = InclusionRules::new().include_suffix(suffix).exclude_fragment("tmp");
        if is_file_included(&name, &rules) {
            prop_assert!(is_included(&name, &rules));
        }
    }

    /// Archive names are `/`-joined, prefixed and never absolute.
    #[test]
    fn prop_archive_name_shape(
        prefix in "[a-z]{0,8}",
        components in prop::collection::vec("[a-zA-Z0-9_-]{1,12}", 1..6)
    ) {
        let relative: PathBuf = components.iter().collect();
        let name = archive_name(&prefix, &relative).unwrap();

        prop_assert!(!name.starts_with('/'));
        prop_assert!(!name.contains('\\'));
        prop_assert!(!name.contains("//"));
        let expected = if prefix.is_empty() {
            components.join("/")
        } else {
            format!("{prefix}/{}", components.join("/"))
        };
        prop_assert_eq!(name, expected);
    }

    /// Parent components are always rejected.
    #[test]
    fn prop_parent_component_rejected(
        head in prop::collection::vec("[a-z]{1,8}", 0..3),
        tail in prop::collection::vec("[a-z]{1,8}", 0..3)
    ) {
        let mut relative: PathBuf = head.iter().collect();
        relative.push("..");
        relative.extend(tail.iter());
        prop_assert!(archive_name("src", &relative).is_err());
    }

    /// Copying preserves every byte.
    #[test]
    fn prop_copy_preserves_data(data in prop::collection::vec(any::<u8>(), 0..200_000)) {
        let mut output = Vec::new();
        let copied = copy_with_buffer(&mut data.as_slice(), &mut output, &mut CopyBuffer::new()).unwrap();
        prop_assert_eq!(copied, data.len() as u64);
        prop_assert_eq!(output, data);
    }
}
