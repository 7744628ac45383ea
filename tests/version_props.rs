//! Property tests for the version model and the splice primitive.

use proptest::prelude::*;
use relbump::span::{splice, Span};
use relbump::version;

/// `major.minor.patch` triples with optional prerelease/build suffixes drawn
/// from the identifier alphabet semver accepts.
fn version_strings() -> impl Strategy<Value = String> {
    let identifier = "[a-zA-Z][a-zA-Z0-9]{0,6}";
    (
        0u64..1000,
        0u64..1000,
        0u64..1000,
        proptest::option::of(identifier),
        proptest::option::of("[a-zA-Z0-9]{1,8}"),
    )
        .prop_map(|(major, minor, patch, pre, build)| {
            let mut s = format!("{major}.{minor}.{patch}");
            if let Some(pre) = pre {
                s.push('-');
                s.push_str(&pre);
            }
            if let Some(build) = build {
                s.push('+');
                s.push_str(&build);
            }
            s
        })
}

proptest! {
    #[test]
    fn prop_parse_to_string_round_trip(input in version_strings()) {
        let parsed = version::parse(&input).unwrap();
        prop_assert_eq!(parsed.to_string(), input);
    }

    #[test]
    fn prop_release_version_is_idempotent(input in version_strings()) {
        let parsed = version::parse(&input).unwrap();
        let released = version::release_version(&parsed);
        prop_assert_eq!(version::release_version(&released), released.clone());
        prop_assert!(released.pre.is_empty());
        prop_assert!(released.build.is_empty());
    }

    #[test]
    fn prop_next_dev_is_a_snapshot_above_the_release(input in version_strings()) {
        let parsed = version::parse(&input).unwrap();
        let next = version::next_dev_version(&parsed).unwrap();
        prop_assert_eq!(next.pre.as_str(), version::SNAPSHOT);
        prop_assert!(next > version::release_version(&parsed));
    }

    #[test]
    fn prop_splice_preserves_bytes_outside_the_span(
        prefix in "[a-z: #\n]{0,40}",
        value in "[0-9]{1,3}\\.[0-9]{1,3}\\.[0-9]{1,3}",
        suffix in "[a-z: #\n]{0,40}",
        replacement in "[0-9]{1,4}\\.[0-9]{1,4}\\.[0-9]{1,4}",
    ) {
        let text = format!("{prefix}{value}{suffix}");
        let span = Span::new(prefix.len(), prefix.len() + value.len(), value.clone());

        let patched = splice(&text, &span, &replacement).unwrap();
        prop_assert_eq!(&patched[..span.begin], prefix.as_str());
        prop_assert_eq!(&patched[span.begin..span.begin + replacement.len()], replacement.as_str());
        prop_assert_eq!(&patched[span.begin + replacement.len()..], suffix.as_str());
    }

    #[test]
    fn prop_identity_splice_is_identity(
        prefix in "[a-z: \n]{0,40}",
        value in "[0-9]{1,3}\\.[0-9]{1,3}\\.[0-9]{1,3}",
        suffix in "[a-z: \n]{0,40}",
    ) {
        let text = format!("{prefix}{value}{suffix}");
        let span = Span::new(prefix.len(), prefix.len() + value.len(), value);
        prop_assert_eq!(splice(&text, &span, &span.value).unwrap(), text);
    }
}
