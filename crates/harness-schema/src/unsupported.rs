//! # Unsupported Tests
//!
//! Known, documented limitations, keyed by `(case description, instance
//! description)`. Consulted only after a case has failed: a match turns
//! the failure into a `skipped` outcome carrying the entry's reason.

const OPTIONAL_VOCABULARIES: &str = "We do not support optional vocabularies";

/// A test the harness knows it cannot run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnsupportedTest {
    /// Case description, matched exactly.
    pub case: &'static str,
    /// Instance description, matched exactly.
    pub test: &'static str,
    /// Message reported in the `skipped` outcome.
    pub reason: &'static str,
}

/// Every known limitation.
pub const UNSUPPORTED_TESTS: &[UnsupportedTest] = &[
    UnsupportedTest {
        case: "schema that uses custom metaschema with with no validation vocabulary",
        test: "no validation: valid number",
        reason: OPTIONAL_VOCABULARIES,
    },
    UnsupportedTest {
        case: "schema that uses custom metaschema with with no validation vocabulary",
        test: "no validation: invalid number, but it still validates",
        reason: OPTIONAL_VOCABULARIES,
    },
    UnsupportedTest {
        case: "ignore unrecognized optional vocabulary",
        test: "string value",
        reason: OPTIONAL_VOCABULARIES,
    },
    UnsupportedTest {
        case: "ignore unrecognized optional vocabulary",
        test: "number value",
        reason: OPTIONAL_VOCABULARIES,
    },
];

/// Reason the `(case, test)` pair is unsupported, if it is.
pub fn reason(case: &str, test: &str) -> Option<&'static str> {
    UNSUPPORTED_TESTS
        .iter()
        .find(|entry| entry.case == case && entry.test == test)
        .map(|entry| entry.reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_pair_has_reason() {
        assert_eq!(
            reason("ignore unrecognized optional vocabulary", "string value"),
            Some("We do not support optional vocabularies")
        );
    }

    #[test]
    fn match_requires_both_descriptions() {
        assert_eq!(
            reason("ignore unrecognized optional vocabulary", "boolean value"),
            None
        );
        assert_eq!(reason("some other case", "string value"), None);
        assert_eq!(reason("", ""), None);
    }

    #[test]
    fn entries_are_unique() {
        let mut keys: Vec<_> = UNSUPPORTED_TESTS.iter().map(|e| (e.case, e.test)).collect();
        let total = keys.len();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), total);
    }

    #[test]
    fn every_entry_has_a_reason() {
        for entry in UNSUPPORTED_TESTS {
            assert!(!entry.reason.is_empty(), "{entry:?}");
            assert_eq!(reason(entry.case, entry.test), Some(entry.reason));
        }
    }
}
