//! Field limits and identifier grammars shared by the validators.

use std::sync::LazyLock;

use regex::Regex;

pub const MAX_LENGTH_AUTHOR: usize = 64;
pub const MAX_LENGTH_LICENSE: usize = 32;
pub const MAX_LENGTH_NAME: usize = 64;
pub const MAX_LENGTH_NAMESPACE: usize = 39;
pub const MAX_LENGTH_TAG: usize = 64;
pub const MAX_LENGTH_URL: usize = 2000;
pub const MAX_LENGTH_VERSION: usize = 128;
pub const MAX_TAGS_COUNT: usize = 20;

pub const MAX_LEGACY_ROLE_LENGTH_VERSION: usize = 10;
pub const MAX_LEGACY_ROLE_LENGTH_COMPANY: usize = 50;
pub const MAX_LEGACY_ROLE_LENGTH_LICENSE: usize = 50;
pub const MAX_LEGACY_ROLE_LENGTH_DESCRIPTION: usize = 255;

/// Tags of which at least one must be present when the required-tag
/// policy is enabled.
pub const REQUIRED_TAG_LIST: &[&str] = &[
    "ai",
    "application",
    "cloud",
    "database",
    "eda",
    "infrastructure",
    "linux",
    "monitoring",
    "networking",
    "security",
    "storage",
    "tools",
    "windows",
];

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]+[0-9a-z_]*$").unwrap());

static LEGACY_NAMESPACE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-zA-Z0-9.]+[-_]?)+$").unwrap());

static LEGACY_ROLE_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]{1,55}$").unwrap());

/// Collection namespace, name, tag and dependency segment grammar.
///
/// Lowercase letter first, then lowercase letters, digits or underscores,
/// with no run of two underscores anywhere.
pub fn is_valid_name(value: &str) -> bool {
    !value.contains("__") && NAME_PATTERN.is_match(value)
}

pub fn is_valid_legacy_namespace(value: &str) -> bool {
    LEGACY_NAMESPACE_PATTERN.is_match(value)
}

pub fn is_valid_legacy_role_name(value: &str) -> bool {
    LEGACY_ROLE_NAME_PATTERN.is_match(value)
}

/// Length in characters, not bytes.
pub(crate) fn char_len(value: &str) -> usize {
    value.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ansible", true)]
    #[case("my_namespace", true)]
    #[case("ns2", true)]
    #[case("a_1_b", true)]
    #[case("", false)]
    #[case("_private", false)]
    #[case("1abc", false)]
    #[case("Upper", false)]
    #[case("double__underscore", false)]
    #[case("has-dash", false)]
    #[case("has.dot", false)]
    fn test_is_valid_name(#[case] value: &str, #[case] expected: bool) {
        assert_eq!(is_valid_name(value), expected, "{value:?}");
    }

    #[rstest]
    #[case("geerlingguy", true)]
    #[case("Some-User", true)]
    #[case("user.name", true)]
    #[case("a_b", true)]
    #[case("", false)]
    #[case("-leading", false)]
    #[case("double--dash", false)]
    #[case("space here", false)]
    fn test_is_valid_legacy_namespace(#[case] value: &str, #[case] expected: bool) {
        assert_eq!(is_valid_legacy_namespace(value), expected, "{value:?}");
    }

    #[rstest]
    #[case("apache", true)]
    #[case("my-role_2", true)]
    #[case("Role", true)]
    #[case("", false)]
    #[case("ns.role", false)]
    #[case("role!", false)]
    fn test_is_valid_legacy_role_name(#[case] value: &str, #[case] expected: bool) {
        assert_eq!(is_valid_legacy_role_name(value), expected, "{value:?}");
    }

    #[test]
    fn test_legacy_role_name_length_cap() {
        assert!(is_valid_legacy_role_name(&"r".repeat(55)));
        assert!(!is_valid_legacy_role_name(&"r".repeat(56)));
    }

    #[test]
    fn test_char_len_counts_characters() {
        assert_eq!(char_len("héllo"), 5);
    }
}
