//! Tests for collection metadata construction and validation

use galaxy_schema::{CollectionInfo, CollectionInfoBuilder, Error, ValidationPolicy};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;
use serde_json::json;

fn minimal() -> CollectionInfoBuilder {
    CollectionInfo::builder()
        .namespace("acme")
        .name("widgets")
        .version("1.2.3")
        .license(["MIT"])
        .authors(["Jane Doe"])
        .repository("https://example.com/acme/widgets")
        .readme("README.md")
}

fn build_err(builder: CollectionInfoBuilder, policy: &ValidationPolicy) -> String {
    match builder.build(policy) {
        Ok(info) => panic!("expected failure, built {}", info.label()),
        Err(err) => {
            assert!(err.is_invalid_metadata(), "unexpected error kind: {err:?}");
            err.to_string()
        }
    }
}

fn default_err(builder: CollectionInfoBuilder) -> String {
    build_err(builder, &ValidationPolicy::default())
}

// ============================================================================
// Successful construction
// ============================================================================

#[test]
fn test_full_metadata() {
    let info = minimal()
        .description("Widgets for everyone")
        .documentation("https://docs.example.com")
        .homepage("https://example.com")
        .issues("https://example.com/issues")
        .tags(["tools", "linux"])
        .dependency("acme.core", ">=1.0.0,<2.0.0")
        .dependency("other.lib", "*")
        .build(&ValidationPolicy::default())
        .unwrap();

    assert_eq!(info.description(), Some("Widgets for everyone"));
    assert_eq!(info.tags(), ["tools", "linux"]);
    assert_eq!(info.dependencies().len(), 2);
    assert!(info.dependencies()["other.lib"].is_any());
    assert!(info.dependencies()["acme.core"].satisfies("1.5.0"));
}

#[test]
fn test_from_manifest_value() {
    let value = json!({
        "namespace": "acme",
        "name": "widgets",
        "version": "1.0.0",
        "license": [],
        "license_file": "LICENSE",
        "authors": ["Jane Doe"],
        "repository": "https://example.com/acme/widgets",
        "readme": "README.md",
        "tags": [],
        "dependencies": {}
    });

    let info = CollectionInfo::from_value(value, &ValidationPolicy::default()).unwrap();
    assert!(info.license().is_empty());
    assert_eq!(info.license_file(), Some("LICENSE"));
}

// ============================================================================
// Field checks
// ============================================================================

#[rstest]
#[case("namespace", json!(null), "'namespace' is required")]
#[case("namespace", json!(""), "'namespace' is required")]
#[case("namespace", json!("Acme"), "'namespace' has invalid format: Acme")]
#[case("namespace", json!("acme__x"), "'namespace' has invalid format: acme__x")]
#[case("name", json!("1widgets"), "'name' has invalid format: 1widgets")]
#[case("readme", json!(""), "'readme' is required")]
#[case("repository", json!(null), "'repository' is required")]
#[case("authors", json!([]), "'authors' is required")]
#[case("tags", json!(["Bad-Tag"]), "'tag' has invalid format: Bad-Tag")]
#[case("license", json!("MIT"), "Expecting 'license' to be a list of strings")]
fn test_field_rejection(#[case] field: &str, #[case] value: serde_json::Value, #[case] message: &str) {
    let err = default_err(minimal().field(field, value));
    assert_eq!(err, format!("Invalid collection metadata. {message}"));
}

#[test]
fn test_name_length_limit() {
    let err = default_err(minimal().name("a".repeat(65)));
    assert!(err.contains("'name' must not be greater than 64 characters"));
}

#[test]
fn test_version_not_semver() {
    let err = default_err(minimal().version("1.0"));
    assert!(err.contains("Expecting 'version' to be in semantic version format, instead found '1.0'."));
}

#[test]
fn test_unknown_license_lists_invalid_ids() {
    let err = default_err(minimal().license(["MIT", "NOT-A-LICENSE"]));
    assert!(err.contains("invalid license identifiers: 'NOT-A-LICENSE'"));
}

#[test]
fn test_deprecated_license_rejected() {
    let err = default_err(minimal().license(["GPL-2.0"]));
    assert!(err.contains("'GPL-2.0'"));
}

#[test]
fn test_too_many_tags() {
    let tags: Vec<String> = (0..21).map(|i| format!("tag{i}")).collect();
    let err = default_err(minimal().tags(tags));
    assert!(err.contains("Expecting no more than 20 tags in metadata"));
}

#[test]
fn test_url_length_limit() {
    let url = format!("https://example.com/{}", "x".repeat(2000));
    let err = default_err(minimal().homepage(url));
    assert!(err.contains("'homepage' must not be greater than 2000 characters"));
}

#[test]
fn test_unknown_field_rejected() {
    let err = default_err(minimal().field("build_ignore", json!([])));
    assert!(err.contains("unknown field in collection_info: 'build_ignore'"));
}

#[test]
fn test_first_failure_wins() {
    // Both namespace and version are invalid; namespace is checked first.
    let err = default_err(minimal().namespace("BAD").version("nope"));
    assert!(err.contains("'namespace' has invalid format"));
}

// ============================================================================
// License / license_file
// ============================================================================

#[test]
fn test_license_and_license_file_exclusive() {
    let err = default_err(minimal().license_file("LICENSE"));
    assert!(err.contains("The 'license' and 'license_file' keys are mutually exclusive"));
}

#[test]
fn test_license_or_license_file_required() {
    let err = default_err(minimal().license(Vec::<String>::new()));
    assert!(err.contains("Valid values for 'license' or 'license_file' are required."));
}

#[test]
fn test_empty_license_file_counts_as_missing() {
    let err = default_err(minimal().license(Vec::<String>::new()).license_file(""));
    assert!(err.contains("are required"));
}

// ============================================================================
// Dependencies
// ============================================================================

#[test]
fn test_self_dependency() {
    let err = default_err(minimal().dependency("acme.widgets", ">=1.0.0"));
    assert!(err.contains("Cannot have self dependency"));
}

#[rstest]
#[case("acme")]
#[case("acme.core.extra")]
#[case("Acme.core")]
fn test_dependency_key_format(#[case] key: &str) {
    let err = default_err(minimal().dependency(key, "*"));
    assert!(err.contains("Invalid dependency format"), "{err}");
}

#[test]
fn test_dependency_range_invalid() {
    let err = default_err(minimal().dependency("acme.core", ">=banana"));
    assert!(err.contains("Dependency version spec range invalid: acme.core >=banana"));
}

#[test]
fn test_dependency_value_must_be_string() {
    let err = default_err(minimal().field("dependencies", json!({"acme.core": 1})));
    assert!(err.contains("Expecting depencency version to be string"));
}

#[test]
fn test_single_equals_dependency_accepted() {
    let info = minimal()
        .dependency("acme.core", "=1.0.0")
        .build(&ValidationPolicy::default())
        .unwrap();
    assert!(info.dependencies()["acme.core"].satisfies("1.0.0"));
    assert!(!info.dependencies()["acme.core"].satisfies("1.0.1"));
}

#[rstest]
#[case("^18446744073709551615.0.0")]
#[case("~1.18446744073709551615.0")]
#[case("^0.0.18446744073709551615")]
fn test_dependency_range_overflow_rejected(#[case] spec: &str) {
    let err = default_err(minimal().dependency("acme.core", spec));
    assert_eq!(
        err,
        format!("Invalid collection metadata. Dependency version spec range invalid: acme.core {spec}")
    );
}

// ============================================================================
// Policy
// ============================================================================

#[test]
fn test_require_v1_policy() {
    let policy = ValidationPolicy::new().require_v1_or_greater(true);
    let err = build_err(minimal().version("0.9.0"), &policy);
    assert!(err.contains("requires version to be 1.0.0 or greater"));

    assert!(minimal().version("1.0.0").build(&policy).is_ok());
    assert!(minimal().version("0.9.0").build(&ValidationPolicy::default()).is_ok());
}

#[test]
fn test_required_tags_policy() {
    let policy = ValidationPolicy::new().check_required_tags(true);

    let err = build_err(minimal().tags(["widgets"]), &policy);
    assert!(err.contains("At least one tag required from tag list: ai, application"));

    assert!(minimal().tags(["widgets", "cloud"]).build(&policy).is_ok());
    assert!(minimal().tags(["widgets"]).build(&ValidationPolicy::default()).is_ok());
}

#[test]
fn test_error_kind_helpers() {
    let err = minimal().name("").build(&ValidationPolicy::default()).unwrap_err();
    assert!(matches!(err, Error::InvalidMetadata(_)));
    assert!(!err.is_legacy_schema());
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    #[test]
    fn prop_grammar_names_are_accepted(name in "[a-z][a-z0-9]{0,20}(_[a-z0-9]{1,10}){0,3}") {
        let info = minimal().name(name.clone()).build(&ValidationPolicy::default());
        prop_assert!(info.is_ok(), "rejected {}", name);
    }

    #[test]
    fn prop_uppercase_names_are_rejected(name in "[A-Z][a-zA-Z0-9_]{0,20}") {
        let info = minimal().name(name).build(&ValidationPolicy::default());
        prop_assert!(info.is_err());
    }
}
