#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Region name canonicalization.
//!
//! Reconciles store document keys, boundary feature names and free-text
//! admin input into the single [`Region`] key space. The pipeline is
//! applied identically to all three sources:
//!
//! 1. Strip `<`, `>`, `"`, `'`, `` ` `` and `\`
//! 2. Collapse whitespace runs and trim
//! 3. Truncate to [`MAX_NAME_LENGTH`] characters
//! 4. Lowercase
//! 5. Resolve aliases, then match against the enumeration

pub mod aliases;
pub mod boundary;

use std::str::FromStr as _;
use std::sync::LazyLock;

pub use arrest_map_region_models::Region;
use regex::Regex;

/// Maximum number of characters kept from any input name.
pub const MAX_NAME_LENGTH: usize = 100;

/// Characters that are never part of a region name.
static STRIP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[<>"'`\\]"#).unwrap_or_else(|_| unreachable!()));

/// Applies the cleaning steps without lowercasing or resolving.
///
/// Safe to echo back in error messages.
#[must_use]
pub fn sanitize(input: &str) -> String {
    let stripped = STRIP_RE.replace_all(input, "");
    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.chars().take(MAX_NAME_LENGTH).collect()
}

/// Maps any region name to its canonical key.
///
/// Returns `None` when the name does not resolve to a known region.
#[must_use]
pub fn canonicalize(input: &str) -> Option<Region> {
    let cleaned = sanitize(input).to_lowercase();
    aliases::resolve(&cleaned).or_else(|| Region::from_str(&cleaned).ok())
}

/// Like [`canonicalize`], but for loosely-typed JSON input. Anything that is
/// not a string is invalid.
#[must_use]
pub fn canonicalize_value(value: &serde_json::Value) -> Option<Region> {
    value.as_str().and_then(canonicalize)
}

/// Returns `true` when `name` canonicalizes to a known region.
#[must_use]
pub fn is_valid_region(name: &str) -> bool {
    canonicalize(name).is_some()
}

/// All canonical keys, sorted alphabetically (for pickers and listings).
#[must_use]
pub fn valid_regions() -> Vec<&'static str> {
    let mut keys: Vec<&'static str> = Region::all().iter().map(|r| r.key()).collect();
    keys.sort_unstable();
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_keys_are_fixed_points() {
        for region in Region::all() {
            assert_eq!(canonicalize(region.key()), Some(*region));
        }
    }

    #[test]
    fn aliases_resolve_to_their_target() {
        for (alias, region) in aliases::all() {
            assert_eq!(canonicalize(alias), Some(region), "alias {alias:?}");
        }
    }

    #[test]
    fn ignores_case_and_surrounding_whitespace() {
        assert_eq!(canonicalize("  Tamil   Nadu "), Some(Region::TamilNadu));
        assert_eq!(canonicalize("NCT of Delhi"), Some(Region::Delhi));
        assert_eq!(canonicalize("ORISSA"), Some(Region::Odisha));
        assert_eq!(canonicalize("Jammu\t&\nKashmir"), Some(Region::JammuAndKashmir));
    }

    #[test]
    fn strips_injection_characters() {
        assert_eq!(canonicalize("<kerala>"), Some(Region::Kerala));
        assert_eq!(canonicalize("\"goa\""), Some(Region::Goa));
        assert_eq!(canonicalize("`bihar`\\"), Some(Region::Bihar));
        assert_eq!(canonicalize("<script>alert('x')</script>"), None);
    }

    #[test]
    fn federal_agency_is_its_own_key() {
        assert_eq!(canonicalize("CBI"), Some(Region::Cbi));
        assert_eq!(
            canonicalize("Central Bureau of Investigation"),
            Some(Region::Cbi)
        );
    }

    #[test]
    fn rejects_unknown_and_empty_names() {
        assert_eq!(canonicalize(""), None);
        assert_eq!(canonicalize("   "), None);
        assert_eq!(canonicalize("atlantis"), None);
        assert_eq!(canonicalize("delhi2"), None);
    }

    #[test]
    fn long_input_is_truncated_not_rejected_by_panic() {
        let long = "x".repeat(500);
        assert_eq!(sanitize(&long).chars().count(), MAX_NAME_LENGTH);
        assert_eq!(canonicalize(&long), None);

        let padded = format!("kerala{}", " ".repeat(400));
        assert_eq!(canonicalize(&padded), Some(Region::Kerala));
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let multibyte = "é".repeat(150);
        assert_eq!(sanitize(&multibyte).chars().count(), MAX_NAME_LENGTH);
        assert_eq!(canonicalize(&multibyte), None);
    }

    #[test]
    fn non_string_json_is_invalid() {
        assert_eq!(canonicalize_value(&serde_json::Value::Null), None);
        assert_eq!(canonicalize_value(&serde_json::json!(42)), None);
        assert_eq!(canonicalize_value(&serde_json::json!({"state": "goa"})), None);
        assert_eq!(
            canonicalize_value(&serde_json::json!("Goa")),
            Some(Region::Goa)
        );
    }

    #[test]
    fn valid_region_list_is_sorted_and_complete() {
        let list = valid_regions();
        assert_eq!(list.len(), Region::all().len());
        assert!(list.windows(2).all(|w| w[0] < w[1]));
        assert!(list.contains(&"cbi"));
    }

    #[test]
    fn validity_matches_canonicalization() {
        assert!(is_valid_region("Uttaranchal"));
        assert!(!is_valid_region("nowhere"));
    }
}
