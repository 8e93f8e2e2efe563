//! Alternate region spellings.
//!
//! Keys are already sanitized and lowercased. Canonical keys are not listed
//! here; a miss falls through to a direct enumeration lookup.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use arrest_map_region_models::Region;

/// Historical names, punctuation variants and boundary-dataset names.
static ALIASES: LazyLock<BTreeMap<&'static str, Region>> = LazyLock::new(|| {
    BTreeMap::from([
        ("andaman & nicobar", Region::AndamanAndNicobar),
        ("andaman and nicobar islands", Region::AndamanAndNicobar),
        ("andaman & nicobar islands", Region::AndamanAndNicobar),
        ("jammu & kashmir", Region::JammuAndKashmir),
        ("j&k", Region::JammuAndKashmir),
        ("nct of delhi", Region::Delhi),
        ("orissa", Region::Odisha),
        ("pondicherry", Region::Puducherry),
        ("uttaranchal", Region::Uttarakhand),
        // Post-2020 merged territory as named by newer boundary files
        ("dadra and nagar haveli and daman and diu", Region::DadraAndNagarHaveli),
        ("central bureau of investigation", Region::Cbi),
    ])
});

/// Looks up an alias. `key` must already be sanitized and lowercased.
#[must_use]
pub fn resolve(key: &str) -> Option<Region> {
    ALIASES.get(key).copied()
}

/// Iterates over every `(alias, canonical)` pair.
pub fn all() -> impl Iterator<Item = (&'static str, Region)> {
    ALIASES.iter().map(|(alias, region)| (*alias, *region))
}
