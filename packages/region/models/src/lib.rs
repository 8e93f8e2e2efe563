#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Canonical region keys.
//!
//! Every name that enters the system (store document keys, boundary feature
//! names, admin input) is reduced to exactly one [`Region`]. The serialized
//! form of each variant is its lowercase canonical key, which is also the
//! document id used by the store.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString, IntoStaticStr};

/// A canonical region key: one of the Indian states and union territories,
/// or the non-geographic federal investigative agency.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    IntoStaticStr,
)]
pub enum Region {
    #[serde(rename = "andaman and nicobar")]
    #[strum(serialize = "andaman and nicobar")]
    AndamanAndNicobar,
    #[serde(rename = "andhra pradesh")]
    #[strum(serialize = "andhra pradesh")]
    AndhraPradesh,
    #[serde(rename = "arunachal pradesh")]
    #[strum(serialize = "arunachal pradesh")]
    ArunachalPradesh,
    #[serde(rename = "assam")]
    #[strum(serialize = "assam")]
    Assam,
    #[serde(rename = "bihar")]
    #[strum(serialize = "bihar")]
    Bihar,
    #[serde(rename = "chandigarh")]
    #[strum(serialize = "chandigarh")]
    Chandigarh,
    #[serde(rename = "chhattisgarh")]
    #[strum(serialize = "chhattisgarh")]
    Chhattisgarh,
    #[serde(rename = "dadra and nagar haveli")]
    #[strum(serialize = "dadra and nagar haveli")]
    DadraAndNagarHaveli,
    #[serde(rename = "daman and diu")]
    #[strum(serialize = "daman and diu")]
    DamanAndDiu,
    #[serde(rename = "delhi")]
    #[strum(serialize = "delhi")]
    Delhi,
    #[serde(rename = "goa")]
    #[strum(serialize = "goa")]
    Goa,
    #[serde(rename = "gujarat")]
    #[strum(serialize = "gujarat")]
    Gujarat,
    #[serde(rename = "haryana")]
    #[strum(serialize = "haryana")]
    Haryana,
    #[serde(rename = "himachal pradesh")]
    #[strum(serialize = "himachal pradesh")]
    HimachalPradesh,
    #[serde(rename = "jammu and kashmir")]
    #[strum(serialize = "jammu and kashmir")]
    JammuAndKashmir,
    #[serde(rename = "jharkhand")]
    #[strum(serialize = "jharkhand")]
    Jharkhand,
    #[serde(rename = "karnataka")]
    #[strum(serialize = "karnataka")]
    Karnataka,
    #[serde(rename = "kerala")]
    #[strum(serialize = "kerala")]
    Kerala,
    #[serde(rename = "ladakh")]
    #[strum(serialize = "ladakh")]
    Ladakh,
    #[serde(rename = "lakshadweep")]
    #[strum(serialize = "lakshadweep")]
    Lakshadweep,
    #[serde(rename = "madhya pradesh")]
    #[strum(serialize = "madhya pradesh")]
    MadhyaPradesh,
    #[serde(rename = "maharashtra")]
    #[strum(serialize = "maharashtra")]
    Maharashtra,
    #[serde(rename = "manipur")]
    #[strum(serialize = "manipur")]
    Manipur,
    #[serde(rename = "meghalaya")]
    #[strum(serialize = "meghalaya")]
    Meghalaya,
    #[serde(rename = "mizoram")]
    #[strum(serialize = "mizoram")]
    Mizoram,
    #[serde(rename = "nagaland")]
    #[strum(serialize = "nagaland")]
    Nagaland,
    #[serde(rename = "odisha")]
    #[strum(serialize = "odisha")]
    Odisha,
    #[serde(rename = "puducherry")]
    #[strum(serialize = "puducherry")]
    Puducherry,
    #[serde(rename = "punjab")]
    #[strum(serialize = "punjab")]
    Punjab,
    #[serde(rename = "rajasthan")]
    #[strum(serialize = "rajasthan")]
    Rajasthan,
    #[serde(rename = "sikkim")]
    #[strum(serialize = "sikkim")]
    Sikkim,
    #[serde(rename = "tamil nadu")]
    #[strum(serialize = "tamil nadu")]
    TamilNadu,
    #[serde(rename = "telangana")]
    #[strum(serialize = "telangana")]
    Telangana,
    #[serde(rename = "tripura")]
    #[strum(serialize = "tripura")]
    Tripura,
    #[serde(rename = "uttar pradesh")]
    #[strum(serialize = "uttar pradesh")]
    UttarPradesh,
    #[serde(rename = "uttarakhand")]
    #[strum(serialize = "uttarakhand")]
    Uttarakhand,
    #[serde(rename = "west bengal")]
    #[strum(serialize = "west bengal")]
    WestBengal,
    /// Central Bureau of Investigation. Not a place: its counts are folded
    /// into [`Region::CAPITAL`] on the map and listed separately in tables.
    #[serde(rename = "cbi")]
    #[strum(serialize = "cbi")]
    Cbi,
}

impl Region {
    /// The capital region that absorbs federal counts on the map.
    pub const CAPITAL: Self = Self::Delhi;

    /// The non-geographic federal agency key.
    pub const FEDERAL: Self = Self::Cbi;

    /// Returns the lowercase canonical key, which doubles as the store
    /// document id.
    #[must_use]
    pub fn key(self) -> &'static str {
        self.into()
    }

    /// Returns `true` for the federal agency key.
    #[must_use]
    pub const fn is_federal(self) -> bool {
        matches!(self, Self::Cbi)
    }

    /// The key this region is counted under on the choropleth map.
    #[must_use]
    pub const fn map_key(self) -> Self {
        if self.is_federal() {
            Self::CAPITAL
        } else {
            self
        }
    }

    /// Returns all variants of this enum, federal key last.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::AndamanAndNicobar,
            Self::AndhraPradesh,
            Self::ArunachalPradesh,
            Self::Assam,
            Self::Bihar,
            Self::Chandigarh,
            Self::Chhattisgarh,
            Self::DadraAndNagarHaveli,
            Self::DamanAndDiu,
            Self::Delhi,
            Self::Goa,
            Self::Gujarat,
            Self::Haryana,
            Self::HimachalPradesh,
            Self::JammuAndKashmir,
            Self::Jharkhand,
            Self::Karnataka,
            Self::Kerala,
            Self::Ladakh,
            Self::Lakshadweep,
            Self::MadhyaPradesh,
            Self::Maharashtra,
            Self::Manipur,
            Self::Meghalaya,
            Self::Mizoram,
            Self::Nagaland,
            Self::Odisha,
            Self::Puducherry,
            Self::Punjab,
            Self::Rajasthan,
            Self::Sikkim,
            Self::TamilNadu,
            Self::Telangana,
            Self::Tripura,
            Self::UttarPradesh,
            Self::Uttarakhand,
            Self::WestBengal,
            Self::Cbi,
        ]
    }

    /// Returns every geographic region (everything except the federal key).
    #[must_use]
    pub fn geographic() -> impl Iterator<Item = Self> {
        Self::all().iter().copied().filter(|r| !r.is_federal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::str::FromStr as _;

    #[test]
    fn thirty_seven_geographic_regions_plus_federal() {
        assert_eq!(Region::all().len(), 38);
        assert_eq!(Region::geographic().count(), 37);
        assert_eq!(Region::all().last(), Some(&Region::FEDERAL));
    }

    #[test]
    fn key_parse_roundtrip() {
        for region in Region::all() {
            assert_eq!(Region::from_str(region.key()).unwrap(), *region);
            assert_eq!(region.to_string(), region.key());
            assert_eq!(region.as_ref(), region.key());
        }
    }

    #[test]
    fn keys_are_unique_lowercase() {
        let keys: BTreeSet<&str> = Region::all().iter().map(|r| r.key()).collect();
        assert_eq!(keys.len(), Region::all().len());
        for key in keys {
            assert_eq!(key, key.to_lowercase(), "{key} is not lowercase");
            assert_eq!(key, key.trim());
        }
    }

    #[test]
    fn federal_folds_into_capital() {
        assert_eq!(Region::Cbi.map_key(), Region::Delhi);
        assert_eq!(Region::Delhi.map_key(), Region::Delhi);
        assert_eq!(Region::Kerala.map_key(), Region::Kerala);
        assert!(Region::FEDERAL.is_federal());
        assert!(!Region::CAPITAL.is_federal());
    }

    #[test]
    fn serde_uses_canonical_key() {
        let json = serde_json::to_string(&Region::TamilNadu).unwrap();
        assert_eq!(json, "\"tamil nadu\"");
        let parsed: Region = serde_json::from_str("\"west bengal\"").unwrap();
        assert_eq!(parsed, Region::WestBengal);
    }
}
