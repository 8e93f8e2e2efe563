#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Arrest and FIR count types shared by aggregation, ranking, the store
//! and the API.
//!
//! Two keyed views exist over the same records. The *raw* view keeps the
//! federal agency separate; the *map* view folds it into the capital so the
//! choropleth has one value per drawable region.

use std::collections::BTreeMap;

use arrest_map_region_models::Region;
use serde::{Deserialize, Serialize};

/// Largest accepted value for a single arrest or FIR count.
pub const MAX_COUNT: u32 = 999_999;

/// Arrest and FIR totals for one key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Counts {
    /// Number of arrests.
    pub arrests: u64,
    /// Number of First Information Reports.
    pub fir: u64,
}

impl Counts {
    /// Creates a new pair of counts.
    #[must_use]
    pub const fn new(arrests: u64, fir: u64) -> Self {
        Self { arrests, fir }
    }

    /// Returns `true` when both counts are zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.arrests == 0 && self.fir == 0
    }

    /// Field-wise saturating sum.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self {
            arrests: self.arrests.saturating_add(other.arrests),
            fir: self.fir.saturating_add(other.fir),
        }
    }
}

/// One per-region record as read from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    /// Canonical region key.
    pub region: Region,
    /// Counts recorded for the region.
    #[serde(flatten)]
    pub counts: Counts,
}

impl RawRecord {
    /// Creates a record from separate counts.
    #[must_use]
    pub const fn new(region: Region, arrests: u64, fir: u64) -> Self {
        Self {
            region,
            counts: Counts::new(arrests, fir),
        }
    }
}

/// A region-keyed view of counts. Missing keys read as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountView {
    entries: BTreeMap<Region, Counts>,
}

impl CountView {
    /// Creates an empty view.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Returns the counts for `region`, zero if absent.
    #[must_use]
    pub fn get(&self, region: Region) -> Counts {
        self.entries.get(&region).copied().unwrap_or_default()
    }

    /// Returns `true` if `region` has an entry.
    #[must_use]
    pub fn contains(&self, region: Region) -> bool {
        self.entries.contains_key(&region)
    }

    /// Adds `counts` to the entry for `region`, creating it if needed.
    pub fn add(&mut self, region: Region, counts: Counts) {
        let entry = self.entries.entry(region).or_default();
        *entry = entry.saturating_add(counts);
    }

    /// Removes and returns the entry for `region`.
    pub fn remove(&mut self, region: Region) -> Option<Counts> {
        self.entries.remove(&region)
    }

    /// Drops entries whose counts are all zero.
    pub fn retain_nonzero(&mut self) {
        self.entries.retain(|_, counts| !counts.is_zero());
    }

    /// Iterates entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (Region, Counts)> + '_ {
        self.entries.iter().map(|(region, counts)| (*region, *counts))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(Region, Counts)> for CountView {
    fn from_iter<T: IntoIterator<Item = (Region, Counts)>>(iter: T) -> Self {
        let mut view = Self::new();
        for (region, counts) in iter {
            view.add(region, counts);
        }
        view
    }
}

/// Headline numbers computed over the map view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Sum of arrests across all regions.
    pub total_arrests: u64,
    /// Sum of FIRs across all regions.
    pub total_fir: u64,
    /// Number of map regions with a nonzero arrest or FIR count.
    pub regions_with_data: usize,
    /// Largest arrest count on the map, never below 1. This is the top of
    /// the color scale.
    pub max_arrests: u64,
}

/// An 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Creates a color from its channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Formats as `#rrggbb`.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// One row of the ranked data table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    /// Human-readable label.
    pub display_name: String,
    /// Region the row reports on.
    pub region: Region,
    /// Arrest count (unfolded).
    pub arrests: u64,
    /// FIR count (unfolded).
    pub fir: u64,
    /// Unique key used as the final ordering tie-break.
    pub sort_key: String,
}

/// One labelled line in a tooltip breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipLine {
    /// Line label.
    pub label: String,
    /// Counts for this line.
    #[serde(flatten)]
    pub counts: Counts,
}

/// Hover details for one boundary feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tooltip {
    /// The feature name as given by the boundary dataset.
    pub name: String,
    /// Resolved region, if any.
    pub region: Option<Region>,
    /// Counts the map fill is based on.
    #[serde(flatten)]
    pub counts: Counts,
    /// Unfolded contributions, present only for the capital region.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub breakdown: Vec<TooltipLine>,
}
