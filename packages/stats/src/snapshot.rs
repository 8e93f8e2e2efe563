//! Owned dashboard state.
//!
//! A [`Snapshot`] is immutable once built. [`DashboardStore`] swaps in a new
//! one on every refresh so readers holding the old `Arc` keep a consistent
//! view. Loads are numbered so one that finishes late never replaces data
//! from a newer load.

use std::sync::Arc;

use arrest_map_region_models::Region;
use arrest_map_stats_models::{RawRecord, Rgb, Summary, TableRow, Tooltip};
use chrono::{DateTime, Utc};

use crate::aggregate::{Aggregation, aggregate, summarize};
use crate::color::color;
use crate::rank::rank;
use crate::tooltip::tooltip;

/// Derived views over one full load of records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Raw and map views.
    pub aggregation: Aggregation,
    /// Totals over the map view.
    pub summary: Summary,
    /// When the records were loaded.
    pub refreshed_at: DateTime<Utc>,
}

impl Snapshot {
    /// Aggregates `records` into a new snapshot.
    #[must_use]
    pub fn build<I>(records: I) -> Self
    where
        I: IntoIterator<Item = RawRecord>,
    {
        let aggregation = aggregate(records);
        let summary = summarize(&aggregation.map);
        Self {
            aggregation,
            summary,
            refreshed_at: Utc::now(),
        }
    }

    /// A snapshot with no data.
    #[must_use]
    pub fn empty() -> Self {
        Self::build(std::iter::empty())
    }

    /// Map fill for `region`. The federal key is drawn as the capital.
    #[must_use]
    pub fn fill(&self, region: Region) -> Rgb {
        let counts = self.aggregation.map.get(region.map_key());
        color(counts.arrests, self.summary.max_arrests)
    }

    /// The ranked table.
    #[must_use]
    pub fn table(&self) -> Vec<TableRow> {
        rank(&self.aggregation.raw)
    }

    /// Hover details for a boundary feature name.
    #[must_use]
    pub fn tooltip(&self, name: &str) -> Tooltip {
        tooltip(&self.aggregation, name)
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::empty()
    }
}

/// Holds the current [`Snapshot`].
#[derive(Debug, Clone, Default)]
pub struct DashboardStore {
    current: Arc<Snapshot>,
    generation: u64,
}

impl DashboardStore {
    /// Creates a store holding an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the snapshot with one built from `records`.
    pub fn refresh<I>(&mut self, records: I) -> Arc<Snapshot>
    where
        I: IntoIterator<Item = RawRecord>,
    {
        self.apply(self.generation + 1, records)
    }

    /// Replaces the snapshot with one built from `records`, loaded as load
    /// number `generation`.
    ///
    /// Loads older than the one already applied are dropped and the current
    /// snapshot is returned unchanged.
    pub fn apply<I>(&mut self, generation: u64, records: I) -> Arc<Snapshot>
    where
        I: IntoIterator<Item = RawRecord>,
    {
        if generation < self.generation {
            log::debug!(
                "Dropping load {generation}, already showing load {}",
                self.generation
            );
            return self.snapshot();
        }

        let snapshot = Arc::new(Snapshot::build(records));
        log::debug!(
            "Refreshed dashboard: {} regions with data, {} arrests, {} FIRs",
            snapshot.summary.regions_with_data,
            snapshot.summary.total_arrests,
            snapshot.summary.total_fir,
        );
        self.current = Arc::clone(&snapshot);
        self.generation = generation;
        snapshot
    }

    /// Number of the load behind the current snapshot.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// The current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.current)
    }
}
