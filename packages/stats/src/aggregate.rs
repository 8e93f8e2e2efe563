//! Folding raw per-region records into the raw and map views.

use std::cmp::Ordering;

use arrest_map_region_models::Region;
use arrest_map_stats_models::{CountView, Counts, RawRecord, Summary};

/// Both keyed views derived from one set of records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregation {
    /// Per canonical key, federal agency kept separate.
    pub raw: CountView,
    /// Per drawable region, federal counts added into the capital.
    pub map: CountView,
}

/// Builds both views from a list of records.
///
/// Duplicate keys are summed. Keys whose summed counts are all zero are
/// left out of both views.
#[must_use]
pub fn aggregate<I>(records: I) -> Aggregation
where
    I: IntoIterator<Item = RawRecord>,
{
    let mut raw: CountView = records
        .into_iter()
        .map(|record| (record.region, record.counts))
        .collect();
    raw.retain_nonzero();

    let mut map = raw.clone();
    if let Some(federal) = map.remove(Region::FEDERAL) {
        map.add(Region::CAPITAL, federal);
    }

    Aggregation { raw, map }
}

/// Computes headline totals over a map view.
#[must_use]
pub fn summarize(map: &CountView) -> Summary {
    let mut summary = Summary {
        max_arrests: 1,
        ..Summary::default()
    };

    for (_, counts) in map.iter() {
        summary.total_arrests = summary.total_arrests.saturating_add(counts.arrests);
        summary.total_fir = summary.total_fir.saturating_add(counts.fir);
        summary.max_arrests = summary.max_arrests.max(counts.arrests);
        if !counts.is_zero() {
            summary.regions_with_data += 1;
        }
    }

    summary
}

/// Orders view entries by arrests, then FIRs (both descending), then key.
#[must_use]
pub fn ranked(view: &CountView) -> Vec<(Region, Counts)> {
    let mut entries: Vec<(Region, Counts)> = view.iter().collect();
    entries.sort_by(|(ra, a), (rb, b)| compare_counts(*a, *b).then_with(|| ra.key().cmp(rb.key())));
    entries
}

fn compare_counts(a: Counts, b: Counts) -> Ordering {
    b.arrests.cmp(&a.arrests).then_with(|| b.fir.cmp(&a.fir))
}
