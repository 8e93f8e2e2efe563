//! Ranked data table over every region.
//!
//! The table reads the raw view, so the capital and the federal agency get
//! separate rows.

use std::cmp::Ordering;

use arrest_map_region_models::Region;
use arrest_map_stats_models::{CountView, TableRow};

/// Row label for the capital's own counts.
pub const CAPITAL_LABEL: &str = "Delhi (excl. CBI)";

/// Row label for the federal agency.
pub const FEDERAL_LABEL: &str = "CBI";

/// Sort key of the federal row. Places it right after the capital on ties.
pub const FEDERAL_SORT_KEY: &str = "delhi:cbi";

/// Capitalizes the first letter of each space-separated word.
#[must_use]
pub fn title_case(key: &str) -> String {
    key.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect::<String>()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Display label for a region's table row.
#[must_use]
pub fn display_name(region: Region) -> String {
    if region == Region::CAPITAL {
        CAPITAL_LABEL.to_string()
    } else if region.is_federal() {
        FEDERAL_LABEL.to_string()
    } else {
        title_case(region.key())
    }
}

fn sort_key(region: Region) -> String {
    if region.is_federal() {
        FEDERAL_SORT_KEY.to_string()
    } else {
        region.key().to_string()
    }
}

const fn tier(row: &TableRow) -> u8 {
    if row.arrests > 0 {
        0
    } else if row.fir > 0 {
        1
    } else {
        2
    }
}

fn compare_rows(a: &TableRow, b: &TableRow) -> Ordering {
    tier(a)
        .cmp(&tier(b))
        .then_with(|| match tier(a) {
            0 => b.arrests.cmp(&a.arrests),
            1 => b.fir.cmp(&a.fir),
            _ => Ordering::Equal,
        })
        .then_with(|| a.sort_key.cmp(&b.sort_key))
}

/// Builds the full table: one row per geographic region plus the federal
/// row, ordered by arrests, then FIRs for arrest-free rows, then sort key.
///
/// Regions absent from `raw` get zero rows.
#[must_use]
pub fn rank(raw: &CountView) -> Vec<TableRow> {
    let mut rows = Vec::with_capacity(Region::all().len());

    for region in Region::geographic() {
        rows.push(row(raw, region));
        if region == Region::CAPITAL {
            rows.push(row(raw, Region::FEDERAL));
        }
    }

    rows.sort_by(compare_rows);
    rows
}

fn row(raw: &CountView, region: Region) -> TableRow {
    let counts = raw.get(region);
    TableRow {
        display_name: display_name(region),
        region,
        arrests: counts.arrests,
        fir: counts.fir,
        sort_key: sort_key(region),
    }
}
