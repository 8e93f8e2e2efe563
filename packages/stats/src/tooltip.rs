//! Hover details for one boundary feature.

use arrest_map_region::canonicalize;
use arrest_map_region_models::Region;
use arrest_map_stats_models::{Counts, Tooltip, TooltipLine};

use crate::aggregate::Aggregation;
use crate::rank::{CAPITAL_LABEL, FEDERAL_LABEL};

/// Hover details for a boundary feature name.
///
/// Totals come from the map view so they agree with the fill color. The
/// capital also gets its own and federal contributions listed separately.
/// Names that do not resolve produce zero counts and no region.
#[must_use]
pub fn tooltip(aggregation: &Aggregation, name: &str) -> Tooltip {
    let region = canonicalize(name).map(Region::map_key);
    let counts = region.map_or_else(Counts::default, |r| aggregation.map.get(r));

    let breakdown = if region == Some(Region::CAPITAL) {
        vec![
            TooltipLine {
                label: CAPITAL_LABEL.to_string(),
                counts: aggregation.raw.get(Region::CAPITAL),
            },
            TooltipLine {
                label: FEDERAL_LABEL.to_string(),
                counts: aggregation.raw.get(Region::FEDERAL),
            },
        ]
    } else {
        Vec::new()
    };

    Tooltip {
        name: name.to_string(),
        region,
        counts,
        breakdown,
    }
}

#[cfg(test)]
mod tests {
    use arrest_map_stats_models::RawRecord;

    use super::*;
    use crate::aggregate::aggregate;

    fn scenario() -> Aggregation {
        aggregate(vec![
            RawRecord::new(Region::Maharashtra, 100, 40),
            RawRecord::new(Region::Delhi, 30, 10),
            RawRecord::new(Region::Cbi, 20, 5),
        ])
    }

    #[test]
    fn capital_shows_folded_total_and_breakdown() {
        let tip = tooltip(&scenario(), "NCT of Delhi");
        assert_eq!(tip.region, Some(Region::Delhi));
        assert_eq!(tip.counts, Counts::new(50, 15));
        assert_eq!(tip.breakdown.len(), 2);
        assert_eq!(tip.breakdown[0].counts, Counts::new(30, 10));
        assert_eq!(tip.breakdown[1].label, "CBI");
        assert_eq!(tip.breakdown[1].counts, Counts::new(20, 5));
    }

    #[test]
    fn other_regions_have_no_breakdown() {
        let tip = tooltip(&scenario(), "Maharashtra");
        assert_eq!(tip.counts, Counts::new(100, 40));
        assert!(tip.breakdown.is_empty());
    }

    #[test]
    fn unknown_name_keeps_raw_name_with_zero_counts() {
        let tip = tooltip(&scenario(), "Atlantis");
        assert_eq!(tip.name, "Atlantis");
        assert_eq!(tip.region, None);
        assert_eq!(tip.counts, Counts::default());
    }

    #[test]
    fn region_without_data_reads_zero() {
        let tip = tooltip(&scenario(), "Goa");
        assert_eq!(tip.region, Some(Region::Goa));
        assert!(tip.counts.is_zero());
    }
}
