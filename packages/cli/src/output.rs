//! Plain-text rendering of dashboard data.

use std::collections::BTreeMap;

use arrest_map_region_models::Region;
use arrest_map_stats::Snapshot;
use arrest_map_stats::aggregate::ranked;
use arrest_map_stats::rank::display_name;
use arrest_map_stats_models::{TableRow, Tooltip};
use arrest_map_store_models::MediaItem;

/// Formats one ranked table line.
#[must_use]
pub fn table_line(rank: usize, row: &TableRow) -> String {
    format!(
        "{rank:>3}  {:<32} {:>9} {:>9}",
        row.display_name, row.arrests, row.fir
    )
}

/// Prints the ranked table.
pub fn print_table(rows: &[TableRow]) {
    println!("{:>3}  {:<32} {:>9} {:>9}", "#", "REGION", "ARRESTS", "FIRS");
    println!("{}", "-".repeat(57));
    for (i, row) in rows.iter().enumerate() {
        println!("{}", table_line(i + 1, row));
    }
}

/// Prints totals and the fill of every region with data, most arrests
/// first.
pub fn print_summary(snapshot: &Snapshot) {
    let summary = &snapshot.summary;
    println!("Total arrests:      {}", summary.total_arrests);
    println!("Total FIRs:         {}", summary.total_fir);
    println!("Regions with data:  {}", summary.regions_with_data);
    println!("Color scale top:    {}", summary.max_arrests);
    println!();

    for (region, counts) in ranked(&snapshot.aggregation.map) {
        println!(
            "{:<32} {:>9} {:>9}  {}",
            display_name(region),
            counts.arrests,
            counts.fir,
            snapshot.fill(region).to_hex()
        );
    }
}

/// Prints hover details for one name.
pub fn print_tooltip(tooltip: &Tooltip) {
    match tooltip.region {
        Some(region) => println!("{} ({region})", tooltip.name),
        None => println!("{} (no matching region)", tooltip.name),
    }
    println!("  Arrests: {}", tooltip.counts.arrests);
    println!("  FIRs:    {}", tooltip.counts.fir);

    for line in &tooltip.breakdown {
        println!(
            "    {}: {} arrests, {} FIRs",
            line.label, line.counts.arrests, line.counts.fir
        );
    }
}

/// Prints media grouped by region.
pub fn print_media(media: &BTreeMap<Region, Vec<MediaItem>>) {
    if media.is_empty() {
        println!("No media found.");
        return;
    }

    for (region, items) in media {
        println!("{}", display_name(*region));
        for item in items {
            let date = item.created_at.as_deref().unwrap_or("-");
            let short_date = if date.len() >= 19 { &date[..19] } else { date };
            println!(
                "  {:<36} {:<8} {:<19} {}",
                item.id, item.kind, short_date, item.title
            );
            println!("  {:<36} {}", "", item.url);
        }
    }
}
