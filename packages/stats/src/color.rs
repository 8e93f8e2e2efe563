//! Choropleth color scale.
//!
//! Two linear segments over three anchors: green at zero, yellow at half
//! the maximum, red at the maximum. A count of zero is drawn as "no data".

use arrest_map_stats_models::Rgb;

/// Fill for regions without arrests.
pub const NO_DATA: Rgb = Rgb::new(226, 232, 240);
/// Low anchor.
pub const GREEN: Rgb = Rgb::new(72, 187, 120);
/// Midpoint anchor.
pub const YELLOW: Rgb = Rgb::new(236, 201, 75);
/// High anchor.
pub const RED: Rgb = Rgb::new(245, 101, 101);

/// Maps a count to a fill color on a scale topping out at `max`.
///
/// `max` below 1 is treated as 1.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn color(count: u64, max: u64) -> Rgb {
    if count == 0 {
        return NO_DATA;
    }

    let ratio = (count as f64 / max.max(1) as f64).clamp(0.0, 1.0);

    if ratio <= 0.5 {
        lerp(GREEN, YELLOW, ratio * 2.0)
    } else {
        lerp(YELLOW, RED, (ratio - 0.5) * 2.0)
    }
}

fn lerp(from: Rgb, to: Rgb, t: f64) -> Rgb {
    Rgb::new(
        lerp_channel(from.r, to.r, t),
        lerp_channel(from.g, to.g, t),
        lerp_channel(from.b, to.b, t),
    )
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lerp_channel(from: u8, to: u8, t: f64) -> u8 {
    let from = f64::from(from);
    let to = f64::from(to);
    (to - from).mul_add(t, from).round().clamp(0.0, 255.0) as u8
}
