//! Validation of media links filed under a region.

use arrest_map_region_models::Region;
use arrest_map_stats::validate::{ValidationError, require_region};
use arrest_map_store_models::MediaKind;

/// Longest title kept, in characters.
pub const MAX_TITLE_LENGTH: usize = 200;

/// A media item ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedMedia {
    /// Region the item is filed under.
    pub region: Region,
    /// `http(s)` link.
    pub url: String,
    /// Cleaned title.
    pub title: String,
    /// Item kind.
    pub kind: MediaKind,
}

/// Removes angle brackets, trims, and truncates to [`MAX_TITLE_LENGTH`].
#[must_use]
pub fn sanitize_title(title: &str) -> String {
    let stripped: String = title.chars().filter(|c| !matches!(c, '<' | '>')).collect();
    stripped.trim().chars().take(MAX_TITLE_LENGTH).collect()
}

/// Validates a new media item.
///
/// # Errors
///
/// * [`ValidationError::MissingFields`] if region, link or title is blank
/// * [`ValidationError::Region`] if the region is unknown
/// * [`ValidationError::InvalidUrl`] if the link is not `http(s)`
pub fn validate_media(
    region: &str,
    url: &str,
    title: &str,
    kind: Option<&str>,
) -> Result<ValidatedMedia, ValidationError> {
    if region.trim().is_empty() || url.trim().is_empty() || title.trim().is_empty() {
        return Err(ValidationError::MissingFields);
    }

    let region = require_region(region)?;

    let url = url.trim();
    let lower = url.to_ascii_lowercase();
    if !(lower.starts_with("http://") || lower.starts_with("https://")) {
        return Err(ValidationError::InvalidUrl);
    }

    let title = sanitize_title(title);
    if title.is_empty() {
        return Err(ValidationError::MissingFields);
    }

    Ok(ValidatedMedia {
        region,
        url: url.to_string(),
        title,
        kind: MediaKind::from_input(kind),
    })
}

/// Checks that a media id is present.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidMediaId`] for a blank id.
pub fn validate_media_id(id: &str) -> Result<&str, ValidationError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(ValidationError::InvalidMediaId);
    }
    Ok(id)
}
