#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Document shapes as persisted in the `arrests` and `media` collections.
//!
//! These are distinct from the aggregated count types in
//! `arrest_map_stats_models` and the API types in `arrest_map_server_models`.
//! Region fields are kept as free text here; they are canonicalized on load.

use arrest_map_region_models::Region;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Collection holding one arrest document per canonical region key.
pub const ARRESTS_COLLECTION: &str = "arrests";

/// Collection holding media items under generated ids.
pub const MEDIA_COLLECTION: &str = "media";

/// An arrest document.
///
/// Older documents carry a single `count` under `state`; those read as an
/// arrest count with zero FIRs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrestDoc {
    /// Region name as written.
    #[serde(default, alias = "state")]
    pub region: Option<String>,
    /// Arrest count.
    #[serde(default, alias = "count")]
    pub arrest_count: u64,
    /// FIR count.
    #[serde(default)]
    pub fir_count: u64,
    /// RFC 3339 time of the last write.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// Email of the last writer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
}

/// Kind of linked media.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MediaKind {
    /// A news article or written report.
    #[default]
    Article,
    /// A video.
    Video,
}

impl MediaKind {
    /// Reads free-form input: `video` selects [`Self::Video`], anything else
    /// is an article.
    #[must_use]
    pub fn from_input(input: Option<&str>) -> Self {
        match input.map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case("video") => Self::Video,
            _ => Self::Article,
        }
    }
}

/// A media document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaDoc {
    /// Region name as written.
    #[serde(default, alias = "state")]
    pub region: Option<String>,
    /// Link to the item.
    #[serde(default, alias = "link")]
    pub url: Option<String>,
    /// Title shown in the media list.
    #[serde(default)]
    pub title: Option<String>,
    /// Item kind.
    #[serde(default, alias = "type")]
    pub kind: MediaKind,
    /// RFC 3339 creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Email of the creator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

/// A loaded, resolved media item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    /// Document id.
    pub id: String,
    /// Region the item is filed under.
    pub region: Region,
    /// Link to the item.
    pub url: String,
    /// Title.
    pub title: String,
    /// Item kind.
    pub kind: MediaKind,
    /// RFC 3339 creation time, if the store recorded one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}
