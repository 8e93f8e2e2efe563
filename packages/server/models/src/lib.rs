#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the arrest map server.
//!
//! These types are serialized to JSON for the REST API. Table rows,
//! tooltips and media items are returned in their model shapes; everything
//! else the frontend needs is defined here.

use arrest_map_region_models::Region;
use arrest_map_stats::validate::{CountValue, RecordUpdate, ValidatedUpdate};
use arrest_map_stats_models::{Rgb, Summary};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Always `true` when the server answers.
    pub healthy: bool,
    /// Crate version.
    pub version: String,
    /// Whether the document store opened.
    pub store_available: bool,
    /// Whether the boundary dataset loaded.
    pub boundaries_loaded: bool,
}

/// One selectable region.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRegion {
    /// Canonical key.
    pub key: Region,
    /// Label for pickers and tables.
    pub display_name: String,
}

/// Map fill for one region.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMapEntry {
    /// Region key on the map (federal counts already folded in).
    pub region: Region,
    /// Arrest count the fill is based on.
    pub arrests: u64,
    /// FIR count.
    pub fir: u64,
    /// Fill as `#rrggbb`.
    pub fill: String,
}

/// Color legend for the map.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiLegend {
    /// Low end label (always 0).
    pub low: u64,
    /// High end label; the arrest count drawn fully red.
    pub high: u64,
    /// Color at the low end.
    pub low_color: String,
    /// Color at the midpoint.
    pub mid_color: String,
    /// Color at the high end.
    pub high_color: String,
    /// Color for regions without arrests.
    pub no_data_color: String,
}

impl ApiLegend {
    /// Builds a legend topping out at `high`.
    #[must_use]
    pub fn new(high: u64, low: Rgb, mid: Rgb, top: Rgb, no_data: Rgb) -> Self {
        Self {
            low: 0,
            high,
            low_color: low.to_hex(),
            mid_color: mid.to_hex(),
            high_color: top.to_hex(),
            no_data_color: no_data.to_hex(),
        }
    }
}

/// `GET /api/map` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMap {
    /// Headline totals.
    pub summary: Summary,
    /// Color legend.
    pub legend: ApiLegend,
    /// Regions with data, in key order.
    pub regions: Vec<ApiMapEntry>,
    /// When the data was loaded.
    pub refreshed_at: DateTime<Utc>,
}

/// `POST /api/admin/records` body.
///
/// Older clients send `state` and `count`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetCountsRequest {
    /// Region name. Kept loose so a non-string answers as an invalid region.
    #[serde(default, alias = "state")]
    pub region: Value,
    /// Arrest count.
    #[serde(default, alias = "count")]
    pub arrests: Option<CountValue>,
    /// FIR count; zero when omitted.
    #[serde(default)]
    pub fir: Option<CountValue>,
    /// Add to the stored counts instead of replacing them.
    #[serde(default)]
    pub additive: bool,
}

/// `POST /api/admin/batch` body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRequest {
    /// Updates to apply.
    #[serde(default)]
    pub updates: Vec<RecordUpdate>,
    /// Add to the stored counts instead of replacing them.
    #[serde(default)]
    pub additive: bool,
}

/// `POST /api/admin/media` body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMediaRequest {
    /// Region name, as in [`SetCountsRequest::region`].
    #[serde(default, alias = "state")]
    pub region: Value,
    /// Link.
    #[serde(default, alias = "link")]
    pub url: String,
    /// Title.
    #[serde(default)]
    pub title: String,
    /// `video` or `article`.
    #[serde(default, alias = "type")]
    pub kind: Option<String>,
}

/// Counts written for one region.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiWrite {
    /// Canonical region.
    pub region: Region,
    /// Arrest count now stored.
    pub arrests: u32,
    /// FIR count now stored.
    pub fir: u32,
}

impl From<ValidatedUpdate> for ApiWrite {
    fn from(update: ValidatedUpdate) -> Self {
        Self {
            region: update.region,
            arrests: update.arrests,
            fir: update.fir,
        }
    }
}

/// `POST /api/admin/batch` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiBatchResult {
    /// One entry per distinct region written.
    pub written: Vec<ApiWrite>,
}

/// `POST /api/admin/media` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMediaCreated {
    /// Id of the new item.
    pub id: String,
}

/// Generic acknowledgement for deletes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDeleted {
    /// What was deleted (region key or media id).
    pub deleted: String,
}

/// Error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// User-facing message.
    pub error: String,
}
