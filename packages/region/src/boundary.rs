//! Region boundary dataset.
//!
//! Loads the state boundary `GeoJSON` once and resolves every feature's
//! name to its canonical [`Region`]. Feature names come from
//! `properties.name`, falling back to `properties.NAME`.

use std::path::Path;

use arrest_map_region_models::Region;
use geojson::{Feature, FeatureCollection, GeoJson, JsonObject};
use thiserror::Error;

use crate::canonicalize;

/// Errors from loading the boundary dataset.
#[derive(Debug, Error)]
pub enum BoundaryError {
    /// The file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The content is not valid `GeoJSON`.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),
}

/// A boundary feature together with its resolved region.
#[derive(Debug, Clone)]
pub struct BoundaryFeature {
    /// The feature as loaded.
    pub feature: Feature,
    /// The raw feature name, empty if the feature has none.
    pub name: String,
    /// Canonical region, or `None` if the name is unrecognized.
    pub region: Option<Region>,
}

/// The loaded boundary dataset.
#[derive(Debug, Clone)]
pub struct BoundarySet {
    features: Vec<BoundaryFeature>,
}

impl BoundarySet {
    /// Reads and parses a `GeoJSON` `FeatureCollection` from disk.
    ///
    /// # Errors
    ///
    /// Returns [`BoundaryError`] if the file is unreadable or not a
    /// feature collection.
    pub fn load(path: &Path) -> Result<Self, BoundaryError> {
        let text = std::fs::read_to_string(path)?;
        let set = Self::parse(&text)?;
        log::info!(
            "Loaded {} boundary features from {}",
            set.features.len(),
            path.display()
        );
        Ok(set)
    }

    /// Parses a `GeoJSON` `FeatureCollection` from a string.
    ///
    /// # Errors
    ///
    /// Returns [`BoundaryError::GeoJson`] if the text is not a feature
    /// collection.
    pub fn parse(text: &str) -> Result<Self, BoundaryError> {
        let geojson: GeoJson = text.parse()?;
        let collection = FeatureCollection::try_from(geojson)?;

        let features: Vec<BoundaryFeature> = collection
            .features
            .into_iter()
            .map(|feature| {
                let name = feature_name(&feature).unwrap_or_default();
                let region = canonicalize(&name);
                if region.is_none() {
                    log::warn!("Boundary feature {name:?} does not match any region");
                }
                BoundaryFeature {
                    feature,
                    name,
                    region,
                }
            })
            .collect();

        Ok(Self { features })
    }

    /// Returns the resolved features in file order.
    #[must_use]
    pub fn features(&self) -> &[BoundaryFeature] {
        &self.features
    }

    /// Returns the names of features that did not resolve to a region.
    #[must_use]
    pub fn unmatched_names(&self) -> Vec<&str> {
        self.features
            .iter()
            .filter(|f| f.region.is_none())
            .map(|f| f.name.as_str())
            .collect()
    }

    /// Builds a new feature collection whose properties are extended with
    /// whatever `decorate` returns for each feature.
    #[must_use]
    pub fn decorated<F>(&self, mut decorate: F) -> FeatureCollection
    where
        F: FnMut(&BoundaryFeature) -> JsonObject,
    {
        let features = self
            .features
            .iter()
            .map(|bf| {
                let mut feature = bf.feature.clone();
                for (key, value) in decorate(bf) {
                    feature.set_property(key, value);
                }
                feature
            })
            .collect();

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }
}

/// Extracts the display name of a boundary feature.
#[must_use]
pub fn feature_name(feature: &Feature) -> Option<String> {
    ["name", "NAME"]
        .iter()
        .filter_map(|key| feature.property(key))
        .filter_map(serde_json::Value::as_str)
        .find(|s| !s.trim().is_empty())
        .map(str::to_string)
}
