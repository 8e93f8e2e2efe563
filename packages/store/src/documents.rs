//! Typed reads and writes over the `arrests` and `media` collections.
//!
//! Documents that fail to parse or name an unknown region are skipped with a
//! warning rather than failing the whole load.

use std::collections::BTreeMap;

use arrest_map_region::canonicalize;
use arrest_map_region_models::Region;
use arrest_map_stats_models::{Counts, RawRecord};
use arrest_map_store_models::{
    ARRESTS_COLLECTION, ArrestDoc, MEDIA_COLLECTION, MediaDoc, MediaItem, MediaKind,
};
use serde_json::Value;

use crate::{Document, DocumentStore, Fields, StoreError, server_timestamp};

fn arrest_doc(document: &Document) -> Option<(Region, ArrestDoc)> {
    let doc: ArrestDoc = match serde_json::from_value(Value::Object(document.fields.clone())) {
        Ok(doc) => doc,
        Err(e) => {
            log::warn!("Skipping arrest document {}: {e}", document.id);
            return None;
        }
    };

    let name = doc.region.as_deref().unwrap_or(&document.id);
    let Some(region) = canonicalize(name) else {
        log::warn!(
            "Skipping arrest document {}: unknown region {name:?}",
            document.id
        );
        return None;
    };

    Some((region, doc))
}

/// Loads every arrest document as a raw record.
///
/// # Errors
///
/// Returns [`StoreError`] if the collection cannot be read.
pub async fn load_records(store: &dyn DocumentStore) -> Result<Vec<RawRecord>, StoreError> {
    let documents = store.fetch_all(ARRESTS_COLLECTION).await?;

    let records: Vec<RawRecord> = documents
        .iter()
        .filter_map(arrest_doc)
        .map(|(region, doc)| RawRecord::new(region, doc.arrest_count, doc.fir_count))
        .collect();

    log::debug!(
        "Loaded {} arrest records from {} documents",
        records.len(),
        documents.len()
    );

    Ok(records)
}

/// Reads the stored counts for one region, if a document exists.
///
/// # Errors
///
/// Returns [`StoreError`] if the document cannot be read.
pub async fn load_counts(
    store: &dyn DocumentStore,
    region: Region,
) -> Result<Option<Counts>, StoreError> {
    let Some(document) = store.get(ARRESTS_COLLECTION, region.key()).await? else {
        return Ok(None);
    };

    Ok(arrest_doc(&document).map(|(_, doc)| Counts::new(doc.arrest_count, doc.fir_count)))
}

/// Builds the fields of an arrest document, stamped at write time.
#[must_use]
pub fn arrest_fields(region: Region, arrests: u32, fir: u32, updated_by: &str) -> Fields {
    let mut fields = Fields::new();
    fields.insert("region".to_string(), Value::from(region.key()));
    fields.insert("arrestCount".to_string(), Value::from(arrests));
    fields.insert("firCount".to_string(), Value::from(fir));
    fields.insert("updatedAt".to_string(), server_timestamp());
    fields.insert("updatedBy".to_string(), Value::from(updated_by));
    fields
}

/// Builds the fields of a media document, stamped at write time.
#[must_use]
pub fn media_fields(
    region: Region,
    url: &str,
    title: &str,
    kind: MediaKind,
    created_by: &str,
) -> Fields {
    let mut fields = Fields::new();
    fields.insert("region".to_string(), Value::from(region.key()));
    fields.insert("url".to_string(), Value::from(url));
    fields.insert("title".to_string(), Value::from(title));
    fields.insert("kind".to_string(), Value::from(kind.as_ref()));
    fields.insert("createdAt".to_string(), server_timestamp());
    fields.insert("createdBy".to_string(), Value::from(created_by));
    fields
}

fn media_item(document: Document) -> Option<MediaItem> {
    let doc: MediaDoc = match serde_json::from_value(Value::Object(document.fields)) {
        Ok(doc) => doc,
        Err(e) => {
            log::warn!("Skipping media document {}: {e}", document.id);
            return None;
        }
    };

    let non_blank = |s: Option<String>| s.filter(|s| !s.trim().is_empty());
    let (Some(name), Some(url), Some(title)) = (
        non_blank(doc.region),
        non_blank(doc.url),
        non_blank(doc.title),
    ) else {
        return None;
    };

    let Some(region) = canonicalize(&name) else {
        log::warn!(
            "Skipping media document {}: unknown region {name:?}",
            document.id
        );
        return None;
    };

    Some(MediaItem {
        id: document.id,
        region,
        url,
        title,
        kind: doc.kind,
        created_at: doc.created_at,
    })
}

/// Loads every media item grouped by region, newest first within each
/// region.
///
/// # Errors
///
/// Returns [`StoreError`] if the collection cannot be read.
pub async fn load_media(
    store: &dyn DocumentStore,
) -> Result<BTreeMap<Region, Vec<MediaItem>>, StoreError> {
    let documents = store.fetch_all(MEDIA_COLLECTION).await?;

    let mut grouped: BTreeMap<Region, Vec<MediaItem>> = BTreeMap::new();
    for item in documents.into_iter().filter_map(media_item) {
        grouped.entry(item.region).or_default().push(item);
    }

    for items in grouped.values_mut() {
        items.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
    }

    Ok(grouped)
}
