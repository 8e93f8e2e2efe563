//! Validated, authorized writes to the document store.
//!
//! Every operation checks, in order: its own inputs, that a store is
//! configured, that someone is signed in, and that they are the admin. Only
//! then is the store touched. Store failures are logged and reported with a
//! fixed message.

use std::collections::BTreeMap;
use std::sync::Arc;

use arrest_map_region_models::Region;
use arrest_map_stats::validate::{
    CountField, CountValue, RecordUpdate, ValidatedUpdate, checked_total, require_region,
    validate_batch_len, validate_update,
};
use arrest_map_stats_models::{CountView, RawRecord};
use arrest_map_store::{
    DocumentStore, Fields, StoreError, arrest_fields, load_counts, media_fields,
};
use arrest_map_store_models::{ARRESTS_COLLECTION, MEDIA_COLLECTION, MediaItem};

use crate::AdminError;
use crate::identity::{AdminIdentity, User};
use crate::media::{validate_media, validate_media_id};
use crate::session::Session;

/// Admin write path plus the unauthenticated reads the dashboard needs.
#[derive(Clone)]
pub struct AdminService {
    store: Option<Arc<dyn DocumentStore>>,
    identity: AdminIdentity,
}

impl std::fmt::Debug for AdminService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminService")
            .field("available", &self.store.is_some())
            .field("identity", &self.identity)
            .finish()
    }
}

fn log_failure(operation: &str, error: &StoreError) {
    log::error!("{operation} failed: {error}");
}

impl AdminService {
    /// Creates a service. With no store, every operation past input
    /// validation fails with [`AdminError::ServiceUnavailable`].
    #[must_use]
    pub fn new(store: Option<Arc<dyn DocumentStore>>, identity: AdminIdentity) -> Self {
        Self { store, identity }
    }

    /// Returns `true` if a store is configured.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.store.is_some()
    }

    /// The admin identity used for permission checks.
    #[must_use]
    pub const fn identity(&self) -> &AdminIdentity {
        &self.identity
    }

    /// Builds a session for a request, signed in when `email` is given.
    #[must_use]
    pub fn session_for(&self, email: Option<&str>) -> Session {
        match email.map(str::trim).filter(|e| !e.is_empty()) {
            Some(email) => Session::signed_in(self.identity.clone(), User::new(email)),
            None => Session::new(self.identity.clone()),
        }
    }

    fn store(&self) -> Result<&dyn DocumentStore, AdminError> {
        self.store.as_deref().ok_or(AdminError::ServiceUnavailable)
    }

    fn authorize<'a>(
        &'a self,
        session: &'a Session,
    ) -> Result<(&'a dyn DocumentStore, &'a User), AdminError> {
        let store = self.store()?;
        let user = session.user().ok_or(AdminError::NotAuthenticated)?;

        if !self.identity.is_admin(user) {
            log::warn!("Rejected admin write from {}", user.email);
            return Err(AdminError::PermissionDenied);
        }

        Ok((store, user))
    }

    /// Writes (or, when `additive`, adds to) the counts for one region.
    ///
    /// Returns the totals that were written.
    ///
    /// # Errors
    ///
    /// * [`AdminError::Validation`] for bad input or an additive total above
    ///   the maximum
    /// * [`AdminError::ServiceUnavailable`], [`AdminError::NotAuthenticated`],
    ///   [`AdminError::PermissionDenied`] from the access checks
    /// * [`AdminError::UpdateFailed`] if the store rejects the read or write
    pub async fn set_counts(
        &self,
        session: &Session,
        region: &str,
        arrests: &CountValue,
        fir: &CountValue,
        additive: bool,
    ) -> Result<ValidatedUpdate, AdminError> {
        let update = validate_update(region, arrests, fir)?;
        let (store, user) = self.authorize(session)?;

        let update = if additive {
            let existing = load_counts(store, update.region)
                .await
                .map_err(|e| {
                    log_failure("Reading current counts", &e);
                    AdminError::UpdateFailed
                })?
                .unwrap_or_default();
            add_to(existing.arrests, existing.fir, update)?
        } else {
            update
        };

        store
            .set(
                ARRESTS_COLLECTION,
                update.region.key(),
                arrest_fields(update.region, update.arrests, update.fir, &user.email),
            )
            .await
            .map_err(|e| {
                log_failure("Updating counts", &e);
                AdminError::UpdateFailed
            })?;

        log::info!(
            "{} set {} to {} arrests, {} FIRs",
            user.email,
            update.region,
            update.arrests,
            update.fir
        );

        Ok(update)
    }

    /// Deletes the record for one region.
    ///
    /// # Errors
    ///
    /// * [`AdminError::Validation`] for an unknown region
    /// * the access-check errors of [`Self::set_counts`]
    /// * [`AdminError::DeleteFailed`] if the store rejects the delete
    pub async fn delete_record(
        &self,
        session: &Session,
        region: &str,
    ) -> Result<Region, AdminError> {
        let region = require_region(region)?;
        let (store, user) = self.authorize(session)?;

        let existed = store
            .delete(ARRESTS_COLLECTION, region.key())
            .await
            .map_err(|e| {
                log_failure("Deleting record", &e);
                AdminError::DeleteFailed
            })?;

        log::info!("{} deleted {region} (existed: {existed})", user.email);

        Ok(region)
    }

    /// Writes up to 50 region updates in one atomic batch.
    ///
    /// The batch size is checked before anything else, including the access
    /// checks. When a region appears more than once the last entry wins.
    ///
    /// # Errors
    ///
    /// * [`AdminError::Validation`] for an empty or oversized batch, any bad
    ///   entry, or an additive total above the maximum
    /// * the access-check errors of [`Self::set_counts`]
    /// * [`AdminError::UpdateFailed`] if the store rejects the read or write
    pub async fn batch_update(
        &self,
        session: &Session,
        updates: &[RecordUpdate],
        additive: bool,
    ) -> Result<Vec<ValidatedUpdate>, AdminError> {
        validate_batch_len(updates.len())?;

        let validated = updates
            .iter()
            .map(RecordUpdate::validate)
            .collect::<Result<Vec<_>, _>>()?;

        let (store, user) = self.authorize(session)?;

        let mut by_region: BTreeMap<Region, ValidatedUpdate> = BTreeMap::new();
        for update in validated {
            by_region.insert(update.region, update);
        }

        let mut written: Vec<ValidatedUpdate> = by_region.into_values().collect();

        if additive {
            let current: CountView = arrest_map_store::load_records(store)
                .await
                .map_err(|e| {
                    log_failure("Reading current counts", &e);
                    AdminError::UpdateFailed
                })?
                .into_iter()
                .map(|record| (record.region, record.counts))
                .collect();

            written = written
                .into_iter()
                .map(|update| {
                    let existing = current.get(update.region);
                    add_to(existing.arrests, existing.fir, update)
                })
                .collect::<Result<_, _>>()?;
        }

        let documents: Vec<(String, Fields)> = written
            .iter()
            .map(|u| {
                (
                    u.region.key().to_string(),
                    arrest_fields(u.region, u.arrests, u.fir, &user.email),
                )
            })
            .collect();

        store
            .batch_set(ARRESTS_COLLECTION, documents)
            .await
            .map_err(|e| {
                log_failure("Batch update", &e);
                AdminError::UpdateFailed
            })?;

        log::info!("{} wrote a batch of {} regions", user.email, written.len());

        Ok(written)
    }

    /// Files a media link under a region. Returns the new item id.
    ///
    /// # Errors
    ///
    /// * [`AdminError::Validation`] for missing fields, unknown region or a
    ///   non-`http(s)` link
    /// * the access-check errors of [`Self::set_counts`]
    /// * [`AdminError::AddMediaFailed`] if the store rejects the insert
    pub async fn add_media(
        &self,
        session: &Session,
        region: &str,
        url: &str,
        title: &str,
        kind: Option<&str>,
    ) -> Result<String, AdminError> {
        let media = validate_media(region, url, title, kind)?;
        let (store, user) = self.authorize(session)?;

        let id = store
            .add(
                MEDIA_COLLECTION,
                media_fields(media.region, &media.url, &media.title, media.kind, &user.email),
            )
            .await
            .map_err(|e| {
                log_failure("Adding media", &e);
                AdminError::AddMediaFailed
            })?;

        log::info!("{} added {} media {id} to {}", user.email, media.kind, media.region);

        Ok(id)
    }

    /// Deletes a media item.
    ///
    /// # Errors
    ///
    /// * [`AdminError::Validation`] for a blank id
    /// * the access-check errors of [`Self::set_counts`]
    /// * [`AdminError::DeleteMediaFailed`] if the store rejects the delete
    pub async fn delete_media(&self, session: &Session, id: &str) -> Result<(), AdminError> {
        let id = validate_media_id(id)?;
        let (store, user) = self.authorize(session)?;

        store.delete(MEDIA_COLLECTION, id).await.map_err(|e| {
            log_failure("Deleting media", &e);
            AdminError::DeleteMediaFailed
        })?;

        log::info!("{} deleted media {id}", user.email);

        Ok(())
    }

    /// Loads all arrest records. No sign-in is required.
    ///
    /// # Errors
    ///
    /// * [`AdminError::ServiceUnavailable`] if no store is configured
    /// * [`AdminError::LoadFailed`] if the store cannot be read
    pub async fn load_records(&self) -> Result<Vec<RawRecord>, AdminError> {
        arrest_map_store::load_records(self.store()?)
            .await
            .map_err(|e| {
                log_failure("Loading records", &e);
                AdminError::LoadFailed
            })
    }

    /// Loads all media grouped by region, newest first. No sign-in is
    /// required.
    ///
    /// # Errors
    ///
    /// * [`AdminError::ServiceUnavailable`] if no store is configured
    /// * [`AdminError::LoadMediaFailed`] if the store cannot be read
    pub async fn load_media(&self) -> Result<BTreeMap<Region, Vec<MediaItem>>, AdminError> {
        arrest_map_store::load_media(self.store()?)
            .await
            .map_err(|e| {
                log_failure("Loading media", &e);
                AdminError::LoadMediaFailed
            })
    }
}

fn add_to(arrests: u64, fir: u64, update: ValidatedUpdate) -> Result<ValidatedUpdate, AdminError> {
    Ok(ValidatedUpdate {
        region: update.region,
        arrests: checked_total(arrests, update.arrests, CountField::Arrests, update.region)?,
        fir: checked_total(fir, update.fir, CountField::Fir, update.region)?,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use arrest_map_stats::validate::{MAX_BATCH_SIZE, ValidationError};
    use arrest_map_stats_models::Counts;
    use async_trait::async_trait;

    use super::*;

    const ADMIN: &str = "admin@example.com";

    /// In-memory store that counts calls and can be told to fail.
    #[derive(Default)]
    struct MemoryStore {
        documents: Mutex<BTreeMap<(String, String), Fields>>,
        calls: AtomicUsize,
        fail: bool,
    }

    impl MemoryStore {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn touch(&self) -> Result<(), StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(StoreError::Database("disk on fire".to_string()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl DocumentStore for MemoryStore {
        async fn fetch_all(
            &self,
            collection: &str,
        ) -> Result<Vec<arrest_map_store::Document>, StoreError> {
            self.touch()?;
            Ok(self
                .documents
                .lock()
                .unwrap()
                .iter()
                .filter(|((c, _), _)| c == collection)
                .map(|((_, id), fields)| arrest_map_store::Document {
                    id: id.clone(),
                    fields: fields.clone(),
                })
                .collect())
        }

        async fn get(
            &self,
            collection: &str,
            id: &str,
        ) -> Result<Option<arrest_map_store::Document>, StoreError> {
            self.touch()?;
            Ok(self
                .documents
                .lock()
                .unwrap()
                .get(&(collection.to_string(), id.to_string()))
                .map(|fields| arrest_map_store::Document {
                    id: id.to_string(),
                    fields: fields.clone(),
                }))
        }

        async fn set(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError> {
            self.touch()?;
            self.documents
                .lock()
                .unwrap()
                .insert((collection.to_string(), id.to_string()), fields);
            Ok(())
        }

        async fn add(&self, collection: &str, fields: Fields) -> Result<String, StoreError> {
            self.touch()?;
            let mut documents = self.documents.lock().unwrap();
            let id = format!("media-{}", documents.len());
            documents.insert((collection.to_string(), id.clone()), fields);
            Ok(id)
        }

        async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
            self.touch()?;
            Ok(self
                .documents
                .lock()
                .unwrap()
                .remove(&(collection.to_string(), id.to_string()))
                .is_some())
        }

        async fn batch_set(
            &self,
            collection: &str,
            documents: Vec<(String, Fields)>,
        ) -> Result<(), StoreError> {
            self.touch()?;
            let mut stored = self.documents.lock().unwrap();
            for (id, fields) in documents {
                stored.insert((collection.to_string(), id), fields);
            }
            Ok(())
        }
    }

    fn service(store: &Arc<MemoryStore>) -> AdminService {
        let store: Arc<dyn DocumentStore> = store.clone();
        AdminService::new(Some(store), AdminIdentity::from_email(ADMIN))
    }

    fn admin(service: &AdminService) -> Session {
        service.session_for(Some(ADMIN))
    }

    fn update(region: &str, arrests: u32, fir: u32) -> RecordUpdate {
        RecordUpdate {
            region: region.to_string(),
            arrests: arrests.into(),
            fir: fir.into(),
        }
    }

    async fn stored_counts(service: &AdminService) -> CountView {
        service
            .load_records()
            .await
            .unwrap()
            .into_iter()
            .map(|r| (r.region, r.counts))
            .collect()
    }

    #[tokio::test]
    async fn oversized_batch_is_rejected_before_the_store() {
        let store = Arc::new(MemoryStore::default());
        let service = service(&store);
        let updates: Vec<RecordUpdate> = (0..=MAX_BATCH_SIZE).map(|_| update("goa", 1, 1)).collect();
        assert_eq!(updates.len(), 51);

        let signed_out = service.session_for(None);
        let err = service
            .batch_update(&signed_out, &updates, false)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            AdminError::Validation(ValidationError::BatchTooLarge { len: 51 })
        );
        assert_eq!(err.to_string(), "Maximum 50 updates per batch");
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn oversized_batch_wins_over_missing_store() {
        let service = AdminService::new(None, AdminIdentity::default());
        let updates: Vec<RecordUpdate> = (0..51).map(|_| update("goa", 1, 1)).collect();
        let err = service
            .batch_update(&service.session_for(None), &updates, false)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AdminError::Validation(ValidationError::BatchTooLarge { .. })
        ));
    }

    #[tokio::test]
    async fn empty_batch_is_invalid() {
        let store = Arc::new(MemoryStore::default());
        let service = service(&store);
        let err = service
            .batch_update(&admin(&service), &[], false)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid updates");
    }

    #[tokio::test]
    async fn checks_run_in_order() {
        let store = Arc::new(MemoryStore::default());
        let service = service(&store);
        let anonymous = service.session_for(None);
        let stranger = service.session_for(Some("someone@example.com"));

        let err = service
            .set_counts(&anonymous, "atlantis", &1u32.into(), &1u32.into(), false)
            .await
            .unwrap_err();
        assert!(matches!(err, AdminError::Validation(_)));

        let err = service
            .set_counts(&anonymous, "goa", &1u32.into(), &1u32.into(), false)
            .await
            .unwrap_err();
        assert_eq!(err, AdminError::NotAuthenticated);

        let err = service
            .set_counts(&stranger, "goa", &1u32.into(), &1u32.into(), false)
            .await
            .unwrap_err();
        assert_eq!(err, AdminError::PermissionDenied);

        let unavailable = AdminService::new(None, AdminIdentity::from_email(ADMIN));
        let err = unavailable
            .set_counts(&admin(&unavailable), "goa", &1u32.into(), &1u32.into(), false)
            .await
            .unwrap_err();
        assert_eq!(err, AdminError::ServiceUnavailable);

        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn set_counts_replaces_or_adds() {
        let store = Arc::new(MemoryStore::default());
        let service = service(&store);
        let session = admin(&service);

        service
            .set_counts(&session, "Orissa", &"10".into(), &2u32.into(), false)
            .await
            .unwrap();
        let written = service
            .set_counts(&session, "odisha", &5u32.into(), &1u32.into(), true)
            .await
            .unwrap();

        assert_eq!((written.arrests, written.fir), (15, 3));
        assert_eq!(
            stored_counts(&service).await.get(Region::Odisha),
            Counts::new(15, 3)
        );
    }

    #[tokio::test]
    async fn additive_overflow_is_rejected_without_writing() {
        let store = Arc::new(MemoryStore::default());
        let service = service(&store);
        let session = admin(&service);

        service
            .set_counts(&session, "goa", &999_000u32.into(), &0u32.into(), false)
            .await
            .unwrap();
        let err = service
            .set_counts(&session, "goa", &1_000u32.into(), &0u32.into(), true)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Total arrest count for goa exceeds maximum");
        assert_eq!(
            stored_counts(&service).await.get(Region::Goa),
            Counts::new(999_000, 0)
        );
    }

    #[tokio::test]
    async fn batch_writes_all_and_last_duplicate_wins() {
        let store = Arc::new(MemoryStore::default());
        let service = service(&store);
        let session = admin(&service);

        let written = service
            .batch_update(
                &session,
                &[
                    update("goa", 1, 1),
                    update("Kerala", 2, 2),
                    update("goa", 3, 3),
                ],
                false,
            )
            .await
            .unwrap();

        assert_eq!(written.len(), 2);
        let counts = stored_counts(&service).await;
        assert_eq!(counts.get(Region::Goa), Counts::new(3, 3));
        assert_eq!(counts.get(Region::Kerala), Counts::new(2, 2));
    }

    #[tokio::test]
    async fn additive_batch_adds_to_current_counts() {
        let store = Arc::new(MemoryStore::default());
        let service = service(&store);
        let session = admin(&service);

        service
            .batch_update(&session, &[update("goa", 10, 1)], false)
            .await
            .unwrap();
        service
            .batch_update(&session, &[update("goa", 5, 1), update("cbi", 2, 0)], true)
            .await
            .unwrap();

        let counts = stored_counts(&service).await;
        assert_eq!(counts.get(Region::Goa), Counts::new(15, 2));
        assert_eq!(counts.get(Region::Cbi), Counts::new(2, 0));
    }

    #[tokio::test]
    async fn invalid_batch_entry_blocks_the_whole_batch() {
        let store = Arc::new(MemoryStore::default());
        let service = service(&store);
        let err = service
            .batch_update(
                &admin(&service),
                &[update("goa", 1, 1), update("atlantis", 1, 1)],
                false,
            )
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Invalid region name: atlantis");
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn store_failures_become_generic_errors() {
        let store = Arc::new(MemoryStore::failing());
        let service = service(&store);
        let session = admin(&service);

        let err = service
            .set_counts(&session, "goa", &1u32.into(), &1u32.into(), false)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to update data");

        let err = service.delete_record(&session, "goa").await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to delete data");

        assert_eq!(service.load_records().await.unwrap_err(), AdminError::LoadFailed);
    }

    #[tokio::test]
    async fn delete_record_removes_the_document() {
        let store = Arc::new(MemoryStore::default());
        let service = service(&store);
        let session = admin(&service);

        service
            .set_counts(&session, "goa", &1u32.into(), &1u32.into(), false)
            .await
            .unwrap();
        assert_eq!(
            service.delete_record(&session, "GOA").await.unwrap(),
            Region::Goa
        );
        assert!(stored_counts(&service).await.is_empty());
    }

    #[tokio::test]
    async fn media_round_trip() {
        let store = Arc::new(MemoryStore::default());
        let service = service(&store);
        let session = admin(&service);

        let id = service
            .add_media(
                &session,
                "Kerala",
                "https://news.test/a",
                "<i>Flood</i> arrests",
                Some("video"),
            )
            .await
            .unwrap();

        let media = service.load_media().await.unwrap();
        let item = &media[&Region::Kerala][0];
        assert_eq!(item.id, id);
        assert_eq!(item.title, "iFlood/i arrests");

        service.delete_media(&session, &id).await.unwrap();
        assert!(service.load_media().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn media_validation_precedes_access_checks() {
        let store = Arc::new(MemoryStore::default());
        let service = service(&store);
        let anonymous = service.session_for(None);

        let err = service
            .add_media(&anonymous, "goa", "", "t", None)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Missing required fields");

        let err = service.delete_media(&anonymous, " ").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid media ID");

        let err = service.delete_media(&anonymous, "x").await.unwrap_err();
        assert_eq!(err, AdminError::NotAuthenticated);
    }
}
