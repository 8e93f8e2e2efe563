#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Admin identity, session and write service.
//!
//! Identity comes from a trusted upstream as an email address. The admin is
//! recognized by email digest; everyone else may read but not write.

pub mod identity;
pub mod media;
pub mod service;
pub mod session;

use arrest_map_stats::validate::ValidationError;
use thiserror::Error;

pub use identity::{AdminIdentity, User};
pub use service::AdminService;
pub use session::{Session, SubscriptionId};

/// Errors from admin operations.
///
/// Messages are fixed and safe to show to users. Underlying store errors
/// are logged, never carried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdminError {
    /// Input was rejected before any store access.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No store is configured.
    #[error("Service unavailable")]
    ServiceUnavailable,

    /// Nobody is signed in.
    #[error("Authentication required")]
    NotAuthenticated,

    /// The signed-in user is not the admin.
    #[error("Permission denied")]
    PermissionDenied,

    /// Writing counts failed.
    #[error("Failed to update data")]
    UpdateFailed,

    /// Deleting a record failed.
    #[error("Failed to delete data")]
    DeleteFailed,

    /// Reading records failed.
    #[error("Failed to load data")]
    LoadFailed,

    /// Inserting a media item failed.
    #[error("Failed to add media")]
    AddMediaFailed,

    /// Deleting a media item failed.
    #[error("Failed to delete media")]
    DeleteMediaFailed,

    /// Reading media failed.
    #[error("Failed to load media")]
    LoadMediaFailed,
}
