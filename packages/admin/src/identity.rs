//! Signed-in users and the admin check.
//!
//! The admin is recognized by the SHA-256 digest of their lowercased email,
//! so the plain address never has to be configured.

use sha2::{Digest, Sha256};

/// Digest of the built-in admin email.
pub const DEFAULT_ADMIN_HASH: &str =
    "166d1337c4641be7b320ddb2e0bad8be0bc630b3efb3917b0f2128ed5a5506d8";

/// A signed-in user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Email address.
    pub email: String,
    /// Optional display name.
    pub display_name: Option<String>,
}

impl User {
    /// Creates a user with no display name.
    #[must_use]
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            display_name: None,
        }
    }

    /// Name to show in prompts and logs.
    #[must_use]
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.email)
    }
}

/// Lowercase hex SHA-256 of the lowercased email.
#[must_use]
pub fn email_digest(email: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(email.to_lowercase().as_bytes());
    hex::encode(hasher.finalize())
}

/// Recognizes the admin by email digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminIdentity {
    digest: String,
}

impl AdminIdentity {
    /// Uses the given hex digest. Case is ignored.
    #[must_use]
    pub fn from_digest(digest: &str) -> Self {
        Self {
            digest: digest.trim().to_ascii_lowercase(),
        }
    }

    /// Recognizes exactly the given email.
    #[must_use]
    pub fn from_email(email: &str) -> Self {
        Self {
            digest: email_digest(email),
        }
    }

    /// Reads `ARREST_MAP_ADMIN_HASH`, falling back to
    /// [`DEFAULT_ADMIN_HASH`].
    #[must_use]
    pub fn from_env() -> Self {
        std::env::var("ARREST_MAP_ADMIN_HASH").map_or_else(
            |_| Self::default(),
            |digest| Self::from_digest(&digest),
        )
    }

    /// Returns `true` if `user` is the admin.
    #[must_use]
    pub fn is_admin(&self, user: &User) -> bool {
        email_digest(&user.email) == self.digest
    }
}

impl Default for AdminIdentity {
    fn default() -> Self {
        Self::from_digest(DEFAULT_ADMIN_HASH)
    }
}
