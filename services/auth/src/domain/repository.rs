#![allow(async_fn_in_trait)]

use crate::domain::types::{OtpRecord, RefreshRecord, Subject};
use crate::error::AuthServiceError;

/// Store for one-time passcodes, keyed by email.
pub trait OtpStore: Send + Sync {
    /// Store a record with the OTP TTL, overwriting any prior record for
    /// the same email.
    async fn put(&self, email: &str, record: &OtpRecord) -> Result<(), AuthServiceError>;

    async fn get(&self, email: &str) -> Result<Option<OtpRecord>, AuthServiceError>;

    /// Delete the record, if any.
    async fn remove(&self, email: &str) -> Result<(), AuthServiceError>;
}

/// Store for refresh-token records, keyed by token value.
///
/// Keying by the token itself (not by subject) makes invalidation a single
/// atomic keyed delete — rotation never scans, so two concurrent rotations
/// of the same token cannot both observe it live.
pub trait RefreshTokenStore: Send + Sync {
    /// Store a record with the refresh TTL.
    async fn put(&self, token: &str, record: &RefreshRecord) -> Result<(), AuthServiceError>;

    /// Atomically fetch and delete the record for a token (GETDEL).
    async fn take(&self, token: &str) -> Result<Option<RefreshRecord>, AuthServiceError>;

    /// Delete the record, if any. Idempotent.
    async fn remove(&self, token: &str) -> Result<(), AuthServiceError>;
}

/// Port to the external identity provider — the source of truth for subject
/// existence and password credentials. This service never stores passwords.
pub trait IdentityProvider: Send + Sync {
    /// Check email + password, returning the subject on success, `None` on
    /// rejected credentials.
    async fn verify_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Subject>, AuthServiceError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Subject>, AuthServiceError>;

    /// Create a new identity. The caller supplies a transient bootstrap
    /// secret (the OTP itself) as the initial password surrogate.
    async fn create(
        &self,
        email: &str,
        bootstrap_secret: &str,
    ) -> Result<Subject, AuthServiceError>;
}

/// Port for out-of-band OTP delivery.
pub trait Mailer: Send + Sync {
    async fn send_otp(&self, email: &str, code: &str) -> Result<(), AuthServiceError>;
}
