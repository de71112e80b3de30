use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Authenticated identity (advocate) resolved by the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    pub id: Uuid,
    pub email: String,
}

/// Why an OTP was issued. Preserved between send and verify — it decides
/// whether verification creates a new identity or resolves an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtpPurpose {
    Login,
    Register,
}

/// One-time passcode stored against an email. At most one live record per
/// email — a new issuance overwrites the prior one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpRecord {
    pub code: String,
    pub purpose: OtpPurpose,
    pub expires_at: DateTime<Utc>,
}

impl OtpRecord {
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

/// Stored refresh-token record, keyed by the token value itself so
/// invalidation is a single atomic delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRecord {
    pub subject_id: Uuid,
    pub email: String,
    pub expires_at: DateTime<Utc>,
}

impl RefreshRecord {
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }

    pub fn subject(&self) -> Subject {
        Subject {
            id: self.subject_id,
            email: self.email.clone(),
        }
    }
}

/// Signing secrets for the two token kinds. Access and refresh tokens use
/// distinct secrets so one can never be presented as the other.
#[derive(Debug, Clone)]
pub struct JwtSecrets {
    pub access: String,
    pub refresh: String,
}

/// Access/refresh pair returned by every session-minting operation.
#[derive(Debug)]
pub struct SessionTokens {
    pub access_token: String,
    pub access_token_exp: u64,
    pub refresh_token: String,
}

/// OTP time-to-live in seconds.
pub const OTP_TTL_SECS: i64 = 300;
