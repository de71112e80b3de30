use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use chambers_auth_types::token::{ACCESS_TOKEN_TTL_SECS, AccessClaims, REFRESH_TOKEN_TTL_SECS};

use crate::domain::repository::{IdentityProvider, RefreshTokenStore};
use crate::domain::types::{JwtSecrets, RefreshRecord, SessionTokens, Subject};
use crate::error::AuthServiceError;

/// JWT claims for refresh tokens. Carries no identity — the stored record is
/// the source of truth. The random `jti` makes every mint structurally
/// distinct even within the same second.
#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshClaims {
    #[serde(rename = "type")]
    pub token_type: String,
    pub jti: String,
    pub exp: u64,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before UNIX epoch")
        .as_secs()
}

pub fn issue_access_token(
    subject: &Subject,
    secret: &str,
) -> Result<(String, u64), AuthServiceError> {
    let iat = now_secs();
    let exp = iat + ACCESS_TOKEN_TTL_SECS;
    let claims = AccessClaims {
        sub: subject.id.to_string(),
        email: subject.email.clone(),
        iat,
        exp,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthServiceError::Internal(e.into()))?;
    Ok((token, exp))
}

pub fn issue_refresh_token(secret: &str) -> Result<String, AuthServiceError> {
    let claims = RefreshClaims {
        token_type: "refresh".to_owned(),
        jti: Uuid::new_v4().to_string(),
        exp: now_secs() + REFRESH_TOKEN_TTL_SECS,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthServiceError::Internal(e.into()))
}

/// Issue an access/refresh pair for a resolved subject and store the refresh
/// record keyed by the token value.
pub async fn mint_session<R: RefreshTokenStore>(
    refresh_tokens: &R,
    secrets: &JwtSecrets,
    subject: &Subject,
) -> Result<SessionTokens, AuthServiceError> {
    let (access_token, access_token_exp) = issue_access_token(subject, &secrets.access)?;
    let refresh_token = issue_refresh_token(&secrets.refresh)?;

    let record = RefreshRecord {
        subject_id: subject.id,
        email: subject.email.clone(),
        expires_at: Utc::now() + Duration::seconds(REFRESH_TOKEN_TTL_SECS as i64),
    };
    refresh_tokens.put(&refresh_token, &record).await?;

    Ok(SessionTokens {
        access_token,
        access_token_exp,
        refresh_token,
    })
}

// ── Login (password, delegated to the identity provider) ─────────────────────

pub struct LoginInput {
    pub email: String,
    pub password: String,
}

pub struct LoginUseCase<I: IdentityProvider, R: RefreshTokenStore> {
    pub identity: I,
    pub refresh_tokens: R,
    pub secrets: JwtSecrets,
}

impl<I: IdentityProvider, R: RefreshTokenStore> LoginUseCase<I, R> {
    pub async fn execute(&self, input: LoginInput) -> Result<SessionTokens, AuthServiceError> {
        let subject = self
            .identity
            .verify_password(&input.email, &input.password)
            .await?
            .ok_or(AuthServiceError::InvalidCredentials)?;

        mint_session(&self.refresh_tokens, &self.secrets, &subject).await
    }
}

// ── Refresh rotation ─────────────────────────────────────────────────────────

pub struct RefreshSessionUseCase<R: RefreshTokenStore> {
    pub refresh_tokens: R,
    pub secrets: JwtSecrets,
}

impl<R: RefreshTokenStore> RefreshSessionUseCase<R> {
    /// Exchange a refresh token for a new pair, invalidating the old one.
    ///
    /// The atomic take means the old token resolves at most once, even under
    /// concurrent rotation attempts. A miss covers every invalid case:
    /// never issued, already rotated, logged out, or expired-and-evicted.
    pub async fn execute(&self, old_token: &str) -> Result<SessionTokens, AuthServiceError> {
        let record = self
            .refresh_tokens
            .take(old_token)
            .await?
            .ok_or(AuthServiceError::InvalidRefreshToken)?;

        // Stores evict by TTL; the timestamp check covers a record read just
        // before eviction.
        if record.is_expired() {
            return Err(AuthServiceError::InvalidRefreshToken);
        }

        mint_session(&self.refresh_tokens, &self.secrets, &record.subject()).await
    }
}

// ── Logout ───────────────────────────────────────────────────────────────────

pub struct EndSessionUseCase<R: RefreshTokenStore> {
    pub refresh_tokens: R,
}

impl<R: RefreshTokenStore> EndSessionUseCase<R> {
    /// Delete the stored record, if any. Idempotent — an unknown or already
    /// revoked token is not an error.
    pub async fn execute(&self, refresh_token: &str) -> Result<(), AuthServiceError> {
        self.refresh_tokens.remove(refresh_token).await
    }
}
