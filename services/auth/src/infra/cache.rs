use deadpool_redis::Pool;
use deadpool_redis::redis::AsyncCommands;

use chambers_auth_types::token::REFRESH_TOKEN_TTL_SECS;

use crate::domain::repository::{OtpStore, RefreshTokenStore};
use crate::domain::types::{OTP_TTL_SECS, OtpRecord, RefreshRecord};
use crate::error::AuthServiceError;

fn otp_key(email: &str) -> String {
    format!("otp:{email}")
}

fn refresh_key(token: &str) -> String {
    format!("refreshtoken:{token}")
}

#[derive(Clone)]
pub struct RedisOtpStore {
    pub pool: Pool,
}

impl OtpStore for RedisOtpStore {
    async fn put(&self, email: &str, record: &OtpRecord) -> Result<(), AuthServiceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AuthServiceError::Internal(e.into()))?;
        let value =
            serde_json::to_string(record).map_err(|e| AuthServiceError::Internal(e.into()))?;
        let (): () = conn
            .set_ex(otp_key(email), value, OTP_TTL_SECS as u64)
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| AuthServiceError::Internal(e.into()))?;
        Ok(())
    }

    async fn get(&self, email: &str) -> Result<Option<OtpRecord>, AuthServiceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AuthServiceError::Internal(e.into()))?;
        let value: Option<String> = conn
            .get(otp_key(email))
            .await
            .map_err(|e| AuthServiceError::Internal(e.into()))?;
        value
            .map(|v| serde_json::from_str(&v).map_err(|e| AuthServiceError::Internal(e.into())))
            .transpose()
    }

    async fn remove(&self, email: &str) -> Result<(), AuthServiceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AuthServiceError::Internal(e.into()))?;
        let (): () = conn
            .del(otp_key(email))
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| AuthServiceError::Internal(e.into()))?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct RedisRefreshTokenStore {
    pub pool: Pool,
}

impl RefreshTokenStore for RedisRefreshTokenStore {
    async fn put(&self, token: &str, record: &RefreshRecord) -> Result<(), AuthServiceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AuthServiceError::Internal(e.into()))?;
        let value =
            serde_json::to_string(record).map_err(|e| AuthServiceError::Internal(e.into()))?;
        let (): () = conn
            .set_ex(refresh_key(token), value, REFRESH_TOKEN_TTL_SECS)
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| AuthServiceError::Internal(e.into()))?;
        Ok(())
    }

    async fn take(&self, token: &str) -> Result<Option<RefreshRecord>, AuthServiceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AuthServiceError::Internal(e.into()))?;
        // GETDEL: at most one caller can ever observe a given token live.
        let value: Option<String> = conn
            .get_del(refresh_key(token))
            .await
            .map_err(|e| AuthServiceError::Internal(e.into()))?;
        value
            .map(|v| serde_json::from_str(&v).map_err(|e| AuthServiceError::Internal(e.into())))
            .transpose()
    }

    async fn remove(&self, token: &str) -> Result<(), AuthServiceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AuthServiceError::Internal(e.into()))?;
        let (): () = conn
            .del(refresh_key(token))
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| AuthServiceError::Internal(e.into()))?;
        Ok(())
    }
}
