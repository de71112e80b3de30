use axum::extract::FromRef;
use deadpool_redis::Pool as RedisPool;

use chambers_auth_types::bearer::AccessTokenVerifier;

use crate::domain::types::JwtSecrets;
use crate::infra::cache::{RedisOtpStore, RedisRefreshTokenStore};
use crate::infra::identity::HttpIdentityProvider;
use crate::infra::mail::HttpMailer;

/// Shared application state passed to every handler via axum `State`.
///
/// Clients and secrets are constructed once in `main` and cloned per
/// request — no ambient globals.
#[derive(Clone)]
pub struct AppState {
    pub redis: RedisPool,
    pub http: reqwest::Client,
    pub secrets: JwtSecrets,
    pub identity_url: String,
    pub identity_service_key: String,
    pub mail_api_url: String,
    pub mail_api_key: String,
    pub mail_sender: String,
}

impl AppState {
    pub fn otp_store(&self) -> RedisOtpStore {
        RedisOtpStore {
            pool: self.redis.clone(),
        }
    }

    pub fn refresh_token_store(&self) -> RedisRefreshTokenStore {
        RedisRefreshTokenStore {
            pool: self.redis.clone(),
        }
    }

    pub fn identity_provider(&self) -> HttpIdentityProvider {
        HttpIdentityProvider::new(
            self.http.clone(),
            self.identity_url.clone(),
            self.identity_service_key.clone(),
        )
    }

    pub fn mailer(&self) -> HttpMailer {
        HttpMailer::new(
            self.http.clone(),
            self.mail_api_url.clone(),
            self.mail_api_key.clone(),
            self.mail_sender.clone(),
        )
    }
}

impl FromRef<AppState> for AccessTokenVerifier {
    fn from_ref(state: &AppState) -> Self {
        AccessTokenVerifier::new(state.secrets.access.clone())
    }
}
