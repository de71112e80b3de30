use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::domain::repository::IdentityProvider;
use crate::domain::types::Subject;
use crate::error::AuthServiceError;

/// Identity provider backed by a GoTrue-compatible auth API.
///
/// Password verification uses the public token grant; lookup and creation go
/// through the admin API with the service key. Swappable behind
/// [`IdentityProvider`] without touching the OTP state machine.
#[derive(Clone)]
pub struct HttpIdentityProvider {
    client: reqwest::Client,
    base_url: String,
    service_key: String,
}

#[derive(Debug, Deserialize)]
struct ProviderUser {
    id: Uuid,
    email: String,
}

#[derive(Debug, Deserialize)]
struct TokenGrantResponse {
    user: ProviderUser,
}

#[derive(Debug, Deserialize)]
struct AdminUsersResponse {
    users: Vec<ProviderUser>,
}

impl From<ProviderUser> for Subject {
    fn from(user: ProviderUser) -> Self {
        Subject {
            id: user.id,
            email: user.email,
        }
    }
}

impl HttpIdentityProvider {
    pub fn new(client: reqwest::Client, base_url: String, service_key: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            service_key,
        }
    }
}

impl IdentityProvider for HttpIdentityProvider {
    async fn verify_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Subject>, AuthServiceError> {
        let response = self
            .client
            .post(format!("{}/token?grant_type=password", self.base_url))
            .header("apikey", &self.service_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("identity provider token grant failed: {e}"))?;

        if response.status().is_client_error() {
            return Ok(None);
        }
        let response = response
            .error_for_status()
            .map_err(|e| anyhow::anyhow!("identity provider token grant failed: {e}"))?;

        let grant: TokenGrantResponse = response
            .json()
            .await
            .map_err(|e| anyhow::anyhow!("invalid token grant response: {e}"))?;
        Ok(Some(grant.user.into()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Subject>, AuthServiceError> {
        let response = self
            .client
            .get(format!("{}/admin/users", self.base_url))
            .query(&[("email", email)])
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("identity provider user lookup failed: {e}"))?
            .error_for_status()
            .map_err(|e| anyhow::anyhow!("identity provider user lookup failed: {e}"))?;

        let listing: AdminUsersResponse = response
            .json()
            .await
            .map_err(|e| anyhow::anyhow!("invalid user listing response: {e}"))?;

        Ok(listing
            .users
            .into_iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .map(Subject::from))
    }

    async fn create(
        &self,
        email: &str,
        bootstrap_secret: &str,
    ) -> Result<Subject, AuthServiceError> {
        let response = self
            .client
            .post(format!("{}/admin/users", self.base_url))
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .json(&json!({
                "email": email,
                "password": bootstrap_secret,
                "email_confirm": true,
            }))
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("identity provider user creation failed: {e}"))?;

        if response.status().is_client_error() {
            return Err(AuthServiceError::IdentityCreationFailed);
        }
        let response = response
            .error_for_status()
            .map_err(|e| anyhow::anyhow!("identity provider user creation failed: {e}"))?;

        let user: ProviderUser = response
            .json()
            .await
            .map_err(|e| anyhow::anyhow!("invalid user creation response: {e}"))?;
        Ok(user.into())
    }
}
