//! `Authorization: Bearer` extractor for protected routes.

use axum::extract::{FromRef, FromRequestParts};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use http::StatusCode;
use http::request::Parts;
use uuid::Uuid;

use crate::token::validate_access_token;

/// Access-token verification key, injected into router state.
///
/// Services expose it to the extractor by implementing
/// `FromRef<AppState> for AccessTokenVerifier`.
#[derive(Debug, Clone)]
pub struct AccessTokenVerifier {
    secret: String,
}

impl AccessTokenVerifier {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

/// Subject identity proven by a valid Bearer access credential.
///
/// Rejects uniformly with 401 when the header is absent, the signature is
/// invalid, or the credential has expired — independent of the downstream
/// operation.
#[derive(Debug, Clone)]
pub struct AuthenticatedSubject {
    pub subject_id: Uuid,
    pub email: String,
    pub access_token_exp: u64,
}

impl<S> FromRequestParts<S> for AuthenticatedSubject
where
    S: Send + Sync,
    AccessTokenVerifier: FromRef<S>,
{
    type Rejection = StatusCode;

    // axum-core 0.5 defines this as `fn -> impl Future + Send` (not `async fn`).
    // In Rust 1.82+ precise capturing, `async fn` captures lifetimes differently,
    // causing E0195. Fix: extract values synchronously, return a 'static async move block.
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let verifier = AccessTokenVerifier::from_ref(state);
        let bearer = parts
            .headers
            .typed_get::<Authorization<Bearer>>()
            .map(|auth| auth.token().to_owned());

        async move {
            let token = bearer.ok_or(StatusCode::UNAUTHORIZED)?;
            let info = validate_access_token(&token, &verifier.secret)
                .map_err(|_| StatusCode::UNAUTHORIZED)?;
            Ok(Self {
                subject_id: info.subject_id,
                email: info.email,
                access_token_exp: info.access_token_exp,
            })
        }
    }
}
