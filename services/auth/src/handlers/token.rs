use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use chambers_auth_types::bearer::AuthenticatedSubject;
use chambers_auth_types::token::validate_access_token;

use crate::domain::types::SessionTokens;
use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::token::{EndSessionUseCase, LoginInput, LoginUseCase, RefreshSessionUseCase};

/// Access/refresh pair as returned by login, verify-otp, and refresh.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPairResponse {
    pub access_token: String,
    pub refresh_token: String,
}

impl From<SessionTokens> for TokenPairResponse {
    fn from(tokens: SessionTokens) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        }
    }
}

// ── POST /auth/login ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<TokenPairResponse>, AuthServiceError> {
    let usecase = LoginUseCase {
        identity: state.identity_provider(),
        refresh_tokens: state.refresh_token_store(),
        secrets: state.secrets.clone(),
    };

    let tokens = usecase
        .execute(LoginInput {
            email: body.email,
            password: body.password,
        })
        .await?;

    Ok(Json(tokens.into()))
}

// ── POST /auth/refresh ────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

pub async fn refresh_token(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> Result<Json<TokenPairResponse>, AuthServiceError> {
    let usecase = RefreshSessionUseCase {
        refresh_tokens: state.refresh_token_store(),
        secrets: state.secrets.clone(),
    };

    let tokens = usecase.execute(&body.refresh_token).await?;
    Ok(Json(tokens.into()))
}

// ── POST /auth/logout ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutRequest {
    pub refresh_token: String,
}

pub async fn logout(
    State(state): State<AppState>,
    _subject: AuthenticatedSubject,
    Json(body): Json<LogoutRequest>,
) -> Result<StatusCode, AuthServiceError> {
    let usecase = EndSessionUseCase {
        refresh_tokens: state.refresh_token_store(),
    };

    usecase.execute(&body.refresh_token).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /auth/token ───────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckTokenResponse {
    pub subject_id: Uuid,
    pub email: String,
    pub access_token_exp: u64,
}

/// Introspection for downstream services: accepts or rejects a presented
/// access credential. Pure signature + expiry check, no store lookup.
pub async fn check_token(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
) -> Result<Json<CheckTokenResponse>, AuthServiceError> {
    let token = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(AuthServiceError::Unauthenticated)?;

    let info = validate_access_token(token, &state.secrets.access)
        .map_err(|_| AuthServiceError::Unauthenticated)?;

    Ok(Json(CheckTokenResponse {
        subject_id: info.subject_id,
        email: info.email,
        access_token_exp: info.access_token_exp,
    }))
}
