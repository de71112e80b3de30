use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use crate::domain::types::OtpPurpose;
use crate::error::AuthServiceError;
use crate::handlers::token::TokenPairResponse;
use crate::state::AppState;
use crate::usecase::otp::{RequestOtpInput, RequestOtpUseCase, VerifyOtpInput, VerifyOtpUseCase};

// ── POST /auth/send-otp ───────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOtpRequest {
    pub email: String,
    #[serde(default)]
    pub is_register: bool,
}

pub async fn send_otp(
    State(state): State<AppState>,
    Json(body): Json<SendOtpRequest>,
) -> Result<StatusCode, AuthServiceError> {
    let usecase = RequestOtpUseCase {
        otps: state.otp_store(),
        mailer: state.mailer(),
    };

    let purpose = if body.is_register {
        OtpPurpose::Register
    } else {
        OtpPurpose::Login
    };

    usecase
        .execute(RequestOtpInput {
            email: body.email,
            purpose,
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// ── POST /auth/verify-otp ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub token: String,
}

pub async fn verify_otp(
    State(state): State<AppState>,
    Json(body): Json<VerifyOtpRequest>,
) -> Result<Json<TokenPairResponse>, AuthServiceError> {
    let usecase = VerifyOtpUseCase {
        otps: state.otp_store(),
        identity: state.identity_provider(),
        refresh_tokens: state.refresh_token_store(),
        secrets: state.secrets.clone(),
    };

    let tokens = usecase
        .execute(VerifyOtpInput {
            email: body.email,
            code: body.token,
        })
        .await?;

    Ok(Json(tokens.into()))
}
