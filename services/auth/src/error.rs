use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Auth service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("invalid or expired otp")]
    InvalidOrExpiredOtp,
    #[error("otp delivery failed")]
    DeliveryFailed,
    #[error("identity creation failed")]
    IdentityCreationFailed,
    #[error("identity not found")]
    IdentityNotFound,
    #[error("invalid refresh token")]
    InvalidRefreshToken,
    #[error("unauthenticated")]
    Unauthenticated,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AuthServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidOrExpiredOtp => "INVALID_OR_EXPIRED_OTP",
            Self::DeliveryFailed => "DELIVERY_FAILED",
            Self::IdentityCreationFailed => "IDENTITY_CREATION_FAILED",
            Self::IdentityNotFound => "IDENTITY_NOT_FOUND",
            Self::InvalidRefreshToken => "INVALID_REFRESH_TOKEN",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for AuthServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidCredentials
            | Self::InvalidOrExpiredOtp
            | Self::IdentityCreationFailed
            | Self::IdentityNotFound
            | Self::InvalidRefreshToken
            | Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::DeliveryFailed => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Log 500s only — tower-http TraceLayer already records method/uri/status for all
        // requests. 4xx are expected client errors; logging them here would be noise.
        // Internal errors need the anyhow chain logged so the root cause is traceable.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
