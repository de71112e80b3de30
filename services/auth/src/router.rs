use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use chambers_core::health::{healthz, readyz};
use chambers_core::middleware::request_id_layer;

use crate::handlers::{
    otp::{send_otp, verify_otp},
    token::{check_token, login, logout, refresh_token},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // OTP
        .route("/auth/send-otp", post(send_otp))
        .route("/auth/verify-otp", post(verify_otp))
        // Sessions
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh_token))
        .route("/auth/logout", post(logout))
        .route("/auth/token", get(check_token))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
