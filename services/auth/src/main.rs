use tracing::info;

use chambers_auth::config::AuthConfig;
use chambers_auth::domain::types::JwtSecrets;
use chambers_auth::router::build_router;
use chambers_auth::state::AppState;
use chambers_core::tracing::init_tracing;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = AuthConfig::from_env();

    let redis_cfg = deadpool_redis::Config::from_url(&config.redis_url);
    let redis = redis_cfg
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .expect("failed to create Redis pool");

    let http = reqwest::Client::new();

    let state = AppState {
        redis,
        http,
        secrets: JwtSecrets {
            access: config.jwt_access_secret,
            refresh: config.jwt_refresh_secret,
        },
        identity_url: config.identity_url,
        identity_service_key: config.identity_service_key,
        mail_api_url: config.mail_api_url,
        mail_api_key: config.mail_api_key,
        mail_sender: config.mail_sender,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.auth_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("auth service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
