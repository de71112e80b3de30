/// Auth service configuration loaded from environment variables.
///
/// Read once at startup; the core never touches ambient env state after
/// this struct is built.
#[derive(Debug)]
pub struct AuthConfig {
    /// Redis connection URL.
    pub redis_url: String,
    /// HMAC secret for signing JWT access credentials.
    pub jwt_access_secret: String,
    /// HMAC secret for signing JWT refresh tokens (distinct from access).
    pub jwt_refresh_secret: String,
    /// Identity provider base URL (GoTrue-compatible auth API).
    pub identity_url: String,
    /// Identity provider service-role key.
    pub identity_service_key: String,
    /// Transactional email API base URL.
    pub mail_api_url: String,
    /// Transactional email API key.
    pub mail_api_key: String,
    /// Sender address for OTP emails.
    pub mail_sender: String,
    /// TCP port to listen on (default 4000). Env var: `AUTH_PORT`.
    pub auth_port: u16,
}

impl AuthConfig {
    pub fn from_env() -> Self {
        Self {
            redis_url: std::env::var("REDIS_URL").expect("REDIS_URL"),
            jwt_access_secret: std::env::var("JWT_ACCESS_SECRET").expect("JWT_ACCESS_SECRET"),
            jwt_refresh_secret: std::env::var("JWT_REFRESH_SECRET").expect("JWT_REFRESH_SECRET"),
            identity_url: std::env::var("IDENTITY_URL").expect("IDENTITY_URL"),
            identity_service_key: std::env::var("IDENTITY_SERVICE_KEY")
                .expect("IDENTITY_SERVICE_KEY"),
            mail_api_url: std::env::var("MAIL_API_URL").expect("MAIL_API_URL"),
            mail_api_key: std::env::var("MAIL_API_KEY").expect("MAIL_API_KEY"),
            mail_sender: std::env::var("MAIL_SENDER").expect("MAIL_SENDER"),
            auth_port: std::env::var("AUTH_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(4000),
        }
    }
}
