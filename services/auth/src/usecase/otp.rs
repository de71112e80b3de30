use chrono::{Duration, Utc};
use rand::RngExt;

use crate::domain::repository::{IdentityProvider, Mailer, OtpStore, RefreshTokenStore};
use crate::domain::types::{JwtSecrets, OTP_TTL_SECS, OtpPurpose, OtpRecord, SessionTokens};
use crate::error::AuthServiceError;
use crate::usecase::token::mint_session;

/// Generate a 6-digit numeric passcode, uniform over 100000–999999.
fn generate_code() -> String {
    let mut rng = rand::rng();
    rng.random_range(100_000..=999_999u32).to_string()
}

// ── Request OTP ──────────────────────────────────────────────────────────────

pub struct RequestOtpInput {
    pub email: String,
    pub purpose: OtpPurpose,
}

pub struct RequestOtpUseCase<O, M>
where
    O: OtpStore,
    M: Mailer,
{
    pub otps: O,
    pub mailer: M,
}

impl<O, M> RequestOtpUseCase<O, M>
where
    O: OtpStore,
    M: Mailer,
{
    /// Issue a passcode and deliver it out-of-band.
    ///
    /// Delivery failure rolls the stored record back before the error
    /// surfaces, so the system never accepts a guess against a code the
    /// user was not sent.
    pub async fn execute(&self, input: RequestOtpInput) -> Result<(), AuthServiceError> {
        let record = OtpRecord {
            code: generate_code(),
            purpose: input.purpose,
            expires_at: Utc::now() + Duration::seconds(OTP_TTL_SECS),
        };

        // Overwrites any prior record for this email.
        self.otps.put(&input.email, &record).await?;

        if let Err(e) = self.mailer.send_otp(&input.email, &record.code).await {
            self.otps.remove(&input.email).await?;
            return Err(e);
        }
        Ok(())
    }
}

// ── Verify OTP ───────────────────────────────────────────────────────────────

pub struct VerifyOtpInput {
    pub email: String,
    pub code: String,
}

pub struct VerifyOtpUseCase<O, I, R>
where
    O: OtpStore,
    I: IdentityProvider,
    R: RefreshTokenStore,
{
    pub otps: O,
    pub identity: I,
    pub refresh_tokens: R,
    pub secrets: JwtSecrets,
}

impl<O, I, R> VerifyOtpUseCase<O, I, R>
where
    O: OtpStore,
    I: IdentityProvider,
    R: RefreshTokenStore,
{
    /// Validate a caller-supplied code exactly once, then resolve the
    /// identity per the stored purpose and mint a session.
    ///
    /// The code is deleted *before* identity resolution: a crash or provider
    /// failure mid-resolution cannot be retried with the same code. The user
    /// must request a fresh one — anti-replay wins over convenience.
    pub async fn execute(&self, input: VerifyOtpInput) -> Result<SessionTokens, AuthServiceError> {
        let record = self
            .otps
            .get(&input.email)
            .await?
            .ok_or(AuthServiceError::InvalidOrExpiredOtp)?;

        if record.is_expired() {
            // Not yet evicted by store TTL; drop it here.
            self.otps.remove(&input.email).await?;
            return Err(AuthServiceError::InvalidOrExpiredOtp);
        }

        // A wrong guess does not consume the code.
        if record.code != input.code {
            return Err(AuthServiceError::InvalidOrExpiredOtp);
        }

        // Single-use enforcement: delete before any further action.
        self.otps.remove(&input.email).await?;

        let subject = match record.purpose {
            OtpPurpose::Register => {
                // The verified code doubles as the bootstrap secret for the
                // new identity; real credential storage stays with the
                // provider.
                self.identity.create(&input.email, &record.code).await?
            }
            OtpPurpose::Login => self
                .identity
                .find_by_email(&input.email)
                .await?
                .ok_or(AuthServiceError::IdentityNotFound)?,
        };

        mint_session(&self.refresh_tokens, &self.secrets, &subject).await
    }
}
