use serde::Serialize;

use crate::domain::repository::Mailer;
use crate::error::AuthServiceError;

/// OTP delivery via a Brevo-compatible transactional email API.
///
/// Any failure — connection, non-2xx status — surfaces as `DeliveryFailed`;
/// the caller rolls back the stored code.
#[derive(Clone)]
pub struct HttpMailer {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    sender: String,
}

#[derive(Debug, Serialize)]
struct EmailAddress {
    email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailBody {
    sender: EmailAddress,
    to: Vec<EmailAddress>,
    subject: String,
    text_content: String,
}

impl HttpMailer {
    pub fn new(client: reqwest::Client, api_url: String, api_key: String, sender: String) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_owned(),
            api_key,
            sender,
        }
    }
}

impl Mailer for HttpMailer {
    async fn send_otp(&self, email: &str, code: &str) -> Result<(), AuthServiceError> {
        let body = SendEmailBody {
            sender: EmailAddress {
                email: self.sender.clone(),
            },
            to: vec![EmailAddress {
                email: email.to_owned(),
            }],
            subject: "Your OTP Code".to_owned(),
            text_content: format!("Your OTP code is: {code}. It expires in 5 minutes."),
        };

        let response = self
            .client
            .post(format!("{}/v3/smtp/email", self.api_url))
            .header("api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "otp email send failed");
                AuthServiceError::DeliveryFailed
            })?;

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "otp email rejected by mail api");
            return Err(AuthServiceError::DeliveryFailed);
        }
        Ok(())
    }
}
