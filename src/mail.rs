use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::header::ContentType,
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use rand::Rng;
use thiserror::Error;

use crate::config::SmtpConfig;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    #[error("failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    #[error("invalid email address: {0}")]
    InvalidAddress(String),
}

/// Transactional mail over SMTP. Bodies are plain text; template rendering is
/// delegated to the upstream mail platform.
#[derive(Clone)]
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
    public_url: String,
}

impl Mailer {
    pub fn new(config: &SmtpConfig, public_url: &str) -> Result<Self, SmtpError> {
        let credentials =
            Credentials::new(config.username.clone(), config.password.clone());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port)
            .credentials(credentials)
            .build();

        Ok(Self {
            transport,
            from_address: config.from_address.clone(),
            public_url: public_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn send_otp_code(&self, to: &str, code: &str) -> Result<(), MailError> {
        let body = format!(
            "Your one-time login code is {code}.\n\nIt expires in 10 minutes. \
             If you did not request it, ignore this email."
        );
        self.send_plain(to, "Your login code", body).await
    }

    pub async fn send_password_reset(&self, to: &str, token: &str) -> Result<(), MailError> {
        let body = format!(
            "A password reset was requested for your account.\n\n\
             Reset it here within the next hour:\n{}/reset-password?token={token}\n\n\
             If you did not request it, ignore this email.",
            self.public_url
        );
        self.send_plain(to, "Reset your password", body).await
    }

    pub async fn send_newsletter_welcome(&self, to: &str) -> Result<(), MailError> {
        let body = "Thanks for subscribing to our newsletter. \
                    You'll hear from us when something worth reading ships."
            .to_string();
        self.send_plain(to, "Welcome to the newsletter", body).await
    }

    pub async fn send_contact_ack(&self, to: &str, name: &str) -> Result<(), MailError> {
        let body = format!(
            "Hi {name},\n\nWe received your message and will get back to you \
             within two business days."
        );
        self.send_plain(to, "We got your message", body).await
    }

    async fn send_plain(
        &self,
        to: &str,
        subject: &str,
        body: String,
    ) -> Result<(), MailError> {
        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| MailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .parse()
                .map_err(|_| MailError::InvalidAddress(to.to_string()))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)?;

        self.transport.send(email).await?;
        tracing::info!(to = %to, subject = %subject, "email sent");
        Ok(())
    }
}

/// 6-digit numeric one-time code.
pub fn generate_otp_code() -> String {
    let code: u32 = rand::rng().random_range(100_000..1_000_000);
    code.to_string()
}

/// Opaque token for password-reset links.
pub fn generate_reset_token() -> String {
    rand::rng()
        .sample_iter(rand::distr::Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn otp_code_is_six_digits() {
        for _ in 0..100 {
            let code = generate_otp_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn reset_token_is_opaque_alphanumeric() {
        let token = generate_reset_token();
        assert_eq!(token.len(), 32);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(token, generate_reset_token());
    }
}
