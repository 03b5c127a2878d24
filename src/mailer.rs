//! Mail transport: SMTP submission of the rendered briefing.
//!
//! The message is `multipart/alternative` with a plain-text part first and
//! the HTML briefing last, so text-only clients still get something
//! readable. Submission uses STARTTLS on the configured relay (Gmail's
//! submission port by default) with the sender's credentials.
//!
//! An SMTP 535 reply means the relay rejected the credentials and maps to
//! [`BriefingError::Auth`]; every other build or submission failure is
//! [`BriefingError::Delivery`].

use std::time::Duration;

use lettre::message::header::ContentType;
use lettre::message::{Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{info, instrument};

use crate::config::Config;
use crate::error::{BriefingError, Result};

/// Service tag carried in error variants and logs.
const SERVICE: &str = "smtp";

/// Capability to deliver one composed briefing email.
pub trait SendMail {
    /// Build and submit the briefing with the given subject and bodies.
    ///
    /// # Errors
    ///
    /// A single attempt; no retries. Any error means the briefing did not
    /// reach the relay and the run must fail.
    async fn send(&self, subject: &str, html_body: &str, text_body: &str) -> Result<()>;
}

/// SMTP mailer bound to one sender/receiver pair.
pub struct SmtpMailer {
    host: String,
    port: u16,
    username: String,
    password: String,
    from: String,
    to: String,
    timeout: Duration,
}

impl SmtpMailer {
    /// Bind a mailer to the configured relay and addresses.
    pub fn new(config: &Config, timeout: Duration) -> Self {
        Self {
            host: config.smtp_host.clone(),
            port: config.smtp_port,
            username: config.sender_email.clone(),
            password: config.sender_password.clone(),
            from: config.sender_email.clone(),
            to: config.receiver_email.clone(),
            timeout,
        }
    }

    /// Compose the MIME message: `multipart/alternative`, text then HTML.
    fn build_message(&self, subject: &str, html_body: &str, text_body: &str) -> Result<Message> {
        let from: Mailbox = self.from.parse().map_err(|e| {
            BriefingError::Delivery(format!("invalid sender address {:?}: {e}", self.from))
        })?;
        let to: Mailbox = self.to.parse().map_err(|e| {
            BriefingError::Delivery(format!("invalid receiver address {:?}: {e}", self.to))
        })?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )
            .map_err(|e| BriefingError::Delivery(format!("failed to build message: {e}")))
    }
}

impl SendMail for SmtpMailer {
    #[instrument(level = "info", skip_all, fields(to = %self.to, %subject))]
    async fn send(&self, subject: &str, html_body: &str, text_body: &str) -> Result<()> {
        let email = self.build_message(subject, html_body, text_body)?;

        let credentials = Credentials::new(self.username.clone(), self.password.clone());
        let transport: AsyncSmtpTransport<Tokio1Executor> =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.host)
                .map_err(|e| {
                    BriefingError::Delivery(format!("failed to set up SMTP transport: {e}"))
                })?
                .port(self.port)
                .credentials(credentials)
                .timeout(Some(self.timeout))
                .build();

        transport.send(email).await.map_err(classify_smtp_error)?;

        info!("Briefing accepted by SMTP relay");
        Ok(())
    }
}

/// 535 is the reply for rejected credentials (RFC 4954); everything else
/// stays a delivery failure.
fn classify_smtp_error(err: lettre::transport::smtp::Error) -> BriefingError {
    let auth_rejected = err
        .status()
        .map(|code| code.to_string() == "535")
        .unwrap_or(false);
    if auth_rejected {
        BriefingError::Auth { service: SERVICE }
    } else {
        BriefingError::Delivery(err.to_string())
    }
}
