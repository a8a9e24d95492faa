// src/notification/email.rs

use async_trait::async_trait;
use lettre::message::{Mailbox, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::{NotificationError, NotificationSender};
use crate::config::SmtpConfig;

pub struct SmtpEmailSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpEmailSender {
    pub fn new(cfg: &SmtpConfig, from: &str) -> anyhow::Result<Self> {
        let from: Mailbox = from.parse()?;

        // Credentials imply a real relay (STARTTLS); without them we assume a
        // local catcher such as MailHog.
        let transport = match (&cfg.username, &cfg.password) {
            (Some(user), Some(pass)) => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&cfg.host)?
                    .port(cfg.port)
                    .credentials(Credentials::new(user.clone(), pass.clone()))
                    .build()
            }
            _ => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&cfg.host)
                .port(cfg.port)
                .build(),
        };

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl NotificationSender for SmtpEmailSender {
    async fn send(
        &self,
        recipient: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), NotificationError> {
        let to: Mailbox = recipient
            .parse()
            .map_err(|e| NotificationError::Transport(format!("bad recipient {recipient}: {e}")))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| NotificationError::Transport(format!("message build error: {e}")))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| NotificationError::Transport(format!("smtp error: {e}")))?;

        tracing::info!(recipient, "email sent");
        Ok(())
    }
}

/// Writes the message to the log instead of delivering it. Used when no SMTP
/// host is configured.
pub struct LogEmailSender;

#[async_trait]
impl NotificationSender for LogEmailSender {
    async fn send(
        &self,
        recipient: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), NotificationError> {
        tracing::info!(recipient, subject, body, "email (log only)");
        Ok(())
    }
}
