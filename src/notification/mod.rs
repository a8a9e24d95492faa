use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;

pub mod email;
pub mod message;

pub use email::{LogEmailSender, SmtpEmailSender};
pub use message::AppointmentNotice;

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("unsupported notification type: {0}")]
    UnsupportedChannel(String),
    #[error("notification transport error: {0}")]
    Transport(String),
}

/// Delivery mechanisms known to the dispatcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    Email,
}

impl FromStr for NotificationKind {
    type Err = NotificationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("email") {
            Ok(Self::Email)
        } else {
            Err(NotificationError::UnsupportedChannel(s.to_string()))
        }
    }
}

#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// Deliver once. Transport failures are returned to the caller, never retried.
    async fn send(&self, recipient: &str, subject: &str, body: &str)
    -> Result<(), NotificationError>;
}

/// Explicit kind → sender mapping. Lookups of unknown or unregistered kinds fail fast.
#[derive(Clone, Default)]
pub struct NotificationFactory {
    senders: HashMap<NotificationKind, Arc<dyn NotificationSender>>,
}

impl NotificationFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, kind: NotificationKind, sender: Arc<dyn NotificationSender>) -> Self {
        self.senders.insert(kind, sender);
        self
    }

    pub fn create_channel(
        &self,
        kind: &str,
    ) -> Result<Arc<dyn NotificationSender>, NotificationError> {
        let parsed = kind.parse::<NotificationKind>()?;
        self.senders
            .get(&parsed)
            .cloned()
            .ok_or_else(|| NotificationError::UnsupportedChannel(kind.to_string()))
    }
}

/// What to do when a notification cannot be delivered after the write succeeded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Keep the persisted appointment, log the failure, answer normally.
    #[default]
    Log,
    /// Keep the persisted appointment but answer with an internal error.
    Fail,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "log" => Ok(Self::Log),
            "fail" => Ok(Self::Fail),
            other => Err(format!("expected 'log' or 'fail', got '{other}'")),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingSender;
    use super::*;

    #[test]
    fn kind_parsing_is_case_insensitive() {
        assert_eq!("EMAIL".parse::<NotificationKind>().unwrap(), NotificationKind::Email);
        assert!(matches!(
            "sms".parse::<NotificationKind>(),
            Err(NotificationError::UnsupportedChannel(k)) if k == "sms"
        ));
    }

    #[tokio::test]
    async fn factory_resolves_registered_channel() {
        let sender = Arc::new(RecordingSender::default());
        let factory = NotificationFactory::new().register(NotificationKind::Email, sender.clone());

        let channel = factory.create_channel("email").unwrap();
        channel.send("ana@x.com", "hi", "body").await.unwrap();
        assert_eq!(sender.messages().await.len(), 1);
    }

    #[test]
    fn factory_rejects_unknown_and_unregistered_kinds() {
        let empty = NotificationFactory::new();
        assert!(matches!(
            empty.create_channel("email"),
            Err(NotificationError::UnsupportedChannel(_))
        ));

        let factory = NotificationFactory::new()
            .register(NotificationKind::Email, Arc::new(RecordingSender::default()));
        assert!(matches!(
            factory.create_channel("pigeon"),
            Err(NotificationError::UnsupportedChannel(k)) if k == "pigeon"
        ));
    }

    #[test]
    fn failure_policy_parsing() {
        assert_eq!("LOG".parse::<FailurePolicy>().unwrap(), FailurePolicy::Log);
        assert_eq!("fail".parse::<FailurePolicy>().unwrap(), FailurePolicy::Fail);
        assert!("retry".parse::<FailurePolicy>().is_err());
    }
}
