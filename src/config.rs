use std::env;

use anyhow::{anyhow, bail};

use crate::notification::FailurePolicy;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Clone, Debug)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: Option<String>,
    pub bind_addr: String,
    pub storage: StorageBackend,
    pub db_max_connections: u32,
    pub notification_channel: String,
    pub failure_policy: FailurePolicy,
    pub mail_from: String,
    pub smtp: Option<SmtpConfig>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let storage = match env::var("STORAGE").ok().as_deref().map(str::trim) {
            None | Some("") | Some("postgres") => StorageBackend::Postgres,
            Some("memory") => StorageBackend::Memory,
            Some(other) => bail!("STORAGE must be 'postgres' or 'memory', got '{other}'"),
        };

        let database_url = env::var("DATABASE_URL").ok();
        if storage == StorageBackend::Postgres && database_url.is_none() {
            bail!("DATABASE_URL is required when STORAGE=postgres");
        }

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let db_max_connections = env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(5);

        let notification_channel =
            env::var("NOTIFICATION_CHANNEL").unwrap_or_else(|_| "email".to_string());

        let failure_policy = match env::var("NOTIFY_FAILURE_POLICY") {
            Ok(raw) => raw
                .parse::<FailurePolicy>()
                .map_err(|e| anyhow!("invalid NOTIFY_FAILURE_POLICY: {e}"))?,
            Err(_) => FailurePolicy::default(),
        };

        let mail_from =
            env::var("MAIL_FROM").unwrap_or_else(|_| "no-reply@medicitas.local".to_string());

        let smtp = match env::var("SMTP_HOST").ok().filter(|h| !h.trim().is_empty()) {
            Some(host) => Some(SmtpConfig {
                host,
                port: env::var("SMTP_PORT")
                    .ok()
                    .and_then(|s| s.parse::<u16>().ok())
                    .unwrap_or(587),
                username: env::var("SMTP_USERNAME").ok(),
                password: env::var("SMTP_PASSWORD").ok(),
            }),
            None => None,
        };

        Ok(Self {
            database_url,
            bind_addr,
            storage,
            db_max_connections,
            notification_channel,
            failure_policy,
            mail_from,
            smtp,
        })
    }
}
