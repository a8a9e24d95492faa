mod config;
mod db;
mod error;
mod models;
mod notification;
mod repository;
mod routes;
mod validation;
mod workflow;

use std::sync::Arc;

use crate::{
    config::{Config, StorageBackend},
    models::AppState,
    notification::{
        LogEmailSender, NotificationFactory, NotificationKind, NotificationSender, SmtpEmailSender,
    },
    repository::{
        AppointmentRepository, DoctorRepository, MemoryStore, PatientRepository,
        PgAppointmentRepository, PgDoctorRepository, PgPatientRepository,
    },
    workflow::AppointmentWorkflow,
};

use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

type Repositories = (
    Arc<dyn PatientRepository>,
    Arc<dyn DoctorRepository>,
    Arc<dyn AppointmentRepository>,
);

async fn build_repositories(cfg: &Config) -> anyhow::Result<Repositories> {
    match cfg.storage {
        StorageBackend::Memory => {
            tracing::warn!("using in-memory storage; data is lost on restart");
            let store = MemoryStore::new();
            Ok((
                Arc::new(store.clone()),
                Arc::new(store.clone()),
                Arc::new(store),
            ))
        }
        StorageBackend::Postgres => {
            let url = cfg
                .database_url
                .as_deref()
                .context("DATABASE_URL is required for postgres storage")?;
            let pool = db::connect_pg(url, cfg.db_max_connections).await?;
            Ok((
                Arc::new(PgPatientRepository::new(pool.clone())),
                Arc::new(PgDoctorRepository::new(pool.clone())),
                Arc::new(PgAppointmentRepository::new(pool)),
            ))
        }
    }
}

fn build_notifications(cfg: &Config) -> anyhow::Result<NotificationFactory> {
    let email: Arc<dyn NotificationSender> = match &cfg.smtp {
        Some(smtp) => {
            tracing::info!(host = %smtp.host, port = smtp.port, "email via SMTP");
            Arc::new(SmtpEmailSender::new(smtp, &cfg.mail_from)?)
        }
        None => {
            tracing::warn!("SMTP_HOST not set; emails are only logged");
            Arc::new(LogEmailSender)
        }
    };

    let factory = NotificationFactory::new().register(NotificationKind::Email, email);

    // A misconfigured channel is a deployment error; refuse to start.
    factory
        .create_channel(&cfg.notification_channel)
        .with_context(|| format!("NOTIFICATION_CHANNEL={}", cfg.notification_channel))?;

    Ok(factory)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cfg = Config::from_env()?;
    let (patients, doctors, appointments) = build_repositories(&cfg).await?;
    let notifications = build_notifications(&cfg)?;

    let workflow = AppointmentWorkflow::new(
        patients.clone(),
        doctors.clone(),
        appointments.clone(),
        notifications,
        cfg.notification_channel.clone(),
        cfg.failure_policy,
    );

    let state = AppState {
        patients,
        doctors,
        appointments,
        workflow: Arc::new(workflow),
    };

    // No access control: every route is open, including cross-origin calls.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = routes::router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    tracing::info!("Listening on http://{}", cfg.bind_addr);
    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
