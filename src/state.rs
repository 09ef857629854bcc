use std::sync::Arc;

use crate::{
    config::{AppConfig, Environment},
    db::DbPool,
    error::AppError,
    services::{
        mail::{Address, MailTransport, PreviewMailer, SmtpMailer},
        notifier::Notifier,
        store::{SqliteStore, TripStore},
    },
};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<dyn TripStore>,
    pub notifier: Notifier,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        store: Arc<dyn TripStore>,
        transport: Arc<dyn MailTransport>,
    ) -> Self {
        let sender = Address::new(
            Some(config.mail_from_name.clone()),
            config.mail_from_address.clone(),
        );
        let notifier = Notifier::new(transport, sender, config.api_base_url.clone());
        Self {
            config,
            store,
            notifier,
        }
    }

    /// Wires the SQLite store and the transport the environment calls for:
    /// real SMTP delivery when an `SMTP_URL` is configured in production,
    /// the in-memory preview mailbox otherwise.
    pub fn from_config(config: AppConfig, db: DbPool) -> Result<Self, AppError> {
        let transport: Arc<dyn MailTransport> = match (&config.environment, &config.smtp_url) {
            (Environment::Production, Some(url)) => Arc::new(SmtpMailer::from_url(url)?),
            (Environment::Production, None) => {
                return Err(AppError::Config("production requires SMTP_URL".into()))
            }
            (Environment::Development, _) => {
                Arc::new(PreviewMailer::new(config.api_base_url.as_str()))
            }
        };
        let store = Arc::new(SqliteStore::new(db));
        Ok(Self::new(config, store, transport))
    }
}
