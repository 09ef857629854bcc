//! Shared fixtures for unit tests.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    config::test_config,
    db::{self, DbPool},
    error::AppError,
    services::{
        mail::{Delivery, MailTransport, OutgoingMail, PreviewMailer},
        store::SqliteStore,
    },
    state::AppState,
};

pub(crate) struct TestApp {
    pub state: AppState,
    pub mailer: PreviewMailer,
    pub pool: DbPool,
}

impl TestApp {
    pub async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }
}

pub(crate) async fn test_app() -> TestApp {
    let config = test_config();
    let mailer = PreviewMailer::new(config.api_base_url.as_str());
    test_app_with(Arc::new(mailer.clone()), mailer).await
}

pub(crate) async fn failing_mail_app() -> TestApp {
    let mailer = PreviewMailer::new("http://api.test");
    test_app_with(Arc::new(FailingMailer), mailer).await
}

async fn test_app_with(transport: Arc<dyn MailTransport>, mailer: PreviewMailer) -> TestApp {
    let pool = db::init_pool("sqlite::memory:").await.unwrap();
    db::migrate(&pool).await.unwrap();
    let store = Arc::new(SqliteStore::new(pool.clone()));
    let state = AppState::new(test_config(), store, transport);
    TestApp {
        state,
        mailer,
        pool,
    }
}

/// Transport whose every send fails, as an unreachable SMTP server would.
pub(crate) struct FailingMailer;

#[async_trait]
impl MailTransport for FailingMailer {
    async fn send(&self, _mail: &OutgoingMail) -> Result<Delivery, AppError> {
        Err(AppError::Mail("connection refused".into()))
    }
}
