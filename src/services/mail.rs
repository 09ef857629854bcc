use std::{collections::VecDeque, sync::Arc};

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub name: Option<String>,
    pub email: String,
}

impl Address {
    pub fn new(name: Option<String>, email: impl Into<String>) -> Self {
        Self {
            name,
            email: email.into(),
        }
    }

    fn to_mailbox(&self) -> Result<Mailbox, AppError> {
        let email = self
            .email
            .parse()
            .map_err(|err| AppError::Mail(format!("invalid address {}: {err}", self.email)))?;
        Ok(Mailbox::new(self.name.clone(), email))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub from: Address,
    pub to: Address,
    pub subject: String,
    pub html: String,
}

/// Result of handing a message to a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// Where the message can be viewed when it was not really sent.
    pub preview_url: Option<String>,
}

#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, mail: &OutgoingMail) -> Result<Delivery, AppError>;

    /// A message kept for preview; transports that really deliver keep nothing.
    async fn preview(&self, _message_id: Uuid) -> Option<OutgoingMail> {
        None
    }
}

#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn from_url(smtp_url: &str) -> Result<Self, AppError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::from_url(smtp_url)
            .map_err(|err| AppError::Config(format!("invalid SMTP_URL: {err}")))?
            .build();
        Ok(Self { transport })
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<Delivery, AppError> {
        let message = Message::builder()
            .from(mail.from.to_mailbox()?)
            .to(mail.to.to_mailbox()?)
            .subject(mail.subject.as_str())
            .header(ContentType::TEXT_HTML)
            .body(mail.html.clone())
            .map_err(|err| AppError::Mail(err.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|err| AppError::Mail(err.to_string()))?;
        info!(to = %mail.to.email, "mail delivered");
        Ok(Delivery { preview_url: None })
    }
}

/// Messages a [`PreviewMailer`] keeps before dropping the oldest.
pub const PREVIEW_CAPACITY: usize = 200;

/// Development transport: keeps the most recent messages in memory and hands
/// back a URL under `{API_BASE_URL}/mail/` where each one can be viewed.
#[derive(Clone)]
pub struct PreviewMailer {
    base_url: Arc<String>,
    capacity: usize,
    mailbox: Arc<RwLock<VecDeque<(Uuid, OutgoingMail)>>>,
}

impl PreviewMailer {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_capacity(base_url, PREVIEW_CAPACITY)
    }

    pub fn with_capacity(base_url: impl Into<String>, capacity: usize) -> Self {
        Self {
            base_url: Arc::new(base_url.into().trim_end_matches('/').to_string()),
            capacity: capacity.max(1),
            mailbox: Arc::default(),
        }
    }

    /// Every message still kept, oldest first.
    pub async fn sent(&self) -> Vec<OutgoingMail> {
        self.mailbox
            .read()
            .await
            .iter()
            .map(|(_, mail)| mail.clone())
            .collect()
    }

    pub async fn sent_to(&self, email: &str) -> Vec<OutgoingMail> {
        self.sent()
            .await
            .into_iter()
            .filter(|mail| mail.to.email == email)
            .collect()
    }
}

#[async_trait]
impl MailTransport for PreviewMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<Delivery, AppError> {
        let id = Uuid::new_v4();
        {
            let mut mailbox = self.mailbox.write().await;
            if mailbox.len() == self.capacity {
                mailbox.pop_front();
            }
            mailbox.push_back((id, mail.clone()));
        }

        let preview_url = format!("{}/mail/{id}", self.base_url);
        info!(to = %mail.to.email, %preview_url, "mail sent to preview mailbox");
        Ok(Delivery {
            preview_url: Some(preview_url),
        })
    }

    async fn preview(&self, message_id: Uuid) -> Option<OutgoingMail> {
        self.mailbox
            .read()
            .await
            .iter()
            .find(|(id, _)| *id == message_id)
            .map(|(_, mail)| mail.clone())
    }
}
