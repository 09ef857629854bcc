use std::{env, net::SocketAddr};

use url::Url;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn parse(raw: &str) -> Result<Self, AppError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(AppError::Config(format!("invalid APP_ENV: {other}"))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub listen_addr: SocketAddr,
    pub api_base_url: Url,
    pub web_base_url: Url,
    pub environment: Environment,
    pub smtp_url: Option<String>,
    pub mail_from_name: String,
    pub mail_from_address: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://planner.db?mode=rwc".to_string());

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT").unwrap_or_else(|_| "3333".to_string());
        let listen_addr: SocketAddr = format!("{host}:{port}")
            .parse()
            .map_err(|err| AppError::Config(format!("invalid APP_HOST/PORT: {err}")))?;

        let api_base_url = parse_url(
            "API_BASE_URL",
            env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:3333".to_string()),
        )?;
        let web_base_url = parse_url(
            "WEB_BASE_URL",
            env::var("WEB_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string()),
        )?;

        let environment = env::var("APP_ENV")
            .map(|raw| Environment::parse(&raw))
            .unwrap_or(Ok(Environment::Development))?;

        let smtp_url = env::var("SMTP_URL").ok().filter(|url| !url.trim().is_empty());
        if environment == Environment::Production && smtp_url.is_none() {
            return Err(AppError::Config(
                "SMTP_URL is required when APP_ENV=production".into(),
            ));
        }

        let mail_from_name =
            env::var("MAIL_FROM_NAME").unwrap_or_else(|_| "Equipe plann.er".to_string());
        let mail_from_address =
            env::var("MAIL_FROM_ADDRESS").unwrap_or_else(|_| "noreply@plann.er".to_string());

        Ok(Self {
            database_url,
            listen_addr,
            api_base_url,
            web_base_url,
            environment,
            smtp_url,
            mail_from_name,
            mail_from_address,
        })
    }

    /// `{API_BASE_URL}/{path}`, without doubling slashes.
    pub fn api_url(&self, path: &str) -> String {
        join_url(&self.api_base_url, path)
    }

    /// `{WEB_BASE_URL}/{path}`, without doubling slashes.
    pub fn web_url(&self, path: &str) -> String {
        join_url(&self.web_base_url, path)
    }
}

fn parse_url(name: &str, raw: String) -> Result<Url, AppError> {
    Url::parse(&raw).map_err(|err| AppError::Config(format!("invalid {name}: {err}")))
}

pub(crate) fn join_url(base: &Url, path: &str) -> String {
    format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
pub(crate) fn test_config() -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".into(),
        listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        api_base_url: Url::parse("http://api.test").unwrap(),
        web_base_url: Url::parse("http://web.test/app/").unwrap(),
        environment: Environment::Development,
        smtp_url: None,
        mail_from_name: "Equipe plann.er".into(),
        mail_from_address: "noreply@plann.er".into(),
    }
}
