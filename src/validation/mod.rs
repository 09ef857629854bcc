//! Request validation.
//!
//! Every route declares a raw payload type (what serde can deserialize) and a
//! [`Validate`] impl that turns it into a typed, already-checked value. The
//! [`ValidJson`] and [`ValidPath`] extractors run that conversion before the
//! handler body executes, so handlers only ever see validated input.

pub mod schemas;

use std::{collections::BTreeMap, fmt};

use async_trait::async_trait;
use axum::{
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use url::Url;
use uuid::Uuid;

use crate::error::AppError;

/// Field name → every message produced for that field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn field(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = self
            .0
            .iter()
            .map(|(field, messages)| format!("{field}: {}", messages.join(", ")))
            .collect::<Vec<_>>();
        write!(f, "{}", parts.join("; "))
    }
}

/// Conversion from a raw request payload into its validated form.
pub trait Validate {
    type Output;

    fn validate(self) -> Result<Self::Output, ValidationErrors>;
}

/// A single string constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    NonEmpty,
    MinLen(usize),
    Email,
    HttpUrl,
}

impl Rule {
    pub fn check(&self, value: &str) -> Result<(), String> {
        match self {
            Rule::NonEmpty if value.is_empty() => Err("Must not be empty".into()),
            Rule::MinLen(min) if value.chars().count() < *min => {
                Err(format!("Must contain at least {min} characters"))
            }
            Rule::Email if !is_email(value) => Err("Invalid email".into()),
            Rule::HttpUrl if !is_http_url(value) => Err("Invalid url".into()),
            _ => Ok(()),
        }
    }
}

/// Collects failures across all fields of one payload.
///
/// Each accessor returns a usable value even on failure (the type's default)
/// so a schema can read every field before calling [`Checker::finish`].
#[derive(Debug, Default)]
pub struct Checker {
    errors: ValidationErrors,
}

impl Checker {
    pub fn new() -> Self {
        Self::default()
    }

    fn required<'a>(&mut self, field: &str, value: Option<&'a str>) -> Option<&'a str> {
        if value.is_none() {
            self.errors.add(field, "Required");
        }
        value
    }

    pub fn text(&mut self, field: &str, value: Option<String>, rules: &[Rule]) -> String {
        let Some(value) = self.required(field, value.as_deref()) else {
            return String::new();
        };
        let value = value.trim().to_string();
        for rule in rules {
            if let Err(message) = rule.check(&value) {
                self.errors.add(field, message);
            }
        }
        value
    }

    pub fn list(&mut self, field: &str, values: Option<Vec<String>>, rules: &[Rule]) -> Vec<String> {
        let Some(values) = values else {
            self.errors.add(field, "Required");
            return Vec::new();
        };
        values
            .into_iter()
            .enumerate()
            .map(|(index, value)| self.text(&format!("{field}[{index}]"), Some(value), rules))
            .collect()
    }

    pub fn timestamp(&mut self, field: &str, value: Option<String>) -> DateTime<Utc> {
        let Some(value) = self.required(field, value.as_deref()) else {
            return DateTime::default();
        };
        parse_timestamp(value).unwrap_or_else(|| {
            self.errors.add(field, "Invalid date");
            DateTime::default()
        })
    }

    pub fn uuid(&mut self, field: &str, value: &str) -> Uuid {
        Uuid::parse_str(value.trim()).unwrap_or_else(|_| {
            self.errors.add(field, "Invalid uuid");
            Uuid::nil()
        })
    }

    pub fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// Accepts RFC 3339, a zone-less `YYYY-MM-DDTHH:MM:SS` (read as UTC) or a
/// bare `YYYY-MM-DD` (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

pub fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels = domain.split('.').collect::<Vec<_>>();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}

pub fn is_http_url(value: &str) -> bool {
    Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
        .unwrap_or(false)
}

/// JSON body extractor yielding the validated form of `T`.
pub struct ValidJson<T: Validate>(pub T::Output);

#[async_trait]
impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate + Send,
    T::Output: Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(raw) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ValidationErrors::single("body", rejection.body_text()))?;
        Ok(Self(raw.validate()?))
    }
}

/// Path parameter extractor yielding the validated form of `T`.
pub struct ValidPath<T: Validate>(pub T::Output);

#[async_trait]
impl<S, T> FromRequestParts<S> for ValidPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate + Send,
    T::Output: Send,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ValidationErrors::single("params", rejection.body_text()))?;
        Ok(Self(raw.validate()?))
    }
}
