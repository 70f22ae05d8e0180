//! Newsletter signup: address validation and a single-flight submit.

use async_trait::async_trait;
use rrd_api_types::NewsletterSignup;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NewsletterError {
    #[error("This field is required")]
    Required,
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("a subscription request is already in flight")]
    Pending,
    #[error("signup endpoint answered HTTP {0}")]
    Rejected(u16),
    #[error("signup transport failed: {0}")]
    Transport(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NewsletterSettings {
    pub endpoint: String,
    pub source: String,
}

impl Default for NewsletterSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://formspree.io/f/mblarryg".to_owned(),
            source: "RRD Collection Website".to_owned(),
        }
    }
}

/// Posts a signup to the remote list.
#[async_trait(?Send)]
pub trait NewsletterTransport {
    async fn submit(&self, endpoint: &str, signup: &NewsletterSignup) -> Result<(), NewsletterError>;
}

/// Trimmed address if it looks like `local@domain.tld` with no whitespace.
pub fn validate_email(raw: &str) -> Result<String, NewsletterError> {
    let email = raw.trim();
    if email.is_empty() {
        return Err(NewsletterError::Required);
    }
    if email.chars().any(char::is_whitespace) {
        return Err(NewsletterError::InvalidEmail);
    }

    let (local, domain) = email.split_once('@').ok_or(NewsletterError::InvalidEmail)?;
    if local.is_empty() || domain.contains('@') {
        return Err(NewsletterError::InvalidEmail);
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) if !host.is_empty() && !tld.is_empty() => Ok(email.to_owned()),
        _ => Err(NewsletterError::InvalidEmail),
    }
}

pub struct NewsletterForm<T> {
    transport: T,
    settings: NewsletterSettings,
    pending: Cell<bool>,
}

impl<T: NewsletterTransport> NewsletterForm<T> {
    pub fn new(transport: T, settings: NewsletterSettings) -> Self {
        Self {
            transport,
            settings,
            pending: Cell::new(false),
        }
    }

    pub fn settings(&self) -> &NewsletterSettings {
        &self.settings
    }

    /// True while a submit is awaiting the endpoint.
    pub fn is_pending(&self) -> bool {
        self.pending.get()
    }

    /// Validate and post. A second call while one is in flight is refused
    /// with [`NewsletterError::Pending`]; the flag clears when the first call
    /// finishes or is dropped.
    pub async fn submit(&self, email: &str, timestamp: String) -> Result<NewsletterSignup, NewsletterError> {
        let email = validate_email(email)?;
        if self.pending.replace(true) {
            warn!("newsletter submit ignored: request already pending");
            return Err(NewsletterError::Pending);
        }
        let _pending = PendingGuard(&self.pending);

        let signup = NewsletterSignup {
            email,
            source: self.settings.source.clone(),
            timestamp,
        };
        match self.transport.submit(&self.settings.endpoint, &signup).await {
            Ok(()) => {
                info!("newsletter signup accepted");
                Ok(signup)
            }
            Err(err) => {
                warn!("newsletter subscription error: {}", err);
                Err(err)
            }
        }
    }
}

struct PendingGuard<'a>(&'a Cell<bool>);

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}
