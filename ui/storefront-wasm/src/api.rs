//! HTTP transport for the newsletter form.

use async_trait::async_trait;
use gloo_net::http::Request;
use rrd_api_types::NewsletterSignup;
use rrd_newsletter::{NewsletterError, NewsletterTransport};

/// `fetch`-backed JSON POST.
pub struct FetchTransport;

#[async_trait(?Send)]
impl NewsletterTransport for FetchTransport {
    async fn submit(&self, endpoint: &str, signup: &NewsletterSignup) -> Result<(), NewsletterError> {
        let response = Request::post(endpoint)
            .header("Accept", "application/json")
            .json(signup)
            .map_err(|err| NewsletterError::Transport(err.to_string()))?
            .send()
            .await
            .map_err(|err| NewsletterError::Transport(err.to_string()))?;

        if !response.ok() {
            return Err(NewsletterError::Rejected(response.status()));
        }
        Ok(())
    }
}
