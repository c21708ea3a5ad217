//! Long-poll client for the push relay's parking service.
//!
//! The parking service holds a pending push approval until the user responds
//! or the park window expires. Its HTTP behavior is idiosyncratic: it issues
//! same-origin relative redirects that generic clients cannot follow, and it
//! drops the connection both on window expiry and right after an approval
//! lands. A dropped connection is therefore polled once more before giving
//! up, since the retry usually finds the now-available result.

use anyhow::Result;
use reqwest::{Client, Response, StatusCode, header::CONTENT_TYPE, header::LOCATION, redirect::Policy};
use serde_json::Value;
use std::time::Duration;
use tracing::{Instrument, debug, info_span, instrument};
use url::Url;

/// Outcome of a single poll attempt. Transport errors and odd intermediate
/// statuses fold into `Dropped`; no exceptional control flow drives the retry.
enum Attempt {
    Resolved(String),
    NoStatus,
    Expired,
    Dropped,
}

pub struct ParkingClient {
    client: Client,
    retries: u32,
}

impl ParkingClient {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(connect_timeout: Duration, read_timeout: Duration, retries: u32) -> Result<Self> {
        // Redirects are handled manually: the relay's relative Location
        // header needs rewriting against the original scheme/authority.
        let client = Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .redirect(Policy::none())
            .connect_timeout(connect_timeout)
            .timeout(read_timeout)
            .build()?;

        Ok(Self { client, retries })
    }

    async fn post_empty(&self, url: &str) -> reqwest::Result<Response> {
        let span = info_span!(
            "parking.poll",
            http.method = "POST",
            url = %url
        );

        self.client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .instrument(span)
            .await
    }

    async fn follow_redirect(&self, original: &str, response: &Response) -> Option<reqwest::Result<Response>> {
        let location = response.headers().get(LOCATION)?.to_str().ok()?;
        let base = Url::parse(original).ok()?;
        let target = base.join(location).ok()?;

        debug!("Following redirect URL: {target}");

        Some(self.post_empty(target.as_str()).await)
    }

    async fn attempt(&self, auth_id_url: &str) -> Attempt {
        let response = match self.post_empty(auth_id_url).await {
            Ok(response) => response,
            Err(err) => {
                debug!("Parking transport error: {err} (window expired or response available)");
                return Attempt::Dropped;
            }
        };

        let response = if response.status() == StatusCode::TEMPORARY_REDIRECT {
            match self.follow_redirect(auth_id_url, &response).await {
                Some(Ok(redirected)) => redirected,
                Some(Err(err)) => {
                    debug!("Parking transport error after redirect: {err}");
                    return Attempt::Dropped;
                }
                None => return Attempt::Dropped,
            }
        } else {
            response
        };

        match response.status() {
            // The parked request has already expired or been consumed.
            StatusCode::NOT_FOUND => Attempt::Expired,
            status if status.is_success() => {
                let body = response.text().await.unwrap_or_default();
                match serde_json::from_str::<Value>(&body)
                    .ok()
                    .as_ref()
                    .and_then(|json| json.get("status"))
                    .and_then(Value::as_str)
                {
                    Some(status) if !status.is_empty() => Attempt::Resolved(status.to_string()),
                    _ => Attempt::NoStatus,
                }
            }
            status => {
                debug!("Parking returned unexpected status {status}");
                Attempt::Dropped
            }
        }
    }

    /// Poll the parking URL for an authentication status.
    ///
    /// Returns `None` when no status is available: empty status field, an
    /// expired parked request (404), or a dropped connection that stayed
    /// dropped past the configured retries.
    #[instrument(skip(self))]
    pub async fn poll(&self, auth_id_url: &str) -> Option<String> {
        let mut dropped = 0u32;

        loop {
            match self.attempt(auth_id_url).await {
                Attempt::Resolved(status) => {
                    debug!("Received status in parking response: {status}");
                    return Some(status);
                }
                Attempt::NoStatus => {
                    debug!("No status in parking response");
                    return None;
                }
                Attempt::Expired => {
                    debug!("Parked request expired or already consumed");
                    return None;
                }
                Attempt::Dropped => {
                    if dropped >= self.retries {
                        return None;
                    }
                    dropped += 1;
                    debug!(
                        "Connection closed by parking service. Polling once again ({dropped}/{})",
                        self.retries
                    );
                }
            }
        }
    }
}

impl std::fmt::Debug for ParkingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParkingClient")
            .field("retries", &self.retries)
            .finish_non_exhaustive()
    }
}
