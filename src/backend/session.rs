//! Cookie-authenticated session to the management backend.
//!
//! Exactly one logical session exists per process. The live [`Session`] is an
//! immutable snapshot behind a lock: `connect` replaces it wholesale, every
//! other caller only reads a cloned `Arc`, so concurrent readers never observe
//! a partially-updated cookie set.

use crate::backend::soap::{self, ConnectOutcome};
use crate::crypto;
use anyhow::{Context, Result, anyhow};
use reqwest::{
    Client, Response, StatusCode,
    header::{CONTENT_TYPE, COOKIE, SET_COOKIE},
};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{Instrument, debug, info_span, instrument, warn};

const SOAP_CONTENT_TYPE: &str = "application/soap+xml; charset=utf-8";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Immutable view of the backend session.
///
/// Invariant: `connected` is true iff `cookies` is non-empty.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub cookies: Vec<String>,
    pub connected: bool,
}

/// Owns the session lifecycle: connect, ping, reconnect, request plumbing.
pub struct SessionManager {
    base_url: String,
    operator_email: String,
    operator_otp: String,
    encryption_key: SecretString,
    request_timeout: Duration,
    client: Client,
    session: RwLock<Arc<Session>>,
}

fn extract_cookies(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
        .collect()
}

impl SessionManager {
    /// # Errors
    /// Returns an error if the base URL is invalid or the HTTP client cannot
    /// be built.
    pub fn new(
        base_url: &str,
        operator_email: String,
        operator_otp: String,
        encryption_key: SecretString,
        request_timeout: Duration,
    ) -> Result<Self> {
        let base_url = super::normalize_base_url(base_url)?;

        let client = Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .build()?;

        Ok(Self {
            base_url,
            operator_email,
            operator_otp,
            encryption_key,
            request_timeout,
            client,
            session: RwLock::new(Arc::new(Session::default())),
        })
    }

    /// Current session snapshot.
    pub async fn snapshot(&self) -> Arc<Session> {
        self.session.read().await.clone()
    }

    pub async fn is_connected(&self) -> bool {
        self.session.read().await.connected
    }

    async fn replace_session(&self, cookies: Vec<String>) {
        let connected = !cookies.is_empty();
        *self.session.write().await = Arc::new(Session { cookies, connected });
    }

    async fn clear_session(&self) {
        *self.session.write().await = Arc::new(Session::default());
    }

    /// `Cookie` header value built from the current snapshot, name=value
    /// pairs only.
    async fn cookie_header(&self) -> Option<String> {
        let snapshot = self.snapshot().await;
        if snapshot.cookies.is_empty() {
            return None;
        }

        let pairs: Vec<&str> = snapshot
            .cookies
            .iter()
            .map(|cookie| cookie.split(';').next().unwrap_or(cookie).trim())
            .collect();

        Some(pairs.join("; "))
    }

    async fn post_raw(
        &self,
        url: &str,
        body: String,
        content_type: &str,
        timeout: Duration,
    ) -> Result<Response> {
        let span = info_span!(
            "backend.request",
            http.method = "POST",
            url = %url
        );

        let mut request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, content_type)
            .timeout(timeout)
            .body(body);

        if let Some(cookies) = self.cookie_header().await {
            request = request.header(COOKIE, cookies);
        }

        Ok(request.send().instrument(span).await?)
    }

    /// Log in to the backend and replace the session cookies.
    ///
    /// Success is decided by the explicit marker in the response body, not by
    /// the HTTP status. Any failure leaves the session cleared.
    ///
    /// # Errors
    /// Returns an error on transport failure, an application-level failure
    /// marker, or an unexpected response.
    #[instrument(skip(self))]
    pub async fn connect(&self) -> Result<()> {
        let email = crypto::decrypt(self.encryption_key.expose_secret(), &self.operator_email)
            .context("Error decrypting operator email")?;
        let otp = crypto::decrypt(self.encryption_key.expose_secret(), &self.operator_otp)
            .context("Error decrypting operator OTP")?;

        let envelope = soap::connect_request(&email, &otp);

        let response = match self
            .post_raw(&self.base_url, envelope, SOAP_CONTENT_TYPE, self.request_timeout)
            .await
        {
            Ok(response) => response,
            Err(err) => {
                self.clear_session().await;
                return Err(err).context("Connect transport error");
            }
        };

        let status = response.status();
        let new_cookies = extract_cookies(&response);
        let body = response.text().await.unwrap_or_default();

        match soap::classify_connect(status, &body) {
            ConnectOutcome::Success => {
                // The backend occasionally answers AUTH_SUCCESS without
                // rotating cookies; the previous set stays valid then.
                let cookies = if new_cookies.is_empty() {
                    self.snapshot().await.cookies.clone()
                } else {
                    new_cookies
                };

                if cookies.is_empty() {
                    self.clear_session().await;
                    return Err(anyhow!("Connect returned no session cookies"));
                }

                debug!("connected with {} session cookie(s)", cookies.len());
                self.replace_session(cookies).await;
                Ok(())
            }
            ConnectOutcome::ApplicationFailure(msg) => {
                self.clear_session().await;
                Err(anyhow!("Connection failed: {msg}"))
            }
            ConnectOutcome::Unexpected(raw) => {
                self.clear_session().await;
                Err(anyhow!("Unexpected connect response: {raw}"))
            }
        }
    }

    /// Reconnect only when the current session is unusable.
    ///
    /// # Errors
    /// Returns an error if the reconnect attempt fails.
    pub async fn ensure_connected(&self) -> Result<()> {
        if self.is_connected().await {
            return Ok(());
        }
        self.connect().await
    }

    /// Liveness check against the backend. Never errors: any non-2xx status,
    /// malformed payload, or transport failure is `false`.
    #[instrument(skip(self))]
    pub async fn ping(&self, timeout: Duration, use_get: bool) -> bool {
        if !self.is_connected().await {
            warn!("Not connected to the management backend");
            return false;
        }

        let url = format!("{}/PingConnection", self.base_url);

        let result = if use_get {
            let span = info_span!("backend.ping", http.method = "GET", url = %url);
            let mut request = self.client.get(&url).timeout(timeout);
            if let Some(cookies) = self.cookie_header().await {
                request = request.header(COOKIE, cookies);
            }
            request
                .send()
                .instrument(span)
                .await
                .map_err(anyhow::Error::from)
        } else {
            self.post_raw(&url, String::new(), FORM_CONTENT_TYPE, timeout)
                .await
        };

        match result {
            Ok(response) if response.status().is_success() => {
                let body = response.text().await.unwrap_or_default();
                soap::parse_boolean(&body).unwrap_or(false)
            }
            Ok(response) => {
                debug!("ping returned {}", response.status());
                false
            }
            Err(err) => {
                debug!("ping transport error: {err}");
                false
            }
        }
    }

    /// One keep-alive cycle: ping, and on failure reconnect, up to
    /// `max_retries` times. Exhaustion is logged, never fatal; the session
    /// simply stays down until the next cycle.
    pub async fn keep_alive_cycle(&self, max_retries: u32, ping_timeout: Duration, use_get: bool) {
        for attempt in 1..=max_retries {
            if self.ping(ping_timeout, use_get).await {
                debug!("keep-alive ping succeeded on attempt {attempt}");
                return;
            }

            warn!("Ping failed on attempt {attempt}. Trying to reconnect...");

            if let Err(err) = self.connect().await {
                warn!("Reconnect failed on attempt {attempt}: {err}");
            }
        }

        warn!("Keep-alive exhausted after {max_retries} attempts; session remains down");
    }

    /// Send a SOAP envelope over the current session. No retry, no reconnect:
    /// callers treat failures as a signal for the keep-alive cycle.
    ///
    /// # Errors
    /// Returns an error on transport failure.
    pub async fn send_request(&self, envelope: String, timeout: Duration) -> Result<(StatusCode, String)> {
        let response = self
            .post_raw(&self.base_url, envelope, SOAP_CONTENT_TYPE, timeout)
            .await?;
        let status = response.status();
        let body = response.text().await?;
        Ok((status, body))
    }

    /// Send a form-encoded request to one of the backend's HTTP-POST bound
    /// operations, e.g. `/GetTokensByOwner`.
    ///
    /// # Errors
    /// Returns an error on transport failure.
    pub async fn send_form(
        &self,
        path: &str,
        body: String,
        timeout: Duration,
    ) -> Result<(StatusCode, String)> {
        let url = format!("{}{path}", self.base_url);
        let response = self.post_raw(&url, body, FORM_CONTENT_TYPE, timeout).await?;
        let status = response.status();
        let text = response.text().await?;
        Ok((status, text))
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("base_url", &self.base_url)
            .field("operator_email", &"***")
            .field("operator_otp", &"***")
            .field("encryption_key", &"***")
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn manager(base_url: &str) -> Result<SessionManager> {
        let key = crypto::generate_key();
        let email = crypto::encrypt(&key, "operator@example.com")?;
        let otp = crypto::encrypt(&key, "123456")?;
        SessionManager::new(
            base_url,
            email,
            otp,
            SecretString::from(key),
            Duration::from_secs(5),
        )
    }

    fn connect_success() -> ResponseTemplate {
        ResponseTemplate::new(200)
            .set_body_string("<ConnectResponse><ConnectResult>AUTH_SUCCESS</ConnectResult></ConnectResponse>")
            .insert_header("Set-Cookie", "ASP.NET_SessionId=abc123; Path=/; HttpOnly")
    }

    #[tokio::test]
    async fn connect_success_sets_cookies() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(body_string_contains("OperatorEmail"))
            .respond_with(connect_success())
            .mount(&server)
            .await;

        let manager = manager(&server.uri())?;
        manager.connect().await?;

        let session = manager.snapshot().await;
        assert!(session.connected);
        assert_eq!(session.cookies.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn failed_connect_clears_session() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(connect_success())
            .mount(&server)
            .await;

        let manager = manager(&server.uri())?;
        manager.connect().await?;
        assert!(manager.is_connected().await);

        // Backend now rejects the operator: the session must drop to a fully
        // cleared state, never cookies-without-connected or vice versa.
        server.reset().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("AUTH_FAILURE"))
            .mount(&server)
            .await;

        let result = manager.connect().await;
        assert!(result.is_err());

        let session = manager.snapshot().await;
        assert!(!session.connected);
        assert!(session.cookies.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn connect_without_new_cookies_keeps_previous() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(connect_success())
            .mount(&server)
            .await;

        let manager = manager(&server.uri())?;
        manager.connect().await?;

        server.reset().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("AUTH_SUCCESS"))
            .mount(&server)
            .await;

        manager.connect().await?;

        let session = manager.snapshot().await;
        assert!(session.connected);
        assert_eq!(session.cookies.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn ping_requires_connected_session() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        let manager = manager(&server.uri())?;

        // Never connected: no HTTP call is made at all.
        assert!(!manager.ping(Duration::from_secs(1), true).await);
        Ok(())
    }

    #[tokio::test]
    async fn ping_parses_boolean_payload() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(connect_success())
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/PingConnection"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"<?xml version="1.0"?><boolean>true</boolean>"#),
            )
            .mount(&server)
            .await;

        let manager = manager(&server.uri())?;
        manager.connect().await?;

        assert!(manager.ping(Duration::from_secs(2), true).await);
        Ok(())
    }

    #[tokio::test]
    async fn ping_false_on_malformed_payload() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(connect_success())
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/PingConnection"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not xml"))
            .mount(&server)
            .await;

        let manager = manager(&server.uri())?;
        manager.connect().await?;

        assert!(!manager.ping(Duration::from_secs(2), true).await);
        Ok(())
    }

    #[tokio::test]
    async fn keep_alive_cycle_is_bounded() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(connect_success())
            .mount(&server)
            .await;

        let manager = manager(&server.uri())?;
        manager.connect().await?;

        // Ping always fails, reconnect always yields an unexpected body:
        // the cycle must stop after exactly 3 reconnect attempts.
        server.reset().await;
        Mock::given(method("GET"))
            .and(path("/PingConnection"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>down</html>"))
            .expect(3)
            .mount(&server)
            .await;

        manager
            .keep_alive_cycle(3, Duration::from_secs(1), true)
            .await;

        assert!(!manager.is_connected().await);
        Ok(())
    }
}
