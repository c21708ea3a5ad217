//! Interface to the native authentication engine's validator endpoint.
//!
//! The engine itself is an external, already-reliable service: one
//! call-and-response primitive that verifies credentials and returns a numeric
//! status plus optional challenge payload. This module models that contract
//! and the HTTP proxy used to reach it, nothing more; the MFA algorithms
//! live on the other side.

use crate::backend::soap;
use anyhow::{Result, anyhow};
use quick_xml::escape::escape;
use reqwest::{Client, header::CONTENT_TYPE};
use std::time::Duration;
use tracing::{Instrument, info_span, instrument, warn};

/// Reserved passcode value that asks the engine for a push notification
/// instead of validating a static credential.
pub const PUSH_TRIGGER: &str = "p";

/// Engine status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    Failure,
    Success,
    Challenge,
    ServerPinProvided,
    UserPinChange,
    OuterWindowAuth,
    ChangeStaticPassword,
    StaticChangeFailed,
    PinChangeFailed,
}

impl AuthStatus {
    #[must_use]
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Failure),
            1 => Some(Self::Success),
            2 => Some(Self::Challenge),
            3 => Some(Self::ServerPinProvided),
            4 => Some(Self::UserPinChange),
            5 => Some(Self::OuterWindowAuth),
            6 => Some(Self::ChangeStaticPassword),
            7 => Some(Self::StaticChangeFailed),
            8 => Some(Self::PinChangeFailed),
            _ => None,
        }
    }

    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Failure => 0,
            Self::Success => 1,
            Self::Challenge => 2,
            Self::ServerPinProvided => 3,
            Self::UserPinChange => 4,
            Self::OuterWindowAuth => 5,
            Self::ChangeStaticPassword => 6,
            Self::StaticChangeFailed => 7,
            Self::PinChangeFailed => 8,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Failure => "AUTH_FAILURE",
            Self::Success => "AUTH_SUCCESS",
            Self::Challenge => "AUTH_CHALLENGE",
            Self::ServerPinProvided => "SERVER_PIN_PROVIDED",
            Self::UserPinChange => "USER_PIN_CHANGE",
            Self::OuterWindowAuth => "OUTER_WINDOW_AUTH",
            Self::ChangeStaticPassword => "CHANGE_STATIC_PASSWORD",
            Self::StaticChangeFailed => "STATIC_CHANGE_FAILED",
            Self::PinChangeFailed => "PIN_CHANGE_FAILED",
        }
    }

    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Failure => {
                "Authentication failed. Please check your credentials and try again."
            }
            Self::Success => "Authentication successful.",
            Self::Challenge => {
                "A challenge has been issued during authentication. Please follow the instructions to complete the authentication process."
            }
            Self::ServerPinProvided => "Server PIN has been provided.",
            Self::UserPinChange => "Your PIN needs to be changed.",
            Self::OuterWindowAuth => {
                "Outer window authentication is required to complete the process."
            }
            Self::ChangeStaticPassword => "Your static password needs to be updated.",
            Self::StaticChangeFailed => {
                "Failed to change the static password. Please try again later."
            }
            Self::PinChangeFailed => "Failed to change the PIN. Please try again later.",
        }
    }

    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }

    /// Status codes 2..=6 require a follow-up call with the returned state.
    #[must_use]
    pub const fn is_challenge(self) -> bool {
        matches!(
            self,
            Self::Challenge
                | Self::ServerPinProvided
                | Self::UserPinChange
                | Self::OuterWindowAuth
                | Self::ChangeStaticPassword
        )
    }
}

/// One verify-credentials exchange.
#[derive(Debug, Clone, Default)]
pub struct VerifyRequest {
    pub username: String,
    pub user_ip: String,
    pub passcode: String,
    pub organization: Option<String>,
    pub state: Option<String>,
    pub push_auth_id: Option<String>,
    pub push_status: Option<String>,
}

/// Parsed engine reply.
#[derive(Debug, Clone, Default)]
pub struct VerifyReply {
    pub status: Option<AuthStatus>,
    pub push_auth_id_url: Option<String>,
    pub challenge_name: Option<String>,
    pub challenge_data: Option<String>,
    pub challenge_state: Option<String>,
}

impl VerifyReply {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_some_and(AuthStatus::is_success)
    }
}

/// HTTP client for the engine's validator endpoint, with an optional failover
/// URL tried on transport errors.
pub struct ValidatorClient {
    primary_url: String,
    failover_url: Option<String>,
    resource: Option<String>,
    read_timeout: Duration,
    client: Client,
}

fn push_element(out: &mut String, name: &str, value: &str) {
    out.push('<');
    out.push_str(name);
    out.push('>');
    out.push_str(&escape(value));
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

impl ValidatorClient {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        primary_url: String,
        failover_url: Option<String>,
        resource: Option<String>,
        connect_timeout: Duration,
        read_timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .connect_timeout(connect_timeout)
            .build()?;

        Ok(Self {
            primary_url,
            failover_url,
            resource,
            read_timeout,
            client,
        })
    }

    fn build_request(&self, request: &VerifyRequest) -> String {
        let mut xml = String::from(r#"<?xml version="1.0" encoding="utf-8"?><authRequest>"#);
        push_element(&mut xml, "action", "verifycredentials");
        push_element(&mut xml, "credentialtype", "TokenValidation");
        if let Some(resource) = &self.resource {
            push_element(&mut xml, "resource", resource);
        }
        push_element(&mut xml, "userid", &request.username);
        push_element(&mut xml, "ipaddress", &request.user_ip);
        push_element(&mut xml, "passcode", &request.passcode);
        if let Some(organization) = &request.organization {
            push_element(&mut xml, "organization", organization);
        }
        if let Some(state) = &request.state {
            push_element(&mut xml, "state", state);
        }
        if let Some(auth_id) = &request.push_auth_id {
            push_element(&mut xml, "pushotpauthid", auth_id);
        }
        if let Some(status) = &request.push_status {
            push_element(&mut xml, "pushotpspsstatus", status);
        }
        xml.push_str("</authRequest>");
        xml
    }

    async fn post(&self, url: &str, body: String) -> Result<String> {
        let span = info_span!(
            "engine.verify",
            http.method = "POST",
            url = %url
        );

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "text/xml; charset=utf-8")
            .timeout(self.read_timeout)
            .body(body)
            .send()
            .instrument(span)
            .await?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        if !status.is_success() {
            let brief: String = text.chars().take(400).collect();
            return Err(anyhow!("{url} - {status}, {brief}"));
        }

        Ok(text)
    }

    /// Send a verify-credentials request, falling back to the failover URL on
    /// a transport error against the primary.
    ///
    /// # Errors
    /// Returns an error if both endpoints are unreachable or reply with a
    /// non-success HTTP status.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn verify_credentials(&self, request: &VerifyRequest) -> Result<VerifyReply> {
        let body = self.build_request(request);

        let text = match self.post(&self.primary_url, body.clone()).await {
            Ok(text) => text,
            Err(err) => {
                let Some(failover) = &self.failover_url else {
                    return Err(err);
                };
                warn!("Primary validator failed: {err}. Trying failover...");
                self.post(failover, body).await?
            }
        };

        Ok(parse_reply(&text))
    }
}

impl std::fmt::Debug for ValidatorClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidatorClient")
            .field("primary_url", &self.primary_url)
            .field("failover_url", &self.failover_url)
            .field("resource", &self.resource)
            .finish_non_exhaustive()
    }
}

fn parse_reply(xml: &str) -> VerifyReply {
    let status = soap::first_element_text(xml, "returnvalue")
        .and_then(|text| text.trim().parse::<i64>().ok())
        .and_then(AuthStatus::from_code);

    let non_empty = |value: Option<String>| value.filter(|v| !v.is_empty());

    VerifyReply {
        status,
        push_auth_id_url: non_empty(soap::first_element_text(xml, "pushotpauthid")),
        challenge_name: non_empty(soap::first_element_text(xml, "challengename")),
        challenge_data: non_empty(soap::first_element_text(xml, "challengedata")),
        challenge_state: non_empty(soap::first_element_text(xml, "state")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use wiremock::matchers::{body_string_contains, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    #[test]
    fn auth_status_round_trips_codes() {
        for code in 0..=8 {
            let status = AuthStatus::from_code(code).expect("valid code");
            assert_eq!(i64::from(status.code()), code);
        }
        assert!(AuthStatus::from_code(9).is_none());
        assert!(AuthStatus::from_code(-1).is_none());
    }

    #[test]
    fn challenge_codes_are_two_through_six() {
        assert!(!AuthStatus::Failure.is_challenge());
        assert!(!AuthStatus::Success.is_challenge());
        assert!(AuthStatus::Challenge.is_challenge());
        assert!(AuthStatus::ChangeStaticPassword.is_challenge());
        assert!(!AuthStatus::StaticChangeFailed.is_challenge());
        assert!(!AuthStatus::PinChangeFailed.is_challenge());
    }

    #[test]
    fn parse_reply_reads_fields() {
        let xml = r#"<authResponse><returnvalue>1</returnvalue><pushotpauthid>https://park.example.com/api/v1/park/abc</pushotpauthid></authResponse>"#;
        let reply = parse_reply(xml);
        assert!(reply.is_success());
        assert_eq!(
            reply.push_auth_id_url.as_deref(),
            Some("https://park.example.com/api/v1/park/abc")
        );

        let reply = parse_reply("<authResponse><returnvalue>bogus</returnvalue></authResponse>");
        assert!(reply.status.is_none());
        assert!(!reply.is_success());
    }

    #[tokio::test]
    async fn verify_uses_failover_on_transport_error() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(body_string_contains("<userid>alice</userid>"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<authResponse><returnvalue>1</returnvalue></authResponse>"),
            )
            .mount(&server)
            .await;

        // Primary points at a closed port; the failover must carry the call.
        let client = ValidatorClient::new(
            "http://127.0.0.1:9".to_string(),
            Some(server.uri()),
            Some("gateway".to_string()),
            Duration::from_millis(500),
            Duration::from_secs(2),
        )?;

        let reply = client
            .verify_credentials(&VerifyRequest {
                username: "alice".to_string(),
                user_ip: "203.0.113.7".to_string(),
                passcode: "482913".to_string(),
                ..VerifyRequest::default()
            })
            .await?;

        assert!(reply.is_success());
        Ok(())
    }

    #[tokio::test]
    async fn verify_errors_on_http_failure() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = ValidatorClient::new(
            server.uri(),
            None,
            None,
            Duration::from_millis(500),
            Duration::from_secs(2),
        )?;

        let result = client
            .verify_credentials(&VerifyRequest {
                username: "alice".to_string(),
                user_ip: "203.0.113.7".to_string(),
                passcode: PUSH_TRIGGER.to_string(),
                ..VerifyRequest::default()
            })
            .await;

        assert!(result.is_err());
        Ok(())
    }
}
