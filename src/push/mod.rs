//! Two-phase push-notification challenge coordinator.
//!
//! Phase one asks the engine for a push challenge and receives the parked
//! request's URL. Phase two polls the parking service and submits the
//! obtained status back to the engine. In challenge-response mode the URL is
//! round-tripped to the caller as base64 opaque state between the phases, so
//! no server-side state survives the first call.

pub mod parking;

pub use parking::ParkingClient;

use crate::engine::{PUSH_TRIGGER, ValidatorClient, VerifyRequest};
use anyhow::Result;
use base64ct::{Base64, Encoding};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Configuration for the push coordinator and its two HTTP clients.
#[derive(Debug, Clone)]
pub struct PushConfig {
    pub validator_url: String,
    pub failover_url: Option<String>,
    pub resource: Option<String>,
    pub parking_retries: u32,
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushMode {
    OneStep,
    ChallengeResponse,
}

/// A challenge suspended between the two phases. Never persisted: the caller
/// holds the opaque state and submits it in the follow-up call.
#[derive(Debug, Clone)]
pub struct PushChallenge {
    pub auth_id: String,
    pub auth_id_url: String,
    pub opaque_state: String,
}

#[derive(Debug, Clone)]
pub enum PushOutcome {
    Approved,
    Denied,
    ChallengeIssued(PushChallenge),
}

pub struct PushCoordinator {
    validator: Arc<ValidatorClient>,
    parking: ParkingClient,
}

fn trailing_segment(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

fn decode_state(state: &str) -> Option<String> {
    Base64::decode_vec(state)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
}

impl PushCoordinator {
    #[must_use]
    pub fn new(validator: Arc<ValidatorClient>, parking: ParkingClient) -> Self {
        Self { validator, parking }
    }

    /// Run a push authentication attempt.
    ///
    /// Without opaque state a new challenge is issued; in challenge-response
    /// mode the attempt suspends immediately and the state goes back to the
    /// caller. With opaque state (or in one-step mode) the attempt resolves
    /// against the parking service. Unresolved polls come back as `Denied`;
    /// the caller may re-submit the same state to poll again.
    ///
    /// # Errors
    /// Returns an error if the engine's validator endpoint is unreachable.
    #[instrument(skip(self, opaque_state))]
    pub async fn authenticate(
        &self,
        username: &str,
        user_ip: &str,
        opaque_state: Option<&str>,
        mode: PushMode,
    ) -> Result<PushOutcome> {
        let auth_id_url = match opaque_state {
            None => {
                let auth_id_url = self.initiate(username, user_ip).await?;

                if auth_id_url.is_empty() {
                    warn!("Engine returned no push auth id for {username}");
                    return Ok(PushOutcome::Denied);
                }

                if mode == PushMode::ChallengeResponse {
                    let challenge = PushChallenge {
                        auth_id: trailing_segment(&auth_id_url).to_string(),
                        opaque_state: Base64::encode_string(auth_id_url.as_bytes()),
                        auth_id_url,
                    };
                    return Ok(PushOutcome::ChallengeIssued(challenge));
                }

                auth_id_url
            }
            Some(state) => match decode_state(state) {
                Some(auth_id_url) => auth_id_url,
                None => {
                    warn!("Opaque push state is not valid base64");
                    return Ok(PushOutcome::Denied);
                }
            },
        };

        self.resolve(&auth_id_url, username, user_ip).await
    }

    /// Phase one: request a push challenge, returning the parked request URL.
    async fn initiate(&self, username: &str, user_ip: &str) -> Result<String> {
        let reply = self
            .validator
            .verify_credentials(&VerifyRequest {
                username: username.to_string(),
                user_ip: user_ip.to_string(),
                passcode: PUSH_TRIGGER.to_string(),
                ..VerifyRequest::default()
            })
            .await?;

        Ok(reply.push_auth_id_url.unwrap_or_default())
    }

    /// Phase two: poll the parking service and submit the status back to the
    /// engine. Idempotent and re-entrant on the same `auth_id_url`.
    ///
    /// # Errors
    /// Returns an error if the engine's validator endpoint is unreachable.
    #[instrument(skip(self))]
    pub async fn resolve(
        &self,
        auth_id_url: &str,
        username: &str,
        user_ip: &str,
    ) -> Result<PushOutcome> {
        let auth_id = trailing_segment(auth_id_url);

        let Some(status) = self.parking.poll(auth_id_url).await else {
            debug!("Push attempt for {username} unresolved");
            return Ok(PushOutcome::Denied);
        };

        let reply = self
            .validator
            .verify_credentials(&VerifyRequest {
                username: username.to_string(),
                user_ip: user_ip.to_string(),
                passcode: PUSH_TRIGGER.to_string(),
                push_auth_id: Some(auth_id.to_string()),
                push_status: Some(status),
                ..VerifyRequest::default()
            })
            .await?;

        debug!("Push authentication successful? {}", reply.is_success());

        if reply.is_success() {
            Ok(PushOutcome::Approved)
        } else {
            Ok(PushOutcome::Denied)
        }
    }
}

impl std::fmt::Debug for PushCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushCoordinator").finish_non_exhaustive()
    }
}
