//! Authentication endpoint: dumb glue between the wire format and the core.
//!
//! Push requests go to the challenge coordinator, everything else to the
//! engine's validator endpoint. Outcomes map onto the engine's numeric
//! response codes; a backend hiccup becomes 503, never a raw error.

use crate::engine::{AuthStatus, PUSH_TRIGGER, ValidatorClient, VerifyReply, VerifyRequest};
use crate::push::{PushCoordinator, PushMode, PushOutcome};
use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::ToSchema;

const CHALLENGE_PUSH: &str = "push_otp";

#[derive(Debug, Deserialize, ToSchema)]
pub struct AuthenticationRequest {
    pub username: String,
    #[serde(default)]
    pub passcode: Option<String>,
    #[serde(default)]
    pub organization: Option<String>,
    /// Opaque continuation state from a previous challenge response.
    #[serde(default)]
    pub state: Option<String>,
    /// Push mode: `push` (one-step) or `challenge-response`.
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub client_ip: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChallengeReply {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthenticationReply {
    pub username: String,
    pub code: u8,
    pub name: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub challenge: Option<ChallengeReply>,
}

fn reply(username: &str, status: AuthStatus, challenge: Option<ChallengeReply>) -> Response {
    Json(AuthenticationReply {
        username: username.to_string(),
        code: status.code(),
        name: status.name().to_string(),
        message: status.message().to_string(),
        challenge,
    })
    .into_response()
}

fn engine_reply(username: &str, verify: &VerifyReply) -> Response {
    let status = verify.status.unwrap_or(AuthStatus::Failure);

    let challenge = if status.is_challenge() {
        Some(ChallengeReply {
            name: verify
                .challenge_name
                .clone()
                .unwrap_or_else(|| status.name().to_lowercase()),
            data: verify.challenge_data.clone(),
            state: verify.challenge_state.clone(),
        })
    } else {
        None
    };

    reply(username, status, challenge)
}

#[utoipa::path(
    post,
    path = "/authenticate",
    request_body = AuthenticationRequest,
    responses(
        (status = 200, description = "Authentication attempt processed", body = AuthenticationReply),
        (status = 503, description = "Authentication backend unreachable")
    ),
    tag = "authentication"
)]
pub async fn authenticate(
    coordinator: Extension<Arc<PushCoordinator>>,
    validator: Extension<Arc<ValidatorClient>>,
    Json(request): Json<AuthenticationRequest>,
) -> impl IntoResponse {
    let user_ip = request
        .client_ip
        .clone()
        .unwrap_or_else(|| "0.0.0.0".to_string());

    let mode = request.mode.as_deref().map(str::to_lowercase);

    let push_mode = match mode.as_deref() {
        Some("challenge-response") => Some(PushMode::ChallengeResponse),
        Some("push") | Some("one-step") => Some(PushMode::OneStep),
        _ if request.passcode.as_deref() == Some(PUSH_TRIGGER) => Some(PushMode::OneStep),
        _ => None,
    };

    if let Some(push_mode) = push_mode {
        return match coordinator
            .authenticate(
                &request.username,
                &user_ip,
                request.state.as_deref(),
                push_mode,
            )
            .await
        {
            Ok(PushOutcome::Approved) => reply(&request.username, AuthStatus::Success, None),
            Ok(PushOutcome::Denied) => reply(&request.username, AuthStatus::Failure, None),
            Ok(PushOutcome::ChallengeIssued(challenge)) => reply(
                &request.username,
                AuthStatus::Challenge,
                Some(ChallengeReply {
                    name: CHALLENGE_PUSH.to_string(),
                    data: None,
                    state: Some(challenge.opaque_state),
                }),
            ),
            Err(err) => {
                error!("Push authentication unavailable: {err}");
                StatusCode::SERVICE_UNAVAILABLE.into_response()
            }
        };
    }

    match validator
        .verify_credentials(&VerifyRequest {
            username: request.username.clone(),
            user_ip,
            passcode: request.passcode.clone().unwrap_or_default(),
            organization: request.organization.clone(),
            state: request.state.clone(),
            ..VerifyRequest::default()
        })
        .await
    {
        Ok(verify) => engine_reply(&request.username, &verify),
        Err(err) => {
            error!("Authentication engine unavailable: {err}");
            StatusCode::SERVICE_UNAVAILABLE.into_response()
        }
    }
}
