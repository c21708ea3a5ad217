//! Per-user authenticator options derived from the synchronized inventory.

use crate::inventory::Inventory;
use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
pub struct OptionsQuery {
    pub organization: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthenticatorOptions {
    pub username: String,
    pub options: Vec<String>,
    pub max_lockout_attempts: u32,
    pub overall_failed_attempts: u32,
    pub remaining_attempts: u32,
}

#[utoipa::path(
    get,
    path = "/authenticators/{username}/options",
    params(
        ("username" = String, Path, description = "User to list options for"),
        OptionsQuery
    ),
    responses(
        (status = 200, description = "Presentation options for the user", body = AuthenticatorOptions),
        (status = 503, description = "Management backend unreachable")
    ),
    tag = "authenticators"
)]
pub async fn options(
    Path(username): Path<String>,
    Query(query): Query<OptionsQuery>,
    inventory: Extension<Arc<Inventory>>,
) -> impl IntoResponse {
    let serials = match inventory
        .serials_by_owner(&username, query.organization.as_deref())
        .await
    {
        Ok(serials) => serials,
        Err(err) => {
            error!("Unable to list authenticators for {username}: {err}");
            return StatusCode::SERVICE_UNAVAILABLE.into_response();
        }
    };

    let options = inventory.options_for_serials(&serials).await;
    let counters = inventory.lockout_counters(&serials).await;

    Json(AuthenticatorOptions {
        username,
        options: options.into_iter().collect(),
        max_lockout_attempts: counters.max_lockout_attempts,
        overall_failed_attempts: counters.overall_failed_attempts,
        remaining_attempts: counters.remaining_attempts,
    })
    .into_response()
}
