use crate::{
    api::handlers::{authenticate, authenticators, health},
    backend::{
        SessionManager,
        keepalive::{self, KeepAliveConfig},
    },
    cli::globals::GlobalArgs,
    engine::ValidatorClient,
    inventory::{self, CacheStore, Inventory, OptionsMap, SyncConfig},
    push::{ParkingClient, PushConfig, PushCoordinator},
};
use anyhow::Result;
use axum::{
    Extension, Router,
    body::Body,
    extract::MatchedPath,
    http::{
        HeaderName, HeaderValue, Method, Request,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    response::Json,
    routing::{get, post},
};
use std::{path::PathBuf, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::PropagateRequestIdLayer,
    set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{Span, error, info, info_span};
use ulid::Ulid;
use utoipa::OpenApi;

pub mod handlers;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,
        handlers::authenticate::authenticate,
        handlers::authenticators::options
    ),
    tags(
        (name = "health", description = "Gateway and backend health"),
        (name = "authentication", description = "End-user authentication"),
        (name = "authenticators", description = "Per-user authenticator inventory")
    )
)]
struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build and start the server: construct the core components, bootstrap the
/// inventory, spawn the background tasks, and serve until interrupted.
///
/// # Errors
/// Returns an error if a component cannot be built or the listener fails.
#[allow(clippy::needless_pass_by_value)]
pub async fn new(
    port: u16,
    globals: &GlobalArgs,
    keep_alive: KeepAliveConfig,
    push_config: PushConfig,
    sync_config: SyncConfig,
    options: OptionsMap,
    storage_file: PathBuf,
) -> Result<()> {
    let session = Arc::new(SessionManager::new(
        &globals.backend_url,
        globals.operator_email.clone(),
        globals.operator_otp.clone(),
        globals.encryption_key.clone(),
        Duration::from_secs(globals.request_timeout_secs),
    )?);

    // A down backend must not block startup; the keep-alive task reconnects.
    if let Err(err) = session.connect().await {
        error!("Initial backend connect failed: {err}");
    }

    let store = CacheStore::new(storage_file, globals.encryption_key.clone());
    let sync_interval = sync_config.interval_secs;
    let inventory = Arc::new(Inventory::new(
        session.clone(),
        store,
        options,
        sync_config,
    ));
    inventory.bootstrap().await;

    let validator = Arc::new(ValidatorClient::new(
        push_config.validator_url.clone(),
        push_config.failover_url.clone(),
        push_config.resource.clone(),
        Duration::from_secs(push_config.connect_timeout_secs),
        Duration::from_secs(push_config.read_timeout_secs),
    )?);

    let parking = ParkingClient::new(
        Duration::from_secs(push_config.connect_timeout_secs),
        Duration::from_secs(push_config.read_timeout_secs),
        push_config.parking_retries,
    )?;

    let coordinator = Arc::new(PushCoordinator::new(validator.clone(), parking));

    keepalive::spawn(session.clone(), keep_alive);
    inventory::spawn_sync(inventory.clone(), sync_interval);

    let cors = CorsLayer::new()
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_methods([Method::GET, Method::POST])
        .allow_origin(Any);

    let app = Router::new()
        .route("/health", get(health::health))
        .route("/authenticate", post(authenticate::authenticate))
        .route(
            "/authenticators/:username/options",
            get(authenticators::options),
        )
        .route("/openapi.json", get(openapi_json))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(cors)
                .layer(Extension(session))
                .layer(Extension(inventory))
                .layer(Extension(coordinator))
                .layer(Extension(validator)),
        );

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Gracefully shutdown");
        })
        .await?;

    Ok(())
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}
