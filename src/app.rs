use crate::config::Config;
use crate::error::{ProxyError, ProxyResult};
use crate::player::{PlayerBases, PlayerClient, PlayerProbe};
use crate::query::{AvailabilityParams, MetadataParams};
use crate::tmdb::{self, Endpoint, MetadataApi, TmdbClient};
use anyhow::Result;
use axum::{
    extract::{Query, State},
    http::{header, HeaderValue, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::json;
use std::{collections::HashMap, path::Path, sync::Arc};
use tower_http::{services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::{info, warn};

// Paths are matched by containment, so any prefix in front of these works.
pub const METADATA_PATH: &str = "/.netlify/functions/api";
pub const AVAILABILITY_PATH: &str = "/.netlify/functions/check-player";

#[derive(Clone)]
pub struct AppState {
    pub metadata: Arc<dyn MetadataApi>,
    pub probe: Arc<dyn PlayerProbe>,
    pub players: Arc<PlayerBases>,
}

impl AppState {
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = tmdb::http_client(config.upstream_timeout)?;
        Ok(Self {
            metadata: Arc::new(TmdbClient::new(
                client.clone(),
                &config.tmdb_base_url,
                &config.tmdb_api_key,
                &config.tmdb_lang,
            )),
            probe: Arc::new(PlayerClient::new(client)),
            players: Arc::new(PlayerBases::from_config(config)),
        })
    }
}

pub async fn run_server(config: Config) -> Result<()> {
    if config.tmdb_api_key.is_empty() {
        warn!("TMDB_API_KEY is not set; metadata calls will be rejected upstream");
    }
    info!("Metadata language: {}", config.tmdb_lang);

    let state = AppState::from_config(&config)?;
    let app = build_app(state, &config.static_dir);

    info!("Listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    with_common_layers(function_router(state))
}

pub fn build_app(state: AppState, static_dir: &Path) -> Router {
    if !static_dir.is_dir() {
        warn!(
            "Static directory {} not found; serving the function only",
            static_dir.display()
        );
        return build_router(state);
    }
    info!("Serving static assets from {}", static_dir.display());
    let assets = ServeDir::new(static_dir)
        .call_fallback_on_method_not_allowed(true)
        .fallback(function_router(state));
    with_common_layers(Router::new().fallback_service(assets))
}

fn function_router(state: AppState) -> Router {
    Router::new().fallback(handle_function).with_state(state)
}

fn with_common_layers(router: Router) -> Router {
    router
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, POST, PUT, DELETE"),
        ))
        .layer(TraceLayer::new_for_http())
}

async fn handle_function(
    State(state): State<AppState>,
    uri: Uri,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let path = uri.path();
    let result = if path.contains(METADATA_PATH) {
        metadata(&state, MetadataParams::from_query(&params)).await
    } else if path.contains(AVAILABILITY_PATH) {
        check_player(&state, AvailabilityParams::from_query(&params)).await
    } else {
        Err(ProxyError::RouteNotFound)
    };
    result.unwrap_or_else(IntoResponse::into_response)
}

async fn metadata(state: &AppState, params: MetadataParams) -> ProxyResult<Response> {
    let api = params.api.ok_or(ProxyError::InvalidApi)?;
    let Some(endpoint) = Endpoint::for_params(api, &params) else {
        return player_url(state, &params);
    };
    let body = state.metadata.fetch(&endpoint).await?;
    Ok(Json(body).into_response())
}

fn player_url(state: &AppState, params: &MetadataParams) -> ProxyResult<Response> {
    if params.id == 0 {
        return Err(ProxyError::MissingId);
    }
    let url = state.players.url_for(&params.media_type, params.id);
    info!("Player URL generated: {}", url);
    Ok(Json(json!({
        "url": url,
        "success": true,
        "id": params.id,
        "type": params.media_type,
    }))
    .into_response())
}

async fn check_player(state: &AppState, params: AvailabilityParams) -> ProxyResult<Response> {
    if params.id == 0 {
        return Err(ProxyError::MissingId);
    }
    let url = state.players.url_for(&params.media_type, params.id);
    let body = match state.probe.is_available(&url).await {
        Ok(available) => json!({
            "available": available,
            "url": url,
            "id": params.id,
            "type": params.media_type,
        }),
        Err(err) => {
            warn!("Player probe failed for {}: {:#}", url, err);
            json!({
                "available": false,
                "url": url,
                "error": format!("{err:#}"),
            })
        }
    };
    Ok(Json(body).into_response())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        }
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        }
    }
}
