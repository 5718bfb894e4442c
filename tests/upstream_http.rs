use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use nflix::app::{build_router, AppState};
use nflix::client::{ApiRequest, CatalogSource, MediaKind, ProxyClient};
use nflix::player::{PlayerBases, PlayerClient};
use nflix::query::ApiKind;
use nflix::tmdb::{http_client, TmdbClient};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::util::ServiceExt;

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

// An address nothing listens on.
async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

// TMDB and the playback service on one local server. Only movie 550 has
// metadata and only movie 7 has a player page; everything else is a 404.
async fn upstream() -> SocketAddr {
    let app = Router::new()
        .route(
            "/movie/550",
            get(|| async { Json(json!({"id": 550, "title": "Fight Club"})) }),
        )
        .route("/filme/7", get(|| async { "player" }));
    serve(app).await
}

async fn proxy_router() -> Router {
    let upstream = upstream().await;
    let dead = closed_addr().await;
    let client = http_client(None).unwrap();
    let state = AppState {
        metadata: Arc::new(TmdbClient::new(
            client.clone(),
            &format!("http://{upstream}"),
            "test-key",
            "pt-BR",
        )),
        probe: Arc::new(PlayerClient::new(client)),
        players: Arc::new(PlayerBases {
            movie: format!("http://{upstream}/filme/"),
            series: format!("http://{dead}/serie/"),
        }),
    };
    build_router(state)
}

async fn call(app: &Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn tmdb_success_is_relayed() {
    let app = proxy_router().await;
    let (status, body) = call(&app, "/.netlify/functions/api?api=details&id=550").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": 550, "title": "Fight Club"}));
}

#[tokio::test]
async fn tmdb_404_becomes_500_with_status() {
    let app = proxy_router().await;
    let (status, body) = call(&app, "/.netlify/functions/api?api=details&id=551").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"error": "Erro interno do servidor", "details": "HTTP error! status: 404"})
    );
}

#[tokio::test]
async fn player_head_reports_availability() {
    let app = proxy_router().await;

    let (status, body) = call(&app, "/.netlify/functions/check-player?id=7").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["available"], true);

    let (status, body) = call(&app, "/.netlify/functions/check-player?id=8").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["available"], false);
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn refused_player_connection_is_a_soft_failure() {
    let app = proxy_router().await;
    let (status, body) = call(&app, "/.netlify/functions/check-player?id=2&type=tv").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["available"], false);
    assert!(body["url"].as_str().unwrap().ends_with("/serie/2"));
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("HEAD request failed"));
}

#[tokio::test]
async fn proxy_client_reads_bodies_and_surfaces_errors() {
    let proxy = serve(proxy_router().await).await;
    let client = ProxyClient::new(&format!("http://{proxy}")).unwrap();

    let body = client
        .get(&ApiRequest::title(ApiKind::Details, 550, MediaKind::Movie))
        .await
        .unwrap();
    assert_eq!(body["title"], "Fight Club");

    let err = client
        .get(&ApiRequest::title(ApiKind::Details, 551, MediaKind::Movie))
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Erro interno do servidor (500): HTTP error! status: 404"
    );

    let err = client
        .get(&ApiRequest::new(ApiKind::Player))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "ID não fornecido (400)");
}
