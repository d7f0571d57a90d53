//! Integration tests for the gamefeed HTTP API.
//!
//! Tests drive the Axum `Router` directly via `tower::ServiceExt` against an
//! in-memory store, without starting a TCP server.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use futures::StreamExt;
use gamefeed_core::emitter::KEEPALIVE;
use gamefeed_core::{MemoryStore, StreamConfig};
use gamefeed_server::{AppState, build_router};
use gamefeed_types::{GameId, GamePhase, PlayerId, PlayerSnapshot};
use serde_json::Value;
use tower::ServiceExt;

const GAME: GameId = GameId(42);

fn player(id: i64, name: &str, seat: u32) -> PlayerSnapshot {
    PlayerSnapshot {
        player_id: PlayerId(id),
        username: name.to_owned(),
        balance: 1500,
        board_position: 0,
        turn_order: seat,
    }
}

async fn make_test_state() -> Arc<AppState<MemoryStore>> {
    let store = MemoryStore::new();
    store.create_game(GAME).await;
    store
        .transaction(GAME, |txn| {
            txn.add_player(player(5, "A", 0))?;
            txn.add_player(player(6, "B", 1))
        })
        .await
        .unwrap();

    let config = StreamConfig {
        poll_interval: Duration::from_millis(20),
        ..StreamConfig::default()
    };
    Arc::new(AppState::new(Arc::new(store), config))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Read body chunks until the collected text contains `marker`. Keepalive
/// comments are dropped from `text`.
async fn read_until(stream: &mut axum::body::BodyDataStream, text: &mut String, marker: &str) {
    let deadline = Duration::from_secs(5);
    tokio::time::timeout(deadline, async {
        while !text.contains(marker) {
            let chunk = stream.next().await.unwrap().unwrap();
            text.push_str(&String::from_utf8_lossy(&chunk));
            *text = text.replace(KEEPALIVE, "");
        }
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn health_reports_ok() {
    let app = build_router(make_test_state().await);
    let response = app.oneshot(get("/api/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
}

#[tokio::test]
async fn status_reports_poll_interval() {
    let app = build_router(make_test_state().await);
    let response = app.oneshot(get("/api/status")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["activeSubscriptions"], 0);
    assert_eq!(json["pollIntervalMs"], 20);
}

#[tokio::test]
async fn unknown_game_is_404() {
    let app = build_router(make_test_state().await);
    let response = app.oneshot(get("/api/games/999/events")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["status"], 404);
    assert!(json["error"].as_str().unwrap().contains("999"));
}

#[tokio::test]
async fn malformed_game_id_is_400() {
    let app = build_router(make_test_state().await);
    let response = app.oneshot(get("/api/games/board/events")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["status"], 400);
}

#[tokio::test]
async fn event_stream_pushes_lobby_then_start() {
    let state = make_test_state().await;
    let app = build_router(Arc::clone(&state));
    let response = app.oneshot(get("/api/games/42/events")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/event-stream"
    );
    assert_eq!(response.headers()[header::CACHE_CONTROL], "no-cache");

    let mut stream = response.into_body().into_data_stream();
    let mut text = String::new();
    read_until(&mut stream, &mut text, "data: [[5,0,0],[6,0,0]]\n\n").await;

    assert!(text.starts_with("event: playerTurn\ndata: [5,0]\n\n"));
    assert!(text.contains("event: playerJoin\ndata: [\"A\",\"B\"]\n\n"));
    assert!(text.contains("event: playerBalance\ndata: [[5,1500,0],[6,1500,0]]\n\n"));
    assert!(!text.contains("gameStart"));
    assert_eq!(state.active_subscriptions(), 1);

    state
        .provider()
        .transaction(GAME, |txn| {
            txn.set_phase(GamePhase::Playing);
            Ok(())
        })
        .await
        .unwrap();

    text.clear();
    read_until(&mut stream, &mut text, "[4,1500,0]]\n\n").await;
    assert!(text.starts_with("event: gameStart\ndata: 42\n\nevent: playerTurn\ndata: [5,0]\n\n"));
    assert!(text.contains("data: [[1,1500,0],[2,1500,0],[3,1500,0],[4,1500,0]]"));

    drop(stream);
    let released = tokio::time::timeout(Duration::from_secs(5), async {
        while state.active_subscriptions() > 0 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await;
    assert!(released.is_ok());
}

#[tokio::test]
async fn subscriptions_do_not_share_state() {
    let state = make_test_state().await;

    let first = build_router(Arc::clone(&state))
        .oneshot(get("/api/games/42/events"))
        .await
        .unwrap();
    let mut first_stream = first.into_body().into_data_stream();
    let mut first_text = String::new();
    read_until(&mut first_stream, &mut first_text, "data: [\"A\",\"B\"]\n").await;

    let second = build_router(Arc::clone(&state))
        .oneshot(get("/api/games/42/events"))
        .await
        .unwrap();
    let mut second_stream = second.into_body().into_data_stream();
    let mut second_text = String::new();
    read_until(&mut second_stream, &mut second_text, "data: [\"A\",\"B\"]\n").await;

    assert!(second_text.contains("event: playerJoin\n"));
    assert_eq!(state.active_subscriptions(), 2);
}
