//! Runs the client over real HTTP against an in-process mock of the game
//! service.

use std::sync::{Arc, Mutex};

use axum::extract::Path;
use axum::http::{header::CONTENT_TYPE, HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use chesstempo::{ClientError, Color, GameClient, NativeTransport, Turn};

type Log = Arc<Mutex<Vec<String>>>;

async fn serve(app: Router) -> GameClient<NativeTransport> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    GameClient::new(NativeTransport::new(&format!("http://{}", addr)))
}

/// Mock that records one line per request it serves.
fn mock_service(log: Log) -> Router {
    let list_log = log.clone();
    let start_log = log.clone();
    let read_log = log.clone();
    let move_log = log.clone();
    let resign_log = log;

    Router::new()
        .route(
            "/api/games",
            get(move || async move {
                list_log.lock().unwrap().push("list".to_string());
                Json(json!(["first", "second"]))
            })
            .post(move |headers: HeaderMap, body: String| async move {
                let content_type = headers
                    .get(CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                start_log
                    .lock()
                    .unwrap()
                    .push(format!("start {} {}", content_type, body));
                Json(json!({ "id": "created" }))
            }),
        )
        .route(
            "/api/games/:id",
            get(move |Path(id): Path<String>| async move {
                read_log.lock().unwrap().push(format!("read {}", id));
                if id == "missing" {
                    return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "reason": "no such game" })));
                }
                (
                    StatusCode::OK,
                    Json(json!({ "FEN": "8/8/8/8/8/8/8/8 w - - 0 1", "Turn": "User" })),
                )
            }),
        )
        .route(
            "/api/games/:id/move/:mv",
            post(move |Path((id, mv)): Path<(String, String)>| async move {
                move_log.lock().unwrap().push(format!("move {} {}", id, mv));
                Json(json!({ "OK": true }))
            }),
        )
        .route(
            "/api/games/:id/resign",
            post(move |Path(id): Path<String>| async move {
                resign_log.lock().unwrap().push(format!("resign {}", id));
                Json(json!({ "OK": true }))
            }),
        )
}

#[tokio::test]
async fn partial_state_round_trips_without_synthesized_fields() {
    let log = Log::default();
    let client = serve(mock_service(log.clone())).await;

    let state = client.fetch_game("abc123").await.unwrap();

    assert_eq!(state.fen.as_deref(), Some("8/8/8/8/8/8/8/8 w - - 0 1"));
    assert_eq!(state.turn, Some(Turn::User));
    assert_eq!(state.valid_moves, None);
    assert_eq!(state.color, None);
    assert_eq!(state.outcome, None);
    assert_eq!(*log.lock().unwrap(), vec!["read abc123"]);
}

#[tokio::test]
async fn error_status_discards_server_reason() {
    let client = serve(mock_service(Log::default())).await;

    let err = client.fetch_game("missing").await.unwrap_err();

    assert!(matches!(err, ClientError::RequestFailed { status: 500 }));
    assert!(!err.to_string().contains("no such game"));
}

/// Service whose game listing and creation fail the way the real server's
/// error handler answers: a `reason` object with a 502.
fn failing_service() -> Router {
    let unavailable = || async {
        (
            StatusCode::BAD_GATEWAY,
            Json(json!({ "reason": "Unknown error." })),
        )
    };
    Router::new().route("/api/games", get(unavailable).post(unavailable))
}

#[tokio::test]
async fn reason_payload_on_error_status_is_a_request_failure() {
    let client = serve(failing_service()).await;

    let err = client.list_games().await.unwrap_err();
    assert!(matches!(err, ClientError::RequestFailed { status: 502 }), "{:?}", err);

    let err = client.start_game(Some(Color::White), None).await.unwrap_err();
    assert!(matches!(err, ClientError::RequestFailed { status: 502 }), "{:?}", err);
}

#[tokio::test]
async fn start_game_posts_json() {
    let log = Log::default();
    let client = serve(mock_service(log.clone())).await;

    let id = client.start_game(None, None).await.unwrap();
    assert_eq!(id, "created");

    client
        .start_game(Some(Color::Black), Some("8/8/8/8/8/8/8/8 w - - 0 1"))
        .await
        .unwrap();

    let log = log.lock().unwrap();
    assert_eq!(log[0], "start application/json {}");
    let body: Value = serde_json::from_str(log[1].trim_start_matches("start application/json ")).unwrap();
    assert_eq!(body, json!({ "color": "b", "fen": "8/8/8/8/8/8/8/8 w - - 0 1" }));
}

#[tokio::test]
async fn move_hits_concatenated_path() {
    let log = Log::default();
    let client = serve(mock_service(log.clone())).await;

    let id = client.move_game("abc", "e2", "e4").await.unwrap();

    assert_eq!(id, None);
    assert_eq!(*log.lock().unwrap(), vec!["move abc e2e4"]);
}

#[tokio::test]
async fn list_and_resign() {
    let log = Log::default();
    let client = serve(mock_service(log.clone())).await;

    let games = client.list_games().await.unwrap();
    assert_eq!(games, vec!["first", "second"]);

    let ack = client.resign_game("first").await.unwrap();
    assert_eq!(ack, json!({ "OK": true }));

    assert_eq!(*log.lock().unwrap(), vec!["list", "resign first"]);
}

#[tokio::test]
async fn unknown_route_with_plain_text_body_is_a_decode_error() {
    let client = serve(mock_service(Log::default())).await;

    // axum answers unknown methods/paths with an empty, non-JSON body.
    let err = client.fetch_game("a/b/c").await.unwrap_err();

    assert!(matches!(err, ClientError::Decode(_)));
}
