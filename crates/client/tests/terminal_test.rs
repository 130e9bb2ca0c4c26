//! Terminal socket tests against a local axum WebSocket server.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::Response;
use axum::routing::get;
use futures::{SinkExt, StreamExt, stream};
use playdeck_client::WsConnector;
use playdeck_core::{
    CONNECTION_CLOSED_MARKER, LiveStreamView, StreamCommand, StreamEvent, StreamState,
    TerminalTarget,
};

#[derive(Clone, Default)]
struct Recorded {
    queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
    handshakes: Arc<Mutex<Vec<serde_json::Value>>>,
}

async fn terminal_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<HashMap<String, String>>,
    State(recorded): State<Recorded>,
) -> Response {
    recorded.queries.lock().unwrap().push(query);
    ws.on_upgrade(move |socket| echo_session(socket, recorded))
}

async fn echo_session(socket: WebSocket, recorded: Recorded) {
    let (mut sender, mut receiver) = socket.split();

    let Some(Ok(Message::Text(auth))) = receiver.next().await else {
        return;
    };
    let auth: serde_json::Value = serde_json::from_str(auth.as_str()).unwrap();
    let user = auth
        .get("username")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default()
        .to_string();
    recorded.handshakes.lock().unwrap().push(auth);

    let welcome = format!("Welcome {user}\r\n");
    if sender.send(Message::Text(welcome.into())).await.is_err() {
        return;
    }

    while let Some(Ok(message)) = receiver.next().await {
        match message {
            Message::Text(line) if line.as_str() == "exit\n" => {
                let _ = sender.send(Message::Close(None)).await;
                break;
            }
            Message::Text(line) => {
                let echo = format!("$ {}", line.as_str());
                if sender.send(Message::Text(echo.into())).await.is_err() {
                    break;
                }
            }
            Message::Close(_) => break,
            _ => {}
        }
    }
}

async fn spawn_server() -> (SocketAddr, Recorded) {
    let recorded = Recorded::default();
    let app = Router::new()
        .route("/ws/terminal", get(terminal_handler))
        .with_state(recorded.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, recorded)
}

fn connector() -> WsConnector {
    WsConnector::new(Duration::from_secs(5))
}

fn target() -> TerminalTarget {
    TerminalTarget::new("10.0.0.7", "deploy", "s3cret")
}

#[tokio::test]
async fn test_connect_sends_credentials_in_handshake_only() {
    let (addr, recorded) = spawn_server().await;
    let mut view = LiveStreamView::new();

    let state = view
        .connect(&connector(), &target(), &format!("ws://{addr}"))
        .await;
    assert_eq!(state, StreamState::Open);

    let welcome = view.next_event().await;
    assert_eq!(
        welcome,
        Some(StreamEvent::Output("Welcome deploy\r\n".to_string()))
    );

    let queries = recorded.queries.lock().unwrap().clone();
    assert_eq!(queries.len(), 1);
    assert_eq!(
        queries.first().and_then(|q| q.get("server_ip")).map(String::as_str),
        Some("10.0.0.7")
    );
    assert!(queries.iter().all(|q| !q.contains_key("password")));

    let handshakes = recorded.handshakes.lock().unwrap().clone();
    assert_eq!(
        handshakes
            .first()
            .and_then(|h| h.get("password"))
            .and_then(serde_json::Value::as_str),
        Some("s3cret")
    );

    view.teardown().await;
    assert_eq!(view.state(), StreamState::Closed);
}

#[tokio::test]
async fn test_run_echoes_commands_until_server_closes() {
    let (addr, _recorded) = spawn_server().await;
    let mut view = LiveStreamView::new();
    view.connect(&connector(), &target(), &format!("ws://{addr}"))
        .await;

    let commands = stream::iter(vec![
        StreamCommand::Input("uptime".to_string()),
        StreamCommand::Input("exit".to_string()),
    ])
    .chain(stream::pending());
    let mut events = Vec::new();

    view.run(commands, |event| events.push(event.clone())).await;

    assert_eq!(events.first(), Some(&StreamEvent::Opened));
    assert!(events.contains(&StreamEvent::Output("$ uptime\n".to_string())));
    assert_eq!(events.last(), Some(&StreamEvent::Closed));
    assert!(view.output().ends_with(CONNECTION_CLOSED_MARKER));
    assert!(!view.has_socket());
}

#[tokio::test]
async fn test_nothing_listening_closes_view() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let mut view = LiveStreamView::new();

    let state = view
        .connect(&connector(), &target(), &format!("ws://{addr}"))
        .await;

    assert_eq!(state, StreamState::Closed);
    assert!(matches!(
        view.last_error(),
        Some(playdeck_core::Error::ConnectFailed { .. })
    ));
}
