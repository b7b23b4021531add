//! Session event stream over WebSocket.
//!
//! Sends the current session as a JSON text frame on connect, then one
//! frame per committed change. Client frames other than Close are ignored.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use tokio::sync::{broadcast, watch};

use crate::http::server::AppState;
use crate::session::Session;

pub async fn session_events(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    let updates = state.session.subscribe();
    let shutdown = state.shutdown.subscribe();
    ws.on_upgrade(move |socket| stream_session(socket, updates, shutdown))
}

async fn stream_session(
    mut socket: WebSocket,
    mut updates: watch::Receiver<Session>,
    mut shutdown: broadcast::Receiver<()>,
) {
    tracing::debug!("Session event stream opened");

    loop {
        let payload = serde_json::to_string(&*updates.borrow_and_update());
        let text = match payload {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode session");
                break;
            }
        };
        if socket.send(Message::Text(text.into())).await.is_err() {
            break;
        }

        // Wait for the next change, ignoring chatter from the client.
        let keep_going = 'wait: loop {
            tokio::select! {
                changed = updates.changed() => break 'wait changed.is_ok(),
                _ = shutdown.recv() => {
                    let _ = socket.send(Message::Close(None)).await;
                    break 'wait false;
                }
                incoming = socket.recv() => match incoming {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break 'wait false,
                    Some(Ok(_)) => continue 'wait,
                },
            }
        };

        if !keep_going {
            break;
        }
    }

    tracing::debug!("Session event stream closed");
}
