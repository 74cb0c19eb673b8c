//! WebSocket endpoint for station displays
//!
//! GET /api/ws — upgrade to WebSocket. The server pushes `{type, data}`
//! envelopes; inbound frames are logged and otherwise ignored (the write
//! path is server → client only). There is no replay: a display that
//! reconnects refetches its queue over HTTP before resuming.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use shared::message::PushEnvelope;

use crate::auth::CurrentUser;
use crate::core::ServerState;

/// GET /api/ws — upgrade to WebSocket (any authenticated role)
pub async fn ws_upgrade(
    State(state): State<ServerState>,
    user: CurrentUser,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_connection(socket, state, user))
}

async fn handle_connection(socket: WebSocket, state: ServerState, user: CurrentUser) {
    let (mut ws_sink, mut ws_stream) = socket.split();

    let (subscriber_id, mut frames) = state.broadcaster.subscribe();

    tracing::info!(
        subscriber = subscriber_id,
        username = %user.username,
        role = %user.role,
        "Push channel connected"
    );

    // One-time greeting
    if let Ok(json) = serde_json::to_string(&PushEnvelope::greeting())
        && ws_sink.send(Message::Text(json.into())).await.is_err()
    {
        state.broadcaster.unsubscribe(subscriber_id);
        return;
    }

    loop {
        tokio::select! {
            // Inbound from the client: log only
            msg = ws_stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        tracing::debug!(
                            subscriber = subscriber_id,
                            message = %text,
                            "Inbound push-channel message ignored"
                        );
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let _ = ws_sink.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        break;
                    }
                    Some(Err(e)) => {
                        tracing::warn!(
                            subscriber = subscriber_id,
                            "Push channel error: {e}"
                        );
                        break;
                    }
                    _ => {} // Binary, Pong — ignore
                }
            }

            // Outbound frame from the broadcaster
            frame = frames.recv() => {
                match frame {
                    Some(frame) => {
                        if ws_sink.send(Message::Text(frame.into())).await.is_err() {
                            break;
                        }
                    }
                    None => break, // registry dropped the sender
                }
            }
        }
    }

    let _ = ws_sink.close().await;
    state.broadcaster.unsubscribe(subscriber_id);

    tracing::info!(subscriber = subscriber_id, "Push channel disconnected");
}
