/**
 * WebSocket Transport
 *
 * Upgrades `GET /ws` into a relay connection. Each socket gets:
 *
 * - a writer task that drains the connection's channel into the socket
 * - a reader loop that feeds text frames to the relay
 *
 * The connection leaves the broadcast group as soon as the reader loop ends,
 * whether the client closed the socket or the transport failed.
 *
 * Browsers always send `Origin` on a WebSocket handshake, and CORS does not
 * apply to upgrades, so the handshake checks it against the configured
 * origin itself. Requests without an `Origin` header (non-browser clients)
 * are let through.
 */

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message as WsMessage, WebSocket, WebSocketUpgrade},
        State,
    },
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::backend::chat::ChatRelay;
use crate::backend::server::config::ServerConfig;
use crate::shared::ServerEvent;

/// Handle `GET /ws`
pub async fn handle_socket_upgrade(
    ws: WebSocketUpgrade,
    State(relay): State<ChatRelay>,
    State(config): State<Arc<ServerConfig>>,
    headers: HeaderMap,
) -> Response {
    if let Some(origin) = headers.get(header::ORIGIN) {
        if origin.as_bytes() != config.allowed_origin.as_bytes() {
            tracing::warn!("[Realtime] refused upgrade from origin {:?}", origin);
            return (StatusCode::FORBIDDEN, "Origin not allowed").into_response();
        }
    }

    ws.on_upgrade(move |socket| run_connection(socket, relay))
}

async fn run_connection(socket: WebSocket, relay: ChatRelay) {
    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerEvent>();
    let mut connection = relay.connect(tx);

    let writer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let frame = match event.to_frame() {
                Ok(frame) => frame,
                Err(err) => {
                    tracing::error!("[Realtime] failed to encode {}: {}", event.name(), err);
                    continue;
                }
            };
            if sink.send(WsMessage::Text(frame.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(frame) = stream.next().await {
        match frame {
            Ok(WsMessage::Text(text)) => {
                // Awaited per frame so writes start in receipt order. Dropping
                // the handle detaches the write; it still completes if this
                // client disconnects first.
                let _ = connection.on_frame(text.as_str()).await;
            }
            Ok(WsMessage::Close(_)) => break,
            Ok(_) => continue,
            Err(err) => {
                tracing::debug!("[Realtime] socket error: {}", err);
                break;
            }
        }
    }

    connection.disconnect();
    writer.abort();
}
