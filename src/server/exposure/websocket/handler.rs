//! WebSocket upgrade handler and message loop

use crate::server::host::ServerHost;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::SinkExt;
use futures::stream::StreamExt;
use std::sync::Arc;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use uuid::Uuid;

/// GET /ws
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(host): State<Arc<ServerHost>>,
) -> impl IntoResponse {
    let tables = host.feed.subscribe();
    ws.on_upgrade(move |socket| handle_socket(socket, tables))
}

/// Handle a single WebSocket connection
///
/// A write task forwards every table from the feed; the read loop only
/// watches for the client going away.
async fn handle_socket(socket: WebSocket, tables: watch::Receiver<String>) {
    let connection_id = format!("conn_{}", Uuid::new_v4().simple());
    tracing::debug!(connection_id = %connection_id, "WebSocket client connected");

    let (mut ws_write, mut ws_read) = socket.split();

    let conn_id_write = connection_id.clone();
    let write_handle = tokio::spawn(async move {
        // Yields the current table first, then each replacement.
        let mut tables = WatchStream::new(tables);
        while let Some(table) = tables.next().await {
            if ws_write.send(Message::Text(table.into())).await.is_err() {
                tracing::debug!(
                    connection_id = %conn_id_write,
                    "WebSocket write failed, closing"
                );
                break;
            }
        }
    });

    while let Some(result) = ws_read.next().await {
        match result {
            Ok(Message::Close(_)) => {
                tracing::debug!(connection_id = %connection_id, "Client sent close frame");
                break;
            }
            Ok(_) => {
                // Clients have nothing to say; pings are answered by axum.
            }
            Err(e) => {
                tracing::debug!(
                    connection_id = %connection_id,
                    error = %e,
                    "WebSocket read error"
                );
                break;
            }
        }
    }

    write_handle.abort();
    tracing::debug!(connection_id = %connection_id, "WebSocket client disconnected");
}
