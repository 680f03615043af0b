use std::sync::Arc;

use axum::{
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    extract::Extension,
    response::IntoResponse,
};
use tracing::{debug, info, warn};

use crate::models::chat::{ClientEvent, ErrorInfo, ServerEvent, SessionId};
use crate::services::conversation::SessionRegistry;
use crate::services::RelayService;

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Extension(registry): Extension<SessionRegistry>,
    Extension(relay): Extension<Arc<RelayService>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, registry, relay))
}

/// Per-connection loop. Frames are handled strictly in order: the next
/// frame is read only after the current relay cycle completes, so turns
/// append in receipt order and the provider call stays the single
/// suspension point of a cycle.
async fn handle_socket(mut socket: WebSocket, registry: SessionRegistry, relay: Arc<RelayService>) {
    let session_id = SessionId::new_v4();
    let conversation = registry.register(session_id);

    info!(%session_id, "A new user connected");

    while let Some(frame) = socket.recv().await {
        let message = match frame {
            Ok(message) => message,
            Err(e) => {
                warn!(%session_id, error = %e, "WebSocket read error");
                break;
            }
        };

        match message {
            Message::Text(text) => {
                let event = match serde_json::from_str::<ClientEvent>(&text) {
                    Ok(event) => event,
                    Err(e) => {
                        debug!(%session_id, error = %e, "Unparseable client event");
                        let error = ServerEvent::Error(ErrorInfo {
                            code: "BAD_EVENT".to_string(),
                            message: format!("Unparseable event: {}", e),
                        });
                        if send_event(&mut socket, &error).await.is_err() {
                            break;
                        }
                        continue;
                    }
                };

                let ClientEvent::UserMessage { prompt } = event;
                debug!(%session_id, prompt_len = prompt.len(), "Received user message");

                let reply = match relay
                    .handle_user_message(session_id, &conversation, &prompt)
                    .await
                {
                    Ok(reply) => ServerEvent::ModelReply(reply),
                    Err(e) => ServerEvent::Error(e.to_error_info()),
                };

                if send_event(&mut socket, &reply).await.is_err() {
                    warn!(%session_id, "Failed to deliver reply, closing");
                    break;
                }
            }
            Message::Close(_) => break,
            // Ping/Pong are answered by the protocol layer; binary frames
            // carry no event semantics
            _ => {}
        }
    }

    registry.deregister(session_id);
    info!(%session_id, "User disconnected");
}

async fn send_event(socket: &mut WebSocket, event: &ServerEvent) -> Result<(), axum::Error> {
    let payload = serde_json::to_string(event).unwrap_or_else(|_| "{}".to_string());
    socket.send(Message::Text(payload.into())).await
}
