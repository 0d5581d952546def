//! WebSocket connection handlers.
//!
//! Each socket gets a fresh `ConnectionId` and two tasks: the pusher loop
//! forwards queued frames to the socket, the receive loop parses client
//! events and dispatches them to the use cases. When either ends the other is
//! aborted and the connection is cleaned up.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, DomainError, RoomId, UserId},
    infrastructure::dto::websocket::{ClientEvent, RoomInviteRequest},
    ui::state::AppState,
    usecase::RoomInvite,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that forwards queued frames to the WebSocket sink.
///
/// The loop ends when the socket rejects a frame or when every sender of the
/// channel is dropped (the connection was unregistered).
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let connection_id = state.connect_participant_usecase.execute(tx).await;

    let (sender, mut receiver) = socket.split();

    let state_clone = state.clone();
    let connection_id_clone = connection_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!(connection_id = %connection_id_clone, "WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => match serde_json::from_str::<ClientEvent>(&text) {
                    Ok(event) => dispatch(&state_clone, &connection_id_clone, event).await,
                    Err(e) => {
                        tracing::warn!(
                            connection_id = %connection_id_clone,
                            "Ignoring malformed event: {}",
                            e
                        );
                    }
                },
                Message::Ping(_) => {
                    tracing::debug!(connection_id = %connection_id_clone, "Received ping");
                }
                Message::Close(_) => {
                    tracing::info!(connection_id = %connection_id_clone, "Client requested close");
                    break;
                }
                _ => {}
            }
        }
    });

    let mut send_task = pusher_loop(rx, sender);

    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    let session = state
        .disconnect_participant_usecase
        .execute(connection_id.clone())
        .await;
    tracing::debug!(
        connection_id = %connection_id,
        user_id = ?session.user_id,
        room_id = ?session.room_id,
        "Socket closed"
    );
}

/// Route one client event to its use case
async fn dispatch(state: &AppState, connection_id: &ConnectionId, event: ClientEvent) {
    match event {
        ClientEvent::UserOnline(payload) => {
            let (user_id, username) = payload.into_parts();
            let Some(user_id) = parse_id::<UserId>(user_id, "userId") else {
                return;
            };
            state
                .identify_user_usecase
                .execute(connection_id, user_id, username)
                .await;
        }
        ClientEvent::JoinRoom(request) => {
            let Some(room_id) = parse_id::<RoomId>(request.room_id, "roomId") else {
                return;
            };
            let user_id = request
                .user_id
                .and_then(|id| parse_id::<UserId>(id, "userId"));
            state
                .join_room_usecase
                .execute(connection_id, user_id, room_id)
                .await;
        }
        ClientEvent::LeaveRoom(request) => {
            let Some(room_id) = parse_id::<RoomId>(request.room_id, "roomId") else {
                return;
            };
            let user_id = request
                .user_id
                .and_then(|id| parse_id::<UserId>(id, "userId"));
            state
                .leave_room_usecase
                .execute(connection_id, user_id, &room_id)
                .await;
        }
        ClientEvent::Draw(request) => {
            let Some(room_id) = parse_id::<RoomId>(request.room_id.clone(), "roomId") else {
                return;
            };
            state
                .relay_event_usecase
                .draw(connection_id, &room_id, request.into())
                .await;
        }
        ClientEvent::MouseMove(request) => {
            let Some(room_id) = parse_id::<RoomId>(request.room_id, "roomId") else {
                return;
            };
            state
                .relay_event_usecase
                .cursor(connection_id, &room_id, request.x, request.y, request.username)
                .await;
        }
        ClientEvent::ClearCanvas(room_id) => {
            let Some(room_id) = parse_id::<RoomId>(room_id, "roomId") else {
                return;
            };
            state
                .relay_event_usecase
                .clear_canvas(connection_id, &room_id)
                .await;
        }
        ClientEvent::RoomMessage(request) => {
            let Some(room_id) = parse_id::<RoomId>(request.room_id, "roomId") else {
                return;
            };
            state
                .relay_event_usecase
                .room_message(connection_id, &room_id, request.username, request.message)
                .await;
        }
        ClientEvent::ChangeTheme(request) => {
            let Some(room_id) = parse_id::<RoomId>(request.room_id, "roomId") else {
                return;
            };
            state
                .relay_event_usecase
                .change_theme(connection_id, &room_id, request.theme)
                .await;
        }
        ClientEvent::MusicSync(payload) => {
            let Some(room_id) = parse_id::<RoomId>(payload.room_id, "roomId") else {
                return;
            };
            state
                .relay_event_usecase
                .music_sync(connection_id, &room_id, payload.state)
                .await;
        }
        ClientEvent::SendRoomInvite(request) => {
            let Some(invite) = to_room_invite(request) else {
                return;
            };
            state.send_room_invite_usecase.execute(invite).await;
        }
        ClientEvent::RoomDeleted(request) => {
            let Some(room_id) = parse_id::<RoomId>(request.room_id, "roomId") else {
                return;
            };
            if let Err(e) = state
                .delete_room_usecase
                .execute(connection_id, &room_id)
                .await
            {
                tracing::warn!(
                    connection_id = %connection_id,
                    room_id = %room_id,
                    "Room deletion rejected: {}",
                    e
                );
            }
        }
    }
}

/// Convert a wire id into a domain id, logging and dropping invalid ones
fn parse_id<T>(value: String, field: &'static str) -> Option<T>
where
    T: TryFrom<String, Error = DomainError>,
{
    match T::try_from(value) {
        Ok(id) => Some(id),
        Err(e) => {
            tracing::warn!(field, "Ignoring event with invalid id: {}", e);
            None
        }
    }
}

fn to_room_invite(request: RoomInviteRequest) -> Option<RoomInvite> {
    Some(RoomInvite {
        from_user_id: parse_id(request.from_user_id, "fromUserId")?,
        from_username: request.from_username,
        to_user_id: parse_id(request.to_user_id, "toUserId")?,
        room_id: parse_id(request.room_id, "roomId")?,
        room_name: request.room_name,
    })
}
