//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    infrastructure::dto::{
        conversion::{to_room_detail, to_room_summary},
        http::{CreateRoomRequest, HealthDto, RoomDetailDto, RoomSummaryDto},
    },
    ui::state::AppState,
    usecase::{CreateRoomError, GetRoomDetailError},
};

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok".to_string(),
        connections: state.connect_participant_usecase.count_connections().await,
    })
}

/// Get the list of public rooms
pub async fn get_rooms(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<RoomSummaryDto>>, StatusCode> {
    match state.get_rooms_usecase.execute().await {
        Ok(rooms) => Ok(Json(
            rooms
                .into_iter()
                .map(|overview| to_room_summary(overview.room, overview.active_connections))
                .collect(),
        )),
        Err(e) => {
            tracing::error!("Failed to list rooms: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get room detail by ID
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    match state.get_room_detail_usecase.execute(room_id).await {
        Ok(overview) => Ok(Json(to_room_detail(
            overview.room,
            overview.active_connections,
        ))),
        Err(GetRoomDetailError::InvalidRoomId(_)) => Err(StatusCode::BAD_REQUEST),
        Err(GetRoomDetailError::RoomNotFound(_)) => Err(StatusCode::NOT_FOUND),
        Err(GetRoomDetailError::Directory(e)) => {
            tracing::error!("Failed to get room detail: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Create a room
pub async fn create_room(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateRoomRequest>,
) -> Result<(StatusCode, Json<RoomDetailDto>), StatusCode> {
    let is_public = request.is_public.unwrap_or(true);
    match state
        .create_room_usecase
        .execute(request.name, request.user_id, is_public)
        .await
    {
        Ok(room) => Ok((StatusCode::CREATED, Json(to_room_detail(room, 0)))),
        Err(
            e @ (CreateRoomError::EmptyName
            | CreateRoomError::NameTooLong { .. }
            | CreateRoomError::InvalidCreator(_)),
        ) => {
            tracing::info!("Rejected room creation: {}", e);
            Err(StatusCode::BAD_REQUEST)
        }
        Err(CreateRoomError::Directory(e)) => {
            tracing::error!("Failed to create room: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
