// src/handlers/notes.rs

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::note::{CreateNotePayload, Note},
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListNotesParams {
    pub contact_id: Option<Uuid>,
    pub lead_id: Option<Uuid>,
    pub deal_id: Option<Uuid>,
}

#[utoipa::path(
    post,
    path = "/api/notes",
    tag = "Notes",
    request_body = CreateNotePayload,
    responses(
        (status = 201, description = "Nota criada", body = Note),
        (status = 400, description = "Campos inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_note(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateNotePayload>,
) -> Result<(StatusCode, Json<Note>), AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let note = app_state.note_service.create_note(&user, &payload).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

#[utoipa::path(
    get,
    path = "/api/notes",
    tag = "Notes",
    params(ListNotesParams),
    responses(
        (status = 200, description = "Notas do próprio usuário no registro informado, fixadas primeiro", body = Vec<Note>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_notes(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(params): Query<ListNotesParams>,
) -> Result<Json<Vec<Note>>, AppError> {
    let notes = app_state
        .note_service
        .list_notes(&user, params.contact_id, params.lead_id, params.deal_id)
        .await?;

    Ok(Json(notes))
}
