// src/handlers/activities.rs

use axum::{
    Json,
    extract::{Path, Query, State},
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
    models::activity::{ActivityResponse, CompleteActivityPayload, CreateActivityPayload},
};

const DEFAULT_LIMIT: i64 = 50;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListActivitiesParams {
    pub limit: Option<i64>,
}

#[utoipa::path(
    post,
    path = "/api/activities",
    tag = "Activities",
    request_body = CreateActivityPayload,
    responses(
        (status = 201, description = "Atividade registrada", body = ActivityResponse),
        (status = 400, description = "Campos inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_activity(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateActivityPayload>,
) -> Result<(StatusCode, Json<ActivityResponse>), AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let activity = app_state
        .activity_service
        .create_activity(&user, &payload)
        .await?;

    Ok((StatusCode::CREATED, Json(activity.into())))
}

#[utoipa::path(
    get,
    path = "/api/activities",
    tag = "Activities",
    params(ListActivitiesParams),
    responses(
        (status = 200, description = "Linha do tempo de atividades, mais recentes primeiro", body = Vec<ActivityResponse>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_activities(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(params): Query<ListActivitiesParams>,
) -> Result<Json<Vec<ActivityResponse>>, AppError> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
    let activities = app_state.activity_service.list_activities(&user, limit).await?;

    Ok(Json(activities.into_iter().map(ActivityResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/api/activities/{id}/complete",
    tag = "Activities",
    params(("id" = Uuid, Path, description = "ID da atividade")),
    request_body = CompleteActivityPayload,
    responses(
        (status = 200, description = "Atividade concluída", body = ActivityResponse),
        (status = 403, description = "Sem permissão"),
        (status = 404, description = "Atividade não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn complete_activity(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CompleteActivityPayload>,
) -> Result<Json<ActivityResponse>, AppError> {
    let activity = app_state
        .activity_service
        .complete_activity(&user, id, payload.outcome)
        .await?;

    Ok(Json(activity.into()))
}
