// src/handlers/notifications.rs

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::notification::{NotificationPriority, NotificationResponse, NotificationType},
    services::dispatch::BulkSendReport,
};

const DEFAULT_LIMIT: i64 = 20;

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListNotificationsParams {
    #[serde(default)]
    pub unread_only: bool,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkAllReadResponse {
    pub marked: u64,
}

// Comunicado enviado pelo admin para vários usuários de uma vez
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastPayload {
    #[validate(length(min = 1, message = "Informe ao menos um destinatário."))]
    pub user_ids: Vec<Uuid>,
    pub notification_type: NotificationType,
    #[validate(length(min = 1, message = "O título é obrigatório."))]
    pub title: String,
    #[validate(length(min = 1, message = "A mensagem é obrigatória."))]
    pub message: String,
    pub priority: Option<NotificationPriority>,
}

#[utoipa::path(
    get,
    path = "/api/notifications",
    tag = "Notifications",
    params(ListNotificationsParams),
    responses(
        (status = 200, description = "Notificações do usuário, mais recentes primeiro", body = Vec<NotificationResponse>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_notifications(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(params): Query<ListNotificationsParams>,
) -> Result<Json<Vec<NotificationResponse>>, AppError> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
    let notifications = app_state
        .notification_service
        .list_notifications(&user, params.unread_only, limit)
        .await?;

    Ok(Json(
        notifications
            .into_iter()
            .map(NotificationResponse::from)
            .collect(),
    ))
}

#[utoipa::path(
    post,
    path = "/api/notifications/{id}/read",
    tag = "Notifications",
    params(("id" = Uuid, Path, description = "ID da notificação")),
    responses(
        (status = 200, description = "Notificação marcada como lida", body = NotificationResponse),
        (status = 403, description = "Notificação de outro usuário"),
        (status = 404, description = "Notificação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn mark_read(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<NotificationResponse>, AppError> {
    let notification = app_state.notification_service.mark_read(&user, id).await?;
    Ok(Json(notification.into()))
}

#[utoipa::path(
    post,
    path = "/api/notifications/read-all",
    tag = "Notifications",
    responses(
        (status = 200, description = "Todas as notificações marcadas como lidas", body = MarkAllReadResponse)
    ),
    security(("api_jwt" = []))
)]
pub async fn mark_all_read(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<MarkAllReadResponse>, AppError> {
    let marked = app_state.notification_service.mark_all_read(&user).await?;
    Ok(Json(MarkAllReadResponse { marked }))
}

#[utoipa::path(
    post,
    path = "/api/notifications/broadcast",
    tag = "Notifications",
    request_body = BroadcastPayload,
    responses(
        (status = 200, description = "Placar de entregas do canal externo", body = BulkSendReport),
        (status = 403, description = "Apenas administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn broadcast(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<BroadcastPayload>,
) -> Result<Json<BulkSendReport>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    if !user.is_admin() {
        return Err(AppError::Forbidden);
    }

    let report = app_state
        .notification_service
        .broadcast(
            &payload.user_ids,
            payload.notification_type,
            &payload.title,
            &payload.message,
            payload.priority.unwrap_or(NotificationPriority::Normal),
        )
        .await?;

    Ok(Json(report))
}
