// src/handlers/deals.rs

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
    models::deal::{
        CreateDealPayload, DealResponse, DealStage, DealStatus, MarkLostPayload, MarkWonPayload,
        MoveStagePayload, PipelineStageView, UpdateDealPayload,
    },
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListDealsParams {
    pub stage: Option<DealStage>,
    pub status: Option<DealStatus>,
}

#[utoipa::path(
    post,
    path = "/api/deals",
    tag = "Deals",
    request_body = CreateDealPayload,
    responses(
        (status = 201, description = "Negócio criado em prospecting", body = DealResponse),
        (status = 400, description = "Campos inválidos ou valor negativo"),
        (status = 404, description = "Contato não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_deal(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateDealPayload>,
) -> Result<(StatusCode, Json<DealResponse>), AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let deal = app_state.deal_service.create_deal(&user, &payload).await?;
    Ok((StatusCode::CREATED, Json(deal.into())))
}

#[utoipa::path(
    get,
    path = "/api/deals",
    tag = "Deals",
    params(ListDealsParams),
    responses(
        (status = 200, description = "Negócios visíveis ao usuário", body = Vec<DealResponse>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_deals(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(params): Query<ListDealsParams>,
) -> Result<Json<Vec<DealResponse>>, AppError> {
    let deals = app_state
        .deal_service
        .list_deals(&user, params.stage, params.status)
        .await?;

    Ok(Json(deals.into_iter().map(DealResponse::from).collect()))
}

// Visão de funil: negócios abertos agrupados por estágio com totais
#[utoipa::path(
    get,
    path = "/api/deals/pipeline",
    tag = "Deals",
    responses(
        (status = 200, description = "Funil com totais brutos e ponderados por estágio", body = Vec<PipelineStageView>)
    ),
    security(("api_jwt" = []))
)]
pub async fn pipeline(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<Vec<PipelineStageView>>, AppError> {
    let stages = app_state.deal_service.pipeline(&user).await?;
    Ok(Json(stages))
}

#[utoipa::path(
    get,
    path = "/api/deals/{id}",
    tag = "Deals",
    params(("id" = Uuid, Path, description = "ID do negócio")),
    responses(
        (status = 200, description = "Negócio encontrado", body = DealResponse),
        (status = 403, description = "Sem permissão"),
        (status = 404, description = "Negócio não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_deal(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DealResponse>, AppError> {
    let deal = app_state.deal_service.get_deal(&user, id).await?;
    Ok(Json(deal.into()))
}

#[utoipa::path(
    put,
    path = "/api/deals/{id}",
    tag = "Deals",
    params(("id" = Uuid, Path, description = "ID do negócio")),
    request_body = UpdateDealPayload,
    responses(
        (status = 200, description = "Negócio atualizado", body = DealResponse),
        (status = 403, description = "Sem permissão"),
        (status = 404, description = "Negócio não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_deal(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateDealPayload>,
) -> Result<Json<DealResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let deal = app_state.deal_service.update_deal(&user, id, &payload).await?;
    Ok(Json(deal.into()))
}

// Estágio desconhecido morre no serde com 422; aqui só chega enum válido
#[utoipa::path(
    post,
    path = "/api/deals/{id}/move-stage",
    tag = "Deals",
    params(("id" = Uuid, Path, description = "ID do negócio")),
    request_body = MoveStagePayload,
    responses(
        (status = 200, description = "Negócio movido; probabilidade da tabela aplicada", body = DealResponse),
        (status = 403, description = "Sem permissão"),
        (status = 404, description = "Negócio não encontrado"),
        (status = 409, description = "Negócio já fechado")
    ),
    security(("api_jwt" = []))
)]
pub async fn move_stage(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<MoveStagePayload>,
) -> Result<Json<DealResponse>, AppError> {
    let deal = app_state
        .deal_service
        .move_stage(&user, id, payload.stage)
        .await?;

    Ok(Json(deal.into()))
}

#[utoipa::path(
    post,
    path = "/api/deals/{id}/mark-won",
    tag = "Deals",
    params(("id" = Uuid, Path, description = "ID do negócio")),
    request_body = MarkWonPayload,
    responses(
        (status = 200, description = "Negócio fechado como ganho", body = DealResponse),
        (status = 403, description = "Sem permissão"),
        (status = 404, description = "Negócio não encontrado"),
        (status = 409, description = "Negócio já fechado")
    ),
    security(("api_jwt" = []))
)]
pub async fn mark_won(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<MarkWonPayload>,
) -> Result<Json<DealResponse>, AppError> {
    let deal = app_state
        .deal_service
        .mark_won(&user, id, payload.close_date)
        .await?;

    Ok(Json(deal.into()))
}

#[utoipa::path(
    post,
    path = "/api/deals/{id}/mark-lost",
    tag = "Deals",
    params(("id" = Uuid, Path, description = "ID do negócio")),
    request_body = MarkLostPayload,
    responses(
        (status = 200, description = "Negócio fechado como perdido", body = DealResponse),
        (status = 403, description = "Sem permissão"),
        (status = 404, description = "Negócio não encontrado"),
        (status = 409, description = "Negócio já fechado")
    ),
    security(("api_jwt" = []))
)]
pub async fn mark_lost(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<MarkLostPayload>,
) -> Result<Json<DealResponse>, AppError> {
    let deal = app_state
        .deal_service
        .mark_lost(&user, id, payload.reason, payload.close_date)
        .await?;

    Ok(Json(deal.into()))
}

#[utoipa::path(
    delete,
    path = "/api/deals/{id}",
    tag = "Deals",
    params(("id" = Uuid, Path, description = "ID do negócio")),
    responses(
        (status = 204, description = "Negócio e dependentes removidos"),
        (status = 403, description = "Sem permissão"),
        (status = 404, description = "Negócio não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_deal(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.deal_service.delete_deal(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
