// src/handlers/leads.rs

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
    models::{
        contact::ContactResponse,
        lead::{
            CreateLeadPayload, LeadResponse, LeadStatus, LeadTemperature, ScoreResponse,
            UpdateLeadPayload, UpdateScorePayload,
        },
    },
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListLeadsParams {
    pub status: Option<LeadStatus>,
    pub temperature: Option<LeadTemperature>,
}

#[utoipa::path(
    post,
    path = "/api/leads",
    tag = "Leads",
    request_body = CreateLeadPayload,
    responses(
        (status = 201, description = "Lead criado", body = LeadResponse),
        (status = 400, description = "Campos inválidos"),
        (status = 409, description = "E-mail já em uso")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_lead(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateLeadPayload>,
) -> Result<(StatusCode, Json<LeadResponse>), AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let lead = app_state.lead_service.create_lead(&user, &payload).await?;
    Ok((StatusCode::CREATED, Json(lead.into())))
}

#[utoipa::path(
    get,
    path = "/api/leads",
    tag = "Leads",
    params(ListLeadsParams),
    responses(
        (status = 200, description = "Leads visíveis ao usuário, maiores scores primeiro", body = Vec<LeadResponse>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_leads(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(params): Query<ListLeadsParams>,
) -> Result<Json<Vec<LeadResponse>>, AppError> {
    let leads = app_state
        .lead_service
        .list_leads(&user, params.status, params.temperature)
        .await?;

    Ok(Json(leads.into_iter().map(LeadResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/leads/{id}",
    tag = "Leads",
    params(("id" = Uuid, Path, description = "ID do lead")),
    responses(
        (status = 200, description = "Lead encontrado", body = LeadResponse),
        (status = 403, description = "Sem permissão"),
        (status = 404, description = "Lead não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_lead(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<LeadResponse>, AppError> {
    let lead = app_state.lead_service.get_lead(&user, id).await?;
    Ok(Json(lead.into()))
}

#[utoipa::path(
    put,
    path = "/api/leads/{id}",
    tag = "Leads",
    params(("id" = Uuid, Path, description = "ID do lead")),
    request_body = UpdateLeadPayload,
    responses(
        (status = 200, description = "Lead atualizado", body = LeadResponse),
        (status = 403, description = "Sem permissão"),
        (status = 404, description = "Lead não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_lead(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateLeadPayload>,
) -> Result<Json<LeadResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let lead = app_state.lead_service.update_lead(&user, id, &payload).await?;
    Ok(Json(lead.into()))
}

// Aplica um delta de pontuação e devolve o score/temperatura resultantes
#[utoipa::path(
    post,
    path = "/api/leads/{id}/score",
    tag = "Leads",
    params(("id" = Uuid, Path, description = "ID do lead")),
    request_body = UpdateScorePayload,
    responses(
        (status = 200, description = "Score ajustado (saturado em 0..100)", body = ScoreResponse),
        (status = 403, description = "Sem permissão"),
        (status = 404, description = "Lead não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_score(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateScorePayload>,
) -> Result<Json<ScoreResponse>, AppError> {
    let score = app_state
        .lead_service
        .update_score(&user, id, payload.points)
        .await?;

    Ok(Json(score))
}

#[utoipa::path(
    post,
    path = "/api/leads/{id}/convert",
    tag = "Leads",
    params(("id" = Uuid, Path, description = "ID do lead")),
    responses(
        (status = 201, description = "Lead convertido; devolve o contato criado", body = ContactResponse),
        (status = 403, description = "Sem permissão"),
        (status = 404, description = "Lead não encontrado"),
        (status = 409, description = "Lead já convertido")
    ),
    security(("api_jwt" = []))
)]
pub async fn convert_lead(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<ContactResponse>), AppError> {
    let contact = app_state.lead_service.convert_lead(&user, id).await?;
    Ok((StatusCode::CREATED, Json(contact.into())))
}

#[utoipa::path(
    delete,
    path = "/api/leads/{id}",
    tag = "Leads",
    params(("id" = Uuid, Path, description = "ID do lead")),
    responses(
        (status = 204, description = "Lead e dependentes removidos"),
        (status = 403, description = "Sem permissão"),
        (status = 404, description = "Lead não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_lead(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.lead_service.delete_lead(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
