// src/handlers/contacts.rs

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
    models::contact::{ContactResponse, ContactStatus, CreateContactPayload, UpdateContactPayload},
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListContactsParams {
    pub status: Option<ContactStatus>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchParams {
    pub q: String,
}

#[utoipa::path(
    post,
    path = "/api/contacts",
    tag = "Contacts",
    request_body = CreateContactPayload,
    responses(
        (status = 201, description = "Contato criado", body = ContactResponse),
        (status = 400, description = "Campos inválidos"),
        (status = 409, description = "E-mail já em uso")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_contact(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateContactPayload>,
) -> Result<(StatusCode, Json<ContactResponse>), AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let contact = app_state.contact_service.create_contact(&user, &payload).await?;
    Ok((StatusCode::CREATED, Json(contact.into())))
}

#[utoipa::path(
    get,
    path = "/api/contacts",
    tag = "Contacts",
    params(ListContactsParams),
    responses(
        (status = 200, description = "Contatos visíveis ao usuário", body = Vec<ContactResponse>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_contacts(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(params): Query<ListContactsParams>,
) -> Result<Json<Vec<ContactResponse>>, AppError> {
    let contacts = app_state
        .contact_service
        .list_contacts(&user, params.status)
        .await?;

    Ok(Json(contacts.into_iter().map(ContactResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/contacts/search",
    tag = "Contacts",
    params(SearchParams),
    responses(
        (status = 200, description = "Contatos que casam com o termo", body = Vec<ContactResponse>)
    ),
    security(("api_jwt" = []))
)]
pub async fn search_contacts(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<ContactResponse>>, AppError> {
    let contacts = app_state
        .contact_service
        .search_contacts(&user, &params.q)
        .await?;

    Ok(Json(contacts.into_iter().map(ContactResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/contacts/{id}",
    tag = "Contacts",
    params(("id" = Uuid, Path, description = "ID do contato")),
    responses(
        (status = 200, description = "Contato encontrado", body = ContactResponse),
        (status = 403, description = "Sem permissão"),
        (status = 404, description = "Contato não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_contact(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ContactResponse>, AppError> {
    let contact = app_state.contact_service.get_contact(&user, id).await?;
    Ok(Json(contact.into()))
}

#[utoipa::path(
    put,
    path = "/api/contacts/{id}",
    tag = "Contacts",
    params(("id" = Uuid, Path, description = "ID do contato")),
    request_body = UpdateContactPayload,
    responses(
        (status = 200, description = "Contato atualizado", body = ContactResponse),
        (status = 403, description = "Sem permissão"),
        (status = 404, description = "Contato não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_contact(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateContactPayload>,
) -> Result<Json<ContactResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let contact = app_state
        .contact_service
        .update_contact(&user, id, &payload)
        .await?;

    Ok(Json(contact.into()))
}

#[utoipa::path(
    delete,
    path = "/api/contacts/{id}",
    tag = "Contacts",
    params(("id" = Uuid, Path, description = "ID do contato")),
    responses(
        (status = 204, description = "Contato e dependentes removidos"),
        (status = 403, description = "Sem permissão"),
        (status = 404, description = "Contato não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_contact(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.contact_service.delete_contact(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
