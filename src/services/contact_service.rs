// src/services/contact_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ContactRepository, DealRepository, LeadRepository},
    models::{
        auth::User,
        contact::{Contact, ContactStatus, CreateContactPayload, UpdateContactPayload},
    },
};

#[derive(Clone)]
pub struct ContactService {
    contact_repo: ContactRepository,
    deal_repo: DealRepository,
    lead_repo: LeadRepository,
    pool: PgPool,
}

impl ContactService {
    pub fn new(
        contact_repo: ContactRepository,
        deal_repo: DealRepository,
        lead_repo: LeadRepository,
        pool: PgPool,
    ) -> Self {
        Self { contact_repo, deal_repo, lead_repo, pool }
    }

    /// Escopo de visibilidade: admin enxerga todos os registros, os
    /// demais só os próprios.
    fn owner_scope(actor: &User) -> Option<Uuid> {
        if actor.is_admin() { None } else { Some(actor.id) }
    }

    pub async fn create_contact(
        &self,
        actor: &User,
        payload: &CreateContactPayload,
    ) -> Result<Contact, AppError> {
        let contact = self
            .contact_repo
            .create_contact(&self.pool, actor.id, payload)
            .await?;

        tracing::info!("Contato criado: {} ({})", contact.full_name(), contact.id);
        Ok(contact)
    }

    pub async fn get_contact(&self, actor: &User, id: Uuid) -> Result<Contact, AppError> {
        let contact = self
            .contact_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Contato"))?;

        if !actor.can_edit(contact.owner_id) {
            return Err(AppError::Forbidden);
        }
        Ok(contact)
    }

    pub async fn list_contacts(
        &self,
        actor: &User,
        status: Option<ContactStatus>,
    ) -> Result<Vec<Contact>, AppError> {
        self.contact_repo.list(Self::owner_scope(actor), status).await
    }

    pub async fn search_contacts(&self, actor: &User, query: &str) -> Result<Vec<Contact>, AppError> {
        self.contact_repo
            .search(Self::owner_scope(actor), query)
            .await
    }

    pub async fn update_contact(
        &self,
        actor: &User,
        id: Uuid,
        payload: &UpdateContactPayload,
    ) -> Result<Contact, AppError> {
        let existing = self.get_contact(actor, id).await?;

        self.contact_repo
            .update_contact(&self.pool, existing.id, payload)
            .await
    }

    /// Exclusão com cascata explícita, numa transação só: primeiro os
    /// filhos de cada negócio do contato, depois os negócios, depois os
    /// filhos diretos do contato, a referência de conversão dos leads e
    /// por fim o contato.
    pub async fn delete_contact(&self, actor: &User, id: Uuid) -> Result<(), AppError> {
        let contact = self.get_contact(actor, id).await?;

        let mut tx = self.pool.begin().await?;

        let deal_ids = self.deal_repo.list_ids_by_contact(&mut tx, contact.id).await?;
        for deal_id in deal_ids {
            self.deal_repo.delete_children(&mut tx, deal_id).await?;
            self.deal_repo.delete_deal(&mut *tx, deal_id).await?;
        }

        self.contact_repo.delete_children(&mut tx, contact.id).await?;
        self.lead_repo.clear_converted_reference(&mut tx, contact.id).await?;
        self.contact_repo.delete_contact(&mut *tx, contact.id).await?;

        tx.commit().await?;

        tracing::info!("Contato removido com cascata: {}", contact.id);
        Ok(())
    }
}
