// src/services/lead_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ActivityRepository, ContactRepository, LeadRepository},
    models::{
        activity::ActivityType,
        auth::User,
        contact::Contact,
        lead::{
            CreateLeadPayload, Lead, LeadStatus, LeadTemperature, ScoreResponse, UpdateLeadPayload,
        },
    },
};

#[derive(Clone)]
pub struct LeadService {
    lead_repo: LeadRepository,
    contact_repo: ContactRepository,
    activity_repo: ActivityRepository,
    pool: PgPool,
}

impl LeadService {
    pub fn new(
        lead_repo: LeadRepository,
        contact_repo: ContactRepository,
        activity_repo: ActivityRepository,
        pool: PgPool,
    ) -> Self {
        Self { lead_repo, contact_repo, activity_repo, pool }
    }

    fn owner_scope(actor: &User) -> Option<Uuid> {
        if actor.is_admin() { None } else { Some(actor.id) }
    }

    pub async fn create_lead(
        &self,
        actor: &User,
        payload: &CreateLeadPayload,
    ) -> Result<Lead, AppError> {
        let lead = self.lead_repo.create_lead(&self.pool, actor.id, payload).await?;

        tracing::info!("Lead criado: {} ({})", lead.full_name(), lead.id);
        Ok(lead)
    }

    pub async fn get_lead(&self, actor: &User, id: Uuid) -> Result<Lead, AppError> {
        let lead = self
            .lead_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Lead"))?;

        if !actor.can_edit(lead.owner_id) {
            return Err(AppError::Forbidden);
        }
        Ok(lead)
    }

    pub async fn list_leads(
        &self,
        actor: &User,
        status: Option<LeadStatus>,
        temperature: Option<LeadTemperature>,
    ) -> Result<Vec<Lead>, AppError> {
        self.lead_repo
            .list(Self::owner_scope(actor), status, temperature)
            .await
    }

    pub async fn update_lead(
        &self,
        actor: &User,
        id: Uuid,
        payload: &UpdateLeadPayload,
    ) -> Result<Lead, AppError> {
        let existing = self.get_lead(actor, id).await?;

        self.lead_repo
            .update_lead(&self.pool, existing.id, payload)
            .await
    }

    /// Aplica um delta de pontuação (positivo ou negativo) ao lead. O
    /// score satura em [0, 100] e a temperatura é recalculada junto.
    pub async fn update_score(
        &self,
        actor: &User,
        id: Uuid,
        points: i32,
    ) -> Result<ScoreResponse, AppError> {
        let mut lead = self.get_lead(actor, id).await?;

        lead.update_score(points);
        self.lead_repo
            .save_score(&self.pool, lead.id, lead.score, lead.temperature)
            .await?;

        tracing::debug!(
            "Score do lead {} ajustado em {points}: agora {}",
            lead.id,
            lead.score
        );

        Ok(ScoreResponse {
            score: lead.score,
            temperature: lead.temperature,
            is_qualified: lead.is_qualified(),
        })
    }

    /// Converte o lead em contato. Operação única: cria o contato,
    /// marca o lead como convertido e registra a atividade de
    /// auditoria, tudo na mesma transação. Um lead já convertido é
    /// rejeitado com 409 sem tocar no banco.
    pub async fn convert_lead(&self, actor: &User, id: Uuid) -> Result<Contact, AppError> {
        let mut lead = self.get_lead(actor, id).await?;

        if lead.status == LeadStatus::Converted {
            return Err(AppError::LeadAlreadyConverted);
        }

        let mut tx = self.pool.begin().await?;

        let contact = self
            .contact_repo
            .create_from_lead(
                &mut *tx,
                lead.owner_id,
                &lead.first_name,
                &lead.last_name,
                &lead.email,
                lead.phone.as_deref(),
                lead.company.as_deref(),
                lead.job_title.as_deref(),
                lead.source.as_deref(),
                lead.notes.as_deref(),
            )
            .await?;

        lead.convert_to_contact(contact.id)?;
        self.lead_repo.save_conversion(&mut *tx, &lead).await?;

        self.activity_repo
            .log_completed(
                &mut *tx,
                ActivityType::Note,
                "Lead convertido",
                &format!("Lead {} convertido em contato.", lead.full_name()),
                actor.id,
                Some(contact.id),
                Some(lead.id),
                None,
            )
            .await?;

        tx.commit().await?;

        tracing::info!("Lead {} convertido no contato {}", lead.id, contact.id);
        Ok(contact)
    }

    pub async fn delete_lead(&self, actor: &User, id: Uuid) -> Result<(), AppError> {
        let lead = self.get_lead(actor, id).await?;

        let mut tx = self.pool.begin().await?;
        self.lead_repo.delete_children(&mut tx, lead.id).await?;
        self.lead_repo.delete_lead(&mut *tx, lead.id).await?;
        tx.commit().await?;

        Ok(())
    }
}
