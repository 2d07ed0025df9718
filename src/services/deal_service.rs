// src/services/deal_service.rs

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ContactRepository, DealRepository, NotificationRepository},
    models::{
        auth::User,
        deal::{
            CreateDealPayload, Deal, DealResponse, DealStage, DealStatus, PipelineStageView,
            UpdateDealPayload,
        },
        notification::{NotificationPriority, NotificationType},
    },
};

// Estágios abertos do funil, na ordem da visão de pipeline.
const OPEN_STAGES: [DealStage; 4] = [
    DealStage::Prospecting,
    DealStage::Qualified,
    DealStage::Proposal,
    DealStage::Negotiation,
];

#[derive(Clone)]
pub struct DealService {
    deal_repo: DealRepository,
    contact_repo: ContactRepository,
    notification_repo: NotificationRepository,
    pool: PgPool,
}

impl DealService {
    pub fn new(
        deal_repo: DealRepository,
        contact_repo: ContactRepository,
        notification_repo: NotificationRepository,
        pool: PgPool,
    ) -> Self {
        Self { deal_repo, contact_repo, notification_repo, pool }
    }

    fn owner_scope(actor: &User) -> Option<Uuid> {
        if actor.is_admin() { None } else { Some(actor.id) }
    }

    pub async fn create_deal(
        &self,
        actor: &User,
        payload: &CreateDealPayload,
    ) -> Result<Deal, AppError> {
        if payload.value < Decimal::ZERO {
            return Err(AppError::NegativeDealValue);
        }

        // O contato precisa existir e ser visível para o autor
        let contact = self
            .contact_repo
            .find_by_id(payload.contact_id)
            .await?
            .ok_or(AppError::NotFound("Contato"))?;
        if !actor.can_edit(contact.owner_id) {
            return Err(AppError::Forbidden);
        }

        let deal = self.deal_repo.create_deal(&self.pool, actor.id, payload).await?;

        tracing::info!("Negócio criado: {} ({})", deal.title, deal.id);
        Ok(deal)
    }

    pub async fn get_deal(&self, actor: &User, id: Uuid) -> Result<Deal, AppError> {
        let deal = self
            .deal_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Negócio"))?;

        if !actor.can_edit(deal.owner_id) {
            return Err(AppError::Forbidden);
        }
        Ok(deal)
    }

    pub async fn list_deals(
        &self,
        actor: &User,
        stage: Option<DealStage>,
        status: Option<DealStatus>,
    ) -> Result<Vec<Deal>, AppError> {
        self.deal_repo
            .list(Self::owner_scope(actor), stage, status)
            .await
    }

    /// Visão de funil: negócios abertos agrupados por estágio, com o
    /// total bruto e o total ponderado de cada grupo.
    pub async fn pipeline(&self, actor: &User) -> Result<Vec<PipelineStageView>, AppError> {
        let open_deals = self.deal_repo.list_open(Self::owner_scope(actor)).await?;
        Ok(Self::group_pipeline(open_deals))
    }

    /// Agrupa os negócios abertos na ordem dos estágios e soma o valor
    /// bruto e o ponderado de cada grupo.
    fn group_pipeline(open_deals: Vec<Deal>) -> Vec<PipelineStageView> {
        let mut stages = Vec::with_capacity(OPEN_STAGES.len());
        for stage in OPEN_STAGES {
            let deals: Vec<DealResponse> = open_deals
                .iter()
                .filter(|d| d.stage == stage)
                .cloned()
                .map(DealResponse::from)
                .collect();

            let total_value = deals.iter().map(|d| d.deal.value).sum();
            let weighted_value = deals.iter().map(|d| d.weighted_value).sum();

            stages.push(PipelineStageView { stage, deals, total_value, weighted_value });
        }

        stages
    }

    pub async fn update_deal(
        &self,
        actor: &User,
        id: Uuid,
        payload: &UpdateDealPayload,
    ) -> Result<Deal, AppError> {
        if matches!(payload.value, Some(v) if v < Decimal::ZERO) {
            return Err(AppError::NegativeDealValue);
        }

        let existing = self.get_deal(actor, id).await?;

        self.deal_repo
            .update_deal(&self.pool, existing.id, payload)
            .await
    }

    /// Move o negócio para outro estágio do funil. A probabilidade vem
    /// da tabela fixa; estágios fechados também resolvem status e data.
    pub async fn move_stage(
        &self,
        actor: &User,
        id: Uuid,
        new_stage: DealStage,
    ) -> Result<Deal, AppError> {
        let mut deal = self.get_deal(actor, id).await?;

        if deal.status != DealStatus::Open {
            return Err(AppError::DealAlreadyClosed);
        }

        deal.move_to_stage(new_stage);
        let saved = self.save_transition(deal).await?;
        Ok(saved)
    }

    pub async fn mark_won(
        &self,
        actor: &User,
        id: Uuid,
        close_date: Option<chrono::NaiveDate>,
    ) -> Result<Deal, AppError> {
        let mut deal = self.get_deal(actor, id).await?;

        if deal.status != DealStatus::Open {
            return Err(AppError::DealAlreadyClosed);
        }

        deal.mark_as_won(close_date);
        let saved = self.save_transition(deal).await?;
        Ok(saved)
    }

    pub async fn mark_lost(
        &self,
        actor: &User,
        id: Uuid,
        reason: Option<String>,
        close_date: Option<chrono::NaiveDate>,
    ) -> Result<Deal, AppError> {
        let mut deal = self.get_deal(actor, id).await?;

        if deal.status != DealStatus::Open {
            return Err(AppError::DealAlreadyClosed);
        }

        deal.mark_as_lost(reason, close_date);
        let saved = self.save_transition(deal).await?;
        Ok(saved)
    }

    /// Persiste uma transição do funil e, quando o negócio fecha como
    /// ganho, notifica o dono na mesma transação.
    async fn save_transition(&self, deal: Deal) -> Result<Deal, AppError> {
        let mut tx = self.pool.begin().await?;

        let saved = self.deal_repo.save_stage(&mut *tx, &deal).await?;

        if saved.status == DealStatus::Won {
            self.notification_repo
                .create_notification(
                    &mut *tx,
                    saved.owner_id,
                    NotificationType::Success,
                    "Negócio ganho!",
                    &format!("O negócio '{}' foi fechado como ganho.", saved.title),
                    Some(&format!("/deals/{}", saved.id)),
                    NotificationPriority::High,
                )
                .await?;
        }

        tx.commit().await?;

        tracing::info!(
            "Negócio {} agora em {:?} ({:?})",
            saved.id,
            saved.stage,
            saved.status
        );
        Ok(saved)
    }

    pub async fn delete_deal(&self, actor: &User, id: Uuid) -> Result<(), AppError> {
        let deal = self.get_deal(actor, id).await?;

        let mut tx = self.pool.begin().await?;
        self.deal_repo.delete_children(&mut tx, deal.id).await?;
        self.deal_repo.delete_deal(&mut *tx, deal.id).await?;
        tx.commit().await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn negocio_em(stage: DealStage, value: i64) -> Deal {
        Deal {
            id: Uuid::new_v4(),
            title: "Licenças anuais".into(),
            description: None,
            value: Decimal::from(value),
            currency: "BRL".into(),
            stage,
            probability: stage.default_probability(),
            status: DealStatus::Open,
            contact_id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            expected_close_date: None,
            actual_close_date: None,
            source: None,
            lost_reason: None,
            products: None,
            competitors: None,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn funil_agrupa_por_estagio_e_soma_totais() {
        let abertos = vec![
            negocio_em(DealStage::Prospecting, 1_000),
            negocio_em(DealStage::Prospecting, 2_000),
            negocio_em(DealStage::Qualified, 100_000),
            negocio_em(DealStage::Negotiation, 10_000),
        ];

        let funil = DealService::group_pipeline(abertos);

        assert_eq!(funil.len(), 4);
        assert_eq!(funil[0].stage, DealStage::Prospecting);
        assert_eq!(funil[0].deals.len(), 2);
        assert_eq!(funil[0].total_value, Decimal::from(3_000));
        assert_eq!(funil[0].weighted_value, Decimal::from(300)); // 10%

        assert_eq!(funil[1].stage, DealStage::Qualified);
        assert_eq!(funil[1].total_value, Decimal::from(100_000));
        assert_eq!(funil[1].weighted_value, Decimal::from(25_000)); // 25%

        assert_eq!(funil[3].stage, DealStage::Negotiation);
        assert_eq!(funil[3].weighted_value, Decimal::from(7_500)); // 75%
    }

    #[test]
    fn estagio_sem_negocios_aparece_zerado() {
        let funil = DealService::group_pipeline(vec![negocio_em(DealStage::Proposal, 5_000)]);

        assert_eq!(funil[0].stage, DealStage::Prospecting);
        assert!(funil[0].deals.is_empty());
        assert_eq!(funil[0].total_value, Decimal::ZERO);
        assert_eq!(funil[0].weighted_value, Decimal::ZERO);

        assert_eq!(funil[2].stage, DealStage::Proposal);
        assert_eq!(funil[2].weighted_value, Decimal::from(2_500)); // 50%
    }
}
