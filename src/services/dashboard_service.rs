// src/services/dashboard_service.rs

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ActivityRepository, ContactRepository, DealRepository, LeadRepository, TaskRepository},
    models::{
        activity::ActivityResponse,
        auth::User,
        deal::DealStatus,
        lead::{LeadResponse, LeadStatus},
        task::{TaskResponse, TaskStatus},
    },
};

const HOT_LEADS_LIMIT: i64 = 5;
const OVERDUE_TASKS_LIMIT: i64 = 5;
const RECENT_ACTIVITIES_LIMIT: i64 = 10;

/// Resumo exibido na tela inicial: contadores, valor de pipeline e as
/// listas de atenção (leads quentes, tarefas atrasadas, atividades).
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_contacts: i64,
    pub total_leads: i64,
    pub new_leads: i64,
    pub qualified_leads: i64,

    pub open_deals: i64,
    pub won_deals: i64,
    pub lost_deals: i64,
    #[schema(value_type = f64)]
    pub pipeline_value: Decimal,
    pub monthly_won_deals: i64,
    #[schema(value_type = f64)]
    pub monthly_revenue: Decimal,

    pub pending_tasks: i64,

    pub hot_leads: Vec<LeadResponse>,
    pub overdue_tasks: Vec<TaskResponse>,
    pub recent_activities: Vec<ActivityResponse>,
}

#[derive(Clone)]
pub struct DashboardService {
    contact_repo: ContactRepository,
    lead_repo: LeadRepository,
    deal_repo: DealRepository,
    task_repo: TaskRepository,
    activity_repo: ActivityRepository,
}

impl DashboardService {
    pub fn new(
        contact_repo: ContactRepository,
        lead_repo: LeadRepository,
        deal_repo: DealRepository,
        task_repo: TaskRepository,
        activity_repo: ActivityRepository,
    ) -> Self {
        Self { contact_repo, lead_repo, deal_repo, task_repo, activity_repo }
    }

    /// Nos relatórios, manager enxerga a visão global junto com admin.
    fn owner_scope(actor: &User) -> Option<Uuid> {
        if actor.is_manager() { None } else { Some(actor.id) }
    }

    pub async fn stats(&self, actor: &User) -> Result<DashboardStats, AppError> {
        let scope = Self::owner_scope(actor);

        let total_contacts = self.contact_repo.count(scope).await?;
        let total_leads = self.lead_repo.count(scope).await?;
        let new_leads = self.lead_repo.count_by_status(scope, LeadStatus::New).await?;
        let qualified_leads = self
            .lead_repo
            .count_by_status(scope, LeadStatus::Qualified)
            .await?;

        let open_deals = self.deal_repo.count_by_status(scope, DealStatus::Open).await?;
        let won_deals = self.deal_repo.count_by_status(scope, DealStatus::Won).await?;
        let lost_deals = self.deal_repo.count_by_status(scope, DealStatus::Lost).await?;
        let pipeline_value = self.deal_repo.open_pipeline_value(scope).await?;
        let (monthly_won_deals, monthly_revenue) = self.deal_repo.monthly_won(scope).await?;

        // Tarefas são sempre pessoais, mesmo para manager
        let task_scope = if actor.is_admin() { None } else { Some(actor.id) };
        let pending_tasks = self
            .task_repo
            .count_by_status(task_scope, TaskStatus::Pending)
            .await?;

        let hot_leads = self
            .lead_repo
            .hot_leads(scope, HOT_LEADS_LIMIT)
            .await?
            .into_iter()
            .map(LeadResponse::from)
            .collect();

        let overdue_tasks = self
            .task_repo
            .overdue(task_scope, OVERDUE_TASKS_LIMIT)
            .await?
            .into_iter()
            .map(TaskResponse::from)
            .collect();

        let recent_activities = self
            .activity_repo
            .list(scope, RECENT_ACTIVITIES_LIMIT)
            .await?
            .into_iter()
            .map(ActivityResponse::from)
            .collect();

        Ok(DashboardStats {
            total_contacts,
            total_leads,
            new_leads,
            qualified_leads,
            open_deals,
            won_deals,
            lost_deals,
            pipeline_value,
            monthly_won_deals,
            monthly_revenue,
            pending_tasks,
            hot_leads,
            overdue_tasks,
            recent_activities,
        })
    }
}
