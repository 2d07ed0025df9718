// src/services/activity_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ActivityRepository,
    models::{
        activity::{Activity, CreateActivityPayload},
        auth::User,
    },
};

#[derive(Clone)]
pub struct ActivityService {
    activity_repo: ActivityRepository,
    pool: PgPool,
}

impl ActivityService {
    pub fn new(activity_repo: ActivityRepository, pool: PgPool) -> Self {
        Self { activity_repo, pool }
    }

    pub async fn create_activity(
        &self,
        actor: &User,
        payload: &CreateActivityPayload,
    ) -> Result<Activity, AppError> {
        self.activity_repo
            .create_activity(&self.pool, actor.id, payload)
            .await
    }

    pub async fn list_activities(
        &self,
        actor: &User,
        limit: i64,
    ) -> Result<Vec<Activity>, AppError> {
        let scope = if actor.is_admin() { None } else { Some(actor.id) };
        self.activity_repo.list(scope, limit).await
    }

    /// Conclui uma atividade, carimbando o horário e o resultado
    /// informado (quando presente). Idempotente quanto ao outcome: sem
    /// outcome novo, o anterior permanece.
    pub async fn complete_activity(
        &self,
        actor: &User,
        id: Uuid,
        outcome: Option<String>,
    ) -> Result<Activity, AppError> {
        let mut activity = self
            .activity_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Atividade"))?;

        if !actor.can_edit(activity.user_id) {
            return Err(AppError::Forbidden);
        }

        activity.mark_completed(outcome);
        self.activity_repo
            .save_completion(&self.pool, &activity)
            .await
    }
}
