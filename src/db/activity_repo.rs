// src/db/activity_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::activity::{Activity, ActivityType, CreateActivityPayload},
};

const ACTIVITY_COLUMNS: &str = "id, activity_type, subject, description, outcome, duration, \
     user_id, contact_id, lead_id, deal_id, \
     scheduled_at, completed_at, is_completed, created_at, updated_at";

#[derive(Clone)]
pub struct ActivityRepository {
    pool: PgPool,
}

impl ActivityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_activity<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        payload: &CreateActivityPayload,
    ) -> Result<Activity, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "INSERT INTO activities (\
                activity_type, subject, description, duration, \
                user_id, contact_id, lead_id, deal_id, scheduled_at\
             ) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {ACTIVITY_COLUMNS}"
        );

        let activity = sqlx::query_as::<_, Activity>(&sql)
            .bind(payload.activity_type)
            .bind(&payload.subject)
            .bind(&payload.description)
            .bind(payload.duration)
            .bind(user_id)
            .bind(payload.contact_id)
            .bind(payload.lead_id)
            .bind(payload.deal_id)
            .bind(payload.scheduled_at)
            .fetch_one(executor)
            .await?;

        Ok(activity)
    }

    /// Registro de auditoria já concluído (ex: "Lead Converted"),
    /// criado dentro da transação do serviço.
    pub async fn log_completed<'e, E>(
        &self,
        executor: E,
        activity_type: ActivityType,
        subject: &str,
        description: &str,
        user_id: Uuid,
        contact_id: Option<Uuid>,
        lead_id: Option<Uuid>,
        deal_id: Option<Uuid>,
    ) -> Result<Activity, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "INSERT INTO activities (\
                activity_type, subject, description, user_id, contact_id, lead_id, deal_id, \
                is_completed, completed_at\
             ) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, TRUE, NOW()) \
             RETURNING {ACTIVITY_COLUMNS}"
        );

        let activity = sqlx::query_as::<_, Activity>(&sql)
            .bind(activity_type)
            .bind(subject)
            .bind(description)
            .bind(user_id)
            .bind(contact_id)
            .bind(lead_id)
            .bind(deal_id)
            .fetch_one(executor)
            .await?;

        Ok(activity)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Activity>, AppError> {
        let sql = format!("SELECT {ACTIVITY_COLUMNS} FROM activities WHERE id = $1");
        let maybe_activity = sqlx::query_as::<_, Activity>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_activity)
    }

    pub async fn list(
        &self,
        user_id: Option<Uuid>,
        limit: i64,
    ) -> Result<Vec<Activity>, AppError> {
        let sql = format!(
            "SELECT {ACTIVITY_COLUMNS} FROM activities \
             WHERE ($1::uuid IS NULL OR user_id = $1) \
             ORDER BY created_at DESC \
             LIMIT $2"
        );
        let activities = sqlx::query_as::<_, Activity>(&sql)
            .bind(user_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(activities)
    }

    /// Persiste o resultado de `Activity::mark_completed`.
    pub async fn save_completion<'e, E>(
        &self,
        executor: E,
        activity: &Activity,
    ) -> Result<Activity, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "UPDATE activities SET \
                is_completed = $2, completed_at = $3, outcome = $4, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {ACTIVITY_COLUMNS}"
        );

        let activity = sqlx::query_as::<_, Activity>(&sql)
            .bind(activity.id)
            .bind(activity.is_completed)
            .bind(activity.completed_at)
            .bind(&activity.outcome)
            .fetch_one(executor)
            .await?;

        Ok(activity)
    }
}
