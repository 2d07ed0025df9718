// src/db/lead_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::lead::{CreateLeadPayload, Lead, LeadStatus, LeadTemperature, UpdateLeadPayload},
};

const LEAD_COLUMNS: &str = "id, first_name, last_name, email, phone, company, job_title, industry, \
     status, source, score, temperature, owner_id, budget, timeline, requirements, notes, \
     converted_to_contact_id, converted_at, city, state, country, \
     last_contacted, next_followup, created_at, updated_at";

#[derive(Clone)]
pub struct LeadRepository {
    pool: PgPool,
}

impl LeadRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_lead<'e, E>(
        &self,
        executor: E,
        owner_id: Uuid,
        payload: &CreateLeadPayload,
    ) -> Result<Lead, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "INSERT INTO leads (\
                first_name, last_name, email, phone, company, job_title, industry, \
                source, owner_id, budget, timeline, requirements, notes, \
                city, state, country, next_followup\
             ) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17) \
             RETURNING {LEAD_COLUMNS}"
        );

        let lead = sqlx::query_as::<_, Lead>(&sql)
            .bind(&payload.first_name)
            .bind(&payload.last_name)
            .bind(&payload.email)
            .bind(&payload.phone)
            .bind(&payload.company)
            .bind(&payload.job_title)
            .bind(&payload.industry)
            .bind(&payload.source)
            .bind(owner_id)
            .bind(payload.budget)
            .bind(&payload.timeline)
            .bind(&payload.requirements)
            .bind(&payload.notes)
            .bind(&payload.city)
            .bind(&payload.state)
            .bind(&payload.country)
            .bind(payload.next_followup)
            .fetch_one(executor)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation() {
                        return AppError::EmailAlreadyExists;
                    }
                }
                e.into()
            })?;

        Ok(lead)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Lead>, AppError> {
        let sql = format!("SELECT {LEAD_COLUMNS} FROM leads WHERE id = $1");
        let maybe_lead = sqlx::query_as::<_, Lead>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_lead)
    }

    pub async fn list(
        &self,
        owner_id: Option<Uuid>,
        status: Option<LeadStatus>,
        temperature: Option<LeadTemperature>,
    ) -> Result<Vec<Lead>, AppError> {
        let sql = format!(
            "SELECT {LEAD_COLUMNS} FROM leads \
             WHERE ($1::uuid IS NULL OR owner_id = $1) \
               AND ($2::lead_status IS NULL OR status = $2) \
               AND ($3::lead_temperature IS NULL OR temperature = $3) \
             ORDER BY score DESC, created_at DESC"
        );
        let leads = sqlx::query_as::<_, Lead>(&sql)
            .bind(owner_id)
            .bind(status)
            .bind(temperature)
            .fetch_all(&self.pool)
            .await?;
        Ok(leads)
    }

    /// Leads quentes em aberto (score >= 70), usados no dashboard.
    pub async fn hot_leads(&self, owner_id: Option<Uuid>, limit: i64) -> Result<Vec<Lead>, AppError> {
        let sql = format!(
            "SELECT {LEAD_COLUMNS} FROM leads \
             WHERE ($1::uuid IS NULL OR owner_id = $1) \
               AND score >= 70 \
               AND status IN ('new', 'contacted', 'qualified') \
             ORDER BY score DESC \
             LIMIT $2"
        );
        let leads = sqlx::query_as::<_, Lead>(&sql)
            .bind(owner_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(leads)
    }

    pub async fn update_lead<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &UpdateLeadPayload,
    ) -> Result<Lead, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "UPDATE leads SET \
                first_name = COALESCE($2, first_name), \
                last_name = COALESCE($3, last_name), \
                email = COALESCE($4, email), \
                phone = COALESCE($5, phone), \
                company = COALESCE($6, company), \
                job_title = COALESCE($7, job_title), \
                industry = COALESCE($8, industry), \
                status = COALESCE($9, status), \
                source = COALESCE($10, source), \
                budget = COALESCE($11, budget), \
                timeline = COALESCE($12, timeline), \
                requirements = COALESCE($13, requirements), \
                notes = COALESCE($14, notes), \
                city = COALESCE($15, city), \
                state = COALESCE($16, state), \
                country = COALESCE($17, country), \
                next_followup = COALESCE($18, next_followup), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {LEAD_COLUMNS}"
        );

        let lead = sqlx::query_as::<_, Lead>(&sql)
            .bind(id)
            .bind(&payload.first_name)
            .bind(&payload.last_name)
            .bind(&payload.email)
            .bind(&payload.phone)
            .bind(&payload.company)
            .bind(&payload.job_title)
            .bind(&payload.industry)
            .bind(payload.status)
            .bind(&payload.source)
            .bind(payload.budget)
            .bind(&payload.timeline)
            .bind(&payload.requirements)
            .bind(&payload.notes)
            .bind(&payload.city)
            .bind(&payload.state)
            .bind(&payload.country)
            .bind(payload.next_followup)
            .fetch_one(executor)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation() {
                        return AppError::EmailAlreadyExists;
                    }
                }
                e.into()
            })?;

        Ok(lead)
    }

    /// Persiste o resultado de `Lead::update_score`.
    pub async fn save_score<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        score: i32,
        temperature: LeadTemperature,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            "UPDATE leads SET score = $2, temperature = $3, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(score)
        .bind(temperature)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Persiste o resultado de `Lead::convert_to_contact`.
    pub async fn save_conversion<'e, E>(&self, executor: E, lead: &Lead) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            "UPDATE leads SET \
                status = $2, converted_to_contact_id = $3, converted_at = $4, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(lead.id)
        .bind(lead.status)
        .bind(lead.converted_to_contact_id)
        .bind(lead.converted_at)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Solta a referência de conversão dos leads que apontam para o
    /// contato. Precisa rodar antes do DELETE do contato, senão a FK
    /// de `converted_to_contact_id` barra a exclusão.
    pub async fn clear_converted_reference(
        &self,
        conn: &mut sqlx::PgConnection,
        contact_id: Uuid,
    ) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE leads SET converted_to_contact_id = NULL, updated_at = NOW() \
             WHERE converted_to_contact_id = $1",
        )
        .bind(contact_id)
        .execute(conn)
        .await?;
        Ok(())
    }

    pub async fn delete_children(
        &self,
        conn: &mut sqlx::PgConnection,
        lead_id: Uuid,
    ) -> Result<(), AppError> {
        sqlx::query("DELETE FROM activities WHERE lead_id = $1")
            .bind(lead_id)
            .execute(&mut *conn)
            .await?;
        sqlx::query("DELETE FROM notes WHERE lead_id = $1")
            .bind(lead_id)
            .execute(&mut *conn)
            .await?;
        sqlx::query("DELETE FROM tasks WHERE lead_id = $1")
            .bind(lead_id)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }

    pub async fn delete_lead<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM leads WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn count_by_status(
        &self,
        owner_id: Option<Uuid>,
        status: LeadStatus,
    ) -> Result<i64, AppError> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM leads \
             WHERE ($1::uuid IS NULL OR owner_id = $1) AND status = $2",
        )
        .bind(owner_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    pub async fn count(&self, owner_id: Option<Uuid>) -> Result<i64, AppError> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM leads WHERE ($1::uuid IS NULL OR owner_id = $1)",
        )
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }
}
