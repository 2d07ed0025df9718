// src/db/deal_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::deal::{CreateDealPayload, Deal, DealStage, DealStatus, UpdateDealPayload},
};

const DEAL_COLUMNS: &str = "id, title, description, value, currency, stage, probability, status, \
     contact_id, owner_id, expected_close_date, actual_close_date, \
     source, lost_reason, products, competitors, notes, created_at, updated_at";

#[derive(Clone)]
pub struct DealRepository {
    pool: PgPool,
}

impl DealRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_deal<'e, E>(
        &self,
        executor: E,
        owner_id: Uuid,
        payload: &CreateDealPayload,
    ) -> Result<Deal, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // Todo negócio nasce em prospecting com a probabilidade da tabela
        let stage = DealStage::Prospecting;
        let sql = format!(
            "INSERT INTO deals (\
                title, description, value, currency, stage, probability, status, \
                contact_id, owner_id, expected_close_date, source, products, competitors, notes\
             ) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             RETURNING {DEAL_COLUMNS}"
        );

        let deal = sqlx::query_as::<_, Deal>(&sql)
            .bind(&payload.title)
            .bind(&payload.description)
            .bind(payload.value)
            .bind(payload.currency.as_deref().unwrap_or("BRL"))
            .bind(stage)
            .bind(stage.default_probability())
            .bind(DealStatus::Open)
            .bind(payload.contact_id)
            .bind(owner_id)
            .bind(payload.expected_close_date)
            .bind(&payload.source)
            .bind(&payload.products)
            .bind(&payload.competitors)
            .bind(&payload.notes)
            .fetch_one(executor)
            .await?;

        Ok(deal)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Deal>, AppError> {
        let sql = format!("SELECT {DEAL_COLUMNS} FROM deals WHERE id = $1");
        let maybe_deal = sqlx::query_as::<_, Deal>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_deal)
    }

    pub async fn list(
        &self,
        owner_id: Option<Uuid>,
        stage: Option<DealStage>,
        status: Option<DealStatus>,
    ) -> Result<Vec<Deal>, AppError> {
        let sql = format!(
            "SELECT {DEAL_COLUMNS} FROM deals \
             WHERE ($1::uuid IS NULL OR owner_id = $1) \
               AND ($2::deal_stage IS NULL OR stage = $2) \
               AND ($3::deal_status IS NULL OR status = $3) \
             ORDER BY created_at DESC"
        );
        let deals = sqlx::query_as::<_, Deal>(&sql)
            .bind(owner_id)
            .bind(stage)
            .bind(status)
            .fetch_all(&self.pool)
            .await?;
        Ok(deals)
    }

    /// Negócios abertos para a visão de funil, do estágio mais cedo ao
    /// mais tarde.
    pub async fn list_open(&self, owner_id: Option<Uuid>) -> Result<Vec<Deal>, AppError> {
        let sql = format!(
            "SELECT {DEAL_COLUMNS} FROM deals \
             WHERE ($1::uuid IS NULL OR owner_id = $1) AND status = 'open' \
             ORDER BY stage ASC, expected_close_date ASC NULLS LAST"
        );
        let deals = sqlx::query_as::<_, Deal>(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(deals)
    }

    pub async fn update_deal<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &UpdateDealPayload,
    ) -> Result<Deal, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "UPDATE deals SET \
                title = COALESCE($2, title), \
                description = COALESCE($3, description), \
                value = COALESCE($4, value), \
                currency = COALESCE($5, currency), \
                expected_close_date = COALESCE($6, expected_close_date), \
                source = COALESCE($7, source), \
                products = COALESCE($8, products), \
                competitors = COALESCE($9, competitors), \
                notes = COALESCE($10, notes), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {DEAL_COLUMNS}"
        );

        let deal = sqlx::query_as::<_, Deal>(&sql)
            .bind(id)
            .bind(&payload.title)
            .bind(&payload.description)
            .bind(payload.value)
            .bind(&payload.currency)
            .bind(payload.expected_close_date)
            .bind(&payload.source)
            .bind(&payload.products)
            .bind(&payload.competitors)
            .bind(&payload.notes)
            .fetch_one(executor)
            .await?;

        Ok(deal)
    }

    /// Persiste o resultado das transições do funil (move_to_stage,
    /// mark_as_won, mark_as_lost).
    pub async fn save_stage<'e, E>(&self, executor: E, deal: &Deal) -> Result<Deal, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "UPDATE deals SET \
                stage = $2, probability = $3, status = $4, \
                actual_close_date = $5, lost_reason = $6, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {DEAL_COLUMNS}"
        );

        let deal = sqlx::query_as::<_, Deal>(&sql)
            .bind(deal.id)
            .bind(deal.stage)
            .bind(deal.probability)
            .bind(deal.status)
            .bind(deal.actual_close_date)
            .bind(&deal.lost_reason)
            .fetch_one(executor)
            .await?;

        Ok(deal)
    }

    pub async fn list_ids_by_contact(
        &self,
        conn: &mut sqlx::PgConnection,
        contact_id: Uuid,
    ) -> Result<Vec<Uuid>, AppError> {
        let ids: Vec<Uuid> = sqlx::query_scalar("SELECT id FROM deals WHERE contact_id = $1")
            .bind(contact_id)
            .fetch_all(conn)
            .await?;
        Ok(ids)
    }

    pub async fn delete_children(
        &self,
        conn: &mut sqlx::PgConnection,
        deal_id: Uuid,
    ) -> Result<(), AppError> {
        sqlx::query("DELETE FROM activities WHERE deal_id = $1")
            .bind(deal_id)
            .execute(&mut *conn)
            .await?;
        sqlx::query("DELETE FROM notes WHERE deal_id = $1")
            .bind(deal_id)
            .execute(&mut *conn)
            .await?;
        sqlx::query("DELETE FROM tasks WHERE deal_id = $1")
            .bind(deal_id)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }

    pub async fn delete_deal<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM deals WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn count_by_status(
        &self,
        owner_id: Option<Uuid>,
        status: DealStatus,
    ) -> Result<i64, AppError> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM deals \
             WHERE ($1::uuid IS NULL OR owner_id = $1) AND status = $2",
        )
        .bind(owner_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    /// Soma do valor dos negócios abertos (valor do pipeline).
    pub async fn open_pipeline_value(&self, owner_id: Option<Uuid>) -> Result<Decimal, AppError> {
        let total: Option<Decimal> = sqlx::query_scalar(
            "SELECT SUM(value) FROM deals \
             WHERE ($1::uuid IS NULL OR owner_id = $1) AND status = 'open'",
        )
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(total.unwrap_or(Decimal::ZERO))
    }

    /// Ganhos do mês corrente: quantidade e receita.
    pub async fn monthly_won(&self, owner_id: Option<Uuid>) -> Result<(i64, Decimal), AppError> {
        let row: (i64, Option<Decimal>) = sqlx::query_as(
            "SELECT COUNT(*), SUM(value) FROM deals \
             WHERE ($1::uuid IS NULL OR owner_id = $1) \
               AND status = 'won' \
               AND actual_close_date >= date_trunc('month', CURRENT_DATE)::date",
        )
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;
        Ok((row.0, row.1.unwrap_or(Decimal::ZERO)))
    }
}
