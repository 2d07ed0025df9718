// src/db/contact_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::contact::{Contact, ContactStatus, CreateContactPayload, UpdateContactPayload},
};

const CONTACT_COLUMNS: &str = "id, first_name, last_name, email, phone, mobile, company, job_title, \
     status, source, owner_id, address, city, state, country, postal_code, \
     website, linkedin, twitter, tags, notes, last_contacted, created_at, updated_at";

#[derive(Clone)]
pub struct ContactRepository {
    pool: PgPool,
}

impl ContactRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_contact<'e, E>(
        &self,
        executor: E,
        owner_id: Uuid,
        payload: &CreateContactPayload,
    ) -> Result<Contact, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "INSERT INTO contacts (\
                first_name, last_name, email, phone, mobile, company, job_title, \
                status, source, owner_id, address, city, state, country, postal_code, \
                website, linkedin, twitter, tags, notes\
             ) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20) \
             RETURNING {CONTACT_COLUMNS}"
        );

        let contact = sqlx::query_as::<_, Contact>(&sql)
            .bind(&payload.first_name)
            .bind(&payload.last_name)
            .bind(&payload.email)
            .bind(&payload.phone)
            .bind(&payload.mobile)
            .bind(&payload.company)
            .bind(&payload.job_title)
            .bind(payload.status.unwrap_or(ContactStatus::Active))
            .bind(&payload.source)
            .bind(owner_id)
            .bind(&payload.address)
            .bind(&payload.city)
            .bind(&payload.state)
            .bind(&payload.country)
            .bind(&payload.postal_code)
            .bind(&payload.website)
            .bind(&payload.linkedin)
            .bind(&payload.twitter)
            .bind(&payload.tags)
            .bind(&payload.notes)
            .fetch_one(executor)
            .await
            .map_err(|e| {
                // E-mail é chave única entre contatos
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation() {
                        return AppError::EmailAlreadyExists;
                    }
                }
                e.into()
            })?;

        Ok(contact)
    }

    /// Usado pela conversão de lead: cria o contato a partir dos campos
    /// do lead, dentro da transação do serviço.
    pub async fn create_from_lead<'e, E>(
        &self,
        executor: E,
        owner_id: Uuid,
        first_name: &str,
        last_name: &str,
        email: &str,
        phone: Option<&str>,
        company: Option<&str>,
        job_title: Option<&str>,
        source: Option<&str>,
        notes: Option<&str>,
    ) -> Result<Contact, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "INSERT INTO contacts (\
                first_name, last_name, email, phone, company, job_title, source, notes, status, owner_id\
             ) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {CONTACT_COLUMNS}"
        );

        let contact = sqlx::query_as::<_, Contact>(&sql)
            .bind(first_name)
            .bind(last_name)
            .bind(email)
            .bind(phone)
            .bind(company)
            .bind(job_title)
            .bind(source)
            .bind(notes)
            .bind(ContactStatus::Active)
            .bind(owner_id)
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

        Ok(contact)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Contact>, AppError> {
        let sql = format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = $1");
        let maybe_contact = sqlx::query_as::<_, Contact>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_contact)
    }

    /// Lista contatos; `owner_id = None` significa visão de admin (todos).
    pub async fn list(
        &self,
        owner_id: Option<Uuid>,
        status: Option<ContactStatus>,
    ) -> Result<Vec<Contact>, AppError> {
        let sql = format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts \
             WHERE ($1::uuid IS NULL OR owner_id = $1) \
               AND ($2::contact_status IS NULL OR status = $2) \
             ORDER BY first_name ASC, last_name ASC"
        );
        let contacts = sqlx::query_as::<_, Contact>(&sql)
            .bind(owner_id)
            .bind(status)
            .fetch_all(&self.pool)
            .await?;
        Ok(contacts)
    }

    /// Busca por nome, e-mail ou empresa (ILIKE), limitada a 50 linhas.
    pub async fn search(
        &self,
        owner_id: Option<Uuid>,
        query: &str,
    ) -> Result<Vec<Contact>, AppError> {
        let search_term = format!("%{}%", query);
        let sql = format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts \
             WHERE ($1::uuid IS NULL OR owner_id = $1) \
               AND (first_name ILIKE $2 OR last_name ILIKE $2 OR email ILIKE $2 OR company ILIKE $2) \
             ORDER BY first_name ASC \
             LIMIT 50"
        );
        let contacts = sqlx::query_as::<_, Contact>(&sql)
            .bind(owner_id)
            .bind(search_term)
            .fetch_all(&self.pool)
            .await?;
        Ok(contacts)
    }

    /// Atualização parcial via COALESCE: parâmetro nulo mantém a coluna.
    pub async fn update_contact<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &UpdateContactPayload,
    ) -> Result<Contact, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "UPDATE contacts SET \
                first_name = COALESCE($2, first_name), \
                last_name = COALESCE($3, last_name), \
                email = COALESCE($4, email), \
                phone = COALESCE($5, phone), \
                mobile = COALESCE($6, mobile), \
                company = COALESCE($7, company), \
                job_title = COALESCE($8, job_title), \
                status = COALESCE($9, status), \
                source = COALESCE($10, source), \
                address = COALESCE($11, address), \
                city = COALESCE($12, city), \
                state = COALESCE($13, state), \
                country = COALESCE($14, country), \
                postal_code = COALESCE($15, postal_code), \
                website = COALESCE($16, website), \
                linkedin = COALESCE($17, linkedin), \
                twitter = COALESCE($18, twitter), \
                tags = COALESCE($19, tags), \
                notes = COALESCE($20, notes), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {CONTACT_COLUMNS}"
        );

        let contact = sqlx::query_as::<_, Contact>(&sql)
            .bind(id)
            .bind(&payload.first_name)
            .bind(&payload.last_name)
            .bind(&payload.email)
            .bind(&payload.phone)
            .bind(&payload.mobile)
            .bind(&payload.company)
            .bind(&payload.job_title)
            .bind(payload.status)
            .bind(&payload.source)
            .bind(&payload.address)
            .bind(&payload.city)
            .bind(&payload.state)
            .bind(&payload.country)
            .bind(&payload.postal_code)
            .bind(&payload.website)
            .bind(&payload.linkedin)
            .bind(&payload.twitter)
            .bind(&payload.tags)
            .bind(&payload.notes)
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

        Ok(contact)
    }

    /// Apaga os filhos diretos do contato (atividades, notas e tarefas).
    /// Os negócios têm cascata própria no serviço.
    pub async fn delete_children(
        &self,
        conn: &mut sqlx::PgConnection,
        contact_id: Uuid,
    ) -> Result<(), AppError> {
        sqlx::query("DELETE FROM activities WHERE contact_id = $1")
            .bind(contact_id)
            .execute(&mut *conn)
            .await?;
        sqlx::query("DELETE FROM notes WHERE contact_id = $1")
            .bind(contact_id)
            .execute(&mut *conn)
            .await?;
        sqlx::query("DELETE FROM tasks WHERE contact_id = $1")
            .bind(contact_id)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }

    pub async fn delete_contact<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM contacts WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn count(&self, owner_id: Option<Uuid>) -> Result<i64, AppError> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM contacts WHERE ($1::uuid IS NULL OR owner_id = $1)",
        )
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }
}
