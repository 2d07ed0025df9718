// src/db/note_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::note::{CreateNotePayload, Note},
};

const NOTE_COLUMNS: &str =
    "id, title, content, is_pinned, user_id, contact_id, lead_id, deal_id, created_at, updated_at";

#[derive(Clone)]
pub struct NoteRepository {
    pool: PgPool,
}

impl NoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_note<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        payload: &CreateNotePayload,
    ) -> Result<Note, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "INSERT INTO notes (title, content, is_pinned, user_id, contact_id, lead_id, deal_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {NOTE_COLUMNS}"
        );

        let note = sqlx::query_as::<_, Note>(&sql)
            .bind(&payload.title)
            .bind(&payload.content)
            .bind(payload.is_pinned)
            .bind(user_id)
            .bind(payload.contact_id)
            .bind(payload.lead_id)
            .bind(payload.deal_id)
            .fetch_one(executor)
            .await?;

        Ok(note)
    }

    /// Notas de um pai específico (contato, lead ou negócio),
    /// fixadas primeiro. `author_id = None` significa visão de admin.
    pub async fn list_for_parent(
        &self,
        author_id: Option<Uuid>,
        contact_id: Option<Uuid>,
        lead_id: Option<Uuid>,
        deal_id: Option<Uuid>,
    ) -> Result<Vec<Note>, AppError> {
        let sql = format!(
            "SELECT {NOTE_COLUMNS} FROM notes \
             WHERE ($1::uuid IS NULL OR user_id = $1) \
               AND ($2::uuid IS NULL OR contact_id = $2) \
               AND ($3::uuid IS NULL OR lead_id = $3) \
               AND ($4::uuid IS NULL OR deal_id = $4) \
             ORDER BY is_pinned DESC, created_at DESC"
        );
        let notes = sqlx::query_as::<_, Note>(&sql)
            .bind(author_id)
            .bind(contact_id)
            .bind(lead_id)
            .bind(deal_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(notes)
    }
}
