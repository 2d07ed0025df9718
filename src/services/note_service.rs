// src/services/note_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::NoteRepository,
    models::{
        auth::User,
        note::{CreateNotePayload, Note},
    },
};

#[derive(Clone)]
pub struct NoteService {
    note_repo: NoteRepository,
    pool: PgPool,
}

impl NoteService {
    pub fn new(note_repo: NoteRepository, pool: PgPool) -> Self {
        Self { note_repo, pool }
    }

    /// Leitura restrita ao autor das notas; admin enxerga todas.
    fn author_scope(actor: &User) -> Option<Uuid> {
        if actor.is_admin() { None } else { Some(actor.id) }
    }

    pub async fn create_note(
        &self,
        actor: &User,
        payload: &CreateNotePayload,
    ) -> Result<Note, AppError> {
        self.note_repo.create_note(&self.pool, actor.id, payload).await
    }

    pub async fn list_notes(
        &self,
        actor: &User,
        contact_id: Option<Uuid>,
        lead_id: Option<Uuid>,
        deal_id: Option<Uuid>,
    ) -> Result<Vec<Note>, AppError> {
        self.note_repo
            .list_for_parent(Self::author_scope(actor), contact_id, lead_id, deal_id)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::UserRole;
    use chrono::Utc;

    fn usuario(role: UserRole) -> User {
        User {
            id: Uuid::new_v4(),
            email: "vendedor@empresa.com".into(),
            password_hash: "hash".into(),
            first_name: "Ana".into(),
            last_name: "Souza".into(),
            phone: None,
            role,
            is_active: true,
            last_login: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn leitura_de_notas_fica_restrita_ao_autor() {
        let user = usuario(UserRole::User);
        assert_eq!(NoteService::author_scope(&user), Some(user.id));

        let manager = usuario(UserRole::Manager);
        assert_eq!(NoteService::author_scope(&manager), Some(manager.id));
    }

    #[test]
    fn admin_enxerga_notas_de_todos() {
        let admin = usuario(UserRole::Admin);
        assert_eq!(NoteService::author_scope(&admin), None);
    }
}
