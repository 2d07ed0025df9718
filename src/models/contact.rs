// src/models/contact.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "contact_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ContactStatus {
    Active,
    Inactive,
    Archived,
}

// Contato é o registro "dono" da relação: negócios, atividades e notas
// apontam para ele e são removidos em cascata (na camada de serviço).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: Uuid,

    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub mobile: Option<String>,

    pub company: Option<String>,
    pub job_title: Option<String>,

    pub status: ContactStatus,
    pub source: Option<String>,
    pub owner_id: Uuid,

    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,

    pub website: Option<String>,
    pub linkedin: Option<String>,
    pub twitter: Option<String>,

    pub tags: Option<Vec<String>>,
    pub notes: Option<String>,

    pub last_contacted: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Contact {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Endereço completo formatado, pulando as partes vazias.
    pub fn full_address(&self) -> String {
        [
            self.address.as_deref(),
            self.city.as_deref(),
            self.state.as_deref(),
            self.country.as_deref(),
            self.postal_code.as_deref(),
        ]
        .iter()
        .flatten()
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
    }
}

// Projeção de transporte: o contato mais os campos derivados que o
// frontend espera junto de cada registro.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    #[serde(flatten)]
    pub contact: Contact,
    pub full_name: String,
    pub full_address: String,
}

impl From<Contact> for ContactResponse {
    fn from(contact: Contact) -> Self {
        let full_name = contact.full_name();
        let full_address = contact.full_address();
        Self { contact, full_name, full_address }
    }
}

// Dados para criação de um contato
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateContactPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub first_name: String,
    #[validate(length(min = 1, message = "O sobrenome é obrigatório."))]
    pub last_name: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    pub phone: Option<String>,
    pub mobile: Option<String>,
    pub company: Option<String>,
    pub job_title: Option<String>,
    pub status: Option<ContactStatus>,
    pub source: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    pub website: Option<String>,
    pub linkedin: Option<String>,
    pub twitter: Option<String>,
    pub tags: Option<Vec<String>>,
    pub notes: Option<String>,
}

// Atualização parcial: campo ausente mantém o valor atual.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContactPayload {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub mobile: Option<String>,
    pub company: Option<String>,
    pub job_title: Option<String>,
    pub status: Option<ContactStatus>,
    pub source: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    pub website: Option<String>,
    pub linkedin: Option<String>,
    pub twitter: Option<String>,
    pub tags: Option<Vec<String>>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contato_base() -> Contact {
        Contact {
            id: Uuid::new_v4(),
            first_name: "Maria".into(),
            last_name: "Silva".into(),
            email: "maria@empresa.com".into(),
            phone: None,
            mobile: None,
            company: Some("Empresa X".into()),
            job_title: None,
            status: ContactStatus::Active,
            source: None,
            owner_id: Uuid::new_v4(),
            address: Some("Rua A, 100".into()),
            city: Some("São Paulo".into()),
            state: None,
            country: Some("Brasil".into()),
            postal_code: None,
            website: None,
            linkedin: None,
            twitter: None,
            tags: None,
            notes: None,
            last_contacted: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn full_address_ignora_partes_ausentes() {
        let contato = contato_base();
        assert_eq!(contato.full_address(), "Rua A, 100, São Paulo, Brasil");
    }

    #[test]
    fn full_address_vazio_quando_nada_preenchido() {
        let mut contato = contato_base();
        contato.address = None;
        contato.city = None;
        contato.country = None;
        assert_eq!(contato.full_address(), "");
    }
}
