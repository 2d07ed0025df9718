// src/models/lead.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::error::AppError;

// Limites da régua de pontuação.
// Obs: o corte de qualificação (50) é independente das faixas de
// temperatura (40/70) — são réguas distintas por decisão de produto.
const SCORE_MIN: i32 = 0;
const SCORE_MAX: i32 = 100;
const QUALIFIED_THRESHOLD: i32 = 50;
const WARM_THRESHOLD: i32 = 40;
const HOT_THRESHOLD: i32 = 70;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "lead_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    New,
    Contacted,
    Qualified,
    Lost,
    Converted,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "lead_temperature", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LeadTemperature {
    Hot,
    Warm,
    Cold,
}

impl LeadTemperature {
    /// Temperatura é função pura do score: >=70 hot, >=40 warm, senão cold.
    pub fn from_score(score: i32) -> Self {
        if score >= HOT_THRESHOLD {
            LeadTemperature::Hot
        } else if score >= WARM_THRESHOLD {
            LeadTemperature::Warm
        } else {
            LeadTemperature::Cold
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: Uuid,

    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,

    pub company: Option<String>,
    pub job_title: Option<String>,
    pub industry: Option<String>,

    pub status: LeadStatus,
    pub source: Option<String>,
    pub score: i32,
    pub temperature: LeadTemperature,

    pub owner_id: Uuid,

    pub budget: Option<Decimal>,
    pub timeline: Option<String>,
    pub requirements: Option<String>,
    pub notes: Option<String>,

    pub converted_to_contact_id: Option<Uuid>,
    pub converted_at: Option<DateTime<Utc>>,

    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,

    pub last_contacted: Option<DateTime<Utc>>,
    pub next_followup: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Lead {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Soma `points` (pode ser negativo) ao score, saturando em [0, 100],
    /// e recalcula a temperatura a partir do score resultante.
    pub fn update_score(&mut self, points: i32) {
        self.score = (self.score + points).clamp(SCORE_MIN, SCORE_MAX);
        self.temperature = LeadTemperature::from_score(self.score);
    }

    pub fn is_qualified(&self) -> bool {
        self.score >= QUALIFIED_THRESHOLD
    }

    /// Transição única e irreversível: marca o lead como convertido e
    /// registra o contato criado. Um lead já convertido não pode ser
    /// convertido de novo (o `converted_at` original é preservado).
    ///
    /// A criação do Contact em si, e a atomicidade dos dois passos,
    /// são responsabilidade do serviço chamador (uma transação só).
    pub fn convert_to_contact(&mut self, contact_id: Uuid) -> Result<(), AppError> {
        if self.status == LeadStatus::Converted {
            return Err(AppError::LeadAlreadyConverted);
        }
        self.status = LeadStatus::Converted;
        self.converted_to_contact_id = Some(contact_id);
        self.converted_at = Some(Utc::now());
        Ok(())
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadResponse {
    #[serde(flatten)]
    pub lead: Lead,
    pub full_name: String,
    pub is_qualified: bool,
}

impl From<Lead> for LeadResponse {
    fn from(lead: Lead) -> Self {
        let full_name = lead.full_name();
        let is_qualified = lead.is_qualified();
        Self { lead, full_name, is_qualified }
    }
}

// Dados para criação de um lead
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeadPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub first_name: String,
    #[validate(length(min = 1, message = "O sobrenome é obrigatório."))]
    pub last_name: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub job_title: Option<String>,
    pub industry: Option<String>,
    pub source: Option<String>,
    pub budget: Option<Decimal>,
    pub timeline: Option<String>,
    pub requirements: Option<String>,
    pub notes: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub next_followup: Option<DateTime<Utc>>,
}

// Atualização parcial: campo ausente mantém o valor atual.
// Score e conversão têm operações próprias e ficam de fora daqui.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLeadPayload {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub job_title: Option<String>,
    pub industry: Option<String>,
    pub status: Option<LeadStatus>,
    pub source: Option<String>,
    pub budget: Option<Decimal>,
    pub timeline: Option<String>,
    pub requirements: Option<String>,
    pub notes: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub next_followup: Option<DateTime<Utc>>,
}

// Delta de pontuação aplicado por /leads/{id}/score
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateScorePayload {
    #[schema(example = 15)]
    pub points: i32,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResponse {
    pub score: i32,
    pub temperature: LeadTemperature,
    pub is_qualified: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lead_com_score(score: i32) -> Lead {
        Lead {
            id: Uuid::new_v4(),
            first_name: "João".into(),
            last_name: "Pereira".into(),
            email: "joao@prospect.com".into(),
            phone: None,
            company: None,
            job_title: None,
            industry: None,
            status: LeadStatus::New,
            source: None,
            score,
            temperature: LeadTemperature::from_score(score),
            owner_id: Uuid::new_v4(),
            budget: None,
            timeline: None,
            requirements: None,
            notes: None,
            converted_to_contact_id: None,
            converted_at: None,
            city: None,
            state: None,
            country: None,
            last_contacted: None,
            next_followup: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn score_fica_saturado_entre_0_e_100() {
        let mut lead = lead_com_score(90);
        lead.update_score(50);
        assert_eq!(lead.score, 100);

        lead.update_score(-300);
        assert_eq!(lead.score, 0);
    }

    #[test]
    fn temperatura_nas_fronteiras_40_e_70() {
        assert_eq!(LeadTemperature::from_score(39), LeadTemperature::Cold);
        assert_eq!(LeadTemperature::from_score(40), LeadTemperature::Warm);
        assert_eq!(LeadTemperature::from_score(69), LeadTemperature::Warm);
        assert_eq!(LeadTemperature::from_score(70), LeadTemperature::Hot);
    }

    #[test]
    fn temperatura_acompanha_o_novo_score() {
        let mut lead = lead_com_score(0);

        lead.update_score(45);
        assert_eq!(lead.score, 45);
        assert_eq!(lead.temperature, LeadTemperature::Warm);

        lead.update_score(30);
        assert_eq!(lead.score, 75);
        assert_eq!(lead.temperature, LeadTemperature::Hot);
    }

    #[test]
    fn qualificacao_usa_corte_proprio_de_50() {
        assert!(!lead_com_score(49).is_qualified());
        assert!(lead_com_score(50).is_qualified());
        // Warm (score 50..69) já é qualificado mesmo sem ser hot
        assert_eq!(lead_com_score(50).temperature, LeadTemperature::Warm);
    }

    #[test]
    fn conversao_marca_status_contato_e_timestamp() {
        let mut lead = lead_com_score(80);
        let contact_id = Uuid::new_v4();

        lead.convert_to_contact(contact_id).unwrap();

        assert_eq!(lead.status, LeadStatus::Converted);
        assert_eq!(lead.converted_to_contact_id, Some(contact_id));
        assert!(lead.converted_at.is_some());
    }

    #[test]
    fn segunda_conversao_e_rejeitada_e_preserva_converted_at() {
        let mut lead = lead_com_score(80);
        lead.convert_to_contact(Uuid::new_v4()).unwrap();
        let primeiro_convert = lead.converted_at;
        let primeiro_contato = lead.converted_to_contact_id;

        let resultado = lead.convert_to_contact(Uuid::new_v4());

        assert!(matches!(resultado, Err(AppError::LeadAlreadyConverted)));
        assert_eq!(lead.converted_at, primeiro_convert);
        assert_eq!(lead.converted_to_contact_id, primeiro_contato);
    }
}
