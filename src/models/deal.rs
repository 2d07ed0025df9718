// src/models/deal.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Estágio do funil de vendas. Estágios fechados são terminais.
// Por ser um enum fechado, um nome de estágio desconhecido morre no
// serde (422) antes de chegar ao domínio — não existe o "no-op
// silencioso" de implementações com estágio em string livre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "deal_stage", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DealStage {
    Prospecting,
    Qualified,
    Proposal,
    Negotiation,
    ClosedWon,
    ClosedLost,
}

impl DealStage {
    /// Tabela fixa estágio → probabilidade de fechamento.
    pub fn default_probability(self) -> i32 {
        match self {
            DealStage::Prospecting => 10,
            DealStage::Qualified => 25,
            DealStage::Proposal => 50,
            DealStage::Negotiation => 75,
            DealStage::ClosedWon => 100,
            DealStage::ClosedLost => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "deal_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DealStatus {
    Open,
    Won,
    Lost,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Deal {
    pub id: Uuid,

    pub title: String,
    pub description: Option<String>,

    pub value: Decimal,
    pub currency: String,

    pub stage: DealStage,
    pub probability: i32,
    pub status: DealStatus,

    pub contact_id: Uuid,
    pub owner_id: Uuid,

    pub expected_close_date: Option<NaiveDate>,
    pub actual_close_date: Option<NaiveDate>,

    pub source: Option<String>,
    pub lost_reason: Option<String>,
    pub products: Option<String>,
    pub competitors: Option<String>,
    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Deal {
    /// Move o negócio para um novo estágio e aplica a probabilidade da
    /// tabela. Estágios fechados também resolvem status e data de
    /// fechamento (hoje).
    pub fn move_to_stage(&mut self, new_stage: DealStage) {
        self.stage = new_stage;
        self.probability = new_stage.default_probability();

        match new_stage {
            DealStage::ClosedWon => {
                self.status = DealStatus::Won;
                self.actual_close_date = Some(Utc::now().date_naive());
            }
            DealStage::ClosedLost => {
                self.status = DealStatus::Lost;
                self.actual_close_date = Some(Utc::now().date_naive());
            }
            _ => {}
        }
    }

    /// Fecha o negócio como ganho, com data explícita ou hoje.
    pub fn mark_as_won(&mut self, close_date: Option<NaiveDate>) {
        self.status = DealStatus::Won;
        self.stage = DealStage::ClosedWon;
        self.probability = 100;
        self.actual_close_date = Some(close_date.unwrap_or_else(|| Utc::now().date_naive()));
    }

    /// Fecha o negócio como perdido, guardando o motivo.
    pub fn mark_as_lost(&mut self, reason: Option<String>, close_date: Option<NaiveDate>) {
        self.status = DealStatus::Lost;
        self.stage = DealStage::ClosedLost;
        self.probability = 0;
        self.lost_reason = reason;
        self.actual_close_date = Some(close_date.unwrap_or_else(|| Utc::now().date_naive()));
    }

    /// Valor ponderado para previsão de pipeline: value × probability / 100.
    pub fn weighted_value(&self) -> Decimal {
        self.value * Decimal::from(self.probability) / Decimal::ONE_HUNDRED
    }

    /// Um negócio só atrasa enquanto está aberto.
    pub fn is_overdue(&self) -> bool {
        match self.expected_close_date {
            Some(expected) if self.status == DealStatus::Open => {
                expected < Utc::now().date_naive()
            }
            _ => false,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DealResponse {
    #[serde(flatten)]
    pub deal: Deal,
    pub weighted_value: Decimal,
    pub is_overdue: bool,
}

impl From<Deal> for DealResponse {
    fn from(deal: Deal) -> Self {
        let weighted_value = deal.weighted_value();
        let is_overdue = deal.is_overdue();
        Self { deal, weighted_value, is_overdue }
    }
}

// Dados para criação de um negócio
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDealPayload {
    #[validate(length(min = 1, message = "O título é obrigatório."))]
    pub title: String,
    pub description: Option<String>,
    #[schema(value_type = f64, example = 100000.0)]
    pub value: Decimal,
    pub currency: Option<String>,
    pub contact_id: Uuid,
    pub expected_close_date: Option<NaiveDate>,
    pub source: Option<String>,
    pub products: Option<String>,
    pub competitors: Option<String>,
    pub notes: Option<String>,
}

// Atualização parcial. Estágio/status mudam só pelas operações do
// funil (move-stage, mark-won, mark-lost).
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDealPayload {
    pub title: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub value: Option<Decimal>,
    pub currency: Option<String>,
    pub expected_close_date: Option<NaiveDate>,
    pub source: Option<String>,
    pub products: Option<String>,
    pub competitors: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MoveStagePayload {
    #[schema(example = "proposal")]
    pub stage: DealStage,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkWonPayload {
    pub close_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkLostPayload {
    #[schema(example = "preço")]
    pub reason: Option<String>,
    pub close_date: Option<NaiveDate>,
}

// Visão do funil: os negócios abertos de um estágio com os totais
// usados no forecast.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PipelineStageView {
    pub stage: DealStage,
    pub deals: Vec<DealResponse>,
    pub total_value: Decimal,
    pub weighted_value: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn negocio_aberto(value: i64) -> Deal {
        Deal {
            id: Uuid::new_v4(),
            title: "Licenças anuais".into(),
            description: None,
            value: Decimal::from(value),
            currency: "BRL".into(),
            stage: DealStage::Prospecting,
            probability: DealStage::Prospecting.default_probability(),
            status: DealStatus::Open,
            contact_id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            expected_close_date: None,
            actual_close_date: None,
            source: None,
            lost_reason: None,
            products: None,
            competitors: None,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn tabela_de_probabilidades_por_estagio() {
        let casos = [
            (DealStage::Prospecting, 10),
            (DealStage::Qualified, 25),
            (DealStage::Proposal, 50),
            (DealStage::Negotiation, 75),
            (DealStage::ClosedWon, 100),
            (DealStage::ClosedLost, 0),
        ];
        for (stage, esperado) in casos {
            let mut deal = negocio_aberto(1000);
            deal.move_to_stage(stage);
            assert_eq!(deal.probability, esperado, "estágio {:?}", stage);
        }
    }

    #[test]
    fn fechar_como_ganho_resolve_status_e_data() {
        let mut deal = negocio_aberto(5000);
        deal.move_to_stage(DealStage::ClosedWon);

        assert_eq!(deal.status, DealStatus::Won);
        assert_eq!(deal.probability, 100);
        assert_eq!(deal.actual_close_date, Some(Utc::now().date_naive()));
    }

    #[test]
    fn fechar_como_perdido_resolve_status_e_data() {
        let mut deal = negocio_aberto(5000);
        deal.move_to_stage(DealStage::ClosedLost);

        assert_eq!(deal.status, DealStatus::Lost);
        assert_eq!(deal.probability, 0);
        assert_eq!(deal.actual_close_date, Some(Utc::now().date_naive()));
    }

    #[test]
    fn mark_as_won_aceita_data_explicita() {
        let mut deal = negocio_aberto(5000);
        let data = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
        deal.mark_as_won(Some(data));

        assert_eq!(deal.stage, DealStage::ClosedWon);
        assert_eq!(deal.status, DealStatus::Won);
        assert_eq!(deal.actual_close_date, Some(data));
    }

    #[test]
    fn mark_as_lost_guarda_o_motivo() {
        let mut deal = negocio_aberto(5000);
        deal.mark_as_lost(Some("preço".into()), None);

        assert_eq!(deal.stage, DealStage::ClosedLost);
        assert_eq!(deal.status, DealStatus::Lost);
        assert_eq!(deal.probability, 0);
        assert_eq!(deal.lost_reason.as_deref(), Some("preço"));
        assert_eq!(deal.actual_close_date, Some(Utc::now().date_naive()));
    }

    #[test]
    fn valor_ponderado_acompanha_o_funil() {
        // Cenário clássico de forecast: 100k avançando no funil
        let mut deal = negocio_aberto(100_000);
        assert_eq!(deal.weighted_value(), Decimal::from(10_000));

        deal.move_to_stage(DealStage::Qualified);
        assert_eq!(deal.weighted_value(), Decimal::from(25_000));

        deal.move_to_stage(DealStage::Proposal);
        assert_eq!(deal.weighted_value(), Decimal::from(50_000));
    }

    #[test]
    fn vocabulario_de_estagios_no_fio_e_snake_case() {
        assert_eq!(
            serde_json::to_string(&DealStage::ClosedWon).unwrap(),
            "\"closed_won\""
        );

        let parsed: DealStage = serde_json::from_str("\"negotiation\"").unwrap();
        assert_eq!(parsed, DealStage::Negotiation);

        let status: DealStatus = serde_json::from_str("\"won\"").unwrap();
        assert_eq!(status, DealStatus::Won);
    }

    #[test]
    fn estagio_desconhecido_morre_no_serde() {
        assert!(serde_json::from_str::<DealStage>("\"imaginado\"").is_err());

        // O payload de move-stage herda a mesma rejeição
        let payload = serde_json::from_str::<MoveStagePayload>(r#"{"stage":"achismo"}"#);
        assert!(payload.is_err());
    }

    #[test]
    fn atraso_so_vale_para_negocio_aberto() {
        let ontem = (Utc::now() - Duration::days(1)).date_naive();

        let mut deal = negocio_aberto(1000);
        deal.expected_close_date = Some(ontem);
        assert!(deal.is_overdue());

        deal.mark_as_won(None);
        assert!(!deal.is_overdue());

        let mut sem_data = negocio_aberto(1000);
        sem_data.expected_close_date = None;
        assert!(!sem_data.is_overdue());
    }
}
