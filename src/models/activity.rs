// src/models/activity.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "activity_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    Call,
    Email,
    Meeting,
    Task,
    Note,
    Sms,
}

// Registro de interação na linha do tempo (ligação, e-mail, reunião...).
// Pode apontar para contato, lead e/ou negócio ao mesmo tempo.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: Uuid,

    pub activity_type: ActivityType,
    pub subject: String,
    pub description: Option<String>,

    pub outcome: Option<String>,
    pub duration: Option<i32>, // minutos

    pub user_id: Uuid,
    pub contact_id: Option<Uuid>,
    pub lead_id: Option<Uuid>,
    pub deal_id: Option<Uuid>,

    pub scheduled_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub is_completed: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Activity {
    /// Conclui a atividade, carimbando o horário e, se informado, o
    /// resultado. Depois de concluída só o outcome ainda muda.
    pub fn mark_completed(&mut self, outcome: Option<String>) {
        self.is_completed = true;
        self.completed_at = Some(Utc::now());
        if outcome.is_some() {
            self.outcome = outcome;
        }
    }

    pub fn is_overdue(&self) -> bool {
        match self.scheduled_at {
            Some(scheduled) if !self.is_completed => scheduled < Utc::now(),
            _ => false,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityResponse {
    #[serde(flatten)]
    pub activity: Activity,
    pub is_overdue: bool,
}

impl From<Activity> for ActivityResponse {
    fn from(activity: Activity) -> Self {
        let is_overdue = activity.is_overdue();
        Self { activity, is_overdue }
    }
}

// Dados para criação de uma atividade
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateActivityPayload {
    pub activity_type: ActivityType,
    #[validate(length(min = 1, message = "O assunto é obrigatório."))]
    pub subject: String,
    pub description: Option<String>,
    pub duration: Option<i32>,
    pub contact_id: Option<Uuid>,
    pub lead_id: Option<Uuid>,
    pub deal_id: Option<Uuid>,
    pub scheduled_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompleteActivityPayload {
    #[schema(example = "successful")]
    pub outcome: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn atividade_agendada(scheduled_at: Option<DateTime<Utc>>) -> Activity {
        Activity {
            id: Uuid::new_v4(),
            activity_type: ActivityType::Call,
            subject: "Ligação de follow-up".into(),
            description: None,
            outcome: None,
            duration: Some(15),
            user_id: Uuid::new_v4(),
            contact_id: None,
            lead_id: None,
            deal_id: None,
            scheduled_at,
            completed_at: None,
            is_completed: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn concluir_carimba_horario_e_outcome() {
        let mut atividade = atividade_agendada(None);
        atividade.mark_completed(Some("successful".into()));

        assert!(atividade.is_completed);
        assert!(atividade.completed_at.is_some());
        assert_eq!(atividade.outcome.as_deref(), Some("successful"));
    }

    #[test]
    fn concluir_sem_outcome_preserva_o_anterior() {
        let mut atividade = atividade_agendada(None);
        atividade.outcome = Some("no_answer".into());
        atividade.mark_completed(None);

        assert_eq!(atividade.outcome.as_deref(), Some("no_answer"));
    }

    #[test]
    fn atraso_depende_de_agenda_e_conclusao() {
        let passado = Utc::now() - Duration::hours(2);

        let mut atrasada = atividade_agendada(Some(passado));
        assert!(atrasada.is_overdue());

        atrasada.mark_completed(None);
        assert!(!atrasada.is_overdue());

        let sem_agenda = atividade_agendada(None);
        assert!(!sem_agenda.is_overdue());
    }
}
