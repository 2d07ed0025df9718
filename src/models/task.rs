// src/models/task.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "task_priority", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl TaskPriority {
    /// Classe de cor que o frontend usa nos badges de prioridade.
    pub fn color_class(self) -> &'static str {
        match self {
            TaskPriority::Low => "success",
            TaskPriority::Medium => "info",
            TaskPriority::High => "warning",
            TaskPriority::Urgent => "danger",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,

    pub title: String,
    pub description: Option<String>,

    pub priority: TaskPriority,
    pub status: TaskStatus,

    pub due_date: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,

    pub assigned_to: Uuid,
    pub created_by: Uuid,

    pub contact_id: Option<Uuid>,
    pub lead_id: Option<Uuid>,
    pub deal_id: Option<Uuid>,

    pub reminder_sent: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn mark_completed(&mut self) {
        self.status = TaskStatus::Completed;
        self.completed_at = Some(Utc::now());
    }

    /// Atrasada se o prazo passou e a tarefa não foi concluída.
    /// Tarefas canceladas seguem contando como não concluídas.
    pub fn is_overdue(&self) -> bool {
        match self.due_date {
            Some(due) if self.status != TaskStatus::Completed => due < Utc::now(),
            _ => false,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    #[serde(flatten)]
    pub task: Task,
    pub is_overdue: bool,
    pub priority_color: &'static str,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        let is_overdue = task.is_overdue();
        let priority_color = task.priority.color_class();
        Self { task, is_overdue, priority_color }
    }
}

// Dados para criação de uma tarefa
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskPayload {
    #[validate(length(min = 1, message = "O título é obrigatório."))]
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<DateTime<Utc>>,
    // Ausente = atribuída ao próprio criador
    pub assigned_to: Option<Uuid>,
    pub contact_id: Option<Uuid>,
    pub lead_id: Option<Uuid>,
    pub deal_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn tarefa(due_date: Option<DateTime<Utc>>, status: TaskStatus) -> Task {
        Task {
            id: Uuid::new_v4(),
            title: "Enviar proposta".into(),
            description: None,
            priority: TaskPriority::High,
            status,
            due_date,
            completed_at: None,
            assigned_to: Uuid::new_v4(),
            created_by: Uuid::new_v4(),
            contact_id: None,
            lead_id: None,
            deal_id: None,
            reminder_sent: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn tarefa_vencida_e_pendente_esta_atrasada() {
        let ontem = Utc::now() - Duration::days(1);
        let t = tarefa(Some(ontem), TaskStatus::Pending);
        assert!(t.is_overdue());
    }

    #[test]
    fn concluir_encerra_o_atraso_mesmo_com_prazo_vencido() {
        let ontem = Utc::now() - Duration::days(1);
        let mut t = tarefa(Some(ontem), TaskStatus::Pending);
        t.mark_completed();

        assert_eq!(t.status, TaskStatus::Completed);
        assert!(t.completed_at.is_some());
        assert!(!t.is_overdue());
    }

    #[test]
    fn sem_prazo_nunca_atrasa() {
        let t = tarefa(None, TaskStatus::InProgress);
        assert!(!t.is_overdue());
    }

    #[test]
    fn cores_de_prioridade() {
        assert_eq!(TaskPriority::Low.color_class(), "success");
        assert_eq!(TaskPriority::Urgent.color_class(), "danger");
    }
}
