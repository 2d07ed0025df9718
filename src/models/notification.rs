// src/models/notification.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "notification_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    Info,
    Success,
    Warning,
    Error,
    Reminder,
}

impl NotificationType {
    /// Ícone (Font Awesome) que o frontend mostra para cada tipo.
    pub fn icon(self) -> &'static str {
        match self {
            NotificationType::Info => "fa-info-circle",
            NotificationType::Success => "fa-check-circle",
            NotificationType::Warning => "fa-exclamation-triangle",
            NotificationType::Error => "fa-times-circle",
            NotificationType::Reminder => "fa-bell",
        }
    }

    pub fn color_class(self) -> &'static str {
        match self {
            NotificationType::Info => "info",
            NotificationType::Success => "success",
            NotificationType::Warning => "warning",
            NotificationType::Error => "danger",
            NotificationType::Reminder => "primary",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "notification_priority", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationPriority {
    Low,
    Normal,
    High,
}

// Notificação in-app. O envio externo (e-mail/SMS/push) passa pelos
// canais em services/dispatch.rs; aqui fica só o registro persistido.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,

    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub action_url: Option<String>,

    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub priority: NotificationPriority,

    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn mark_as_read(&mut self) {
        self.is_read = true;
        self.read_at = Some(Utc::now());
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    #[serde(flatten)]
    pub notification: Notification,
    pub icon: &'static str,
    pub color_class: &'static str,
}

impl From<Notification> for NotificationResponse {
    fn from(notification: Notification) -> Self {
        let icon = notification.notification_type.icon();
        let color_class = notification.notification_type.color_class();
        Self { notification, icon, color_class }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marcar_como_lida_carimba_read_at() {
        let mut n = Notification {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            notification_type: NotificationType::Reminder,
            title: "Tarefa vencendo".into(),
            message: "A tarefa 'Enviar proposta' vence hoje.".into(),
            action_url: None,
            is_read: false,
            read_at: None,
            priority: NotificationPriority::Normal,
            created_at: Utc::now(),
        };

        n.mark_as_read();
        assert!(n.is_read);
        assert!(n.read_at.is_some());
    }

    #[test]
    fn dicas_visuais_por_tipo() {
        assert_eq!(NotificationType::Error.icon(), "fa-times-circle");
        assert_eq!(NotificationType::Error.color_class(), "danger");
        assert_eq!(NotificationType::Reminder.color_class(), "primary");
    }
}
