// src/db/notification_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::notification::{Notification, NotificationPriority, NotificationType},
};

const NOTIFICATION_COLUMNS: &str = "id, user_id, notification_type, title, message, action_url, \
     is_read, read_at, priority, created_at";

#[derive(Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_notification<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        notification_type: NotificationType,
        title: &str,
        message: &str,
        action_url: Option<&str>,
        priority: NotificationPriority,
    ) -> Result<Notification, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "INSERT INTO notifications (user_id, notification_type, title, message, action_url, priority) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {NOTIFICATION_COLUMNS}"
        );

        let notification = sqlx::query_as::<_, Notification>(&sql)
            .bind(user_id)
            .bind(notification_type)
            .bind(title)
            .bind(message)
            .bind(action_url)
            .bind(priority)
            .fetch_one(executor)
            .await?;

        Ok(notification)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Notification>, AppError> {
        let sql = format!("SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE id = $1");
        let maybe_notification = sqlx::query_as::<_, Notification>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_notification)
    }

    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        unread_only: bool,
        limit: i64,
    ) -> Result<Vec<Notification>, AppError> {
        let sql = format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications \
             WHERE user_id = $1 AND (NOT $2 OR is_read = FALSE) \
             ORDER BY created_at DESC \
             LIMIT $3"
        );
        let notifications = sqlx::query_as::<_, Notification>(&sql)
            .bind(user_id)
            .bind(unread_only)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(notifications)
    }

    /// Persiste o resultado de `Notification::mark_as_read`.
    pub async fn save_read(&self, notification: &Notification) -> Result<(), AppError> {
        sqlx::query("UPDATE notifications SET is_read = $2, read_at = $3 WHERE id = $1")
            .bind(notification.id)
            .bind(notification.is_read)
            .bind(notification.read_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Marca todas as notificações do usuário como lidas; retorna
    /// quantas linhas mudaram.
    pub async fn mark_all_read(&self, user_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE, read_at = NOW() \
             WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}
