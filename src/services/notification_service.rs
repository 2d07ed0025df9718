// src/services/notification_service.rs

use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{NotificationRepository, UserRepository},
    models::{
        auth::User,
        notification::{Notification, NotificationPriority, NotificationType},
    },
    services::dispatch::{BulkSendReport, NotificationChannel},
};

#[derive(Clone)]
pub struct NotificationService {
    notification_repo: NotificationRepository,
    user_repo: UserRepository,
    channel: Arc<dyn NotificationChannel>,
    pool: PgPool,
}

impl NotificationService {
    pub fn new(
        notification_repo: NotificationRepository,
        user_repo: UserRepository,
        channel: Arc<dyn NotificationChannel>,
        pool: PgPool,
    ) -> Self {
        Self { notification_repo, user_repo, channel, pool }
    }

    /// Persiste a notificação in-app e despacha pelo canal externo.
    /// A entrega externa é melhor esforço: falha vira log, nunca erro.
    pub async fn notify(
        &self,
        user_id: Uuid,
        notification_type: NotificationType,
        title: &str,
        message: &str,
        action_url: Option<&str>,
        priority: NotificationPriority,
    ) -> Result<Notification, AppError> {
        let notification = self
            .notification_repo
            .create_notification(
                &self.pool,
                user_id,
                notification_type,
                title,
                message,
                action_url,
                priority,
            )
            .await?;

        if let Some(user) = self.user_repo.find_by_id(user_id).await? {
            let delivered = self.channel.send(&user.email, title, message).await;
            if !delivered {
                tracing::warn!(
                    "Canal '{}' não entregou a notificação {} para {}",
                    self.channel.name(),
                    notification.id,
                    user.email
                );
            }
        }

        Ok(notification)
    }

    /// Envia a mesma notificação para vários usuários e devolve o
    /// placar de entregas do canal externo.
    pub async fn broadcast(
        &self,
        user_ids: &[Uuid],
        notification_type: NotificationType,
        title: &str,
        message: &str,
        priority: NotificationPriority,
    ) -> Result<BulkSendReport, AppError> {
        let mut report = BulkSendReport::default();

        for &user_id in user_ids {
            self.notification_repo
                .create_notification(
                    &self.pool,
                    user_id,
                    notification_type,
                    title,
                    message,
                    None,
                    priority,
                )
                .await?;

            let delivered = match self.user_repo.find_by_id(user_id).await? {
                Some(user) => self.channel.send(&user.email, title, message).await,
                None => false,
            };
            report.record(delivered);
        }

        Ok(report)
    }

    pub async fn list_notifications(
        &self,
        actor: &User,
        unread_only: bool,
        limit: i64,
    ) -> Result<Vec<Notification>, AppError> {
        self.notification_repo
            .list_for_user(actor.id, unread_only, limit)
            .await
    }

    /// Só o destinatário marca a própria notificação como lida.
    pub async fn mark_read(&self, actor: &User, id: Uuid) -> Result<Notification, AppError> {
        let mut notification = self
            .notification_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Notificação"))?;

        if notification.user_id != actor.id {
            return Err(AppError::Forbidden);
        }

        notification.mark_as_read();
        self.notification_repo.save_read(&notification).await?;
        Ok(notification)
    }

    pub async fn mark_all_read(&self, actor: &User) -> Result<u64, AppError> {
        self.notification_repo.mark_all_read(actor.id).await
    }
}
