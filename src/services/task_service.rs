// src/services/task_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::TaskRepository,
    models::{
        auth::User,
        notification::{NotificationPriority, NotificationType},
        task::{CreateTaskPayload, Task, TaskStatus},
    },
    services::NotificationService,
};

#[derive(Clone)]
pub struct TaskService {
    task_repo: TaskRepository,
    notification_service: NotificationService,
    pool: PgPool,
}

impl TaskService {
    pub fn new(
        task_repo: TaskRepository,
        notification_service: NotificationService,
        pool: PgPool,
    ) -> Self {
        Self { task_repo, notification_service, pool }
    }

    /// Cria a tarefa; sem `assigned_to` ela fica com o próprio criador.
    /// Atribuir a outra pessoa notifica o responsável (in-app + canal).
    pub async fn create_task(
        &self,
        actor: &User,
        payload: &CreateTaskPayload,
    ) -> Result<Task, AppError> {
        let assigned_to = payload.assigned_to.unwrap_or(actor.id);

        let task = self
            .task_repo
            .create_task(&self.pool, actor.id, assigned_to, payload)
            .await?;

        if assigned_to != actor.id {
            self.notification_service
                .notify(
                    assigned_to,
                    NotificationType::Info,
                    "Nova tarefa atribuída",
                    &format!("{} atribuiu a você a tarefa '{}'.", actor.full_name(), task.title),
                    Some(&format!("/tasks/{}", task.id)),
                    NotificationPriority::Normal,
                )
                .await?;
        }

        Ok(task)
    }

    pub async fn get_task(&self, actor: &User, id: Uuid) -> Result<Task, AppError> {
        let task = self
            .task_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Tarefa"))?;

        // O responsável e o criador enxergam a tarefa; admin também
        if !(actor.can_edit(task.assigned_to) || task.created_by == actor.id) {
            return Err(AppError::Forbidden);
        }
        Ok(task)
    }

    pub async fn list_tasks(
        &self,
        actor: &User,
        status: Option<TaskStatus>,
    ) -> Result<Vec<Task>, AppError> {
        let scope = if actor.is_admin() { None } else { Some(actor.id) };
        self.task_repo.list(scope, status).await
    }

    pub async fn complete_task(&self, actor: &User, id: Uuid) -> Result<Task, AppError> {
        let mut task = self.get_task(actor, id).await?;

        task.mark_completed();
        self.task_repo.save_completion(&self.pool, &task).await
    }
}
