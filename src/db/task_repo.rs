// src/db/task_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::task::{CreateTaskPayload, Task, TaskPriority, TaskStatus},
};

const TASK_COLUMNS: &str = "id, title, description, priority, status, due_date, completed_at, \
     assigned_to, created_by, contact_id, lead_id, deal_id, reminder_sent, \
     created_at, updated_at";

#[derive(Clone)]
pub struct TaskRepository {
    pool: PgPool,
}

impl TaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_task<'e, E>(
        &self,
        executor: E,
        created_by: Uuid,
        assigned_to: Uuid,
        payload: &CreateTaskPayload,
    ) -> Result<Task, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "INSERT INTO tasks (\
                title, description, priority, due_date, assigned_to, created_by, \
                contact_id, lead_id, deal_id\
             ) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {TASK_COLUMNS}"
        );

        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(&payload.title)
            .bind(&payload.description)
            .bind(payload.priority.unwrap_or(TaskPriority::Medium))
            .bind(payload.due_date)
            .bind(assigned_to)
            .bind(created_by)
            .bind(payload.contact_id)
            .bind(payload.lead_id)
            .bind(payload.deal_id)
            .fetch_one(executor)
            .await?;

        Ok(task)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, AppError> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1");
        let maybe_task = sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_task)
    }

    pub async fn list(
        &self,
        assigned_to: Option<Uuid>,
        status: Option<TaskStatus>,
    ) -> Result<Vec<Task>, AppError> {
        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM tasks \
             WHERE ($1::uuid IS NULL OR assigned_to = $1) \
               AND ($2::task_status IS NULL OR status = $2) \
             ORDER BY due_date ASC NULLS LAST, created_at DESC"
        );
        let tasks = sqlx::query_as::<_, Task>(&sql)
            .bind(assigned_to)
            .bind(status)
            .fetch_all(&self.pool)
            .await?;
        Ok(tasks)
    }

    /// Tarefas vencidas e não concluídas, para o dashboard.
    pub async fn overdue(&self, assigned_to: Option<Uuid>, limit: i64) -> Result<Vec<Task>, AppError> {
        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM tasks \
             WHERE ($1::uuid IS NULL OR assigned_to = $1) \
               AND due_date < NOW() \
               AND status <> 'completed' \
             ORDER BY due_date ASC \
             LIMIT $2"
        );
        let tasks = sqlx::query_as::<_, Task>(&sql)
            .bind(assigned_to)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(tasks)
    }

    /// Persiste o resultado de `Task::mark_completed`.
    pub async fn save_completion<'e, E>(&self, executor: E, task: &Task) -> Result<Task, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "UPDATE tasks SET status = $2, completed_at = $3, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {TASK_COLUMNS}"
        );

        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(task.id)
            .bind(task.status)
            .bind(task.completed_at)
            .fetch_one(executor)
            .await?;

        Ok(task)
    }

    pub async fn count_by_status(
        &self,
        assigned_to: Option<Uuid>,
        status: TaskStatus,
    ) -> Result<i64, AppError> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM tasks \
             WHERE ($1::uuid IS NULL OR assigned_to = $1) AND status = $2",
        )
        .bind(assigned_to)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }
}
