// src/config.rs

use std::{env, sync::Arc, time::Duration};

use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{
    db::{
        ActivityRepository, ContactRepository, DealRepository, LeadRepository, NoteRepository,
        NotificationRepository, TaskRepository, UserRepository,
    },
    services::{
        ActivityService, AuthService, ContactService, DashboardService, DealService, LeadService,
        NoteService, NotificationService, TaskService,
        dispatch::LogChannel,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub contact_service: ContactService,
    pub lead_service: LeadService,
    pub deal_service: DealService,
    pub activity_service: ActivityService,
    pub task_service: TaskService,
    pub note_service: NoteService,
    pub notification_service: NotificationService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let contact_repo = ContactRepository::new(db_pool.clone());
        let lead_repo = LeadRepository::new(db_pool.clone());
        let deal_repo = DealRepository::new(db_pool.clone());
        let activity_repo = ActivityRepository::new(db_pool.clone());
        let task_repo = TaskRepository::new(db_pool.clone());
        let note_repo = NoteRepository::new(db_pool.clone());
        let notification_repo = NotificationRepository::new(db_pool.clone());

        let channel = Arc::new(LogChannel);

        let auth_service = AuthService::new(user_repo.clone(), jwt_secret, db_pool.clone());
        let contact_service = ContactService::new(
            contact_repo.clone(),
            deal_repo.clone(),
            lead_repo.clone(),
            db_pool.clone(),
        );
        let lead_service = LeadService::new(
            lead_repo.clone(),
            contact_repo.clone(),
            activity_repo.clone(),
            db_pool.clone(),
        );
        let deal_service = DealService::new(
            deal_repo.clone(),
            contact_repo.clone(),
            notification_repo.clone(),
            db_pool.clone(),
        );
        let activity_service = ActivityService::new(activity_repo.clone(), db_pool.clone());
        let note_service = NoteService::new(note_repo, db_pool.clone());
        let notification_service = NotificationService::new(
            notification_repo,
            user_repo,
            channel,
            db_pool.clone(),
        );
        let task_service = TaskService::new(
            task_repo.clone(),
            notification_service.clone(),
            db_pool.clone(),
        );
        let dashboard_service = DashboardService::new(
            contact_repo,
            lead_repo,
            deal_repo,
            task_repo,
            activity_repo,
        );

        Ok(Self {
            db_pool,
            auth_service,
            contact_service,
            lead_service,
            deal_service,
            activity_service,
            task_service,
            note_service,
            notification_service,
            dashboard_service,
        })
    }
}
