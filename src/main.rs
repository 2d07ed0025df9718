//src/main.rs

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::auth_middleware;

#[tokio::main]
async fn main() {
    // Inicializa o logger
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas de autenticação (públicas, exceto /me)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route(
            "/me",
            get(handlers::auth::get_me).layer(axum_middleware::from_fn_with_state(
                app_state.clone(),
                auth_middleware,
            )),
        );

    let contact_routes = Router::new()
        .route(
            "/",
            post(handlers::contacts::create_contact).get(handlers::contacts::list_contacts),
        )
        .route("/search", get(handlers::contacts::search_contacts))
        .route(
            "/{id}",
            get(handlers::contacts::get_contact)
                .put(handlers::contacts::update_contact)
                .delete(handlers::contacts::delete_contact),
        );

    let lead_routes = Router::new()
        .route(
            "/",
            post(handlers::leads::create_lead).get(handlers::leads::list_leads),
        )
        .route(
            "/{id}",
            get(handlers::leads::get_lead)
                .put(handlers::leads::update_lead)
                .delete(handlers::leads::delete_lead),
        )
        .route("/{id}/score", post(handlers::leads::update_score))
        .route("/{id}/convert", post(handlers::leads::convert_lead));

    let deal_routes = Router::new()
        .route(
            "/",
            post(handlers::deals::create_deal).get(handlers::deals::list_deals),
        )
        .route("/pipeline", get(handlers::deals::pipeline))
        .route(
            "/{id}",
            get(handlers::deals::get_deal)
                .put(handlers::deals::update_deal)
                .delete(handlers::deals::delete_deal),
        )
        .route("/{id}/move-stage", post(handlers::deals::move_stage))
        .route("/{id}/mark-won", post(handlers::deals::mark_won))
        .route("/{id}/mark-lost", post(handlers::deals::mark_lost));

    let activity_routes = Router::new()
        .route(
            "/",
            post(handlers::activities::create_activity).get(handlers::activities::list_activities),
        )
        .route(
            "/{id}/complete",
            post(handlers::activities::complete_activity),
        );

    let task_routes = Router::new()
        .route(
            "/",
            post(handlers::tasks::create_task).get(handlers::tasks::list_tasks),
        )
        .route("/{id}", get(handlers::tasks::get_task))
        .route("/{id}/complete", post(handlers::tasks::complete_task));

    let note_routes = Router::new().route(
        "/",
        post(handlers::notes::create_note).get(handlers::notes::list_notes),
    );

    let notification_routes = Router::new()
        .route("/", get(handlers::notifications::list_notifications))
        .route("/{id}/read", post(handlers::notifications::mark_read))
        .route("/read-all", post(handlers::notifications::mark_all_read))
        .route("/broadcast", post(handlers::notifications::broadcast));

    let dashboard_routes = Router::new().route("/", get(handlers::dashboard::get_stats));

    // Tudo que é CRM exige usuário autenticado
    let protected_routes = Router::new()
        .nest("/api/contacts", contact_routes)
        .nest("/api/leads", lead_routes)
        .nest("/api/deals", deal_routes)
        .nest("/api/activities", activity_routes)
        .nest("/api/tasks", task_routes)
        .nest("/api/notes", note_routes)
        .nest("/api/notifications", notification_routes)
        .nest("/api/dashboard", dashboard_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .nest("/api/auth", auth_routes)
        .merge(protected_routes)
        .with_state(app_state);

    // Inicia o servidor
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.expect("Erro no servidor Axum");
}
