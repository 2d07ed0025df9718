// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

use crate::handlers;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Contacts ---
        handlers::contacts::create_contact,
        handlers::contacts::list_contacts,
        handlers::contacts::search_contacts,
        handlers::contacts::get_contact,
        handlers::contacts::update_contact,
        handlers::contacts::delete_contact,

        // --- Leads ---
        handlers::leads::create_lead,
        handlers::leads::list_leads,
        handlers::leads::get_lead,
        handlers::leads::update_lead,
        handlers::leads::update_score,
        handlers::leads::convert_lead,
        handlers::leads::delete_lead,

        // --- Deals ---
        handlers::deals::create_deal,
        handlers::deals::list_deals,
        handlers::deals::pipeline,
        handlers::deals::get_deal,
        handlers::deals::update_deal,
        handlers::deals::move_stage,
        handlers::deals::mark_won,
        handlers::deals::mark_lost,
        handlers::deals::delete_deal,

        // --- Activities ---
        handlers::activities::create_activity,
        handlers::activities::list_activities,
        handlers::activities::complete_activity,

        // --- Tasks ---
        handlers::tasks::create_task,
        handlers::tasks::list_tasks,
        handlers::tasks::get_task,
        handlers::tasks::complete_task,

        // --- Notes ---
        handlers::notes::create_note,
        handlers::notes::list_notes,

        // --- Notifications ---
        handlers::notifications::list_notifications,
        handlers::notifications::mark_read,
        handlers::notifications::mark_all_read,
        handlers::notifications::broadcast,

        // --- Dashboard ---
        handlers::dashboard::get_stats,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::UserRole,
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Contacts ---
            models::contact::ContactStatus,
            models::contact::Contact,
            models::contact::ContactResponse,
            models::contact::CreateContactPayload,
            models::contact::UpdateContactPayload,

            // --- Leads ---
            models::lead::LeadStatus,
            models::lead::LeadTemperature,
            models::lead::Lead,
            models::lead::LeadResponse,
            models::lead::CreateLeadPayload,
            models::lead::UpdateLeadPayload,
            models::lead::UpdateScorePayload,
            models::lead::ScoreResponse,

            // --- Deals ---
            models::deal::DealStage,
            models::deal::DealStatus,
            models::deal::Deal,
            models::deal::DealResponse,
            models::deal::CreateDealPayload,
            models::deal::UpdateDealPayload,
            models::deal::MoveStagePayload,
            models::deal::MarkWonPayload,
            models::deal::MarkLostPayload,
            models::deal::PipelineStageView,

            // --- Activities ---
            models::activity::ActivityType,
            models::activity::Activity,
            models::activity::ActivityResponse,
            models::activity::CreateActivityPayload,
            models::activity::CompleteActivityPayload,

            // --- Tasks ---
            models::task::TaskStatus,
            models::task::TaskPriority,
            models::task::Task,
            models::task::TaskResponse,
            models::task::CreateTaskPayload,

            // --- Notes ---
            models::note::Note,
            models::note::CreateNotePayload,

            // --- Notifications ---
            models::notification::NotificationType,
            models::notification::NotificationPriority,
            models::notification::Notification,
            models::notification::NotificationResponse,
            handlers::notifications::MarkAllReadResponse,
            handlers::notifications::BroadcastPayload,
            services::dispatch::BulkSendReport,

            // --- Dashboard ---
            services::dashboard_service::DashboardStats,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Contacts", description = "Gestão de Contatos"),
        (name = "Leads", description = "Gestão de Leads, Pontuação e Conversão"),
        (name = "Deals", description = "Funil de Vendas e Negócios"),
        (name = "Activities", description = "Linha do Tempo de Interações"),
        (name = "Tasks", description = "Tarefas e Prazos"),
        (name = "Notes", description = "Notas Vinculadas"),
        (name = "Notifications", description = "Notificações In-App"),
        (name = "Dashboard", description = "Indicadores Comerciais")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
