pub mod activity_service;
pub use activity_service::ActivityService;
pub mod auth;
pub use auth::AuthService;
pub mod contact_service;
pub use contact_service::ContactService;
pub mod dashboard_service;
pub use dashboard_service::DashboardService;
pub mod deal_service;
pub use deal_service::DealService;
pub mod dispatch;
pub mod lead_service;
pub use lead_service::LeadService;
pub mod note_service;
pub use note_service::NoteService;
pub mod notification_service;
pub use notification_service::NotificationService;
pub mod task_service;
pub use task_service::TaskService;
