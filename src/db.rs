pub mod activity_repo;
pub use activity_repo::ActivityRepository;
pub mod contact_repo;
pub use contact_repo::ContactRepository;
pub mod deal_repo;
pub use deal_repo::DealRepository;
pub mod lead_repo;
pub use lead_repo::LeadRepository;
pub mod note_repo;
pub use note_repo::NoteRepository;
pub mod notification_repo;
pub use notification_repo::NotificationRepository;
pub mod task_repo;
pub use task_repo::TaskRepository;
pub mod user_repo;
pub use user_repo::UserRepository;
