pub mod activity;
pub mod auth;
pub mod contact;
pub mod deal;
pub mod lead;
pub mod note;
pub mod notification;
pub mod task;
