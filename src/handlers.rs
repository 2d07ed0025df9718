pub mod activities;
pub mod auth;
pub mod contacts;
pub mod dashboard;
pub mod deals;
pub mod leads;
pub mod notes;
pub mod notifications;
pub mod tasks;
