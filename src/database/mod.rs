pub mod comments;
pub mod manager;
pub mod models;
pub mod requests;
pub mod roles;
