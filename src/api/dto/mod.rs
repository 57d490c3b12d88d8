pub mod auth;
pub mod pdf;
