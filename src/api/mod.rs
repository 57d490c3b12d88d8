/*
 * Responsibility
 * - HTTP 層 (routes / handlers / dto / extractors) の入口
 * - routes() の re-export
 */
pub mod dto;
pub mod extractors;
pub mod handlers;
mod routes;

pub use routes::routes;
