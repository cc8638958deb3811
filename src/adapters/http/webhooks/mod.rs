//! Payment and compliance webhook endpoints.

mod dto;
mod handlers;
mod routes;

pub use routes::webhook_routes;
