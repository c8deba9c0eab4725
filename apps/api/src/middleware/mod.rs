// Tower / axum middleware applied around the route handlers.

pub mod auth;
pub mod rate_limit;
pub mod security;
