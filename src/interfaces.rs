pub mod body_limit;
pub mod handlers;
pub mod repositories;
pub mod routes;
