pub mod auth;
pub mod database;
pub mod errors;
pub mod events;
pub mod graphql;
pub mod pagination;
pub mod server;
pub mod services;
