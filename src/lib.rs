pub mod auth;
pub mod cleanup;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod scoring;
pub mod state;
