// Library exports for integration tests
pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod form;
pub mod handlers;
pub mod models;
pub mod templates;
