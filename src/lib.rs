pub mod api;
pub mod auth;
pub mod commands;
pub mod config;
pub mod handlers;
pub mod html;
pub mod observability;
pub mod priority;
pub mod ramlog;
pub mod status;
