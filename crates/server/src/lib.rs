pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod store_factory;
