//! Cloud migration service: library crate shared by the binary and the
//! integration tests in `tests/`.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod errors;
pub mod gcom;
pub mod metrics;
pub mod models;
pub mod service;
pub mod store;

/// Shared application state passed to handlers and middleware.
pub struct AppState {
    pub service: Arc<dyn service::CloudMigrationService>,
    pub admin_key: Option<String>,
}
