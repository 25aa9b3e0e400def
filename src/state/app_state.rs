//! Application state shared across handlers

use std::sync::Arc;

use axum::extract::FromRef;

use crate::auth::AuthService;
use crate::loan::LifecycleService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub lifecycle_service: Arc<LifecycleService>,
    pub auth_service: Arc<AuthService>,
    /// Backend name reported by the health endpoint
    pub storage_backend: &'static str,
}

impl AppState {
    pub fn new(
        lifecycle_service: Arc<LifecycleService>,
        auth_service: Arc<AuthService>,
        storage_backend: &'static str,
    ) -> Self {
        Self {
            lifecycle_service,
            auth_service,
            storage_backend,
        }
    }
}

impl FromRef<AppState> for Arc<LifecycleService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.lifecycle_service.clone()
    }
}

impl FromRef<AppState> for Arc<AuthService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.auth_service.clone()
    }
}
