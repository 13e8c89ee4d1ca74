//! Application state shared by the HTTP handlers.

use std::sync::Arc;

use snapsight_core::AppError;

use crate::error::HttpAppError;
use crate::services::ingress::IngressHandler;

pub struct AppState {
    pub ingress: Arc<IngressHandler>,
    /// Taken from [`snapsight_core::Config::is_production`]; hides internal error details.
    pub is_production: bool,
}

impl AppState {
    pub fn new(ingress: IngressHandler, is_production: bool) -> Self {
        Self {
            ingress: Arc::new(ingress),
            is_production,
        }
    }

    pub fn http_error(&self, error: AppError) -> HttpAppError {
        HttpAppError::new(error, self.is_production)
    }
}
