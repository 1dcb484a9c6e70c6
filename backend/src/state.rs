//! Application state management
//!
//! Shared state passed to all request handlers via Axum's state extraction.
//!
//! # Design Principles
//!
//! 1. **Pre-compute expensive resources**: JWT keys, DB pools, HTTP clients are created once
//! 2. **Cheap cloning**: All fields use Arc or are already Clone-cheap
//! 3. **Immutable after creation**: State is read-only during request handling

use crate::ai::{GeminiClient, TextGenerator};
use crate::auth::JwtService;
use crate::config::AppConfig;
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::warn;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Pre-initialized JWT verifier with cached keys
    pub jwt: JwtService,
    /// AI text service, absent when disabled or unconfigured
    pub ai: Option<Arc<dyn TextGenerator>>,
    /// Prometheus render handle, absent when no recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create a new application state
    ///
    /// Builds the JWT verifier and, when enabled, the AI client.
    /// Call once at application startup.
    pub fn new(db: PgPool, config: AppConfig) -> Self {
        let jwt = JwtService::new(&config.auth.jwt_secret, &config.auth.audience);

        let ai: Option<Arc<dyn TextGenerator>> = if config.ai.is_configured() {
            match GeminiClient::new(&config.ai) {
                Ok(client) => Some(Arc::new(client)),
                Err(e) => {
                    warn!(error = %e, "AI client unavailable, static fallbacks only");
                    None
                }
            }
        } else {
            None
        };

        Self {
            db,
            config: Arc::new(config),
            jwt,
            ai,
            metrics: None,
        }
    }

    /// Attach a Prometheus handle for the `/metrics` endpoint
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Replace the AI text generator
    pub fn with_ai(mut self, ai: Arc<dyn TextGenerator>) -> Self {
        self.ai = Some(ai);
        self
    }

    /// Get a reference to the database pool
    #[inline]
    pub fn db(&self) -> &PgPool {
        &self.db
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get a reference to the JWT service
    #[inline]
    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }

    /// Get the AI text generator, if any
    #[inline]
    pub fn ai(&self) -> Option<&dyn TextGenerator> {
        self.ai.as_deref()
    }
}
