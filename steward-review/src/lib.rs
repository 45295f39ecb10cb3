//! steward-review library - record synthesis, lookup and review workflow
//!
//! Serves the data steward review console: AI-transformed document records
//! with their source/companion paths, review status and confidence, plus the
//! approval workflow around them.

use axum::Router;
use std::sync::Arc;
use steward_common::config::TomlConfig;
use steward_common::Result;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod audit;
pub mod catalog;
pub mod content;
pub mod error;
pub mod fallback;
pub mod filters;
pub mod lookup;
pub mod models;
pub mod pagination;
pub mod queue;
pub mod resolver;
pub mod slug;
pub mod stats;
pub mod synthesizer;
pub mod workflow;

pub use crate::error::{ApiError, ApiResult};

use audit::AuditLog;
use catalog::Catalog;
use lookup::RecordLookup;
use resolver::FileResolver;
use synthesizer::Synthesizer;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Record synthesis and lookup over the known catalog
    pub lookup: RecordLookup,
    /// Reviewer action trail
    pub audit: Arc<AuditLog>,
}

impl AppState {
    /// Create new application state
    pub fn new(lookup: RecordLookup, audit: Arc<AuditLog>) -> Self {
        Self { lookup, audit }
    }

    /// Wire resolver, content source, synthesizer and catalog from configuration
    pub fn from_config(config: &TomlConfig) -> Result<Self> {
        let resolver = FileResolver::new(&config.resolver);
        let source = content::from_config(&config.content)?;
        let synthesizer = Synthesizer::new(resolver, source, config.synthesis.seed);
        let catalog = Catalog::from_config(&config.catalog);

        tracing::info!(
            filenames = catalog.len(),
            content_mode = ?config.content.mode,
            "Record service configured"
        );

        let lookup = RecordLookup::new(Arc::new(synthesizer), Arc::new(catalog));
        Ok(Self::new(lookup, Arc::new(AuditLog::default())))
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let records = Router::new()
        .route("/api/records", get(api::list_records))
        .route("/api/records/:id", get(api::get_record))
        .route("/api/records/:id/resolution", get(api::get_resolution))
        .route("/api/records/:id/approve", post(api::approve_record))
        .route("/api/records/:id/reject", post(api::reject_record))
        .route("/api/records/:id/forward", post(api::forward_record))
        .route("/api/records/:id/feedback", post(api::submit_feedback));

    let dashboard = Router::new()
        .route("/api/queue", get(api::get_queue))
        .route("/api/stats", get(api::get_stats))
        .route("/api/audit", get(api::get_audit))
        .route("/api/buildinfo", get(api::get_build_info));

    Router::new()
        .merge(records)
        .merge(dashboard)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
