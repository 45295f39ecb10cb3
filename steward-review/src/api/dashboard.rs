//! Dashboard API: approval queue, summary statistics, audit trail

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::audit::AuditEntry;
use crate::queue::{approval_queue, QueueItem};
use crate::stats::DashboardStats;
use crate::AppState;

/// Largest accepted `limit` for the audit trail
const MAX_AUDIT_LIMIT: usize = 500;

#[derive(Debug, Deserialize)]
pub struct AuditQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    50
}

/// GET /api/queue
pub async fn get_queue(State(state): State<AppState>) -> Json<Vec<QueueItem>> {
    let records = state.lookup.get_all().await;
    Json(approval_queue(&records))
}

/// GET /api/stats
pub async fn get_stats(State(state): State<AppState>) -> Json<DashboardStats> {
    let records = state.lookup.get_all().await;
    Json(DashboardStats::from_records(&records))
}

/// GET /api/audit?limit=N
pub async fn get_audit(
    State(state): State<AppState>,
    Query(query): Query<AuditQuery>,
) -> Json<Vec<AuditEntry>> {
    Json(state.audit.recent(query.limit.min(MAX_AUDIT_LIMIT)).await)
}
