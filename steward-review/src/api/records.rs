//! Record listing and lookup API
//!
//! Listing is filtered, sorted and paginated (20 records/page). Single
//! record lookup never 404s while the catalog has entries.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::filters::{RecordFilter, SortField, SortOrder};
use crate::lookup::LookupResolution;
use crate::models::{ConfidenceLevel, Record, RecordStatus};
use crate::pagination::{calculate_pagination, PAGE_SIZE};
use crate::AppState;

/// Query parameters for record listing
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    pub page: usize,
    pub status: Option<RecordStatus>,
    pub confidence: Option<ConfidenceLevel>,
    pub search: Option<String>,
    pub sort: Option<SortField>,
    pub order: Option<SortOrder>,
}

fn default_page() -> usize {
    1
}

impl ListQuery {
    fn filter(&self) -> RecordFilter {
        RecordFilter {
            status: self.status,
            confidence: self.confidence,
            search: self.search.clone(),
            sort: self.sort.unwrap_or_default(),
            order: self.order.unwrap_or_default(),
        }
    }
}

/// Paginated record listing
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordListResponse {
    pub total_results: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub records: Vec<Record>,
}

/// GET /api/records
pub async fn list_records(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<RecordListResponse>> {
    let records = query.filter().apply(state.lookup.get_all().await);
    let pagination = calculate_pagination(records.len(), query.page);

    tracing::debug!(
        total = records.len(),
        page = pagination.page,
        "Listing records"
    );

    Ok(Json(RecordListResponse {
        total_results: records.len(),
        page: pagination.page,
        page_size: PAGE_SIZE,
        total_pages: pagination.total_pages,
        records: pagination.slice(&records).to_vec(),
    }))
}

/// GET /api/records/:id
pub async fn get_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Record>> {
    state
        .lookup
        .get_by_id(&id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("record {}", id)))
}

/// GET /api/records/:id/resolution
///
/// Same lookup as [`get_record`], reporting which tier matched and, for the
/// heuristic tier, the full candidate ranking.
pub async fn get_resolution(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<LookupResolution>> {
    state
        .lookup
        .resolve(&id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("record {}", id)))
}
