//! Approval workflow API
//!
//! Actions are not persisted. The response carries the new history item and
//! the record as it looks with that item applied.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::audit::AuditAction;
use crate::error::{ApiError, ApiResult};
use crate::models::{ApprovalHistoryItem, Feedback, Record};
use crate::workflow::{self, FeedbackInput};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ApproveRequest {
    pub actor: String,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RejectRequest {
    pub actor: String,
    pub reason: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForwardRequest {
    pub actor: String,
    pub recipient: String,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Result of an approve/reject/forward action
#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub item: ApprovalHistoryItem,
    pub record: Record,
}

async fn load(state: &AppState, id: &str) -> ApiResult<Record> {
    state
        .lookup
        .get_by_id(id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("record {}", id)))
}

async fn finish(
    state: &AppState,
    mut record: Record,
    item: ApprovalHistoryItem,
    action: AuditAction,
    detail: Option<String>,
) -> Json<ActionResponse> {
    state
        .audit
        .record(&item.actor, action, &record.id, detail)
        .await;
    workflow::merge_into(&mut record, item.clone());
    Json(ActionResponse { item, record })
}

/// POST /api/records/:id/approve
pub async fn approve_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ApproveRequest>,
) -> ApiResult<Json<ActionResponse>> {
    let record = load(&state, &id).await?;
    let item = workflow::approve(&record, &req.actor, req.comment)?;
    let detail = item.comment.clone();
    Ok(finish(&state, record, item, AuditAction::Approve, detail).await)
}

/// POST /api/records/:id/reject
pub async fn reject_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<RejectRequest>,
) -> ApiResult<Json<ActionResponse>> {
    let record = load(&state, &id).await?;
    let item = workflow::reject(&record, &req.actor, &req.reason)?;
    let detail = item.comment.clone();
    Ok(finish(&state, record, item, AuditAction::Reject, detail).await)
}

/// POST /api/records/:id/forward
pub async fn forward_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ForwardRequest>,
) -> ApiResult<Json<ActionResponse>> {
    let record = load(&state, &id).await?;
    let item = workflow::forward(&record, &req.actor, &req.recipient, req.comment)?;
    let detail = item.forwarded_to.as_ref().map(|to| format!("to {}", to));
    Ok(finish(&state, record, item, AuditAction::Forward, detail).await)
}

/// POST /api/records/:id/feedback
pub async fn submit_feedback(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<FeedbackInput>,
) -> ApiResult<Json<Feedback>> {
    let record = load(&state, &id).await?;
    let feedback = workflow::submit_feedback(&record, input)?;
    state
        .audit
        .record(
            &feedback.author,
            AuditAction::Feedback,
            &record.id,
            feedback.field.clone(),
        )
        .await;
    Ok(Json(feedback))
}
