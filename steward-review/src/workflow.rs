//! Approval workflow actions and feedback capture
//!
//! Actions never mutate or persist records. Each returns a transient item
//! which the caller merges into its own view (see [`merge_into`]).

use crate::models::{ApprovalAction, ApprovalHistoryItem, Feedback, Record, RecordStatus};
use serde::Deserialize;
use steward_common::{Error, Result};
use uuid::Uuid;

/// Feedback submission
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackInput {
    pub author: String,
    #[serde(default)]
    pub field: Option<String>,
    pub comment: String,
    #[serde(default)]
    pub rating: Option<u8>,
}

fn require(value: &str, what: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidInput(format!("{} must not be empty", what)));
    }
    Ok(trimmed.to_string())
}

fn clean_comment(comment: Option<String>) -> Option<String> {
    comment
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}

fn history_item(
    action: ApprovalAction,
    actor: String,
    comment: Option<String>,
    forwarded_to: Option<String>,
) -> ApprovalHistoryItem {
    ApprovalHistoryItem {
        id: Uuid::new_v4(),
        action,
        actor,
        timestamp: steward_common::time::now(),
        comment,
        forwarded_to,
    }
}

/// Approve `record`
pub fn approve(record: &Record, actor: &str, comment: Option<String>) -> Result<ApprovalHistoryItem> {
    let actor = require(actor, "actor")?;
    tracing::info!(record_id = %record.id, actor = %actor, "Record approved");
    Ok(history_item(
        ApprovalAction::Approved,
        actor,
        clean_comment(comment),
        None,
    ))
}

/// Reject `record`; a reason is mandatory
pub fn reject(record: &Record, actor: &str, reason: &str) -> Result<ApprovalHistoryItem> {
    let actor = require(actor, "actor")?;
    let reason = require(reason, "reason")?;
    tracing::info!(record_id = %record.id, actor = %actor, "Record rejected");
    Ok(history_item(
        ApprovalAction::Rejected,
        actor,
        Some(reason),
        None,
    ))
}

/// Forward `record` to another reviewer
pub fn forward(
    record: &Record,
    actor: &str,
    recipient: &str,
    comment: Option<String>,
) -> Result<ApprovalHistoryItem> {
    let actor = require(actor, "actor")?;
    let recipient = require(recipient, "recipient")?;
    if recipient.eq_ignore_ascii_case(&actor) {
        return Err(Error::InvalidInput(
            "cannot forward a record to yourself".to_string(),
        ));
    }
    tracing::info!(record_id = %record.id, actor = %actor, recipient = %recipient, "Record forwarded");
    Ok(history_item(
        ApprovalAction::Forwarded,
        actor,
        clean_comment(comment),
        Some(recipient),
    ))
}

/// Capture reviewer feedback on `record`
///
/// `field`, when given, must be one of the record's confidence fields;
/// `rating`, when given, must be within 1..=5.
pub fn submit_feedback(record: &Record, input: FeedbackInput) -> Result<Feedback> {
    let author = require(&input.author, "author")?;
    let comment = require(&input.comment, "comment")?;

    if let Some(field) = &input.field {
        if !record.confidence.fields.contains_key(field) {
            return Err(Error::InvalidInput(format!("unknown field: {}", field)));
        }
    }

    if let Some(rating) = input.rating {
        if !(1..=5).contains(&rating) {
            return Err(Error::InvalidInput(format!(
                "rating must be between 1 and 5, got {}",
                rating
            )));
        }
    }

    tracing::info!(record_id = %record.id, author = %author, "Feedback submitted");

    Ok(Feedback {
        id: Uuid::new_v4(),
        record_id: record.id.clone(),
        author,
        field: input.field,
        comment,
        rating: input.rating,
        created_at: steward_common::time::now(),
    })
}

/// Apply a history item to a caller-held copy of a record
///
/// Approve/reject set the status; forward leaves it unchanged.
pub fn merge_into(record: &mut Record, item: ApprovalHistoryItem) {
    match item.action {
        ApprovalAction::Approved => record.status = RecordStatus::Approved,
        ApprovalAction::Rejected => record.status = RecordStatus::Rejected,
        ApprovalAction::Forwarded => {}
    }
    record.updated_at = item.timestamp;
    record.approval_history.push(item);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Confidence, ConfidenceLevel};
    use serde_json::json;
    use std::collections::BTreeMap;

    fn pending_record() -> Record {
        let mut fields = BTreeMap::new();
        fields.insert("title".to_string(), ConfidenceLevel::High);
        let now = steward_common::time::now();
        Record {
            id: "rec-test".to_string(),
            name: "Test".to_string(),
            source_file_path: "/pdfs/Test.pdf".to_string(),
            transformed_file_path: "/transformed/Test.json".to_string(),
            transformed_data: json!({}),
            status: RecordStatus::Pending,
            confidence: Confidence {
                overall: ConfidenceLevel::Medium,
                fields,
            },
            created_at: now,
            updated_at: now,
            approval_history: Vec::new(),
            feedback: Vec::new(),
        }
    }

    #[test]
    fn test_approve_and_merge() {
        let mut record = pending_record();
        let item = approve(&record, " Dana ", Some("  ".to_string())).unwrap();
        assert_eq!(item.action, ApprovalAction::Approved);
        assert_eq!(item.actor, "Dana");
        assert_eq!(item.comment, None);

        merge_into(&mut record, item);
        assert_eq!(record.status, RecordStatus::Approved);
        assert!(record.history_consistent());
    }

    #[test]
    fn test_reject_requires_reason() {
        let record = pending_record();
        assert!(matches!(reject(&record, "Dana", " "), Err(Error::InvalidInput(_))));

        let item = reject(&record, "Dana", "Wrong revision").unwrap();
        assert_eq!(item.comment.as_deref(), Some("Wrong revision"));
    }

    #[test]
    fn test_forward_validation() {
        let record = pending_record();
        assert!(forward(&record, "Dana", "", None).is_err());
        assert!(forward(&record, "Dana", "dana", None).is_err());

        let mut copy = record.clone();
        let item = forward(&record, "Dana", "Priya", Some("Please check".to_string())).unwrap();
        assert_eq!(item.forwarded_to.as_deref(), Some("Priya"));
        merge_into(&mut copy, item);
        assert_eq!(copy.status, RecordStatus::Pending);
        assert_eq!(copy.approval_history.len(), 1);
    }

    #[test]
    fn test_actions_do_not_touch_record() {
        let record = pending_record();
        let before = record.clone();
        approve(&record, "Dana", None).unwrap();
        reject(&record, "Dana", "No").unwrap();
        assert_eq!(record, before);
    }

    #[test]
    fn test_feedback_validation() {
        let record = pending_record();
        let input = |field: Option<&str>, rating: Option<u8>| FeedbackInput {
            author: "Priya".to_string(),
            field: field.map(str::to_string),
            comment: "Looks off".to_string(),
            rating,
        };

        assert!(submit_feedback(&record, input(Some("nope"), None)).is_err());
        assert!(submit_feedback(&record, input(None, Some(0))).is_err());
        assert!(submit_feedback(&record, input(None, Some(6))).is_err());

        let fb = submit_feedback(&record, input(Some("title"), Some(4))).unwrap();
        assert_eq!(fb.record_id, "rec-test");
        assert_eq!(fb.field.as_deref(), Some("title"));
        assert_eq!(fb.rating, Some(4));
    }
}
