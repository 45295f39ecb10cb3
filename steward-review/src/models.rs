//! Record data model returned to the review console
//!
//! All types serialize with camelCase field names, which is what the console
//! pages consume.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Review status of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Pending,
    Approved,
    Rejected,
}

impl RecordStatus {
    pub const ALL: [RecordStatus; 3] = [
        RecordStatus::Pending,
        RecordStatus::Approved,
        RecordStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Pending => "pending",
            RecordStatus::Approved => "approved",
            RecordStatus::Rejected => "rejected",
        }
    }

    /// History action implied by a decided status
    pub fn implied_action(&self) -> Option<ApprovalAction> {
        match self {
            RecordStatus::Pending => None,
            RecordStatus::Approved => Some(ApprovalAction::Approved),
            RecordStatus::Rejected => Some(ApprovalAction::Rejected),
        }
    }
}

/// Extraction confidence level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    pub const ALL: [ConfidenceLevel; 3] = [
        ConfidenceLevel::High,
        ConfidenceLevel::Medium,
        ConfidenceLevel::Low,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLevel::High => "high",
            ConfidenceLevel::Medium => "medium",
            ConfidenceLevel::Low => "low",
        }
    }
}

/// Overall and per-field confidence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Confidence {
    pub overall: ConfidenceLevel,
    pub fields: BTreeMap<String, ConfidenceLevel>,
}

/// Workflow action recorded in approval history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalAction {
    Approved,
    Rejected,
    Forwarded,
}

impl ApprovalAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalAction::Approved => "approved",
            ApprovalAction::Rejected => "rejected",
            ApprovalAction::Forwarded => "forwarded",
        }
    }
}

/// One entry in a record's approval history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalHistoryItem {
    pub id: Uuid,
    pub action: ApprovalAction,
    pub actor: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Recipient, only for forwarded items
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forwarded_to: Option<String>,
}

/// Reviewer feedback on a record or one of its fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: Uuid,
    pub record_id: String,
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub comment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    pub created_at: DateTime<Utc>,
}

/// One processed document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: String,
    pub name: String,
    pub source_file_path: String,
    pub transformed_file_path: String,
    pub transformed_data: Value,
    pub status: RecordStatus,
    pub confidence: Confidence,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub approval_history: Vec<ApprovalHistoryItem>,
    pub feedback: Vec<Feedback>,
}

impl Record {
    /// History is non-empty iff the record has been decided
    pub fn history_consistent(&self) -> bool {
        self.approval_history.is_empty() == (self.status == RecordStatus::Pending)
    }
}
