//! Approval queue derivation
//!
//! Priority comes from filename keywords and is placeholder business logic:
//! `ARTWORKS` -> high, `Component` -> medium, anything else -> low, and a
//! low overall confidence raises the level by one.

use crate::models::{ConfidenceLevel, Record, RecordStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Review priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    fn raised(self) -> Self {
        match self {
            Priority::Low => Priority::Medium,
            Priority::Medium | Priority::High => Priority::High,
        }
    }
}

/// One pending record awaiting review
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueItem {
    pub record_id: String,
    pub name: String,
    pub priority: Priority,
    pub confidence: ConfidenceLevel,
    pub created_at: DateTime<Utc>,
}

/// Priority for one record
pub fn priority_for(record: &Record) -> Priority {
    let base = if record.name.contains("ARTWORKS") {
        Priority::High
    } else if record.name.contains("Component") {
        Priority::Medium
    } else {
        Priority::Low
    };

    if record.confidence.overall == ConfidenceLevel::Low {
        base.raised()
    } else {
        base
    }
}

/// Pending records, highest priority first, oldest first within a priority
pub fn approval_queue(records: &[Record]) -> Vec<QueueItem> {
    let mut items: Vec<QueueItem> = records
        .iter()
        .filter(|r| r.status == RecordStatus::Pending)
        .map(|r| QueueItem {
            record_id: r.id.clone(),
            name: r.name.clone(),
            priority: priority_for(r),
            confidence: r.confidence.overall,
            created_at: r.created_at,
        })
        .collect();

    items.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| a.created_at.cmp(&b.created_at))
    });
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Confidence;
    use chrono::{Duration, TimeZone};
    use serde_json::json;
    use std::collections::BTreeMap;

    fn record(name: &str, status: RecordStatus, overall: ConfidenceLevel, age_days: i64) -> Record {
        let anchor = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();
        let created = anchor - Duration::days(age_days);
        Record {
            id: format!("rec-{}", name.to_lowercase().replace(' ', "-")),
            name: name.to_string(),
            source_file_path: String::new(),
            transformed_file_path: String::new(),
            transformed_data: json!({}),
            status,
            confidence: Confidence {
                overall,
                fields: BTreeMap::new(),
            },
            created_at: created,
            updated_at: created,
            approval_history: Vec::new(),
            feedback: Vec::new(),
        }
    }

    #[test]
    fn test_priority_rules() {
        use ConfidenceLevel::*;
        assert_eq!(priority_for(&record("ARTWORKS X", RecordStatus::Pending, High, 1)), Priority::High);
        assert_eq!(priority_for(&record("Jax Component", RecordStatus::Pending, High, 1)), Priority::Medium);
        assert_eq!(priority_for(&record("Jax Component", RecordStatus::Pending, Low, 1)), Priority::High);
        assert_eq!(priority_for(&record("Plain", RecordStatus::Pending, Medium, 1)), Priority::Low);
        assert_eq!(priority_for(&record("Plain", RecordStatus::Pending, Low, 1)), Priority::Medium);
    }

    #[test]
    fn test_queue_filters_and_orders() {
        use ConfidenceLevel::*;
        let records = vec![
            record("Plain Old", RecordStatus::Pending, High, 10),
            record("Done", RecordStatus::Approved, Low, 5),
            record("ARTWORKS New", RecordStatus::Pending, High, 1),
            record("ARTWORKS Old", RecordStatus::Pending, High, 9),
            record("Plain New", RecordStatus::Pending, High, 2),
        ];

        let queue = approval_queue(&records);
        let names: Vec<&str> = queue.iter().map(|q| q.name.as_str()).collect();
        assert_eq!(names, ["ARTWORKS Old", "ARTWORKS New", "Plain Old", "Plain New"]);
    }
}
