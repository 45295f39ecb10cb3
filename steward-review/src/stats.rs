//! Dashboard summary statistics

use crate::models::{ConfidenceLevel, Record, RecordStatus};
use serde::Serialize;
use std::collections::BTreeMap;

/// Counts shown on the console dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total: usize,
    pub by_status: BTreeMap<String, usize>,
    pub by_confidence: BTreeMap<String, usize>,
    /// approved / (approved + rejected); 0 when nothing is decided
    pub approval_rate: f64,
    pub feedback_count: usize,
}

impl DashboardStats {
    pub fn from_records(records: &[Record]) -> Self {
        let mut by_status: BTreeMap<String, usize> = RecordStatus::ALL
            .iter()
            .map(|s| (s.as_str().to_string(), 0))
            .collect();
        let mut by_confidence: BTreeMap<String, usize> = ConfidenceLevel::ALL
            .iter()
            .map(|c| (c.as_str().to_string(), 0))
            .collect();

        for record in records {
            *by_status.entry(record.status.as_str().to_string()).or_default() += 1;
            *by_confidence
                .entry(record.confidence.overall.as_str().to_string())
                .or_default() += 1;
        }

        let approved = by_status.get("approved").copied().unwrap_or(0);
        let rejected = by_status.get("rejected").copied().unwrap_or(0);
        let decided = approved + rejected;
        let approval_rate = if decided == 0 {
            0.0
        } else {
            approved as f64 / decided as f64
        };

        Self {
            total: records.len(),
            by_status,
            by_confidence,
            approval_rate,
            feedback_count: records.iter().map(|r| r.feedback.len()).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Confidence;
    use chrono::Utc;
    use serde_json::json;

    fn record(status: RecordStatus, overall: ConfidenceLevel) -> Record {
        let now = Utc::now();
        Record {
            id: "rec-x".to_string(),
            name: "X".to_string(),
            source_file_path: String::new(),
            transformed_file_path: String::new(),
            transformed_data: json!({}),
            status,
            confidence: Confidence {
                overall,
                fields: BTreeMap::new(),
            },
            created_at: now,
            updated_at: now,
            approval_history: Vec::new(),
            feedback: Vec::new(),
        }
    }

    #[test]
    fn test_counts_and_rate() {
        let records = vec![
            record(RecordStatus::Approved, ConfidenceLevel::High),
            record(RecordStatus::Approved, ConfidenceLevel::Low),
            record(RecordStatus::Approved, ConfidenceLevel::High),
            record(RecordStatus::Rejected, ConfidenceLevel::Medium),
            record(RecordStatus::Pending, ConfidenceLevel::High),
        ];
        let stats = DashboardStats::from_records(&records);
        assert_eq!(stats.total, 5);
        assert_eq!(stats.by_status["approved"], 3);
        assert_eq!(stats.by_status["pending"], 1);
        assert_eq!(stats.by_confidence["high"], 3);
        assert!((stats.approval_rate - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_has_zero_buckets() {
        let stats = DashboardStats::from_records(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.by_status.len(), 3);
        assert_eq!(stats.by_status["rejected"], 0);
        assert_eq!(stats.approval_rate, 0.0);
    }
}
