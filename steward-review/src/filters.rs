//! Record filtering and sorting for list views

use crate::models::{ConfidenceLevel, Record, RecordStatus};
use serde::Deserialize;
use std::cmp::Ordering;

/// Sortable columns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Name,
    #[default]
    CreatedAt,
    UpdatedAt,
    Status,
}

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// List view filter; every criterion is optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RecordFilter {
    pub status: Option<RecordStatus>,
    pub confidence: Option<ConfidenceLevel>,
    /// Case-insensitive substring over name and id
    pub search: Option<String>,
    pub sort: SortField,
    pub order: SortOrder,
}

impl RecordFilter {
    pub fn matches(&self, record: &Record) -> bool {
        if let Some(status) = self.status {
            if record.status != status {
                return false;
            }
        }
        if let Some(confidence) = self.confidence {
            if record.confidence.overall != confidence {
                return false;
            }
        }
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            if !record.name.to_lowercase().contains(&needle)
                && !record.id.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        true
    }

    fn compare(&self, a: &Record, b: &Record) -> Ordering {
        let ordering = match self.sort {
            SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            SortField::Status => a.status.as_str().cmp(b.status.as_str()),
        };
        match self.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }

    /// Matching records, sorted
    pub fn apply(&self, records: Vec<Record>) -> Vec<Record> {
        let mut matched: Vec<Record> = records.into_iter().filter(|r| self.matches(r)).collect();
        matched.sort_by(|a, b| self.compare(a, b));
        matched
    }
}
