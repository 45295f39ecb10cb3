//! Record Synthesizer
//!
//! Builds one [`Record`] per known filename. Review metadata (status,
//! confidence, timestamps, history and feedback stubs) is drawn from a
//! generator seeded by the record id, so repeated calls within a process
//! produce identical records.
//!
//! A filename that cannot be synthesized never fails the batch; it is replaced
//! by a minimal record with a random id.

use crate::content::ContentSource;
use crate::fallback::build_fallback;
use crate::models::{
    ApprovalHistoryItem, Confidence, ConfidenceLevel, Feedback, Record, RecordStatus,
};
use crate::resolver::{FileResolver, ResolveError};
use crate::slug::{display_name, record_id, IdAllocator};
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

/// Fields that carry a per-field confidence level
pub const CONFIDENCE_FIELDS: &[&str] = &[
    "title",
    "documentNumber",
    "revision",
    "effectiveDate",
    "specifications",
];

/// Records are created within this many days before the anchor
pub const CREATED_WINDOW_DAYS: i64 = 60;

const REVIEWERS: &[&str] = &[
    "Dana Whitfield",
    "Priya Raman",
    "Marcus Oyelaran",
    "Elena Sokolova",
];

const APPROVE_COMMENTS: &[&str] = &[
    "Extraction matches source document.",
    "Verified against the original PDF.",
    "Minor formatting differences only; approved.",
];

const REJECT_COMMENTS: &[&str] = &[
    "Key fields missing from the extraction.",
    "Revision number does not match the source.",
    "Tables were flattened incorrectly.",
];

const FEEDBACK_COMMENTS: &[&str] = &[
    "Value looks truncated compared to the PDF.",
    "Date format differs from the source.",
    "Extraction is correct but the label is misleading.",
];

/// Share of records (out of 100) per status
const APPROVED_PERCENT: u32 = 30;
const REJECTED_PERCENT: u32 = 20;

/// Per-filename synthesis errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SynthesisError {
    /// Filename yields no usable id or path
    #[error("Invalid filename: {0:?}")]
    InvalidFilename(String),
}

/// Builds records from source filenames
pub struct Synthesizer {
    resolver: FileResolver,
    source: Arc<dyn ContentSource>,
    seed: u64,
    anchor: DateTime<Utc>,
}

impl Synthesizer {
    /// Create synthesizer anchored at the start of the current UTC day
    pub fn new(resolver: FileResolver, source: Arc<dyn ContentSource>, seed: u64) -> Self {
        Self {
            resolver,
            source,
            seed,
            anchor: steward_common::time::day_anchor(steward_common::time::now()),
        }
    }

    /// Replace the timestamp anchor
    pub fn with_anchor(mut self, anchor: DateTime<Utc>) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn resolver(&self) -> &FileResolver {
        &self.resolver
    }

    pub fn anchor(&self) -> DateTime<Utc> {
        self.anchor
    }

    /// Synthesize one record per filename, in input order
    ///
    /// Filenames whose slug collides with an earlier one get a numeric suffix.
    pub async fn synthesize_all(&self, filenames: &[String]) -> Vec<Record> {
        let mut ids = IdAllocator::new();
        let mut records = Vec::with_capacity(filenames.len());

        for filename in filenames {
            let record = match self.try_synthesize(filename, &mut ids).await {
                Ok(record) => record,
                Err(e) => {
                    warn!(filename = %filename, error = %e, "Synthesis failed, substituting minimal record");
                    self.failure_record(filename, &e)
                }
            };
            records.push(record);
        }

        debug!(count = records.len(), "Synthesized records");
        records
    }

    /// Synthesize a single record with its bare slug id
    pub async fn synthesize_one(&self, filename: &str) -> Record {
        let mut ids = IdAllocator::new();
        match self.try_synthesize(filename, &mut ids).await {
            Ok(record) => record,
            Err(e) => {
                warn!(filename = %filename, error = %e, "Synthesis failed, substituting minimal record");
                self.failure_record(filename, &e)
            }
        }
    }

    async fn try_synthesize(
        &self,
        filename: &str,
        ids: &mut IdAllocator,
    ) -> Result<Record, SynthesisError> {
        let base_id = record_id(filename)
            .ok_or_else(|| SynthesisError::InvalidFilename(filename.to_string()))?;

        let (transformed_path, data) = match self
            .resolver
            .fetch_transformed_content(self.source.as_ref(), filename)
            .await
        {
            Ok(resolved) => (resolved.path, resolved.data),
            Err(ResolveError::NotFound { tried, .. }) => {
                debug!(filename = %filename, tried = tried.len(), "Using fallback content");
                (
                    self.resolver.assumed_transformed_path(filename),
                    build_fallback(filename),
                )
            }
            Err(ResolveError::InvalidFilename(f)) => {
                return Err(SynthesisError::InvalidFilename(f));
            }
        };

        let id = ids.allocate(&base_id);
        let mut rng = self.rng_for(&id);

        Ok(self.build_record(
            id,
            filename,
            transformed_path,
            data,
            &mut rng,
        ))
    }

    /// Minimal record for a filename that could not be synthesized
    fn failure_record(&self, filename: &str, error: &SynthesisError) -> Record {
        let id = format!("rec-{}", Uuid::new_v4());
        let data = json!({
            "error": error.to_string(),
            "sourceFile": filename,
        });
        self.build_record(id, filename, String::new(), data, &mut rand::thread_rng())
    }

    /// Generator seeded by SHA-256 of (configured seed, record id)
    fn rng_for(&self, id: &str) -> StdRng {
        let mut hasher = Sha256::new();
        hasher.update(self.seed.to_le_bytes());
        hasher.update(id.as_bytes());
        let digest = hasher.finalize();

        let mut seed = [0u8; 32];
        seed.copy_from_slice(&digest);
        StdRng::from_seed(seed)
    }

    fn build_record<R: Rng + ?Sized>(
        &self,
        id: String,
        filename: &str,
        transformed_file_path: String,
        transformed_data: Value,
        rng: &mut R,
    ) -> Record {
        let status = draw_status(rng);
        let confidence = draw_confidence(rng);

        let window_minutes = CREATED_WINDOW_DAYS * 24 * 60;
        let created_at = self.anchor - Duration::minutes(rng.gen_range(0..window_minutes));
        let until_anchor = (self.anchor - created_at).num_minutes().max(1);
        let updated_at = created_at + Duration::minutes(rng.gen_range(1..=until_anchor));

        let mut approval_history = Vec::new();
        if let Some(action) = status.implied_action() {
            let comments = match status {
                RecordStatus::Rejected => REJECT_COMMENTS,
                _ => APPROVE_COMMENTS,
            };
            approval_history.push(ApprovalHistoryItem {
                id: random_uuid(rng),
                action,
                actor: pick(rng, REVIEWERS).to_string(),
                timestamp: updated_at,
                comment: Some(pick(rng, comments).to_string()),
                forwarded_to: None,
            });
        }

        let mut feedback = Vec::new();
        if rng.gen_bool(0.25) {
            feedback.push(Feedback {
                id: random_uuid(rng),
                record_id: id.clone(),
                author: pick(rng, REVIEWERS).to_string(),
                field: Some(pick(rng, CONFIDENCE_FIELDS).to_string()),
                comment: pick(rng, FEEDBACK_COMMENTS).to_string(),
                rating: Some(rng.gen_range(1..=5)),
                created_at: updated_at,
            });
        }

        Record {
            id,
            name: display_name(filename).to_string(),
            source_file_path: self.resolver.resolve_source_url(filename),
            transformed_file_path,
            transformed_data,
            status,
            confidence,
            created_at,
            updated_at,
            approval_history,
            feedback,
        }
    }
}

fn draw_status<R: Rng + ?Sized>(rng: &mut R) -> RecordStatus {
    let roll = rng.gen_range(0..100);
    if roll < APPROVED_PERCENT {
        RecordStatus::Approved
    } else if roll < APPROVED_PERCENT + REJECTED_PERCENT {
        RecordStatus::Rejected
    } else {
        RecordStatus::Pending
    }
}

fn draw_confidence<R: Rng + ?Sized>(rng: &mut R) -> Confidence {
    let overall = ConfidenceLevel::ALL[rng.gen_range(0..ConfidenceLevel::ALL.len())];
    let fields: BTreeMap<String, ConfidenceLevel> = CONFIDENCE_FIELDS
        .iter()
        .map(|field| {
            let level = ConfidenceLevel::ALL[rng.gen_range(0..ConfidenceLevel::ALL.len())];
            (field.to_string(), level)
        })
        .collect();
    Confidence { overall, fields }
}

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, items: &[&'a str]) -> &'a str {
    items[rng.gen_range(0..items.len())]
}

fn random_uuid<R: Rng + ?Sized>(rng: &mut R) -> Uuid {
    uuid::Builder::from_random_bytes(rng.gen()).into_uuid()
}
