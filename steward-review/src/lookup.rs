//! Record Lookup Service
//!
//! Resolves a record id in three tiers:
//! 1. `ExactId` - exact match against the synthesized collection
//! 2. `SlugMatch` - exact match against the slug id of each known filename
//! 3. `SubstringHeuristic` - best-scoring filename by containment rules; the
//!    synthesized record takes the requested id so callers keep their reference
//!
//! While the catalog is non-empty every id resolves to some record.

use crate::catalog::Catalog;
use crate::models::Record;
use crate::slug::{record_id, RECORD_ID_PREFIX};
use crate::synthesizer::Synthesizer;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Which tier produced the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchStrategy {
    ExactId,
    SlugMatch,
    SubstringHeuristic,
}

/// Containment rule used by the substring heuristic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchRule {
    /// Lowercased id body and filename contain one another
    RawContainment,
    /// Same, with whitespace and `-` removed from both sides
    WhitespaceInsensitive,
    /// Same, with both sides reduced to ASCII alphanumerics
    AlphanumericOnly,
}

impl MatchRule {
    pub const ALL: [MatchRule; 3] = [
        MatchRule::RawContainment,
        MatchRule::WhitespaceInsensitive,
        MatchRule::AlphanumericOnly,
    ];

    pub fn weight(&self) -> u32 {
        match self {
            MatchRule::RawContainment => 10,
            MatchRule::WhitespaceInsensitive => 5,
            MatchRule::AlphanumericOnly => 3,
        }
    }

    fn normalize(&self, s: &str) -> String {
        match self {
            MatchRule::RawContainment => s.to_string(),
            MatchRule::WhitespaceInsensitive => s
                .chars()
                .filter(|c| !c.is_whitespace() && *c != '-')
                .collect(),
            MatchRule::AlphanumericOnly => s.chars().filter(|c| c.is_ascii_alphanumeric()).collect(),
        }
    }
}

/// One filename scored against a requested id
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredCandidate {
    pub filename: String,
    pub score: u32,
    pub matched_rules: Vec<MatchRule>,
}

/// Outcome of a lookup with the reasoning behind it
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupResolution {
    pub requested_id: String,
    pub strategy: MatchStrategy,
    pub filename: String,
    /// Full ranking, only for the heuristic tier
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ranked: Vec<ScoredCandidate>,
    pub record: Record,
}

fn contains_either(a: &str, b: &str) -> bool {
    !a.is_empty() && !b.is_empty() && (a.contains(b) || b.contains(a))
}

/// Score `filename` against `requested_id`; scores of matched rules accumulate
pub fn score_filename(requested_id: &str, filename: &str) -> ScoredCandidate {
    let lowered = requested_id.to_lowercase();
    let needle = lowered.strip_prefix(RECORD_ID_PREFIX).unwrap_or(&lowered);
    let haystack = filename.to_lowercase();

    let matched_rules: Vec<MatchRule> = MatchRule::ALL
        .into_iter()
        .filter(|rule| contains_either(&rule.normalize(&haystack), &rule.normalize(needle)))
        .collect();

    ScoredCandidate {
        filename: filename.to_string(),
        score: matched_rules.iter().map(MatchRule::weight).sum(),
        matched_rules,
    }
}

/// Rank every filename, best first; ties keep catalog order
pub fn rank_candidates(requested_id: &str, filenames: &[String]) -> Vec<ScoredCandidate> {
    let mut ranked: Vec<ScoredCandidate> = filenames
        .iter()
        .map(|f| score_filename(requested_id, f))
        .collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked
}

/// First filename whose slug id equals `requested_id`
pub fn match_slug<'a>(requested_id: &str, filenames: &'a [String]) -> Option<&'a str> {
    filenames
        .iter()
        .find(|f| record_id(f).as_deref() == Some(requested_id))
        .map(String::as_str)
}

/// Record lookup over the known catalog
#[derive(Clone)]
pub struct RecordLookup {
    synthesizer: Arc<Synthesizer>,
    catalog: Arc<Catalog>,
}

impl RecordLookup {
    pub fn new(synthesizer: Arc<Synthesizer>, catalog: Arc<Catalog>) -> Self {
        Self {
            synthesizer,
            catalog,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Every record in catalog order
    pub async fn get_all(&self) -> Vec<Record> {
        self.synthesizer
            .synthesize_all(self.catalog.filenames())
            .await
    }

    /// Record for `id`, or `None` when the catalog is empty
    pub async fn get_by_id(&self, id: &str) -> Option<Record> {
        self.resolve(id).await.map(|resolution| resolution.record)
    }

    /// Resolve `id` and report which tier matched
    ///
    /// Every filename whose slug is `id` either owns `id` outright or lost it
    /// to an earlier record, so with the current allocation the exact-id tier
    /// answers first and `SlugMatch` only fires if that allocation changes.
    pub async fn resolve(&self, id: &str) -> Option<LookupResolution> {
        let filenames = self.catalog.filenames();
        if filenames.is_empty() {
            debug!(id = %id, "Lookup miss: catalog is empty");
            return None;
        }

        // Tier 1: exact id against the synthesized collection
        let records = self.synthesizer.synthesize_all(filenames).await;
        if let Some((filename, record)) = filenames
            .iter()
            .zip(records)
            .find(|(_, record)| record.id == id)
        {
            debug!(id = %id, filename = %filename, "Lookup matched exact id");
            return Some(LookupResolution {
                requested_id: id.to_string(),
                strategy: MatchStrategy::ExactId,
                filename: filename.clone(),
                ranked: Vec::new(),
                record,
            });
        }

        // Tier 2: recomputed slug ids
        if let Some(filename) = match_slug(id, filenames) {
            debug!(id = %id, filename = %filename, "Lookup matched slug id");
            let record = self.synthesizer.synthesize_one(filename).await;
            return Some(LookupResolution {
                requested_id: id.to_string(),
                strategy: MatchStrategy::SlugMatch,
                filename: filename.to_string(),
                ranked: Vec::new(),
                record,
            });
        }

        // Tier 3: best containment score
        let ranked = rank_candidates(id, filenames);
        let best = ranked.first()?.clone();
        debug!(id = %id, filename = %best.filename, score = best.score, "Lookup matched by heuristic");

        let mut record = self.synthesizer.synthesize_one(&best.filename).await;
        record.id = id.to_string();
        for feedback in &mut record.feedback {
            feedback.record_id = id.to_string();
        }

        Some(LookupResolution {
            requested_id: id.to_string(),
            strategy: MatchStrategy::SubstringHeuristic,
            filename: best.filename,
            ranked,
            record,
        })
    }
}
