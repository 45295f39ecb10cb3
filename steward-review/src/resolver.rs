//! File Resolver
//!
//! Maps a source document filename to:
//! - the public URL of the source artifact
//! - the expected companion (transformed JSON) filename
//! - an ordered list of candidate paths for the companion, tried one at a
//!   time against a [`ContentSource`] until one succeeds
//!
//! Candidates are tried sequentially; a later candidate is only requested
//! after every earlier one has failed.

use crate::content::{ContentSource, FetchError};
use crate::slug::display_name;
use serde_json::Value;
use std::collections::BTreeMap;
use std::future::Future;
use steward_common::config::ResolverConfig;
use thiserror::Error;

/// Companion resolution errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// No candidate path produced content
    #[error("No transformed content for {filename} (tried {} paths)", .tried.len())]
    NotFound { filename: String, tried: Vec<String> },

    /// Filename cannot be mapped to any path
    #[error("Invalid filename: {0:?}")]
    InvalidFilename(String),
}

/// Known source filenames whose companion name the generic rule gets wrong
const BUILTIN_SPECIAL_CASES: &[(&str, &str)] = &[
    (
        "ARTWORKS - Spring Catalogue (Final).pdf",
        "artworks_spring_catalogue.json",
    ),
    ("Brand Guidelines v3 (1).pdf", "brand_guidelines_v3.json"),
    ("Supplier Component Matrix.pdf", "supplier-component-matrix.json"),
    ("Safety Data Sheet (Rev B).pdf", "SDS_Rev_B.json"),
];

/// Explicit source filename -> companion filename table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecialCaseTable {
    entries: BTreeMap<String, String>,
}

impl SpecialCaseTable {
    /// Built-in entries only
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_SPECIAL_CASES
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Built-in entries with `overrides` taking precedence
    pub fn with_overrides(overrides: &BTreeMap<String, String>) -> Self {
        let mut table = Self::builtin();
        for (source, companion) in overrides {
            table.entries.insert(source.clone(), companion.clone());
        }
        table
    }

    pub fn get(&self, filename: &str) -> Option<&str> {
        self.entries.get(filename).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Collapse an accidental repeated extension once (`a.pdf.pdf` -> `a.pdf`)
pub fn strip_duplicate_extension(filename: &str) -> &str {
    let Some(idx) = filename.rfind('.') else {
        return filename;
    };
    let (stem, ext) = filename.split_at(idx);
    if ext.len() > 1 && stem.len() > ext.len() && stem.to_lowercase().ends_with(&ext.to_lowercase())
    {
        stem
    } else {
        filename
    }
}

/// Generic companion name rule
///
/// Replace the extension with `.json`, drop one trailing ` 1` token, turn
/// whitespace runs into `_`, remove parentheses.
///
/// `"X 1.pdf"` and `"X.pdf"` both map to `X.json`.
pub fn normalize_companion_name(filename: &str) -> String {
    let stem = display_name(strip_duplicate_extension(filename)).trim_end();
    let stem = stem.strip_suffix(" 1").unwrap_or(stem);

    let mut out = String::with_capacity(stem.len() + 5);
    let mut in_space = false;
    for c in stem.trim().chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push('_');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        if c != '(' && c != ')' {
            out.push(c);
        }
    }
    out.push_str(".json");
    out
}

/// Companion name with no normalization beyond the extension swap
pub fn exact_companion_name(filename: &str) -> String {
    format!("{}.json", display_name(strip_duplicate_extension(filename)))
}

/// One way of turning a filename into a companion candidate path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateStrategy {
    ExactEncoded,
    NormalizedEncoded,
    NormalizedRaw,
    ExactRaw,
}

impl CandidateStrategy {
    /// Order in which candidates are tried
    pub const ORDER: [CandidateStrategy; 4] = [
        CandidateStrategy::ExactEncoded,
        CandidateStrategy::NormalizedEncoded,
        CandidateStrategy::NormalizedRaw,
        CandidateStrategy::ExactRaw,
    ];

    pub fn candidate(&self, resolver: &FileResolver, filename: &str) -> String {
        let name = match self {
            CandidateStrategy::ExactEncoded => {
                urlencoding::encode(&exact_companion_name(filename)).into_owned()
            }
            CandidateStrategy::NormalizedEncoded => {
                urlencoding::encode(&resolver.resolve_transformed_name(filename)).into_owned()
            }
            CandidateStrategy::NormalizedRaw => resolver.resolve_transformed_name(filename),
            CandidateStrategy::ExactRaw => exact_companion_name(filename),
        };
        format!("{}/{}", resolver.transformed_dir, name)
    }
}

/// Companion content found under one of the candidate paths
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedContent {
    pub path: String,
    /// Parsed JSON, or the raw body as a JSON string when it does not parse
    pub data: Value,
}

/// Try `candidates` strictly in order; first success wins
///
/// Returns the winning candidate together with its value, or the list of
/// every candidate tried.
pub async fn first_successful<T, F, Fut>(
    filename: &str,
    candidates: &[String],
    mut attempt: F,
) -> Result<(String, T), ResolveError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let mut tried = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        match attempt(candidate.clone()).await {
            Ok(value) => return Ok((candidate.clone(), value)),
            Err(e) => {
                tracing::debug!(filename = %filename, candidate = %candidate, error = %e, "Candidate failed");
                tried.push(candidate.clone());
            }
        }
    }

    Err(ResolveError::NotFound {
        filename: filename.to_string(),
        tried,
    })
}

/// Source URL and companion path resolution
#[derive(Debug, Clone)]
pub struct FileResolver {
    source_dir: String,
    transformed_dir: String,
    special_cases: SpecialCaseTable,
}

impl FileResolver {
    pub fn new(config: &ResolverConfig) -> Self {
        Self {
            source_dir: config.source_dir.trim_end_matches('/').to_string(),
            transformed_dir: config.transformed_dir.trim_end_matches('/').to_string(),
            special_cases: SpecialCaseTable::with_overrides(&config.special_cases),
        }
    }

    pub fn special_cases(&self) -> &SpecialCaseTable {
        &self.special_cases
    }

    /// Public URL of the source artifact
    ///
    /// Values that already look like a path or URL are returned unchanged.
    pub fn resolve_source_url(&self, filename: &str) -> String {
        if filename.starts_with('/') || filename.contains("://") {
            return filename.to_string();
        }
        let cleaned = strip_duplicate_extension(filename);
        format!("{}/{}", self.source_dir, urlencoding::encode(cleaned))
    }

    /// Expected companion filename: special-case table first, then the generic rule
    pub fn resolve_transformed_name(&self, filename: &str) -> String {
        match self.special_cases.get(filename) {
            Some(name) => name.to_string(),
            None => normalize_companion_name(filename),
        }
    }

    /// Path the companion is assumed to live at when nothing was fetched
    pub fn assumed_transformed_path(&self, filename: &str) -> String {
        CandidateStrategy::NormalizedEncoded.candidate(self, filename)
    }

    /// Candidate paths in try order, duplicates removed
    pub fn candidate_paths(&self, filename: &str) -> Vec<String> {
        let mut paths: Vec<String> = Vec::with_capacity(CandidateStrategy::ORDER.len());
        for strategy in CandidateStrategy::ORDER {
            let path = strategy.candidate(self, filename);
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
        paths
    }

    /// Fetch the companion content for `filename` from `source`
    pub async fn fetch_transformed_content(
        &self,
        source: &dyn ContentSource,
        filename: &str,
    ) -> Result<ResolvedContent, ResolveError> {
        if filename.trim().is_empty() {
            return Err(ResolveError::InvalidFilename(filename.to_string()));
        }

        let candidates = self.candidate_paths(filename);
        let (path, body) = first_successful(filename, &candidates, |candidate| async move {
            source.fetch(&candidate).await
        })
        .await?;

        let data = match serde_json::from_str::<Value>(&body) {
            Ok(value) => value,
            Err(_) => Value::String(body),
        };

        tracing::debug!(filename = %filename, path = %path, source = source.name(), "Resolved transformed content");

        Ok(ResolvedContent { path, data })
    }
}
