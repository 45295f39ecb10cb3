//! Integration tests for record synthesis and lookup
//!
//! Tests cover:
//! - Slug ids stable across calls
//! - Source URLs distinct for distinct names
//! - Lookup round trip after synthesis
//! - Unknown ids keep the requested id
//! - Fallback content purity and component/artwork sections
//! - Empty catalog behavior
//! - Slug collisions and the shared ` 1` companion name

use chrono::{TimeZone, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use steward_common::config::ResolverConfig;
use steward_review::catalog::Catalog;
use steward_review::content::MemoryContentSource;
use steward_review::fallback::build_fallback;
use steward_review::lookup::{MatchStrategy, RecordLookup};
use steward_review::resolver::FileResolver;
use steward_review::slug::record_id;
use steward_review::synthesizer::Synthesizer;

fn synthesizer(source: MemoryContentSource) -> Synthesizer {
    Synthesizer::new(FileResolver::new(&ResolverConfig::default()), Arc::new(source), 7)
        .with_anchor(Utc.with_ymd_and_hms(2026, 3, 15, 0, 0, 0).unwrap())
}

fn lookup_over(filenames: &[&str]) -> RecordLookup {
    let catalog = Catalog::new(filenames.iter().map(|f| f.to_string()).collect());
    RecordLookup::new(
        Arc::new(synthesizer(MemoryContentSource::new())),
        Arc::new(catalog),
    )
}

// =============================================================================
// Slugs and source URLs
// =============================================================================

#[test]
fn test_record_id_is_stable() {
    for filename in Catalog::builtin().filenames() {
        let first = record_id(filename);
        assert!(first.is_some(), "no id for {}", filename);
        assert_eq!(first, record_id(filename));
    }
}

#[test]
fn test_source_urls_distinct_for_distinct_names() {
    let resolver = FileResolver::new(&ResolverConfig::default());
    let names = [
        "Report.pdf",
        "Report 1.pdf",
        "report.pdf",
        "Report (1).pdf",
        "Report%20.pdf",
        "Report .pdf",
    ];
    let urls: HashSet<String> = names.iter().map(|n| resolver.resolve_source_url(n)).collect();
    assert_eq!(urls.len(), names.len());
}

// =============================================================================
// Lookup
// =============================================================================

#[tokio::test]
async fn test_round_trip_for_every_builtin_filename() {
    let catalog = Catalog::builtin();
    let service = RecordLookup::new(
        Arc::new(synthesizer(MemoryContentSource::new())),
        Arc::new(catalog.clone()),
    );

    for filename in catalog.filenames() {
        let id = record_id(filename).unwrap();
        let record = service.get_by_id(&id).await.unwrap();
        assert_eq!(record.id, id);
    }
}

#[tokio::test]
async fn test_get_by_id_matches_get_all() {
    let service = lookup_over(&["Jax Component spec.pdf", "Brand Guidelines v3 (1).pdf"]);
    let all = service.get_all().await;
    for record in &all {
        assert_eq!(service.get_by_id(&record.id).await.as_ref(), Some(record));
    }
}

#[tokio::test]
async fn test_unknown_ids_take_requested_id() {
    let service = lookup_over(&["Jax Component spec.pdf", "Packaging Specification.pdf"]);
    for requested in ["rec-packaging", "", "rec-", "zzz-not-a-record", "Jax"] {
        let record = service.get_by_id(requested).await.unwrap();
        assert_eq!(record.id, requested);
        for fb in &record.feedback {
            assert_eq!(fb.record_id, requested);
        }
    }
}

#[tokio::test]
async fn test_heuristic_picks_best_scoring_filename() {
    let service = lookup_over(&["Jax Component spec.pdf", "Packaging Specification.pdf"]);
    let resolution = service.resolve("rec-packaging").await.unwrap();
    assert_eq!(resolution.strategy, MatchStrategy::SubstringHeuristic);
    assert_eq!(resolution.filename, "Packaging Specification.pdf");
    assert_eq!(resolution.record.name, "Packaging Specification");
}

#[tokio::test]
async fn test_jax_component_scenario() {
    let service = lookup_over(&["Jax Component spec.pdf"]);
    let record = service.get_by_id("rec-jax-component-specpdf").await.unwrap();

    assert_eq!(record.id, "rec-jax-component-specpdf");
    assert_eq!(record.name, "Jax Component spec");
    assert_eq!(record.source_file_path, "/pdfs/Jax%20Component%20spec.pdf");
    assert!(record.transformed_data.get("componentDetails").is_some());
    assert!(record.transformed_data.get("artworkDetails").is_none());
}

#[tokio::test]
async fn test_empty_catalog_scenario() {
    let service = lookup_over(&[]);
    assert!(service.get_all().await.is_empty());
    assert!(service.get_by_id("anything").await.is_none());
    assert!(service.resolve("anything").await.is_none());
}

#[tokio::test]
async fn test_records_stable_across_calls() {
    let service = RecordLookup::new(
        Arc::new(synthesizer(MemoryContentSource::new())),
        Arc::new(Catalog::builtin()),
    );
    assert_eq!(service.get_all().await, service.get_all().await);
}

// =============================================================================
// Fallback content
// =============================================================================

#[test]
fn test_fallback_is_pure() {
    for filename in Catalog::builtin().filenames() {
        let a = serde_json::to_string(&build_fallback(filename)).unwrap();
        let b = serde_json::to_string(&build_fallback(filename)).unwrap();
        assert_eq!(a, b);
    }
}

#[tokio::test]
async fn test_fetched_content_beats_fallback() {
    let source = MemoryContentSource::new()
        .with("/transformed/Jax_Component_spec.json", r#"{"title":"Jax"}"#);
    let synth = synthesizer(source);
    let records = synth
        .synthesize_all(&["Jax Component spec.pdf".to_string()])
        .await;
    assert_eq!(records[0].transformed_data["title"], "Jax");
    assert!(records[0].transformed_data.get("componentDetails").is_none());
}

// =============================================================================
// Collisions
// =============================================================================

#[tokio::test]
async fn test_colliding_slugs_get_distinct_ids() {
    let filenames = ["Report (A).pdf", "Report A.pdf"];
    assert_eq!(record_id(filenames[0]), record_id(filenames[1]));

    let service = lookup_over(&filenames);
    let records = service.get_all().await;
    assert_eq!(records[0].id, "rec-report-apdf");
    assert_eq!(records[1].id, "rec-report-apdf-2");

    let second = service.get_by_id("rec-report-apdf-2").await.unwrap();
    assert_eq!(second.name, "Report A");
}

#[tokio::test]
async fn test_suffix_never_reuses_a_bare_slug() {
    let service = lookup_over(&["Notes", "Notes!", "Notes 2"]);
    let records = service.get_all().await;

    let ids: HashSet<&str> = records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids.len(), 3, "duplicate ids: {:?}", ids);

    for record in &records {
        let found = service.get_by_id(&record.id).await.unwrap();
        assert_eq!(found.name, record.name);
    }
}

#[tokio::test]
async fn test_trailing_one_shares_companion_but_not_id() {
    let resolver = FileResolver::new(&ResolverConfig::default());
    assert_eq!(
        resolver.resolve_transformed_name("Audit Notes 1.pdf"),
        resolver.resolve_transformed_name("Audit Notes.pdf")
    );

    let service = lookup_over(&["Audit Notes.pdf", "Audit Notes 1.pdf"]);
    let records = service.get_all().await;
    assert_ne!(records[0].id, records[1].id);
    assert_eq!(records[0].transformed_file_path, records[1].transformed_file_path);
}
