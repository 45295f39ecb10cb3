//! Fallback content for records whose companion file cannot be resolved
//!
//! Pure and deterministic: the same filename always yields the same value.

use crate::slug::display_name;
use serde_json::{json, Map, Value};

const COMPONENT_KEYWORD: &str = "Component";
const ARTWORKS_KEYWORD: &str = "ARTWORKS";

/// Build a structurally valid placeholder payload for `filename`
///
/// Keyword checks are case-sensitive on the base name. A name carrying both
/// keywords gets both sections.
pub fn build_fallback(filename: &str) -> Value {
    let base = display_name(filename);
    let is_component = base.contains(COMPONENT_KEYWORD);
    let is_artworks = base.contains(ARTWORKS_KEYWORD);

    let document_type = if is_component {
        "Component Specification"
    } else if is_artworks {
        "Artwork Catalogue"
    } else {
        "General Document"
    };

    let mut payload = Map::new();
    payload.insert(
        "documentInfo".to_string(),
        json!({
            "title": base,
            "sourceFile": filename,
            "documentType": document_type,
            "extraction": "fallback",
            "note": "Transformed data not available; showing placeholder structure",
        }),
    );
    payload.insert(
        "metadata".to_string(),
        json!({
            "schemaVersion": "1.0",
            "language": "en",
            "pageCount": null,
            "revision": null,
        }),
    );
    payload.insert(
        "sections".to_string(),
        json!([
            { "heading": "Summary", "content": format!("No extracted summary for {}.", base) },
            { "heading": "Details", "content": "" },
        ]),
    );

    if is_component {
        payload.insert(
            "componentDetails".to_string(),
            json!({
                "componentName": base,
                "partNumber": null,
                "materials": [],
                "dimensions": { "length": null, "width": null, "height": null, "unit": "mm" },
                "specifications": [],
            }),
        );
    }

    if is_artworks {
        payload.insert(
            "artworkDetails".to_string(),
            json!({
                "collection": base,
                "artworks": [],
                "colorProfile": null,
                "printSpecifications": [],
                "approvalsRequired": ["brand", "legal"],
            }),
        );
    }

    Value::Object(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_is_pure() {
        let a = serde_json::to_string(&build_fallback("Jax Component spec.pdf")).unwrap();
        let b = serde_json::to_string(&build_fallback("Jax Component spec.pdf")).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_component_section() {
        let value = build_fallback("Jax Component spec.pdf");
        assert_eq!(value["documentInfo"]["title"], "Jax Component spec");
        assert_eq!(value["documentInfo"]["documentType"], "Component Specification");
        assert_eq!(value["componentDetails"]["componentName"], "Jax Component spec");
        assert!(value.get("artworkDetails").is_none());
    }

    #[test]
    fn test_artworks_section() {
        let value = build_fallback("ARTWORKS Summer Collection.pdf");
        assert!(value.get("artworkDetails").is_some());
        assert!(value.get("componentDetails").is_none());
        assert_eq!(value["documentInfo"]["documentType"], "Artwork Catalogue");
    }

    #[test]
    fn test_keywords_are_case_sensitive() {
        let value = build_fallback("component artworks.pdf");
        assert!(value.get("componentDetails").is_none());
        assert!(value.get("artworkDetails").is_none());
        assert_eq!(value["documentInfo"]["documentType"], "General Document");
    }

    #[test]
    fn test_both_keywords() {
        let value = build_fallback("ARTWORKS Component Pack.pdf");
        assert!(value.get("componentDetails").is_some());
        assert!(value.get("artworkDetails").is_some());
    }
}
