//! Known source filenames
//!
//! Stands in for a directory listing of the source folder.

use steward_common::config::CatalogConfig;

/// Built-in catalog used when configuration does not supply one
pub const DEFAULT_FILENAMES: &[&str] = &[
    "Jax Component spec.pdf",
    "Orion Component Datasheet.pdf",
    "Supplier Component Matrix.pdf",
    "ARTWORKS Summer Collection.pdf",
    "ARTWORKS - Spring Catalogue (Final).pdf",
    "Brand Guidelines v3 (1).pdf",
    "Packaging Specification.pdf",
    "Quality Assurance Report 1.pdf",
    "Safety Data Sheet (Rev B).pdf",
    "Annual Compliance Summary.pdf",
];

/// Ordered list of known source filenames
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    filenames: Vec<String>,
}

impl Catalog {
    pub fn new(filenames: Vec<String>) -> Self {
        Self { filenames }
    }

    pub fn builtin() -> Self {
        Self::new(DEFAULT_FILENAMES.iter().map(|f| f.to_string()).collect())
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        match &config.filenames {
            Some(filenames) => Self::new(filenames.clone()),
            None => Self::builtin(),
        }
    }

    pub fn filenames(&self) -> &[String] {
        &self.filenames
    }

    pub fn len(&self) -> usize {
        self.filenames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filenames.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
