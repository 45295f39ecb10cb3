//! Deterministic record identifiers derived from source filenames

use std::collections::HashSet;

/// Prefix shared by every record id
pub const RECORD_ID_PREFIX: &str = "rec-";

/// Slug body of a filename, without prefix
///
/// Lowercase; drop anything that is not ASCII alphanumeric, whitespace or `-`;
/// collapse whitespace runs to a single `-`; trim leading/trailing `-`.
/// Returns `None` when nothing usable is left.
pub fn slug_body(filename: &str) -> Option<String> {
    let mut body = String::with_capacity(filename.len());
    let mut pending_space = false;

    for c in filename.chars() {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        let c = c.to_ascii_lowercase();
        if !(c.is_ascii_alphanumeric() || c == '-') {
            continue;
        }
        if pending_space && !body.is_empty() {
            body.push('-');
        }
        pending_space = false;
        body.push(c);
    }

    let body = body.trim_matches('-');
    if body.is_empty() {
        None
    } else {
        Some(body.to_string())
    }
}

/// Stable record id for a filename, e.g. `Jax Component spec.pdf` -> `rec-jax-component-specpdf`
pub fn record_id(filename: &str) -> Option<String> {
    slug_body(filename).map(|body| format!("{}{}", RECORD_ID_PREFIX, body))
}

/// Display name: filename without its final extension
pub fn display_name(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(idx) if idx > 0 => &filename[..idx],
        _ => filename,
    }
}

/// Hands out unique ids within one synthesis batch
///
/// The first filename keeps its bare slug id; later filenames with the same
/// slug get `-2`, `-3`, ... in input order, skipping any id already issued
/// (another filename's bare slug can look like a suffixed one).
#[derive(Debug, Default)]
pub struct IdAllocator {
    issued: HashSet<String>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self, base_id: &str) -> String {
        let mut id = base_id.to_string();
        let mut suffix = 1;
        while self.issued.contains(&id) {
            suffix += 1;
            id = format!("{}-{}", base_id, suffix);
        }
        self.issued.insert(id.clone());
        id
    }
}
