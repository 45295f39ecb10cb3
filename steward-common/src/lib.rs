//! # Steward Common Library
//!
//! Shared code for the steward review services:
//! - Error and result types
//! - Configuration loading (TOML with multi-tier path resolution)
//! - Timestamp helpers

pub mod config;
pub mod error;
pub mod time;

pub use error::{Error, Result};
