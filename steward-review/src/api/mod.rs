//! HTTP API handlers for steward-review

pub mod buildinfo;
pub mod dashboard;
pub mod health;
pub mod records;
pub mod workflow;

pub use buildinfo::get_build_info;
pub use dashboard::{get_audit, get_queue, get_stats};
pub use health::health_routes;
pub use records::{get_record, get_resolution, list_records};
pub use workflow::{approve_record, forward_record, reject_record, submit_feedback};
