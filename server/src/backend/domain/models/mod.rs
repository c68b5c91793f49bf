//! Domain models for the Kiddo backend.
//!
//! These types are internal to the server. The `shared` crate holds the wire
//! representations and the REST mappers translate between the two.

pub mod child;
pub mod parent;
pub mod reward;
pub mod session;
pub mod task;
pub mod wish;

use thiserror::Error;

/// Raised when a stored or submitted status string names no known state
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown status: {0}")]
pub struct UnknownStatus(pub String);

/// Normalize legacy status spellings (`pending-approval`, `Pending_Approval`)
/// to the canonical lowercase snake_case form.
pub(crate) fn normalize_status(raw: &str) -> String {
    raw.trim().to_ascii_lowercase().replace('-', "_")
}
