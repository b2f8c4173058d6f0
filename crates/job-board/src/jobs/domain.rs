use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for job postings. Opaque to callers; the store assigns
/// sequential values so insertion order is recoverable for tie-breaking.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle status of a posting. Soft deletion is an independent axis
/// tracked by `deleted_at`, not a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Open,
    Filled,
}

impl JobStatus {
    pub const fn label(self) -> &'static str {
        match self {
            JobStatus::Open => "OPEN",
            JobStatus::Filled => "FILLED",
        }
    }
}

/// A job posting as persisted.
///
/// Invariants maintained by the lifecycle engine:
/// - `status == Filled` iff `filled_at` and `hired_name` are present;
///   `Open` postings carry no hired fields at all.
/// - `deleted_at` present forces `active == false`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub title: String,
    pub description: String,
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub active: bool,
    pub status: JobStatus,
    pub filled_at: Option<NaiveDateTime>,
    pub hired_name: Option<String>,
    pub hired_contact: Option<String>,
    pub hired_notes: Option<String>,
    pub deleted_at: Option<NaiveDateTime>,
    pub deleted_by: Option<String>,
    pub created_at: NaiveDateTime,
}

impl Job {
    /// Whether the posting appears in the public listing.
    pub fn publicly_listable(&self) -> bool {
        self.deleted_at.is_none() && self.active && self.status == JobStatus::Open
    }
}

/// Content fields accepted when creating a posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDraft {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Full content-and-visibility overwrite for an existing posting. Status,
/// fill, and deletion fields are never touched by a content update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobContent {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

/// Hire metadata recorded when a posting is filled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillDetails {
    pub hired_name: String,
    #[serde(default)]
    pub hired_contact: Option<String>,
    #[serde(default)]
    pub hired_notes: Option<String>,
}

/// Actions recorded in the audit ledger, one per mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Create,
    Update,
    Fill,
    Unfill,
    SoftDelete,
    Restore,
}

impl AuditAction {
    pub const fn label(self) -> &'static str {
        match self {
            AuditAction::Create => "CREATE",
            AuditAction::Update => "UPDATE",
            AuditAction::Fill => "FILL",
            AuditAction::Unfill => "UNFILL",
            AuditAction::SoftDelete => "SOFT_DELETE",
            AuditAction::Restore => "RESTORE",
        }
    }
}

/// Immutable record of one mutating action against a posting. Audit entries
/// outlive soft deletion because postings are never physically removed.
///
/// The metadata is a flat string map rather than an opaque serialized blob so
/// the trail stays queryable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: u64,
    pub job_id: JobId,
    pub action: AuditAction,
    pub actor: String,
    pub meta: BTreeMap<String, String>,
    pub created_at: NaiveDateTime,
}

/// Explicit capability passed into every engine operation. There is no
/// ambient privilege state: the HTTP layer derives one of these per request
/// and the engine trusts nothing else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    is_admin: bool,
    actor: String,
}

impl Caller {
    pub fn admin(actor: impl Into<String>) -> Self {
        Self {
            is_admin: true,
            actor: actor.into(),
        }
    }

    pub fn public() -> Self {
        Self {
            is_admin: false,
            actor: "public".to_string(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    pub fn actor(&self) -> &str {
        &self.actor
    }
}

/// Raised when a required field is missing or blank. Checked before any
/// write, so a validation failure leaves the store untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    Blank { field: &'static str },
}

/// Reject empty or whitespace-only required inputs.
pub(crate) fn require_non_blank(
    field: &'static str,
    value: &str,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Blank { field })
    } else {
        Ok(())
    }
}
