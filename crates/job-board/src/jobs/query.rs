use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::domain::{Caller, Job, JobStatus};

/// Listing tab requested by a caller. Non-admin callers receive the public
/// predicate regardless of what they ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobView {
    /// Everything not soft-deleted; the admin default tab.
    #[default]
    Live,
    /// Live and visible on the public board.
    Published,
    /// Live but unpublished (`active = false`).
    Hidden,
    /// Live postings that have been filled.
    Filled,
    /// Soft-deleted postings only.
    Deleted,
    /// No restriction at all.
    All,
}

impl JobView {
    /// Map the legacy boolean query flags (`deleted=1`, `filled=1`, `all=1`)
    /// onto a view, with the same precedence the flags always had.
    pub fn from_flags(deleted: bool, filled: bool, all: bool) -> Self {
        if deleted {
            JobView::Deleted
        } else if filled {
            JobView::Filled
        } else if all {
            JobView::All
        } else {
            JobView::Live
        }
    }
}

/// Store-level predicate over job postings. `None` leaves a dimension
/// unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobFilter {
    /// `Some(true)` selects only soft-deleted postings, `Some(false)` only
    /// live ones.
    pub deleted: Option<bool>,
    pub active: Option<bool>,
    pub status: Option<JobStatus>,
    /// Restrict to postings with `filled_at >=` the given instant.
    pub filled_since: Option<NaiveDateTime>,
    /// Require a fill timestamp to be present at all.
    pub has_fill_record: Option<bool>,
}

impl JobFilter {
    /// The public-safe predicate: never matches a deleted, hidden, or filled
    /// posting.
    pub fn public() -> Self {
        Self {
            deleted: Some(false),
            active: Some(true),
            status: Some(JobStatus::Open),
            ..Self::default()
        }
    }

    /// Resolve the predicate for a caller and requested view. The privilege
    /// check happens here so no route can accidentally widen a public query.
    pub fn for_caller(caller: &Caller, view: JobView) -> Self {
        if !caller.is_admin() {
            return Self::public();
        }

        match view {
            JobView::Live => Self {
                deleted: Some(false),
                ..Self::default()
            },
            JobView::Published => Self {
                deleted: Some(false),
                active: Some(true),
                ..Self::default()
            },
            JobView::Hidden => Self {
                deleted: Some(false),
                active: Some(false),
                ..Self::default()
            },
            JobView::Filled => Self {
                deleted: Some(false),
                status: Some(JobStatus::Filled),
                ..Self::default()
            },
            JobView::Deleted => Self {
                deleted: Some(true),
                ..Self::default()
            },
            JobView::All => Self::default(),
        }
    }

    pub fn matches(&self, job: &Job) -> bool {
        if let Some(deleted) = self.deleted {
            if job.deleted_at.is_some() != deleted {
                return false;
            }
        }
        if let Some(active) = self.active {
            if job.active != active {
                return false;
            }
        }
        if let Some(status) = self.status {
            if job.status != status {
                return false;
            }
        }
        if let Some(required) = self.has_fill_record {
            if job.filled_at.is_some() != required {
                return false;
            }
        }
        if let Some(since) = self.filled_since {
            match job.filled_at {
                Some(filled_at) if filled_at >= since => {}
                _ => return false,
            }
        }
        true
    }
}
