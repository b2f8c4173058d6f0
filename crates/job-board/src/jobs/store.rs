use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDateTime;

use super::domain::{AuditAction, AuditEntry, Job, JobId, JobStatus};
use super::query::JobFilter;

/// Fields for a posting about to be created. The store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewJob {
    pub title: String,
    pub description: String,
    pub location: Option<String>,
    pub kind: Option<String>,
    pub active: bool,
    pub created_at: NaiveDateTime,
}

/// Audit entry to insert alongside a job write. The store stamps the id and
/// creation time at insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuditEntry {
    pub action: AuditAction,
    pub actor: String,
    pub meta: BTreeMap<String, String>,
}

impl NewAuditEntry {
    pub fn new(action: AuditAction, actor: impl Into<String>) -> Self {
        Self {
            action,
            actor: actor.into(),
            meta: BTreeMap::new(),
        }
    }

    pub fn with_meta(mut self, key: &str, value: impl Into<String>) -> Self {
        self.meta.insert(key.to_string(), value.into());
        self
    }
}

/// Field-level patch applied to an existing posting. Outer `None` leaves a
/// field untouched; the inner `Option` writes nullable columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<Option<String>>,
    pub kind: Option<Option<String>>,
    pub active: Option<bool>,
    pub status: Option<JobStatus>,
    pub filled_at: Option<Option<NaiveDateTime>>,
    pub hired_name: Option<Option<String>>,
    pub hired_contact: Option<Option<String>>,
    pub hired_notes: Option<Option<String>>,
    pub deleted_at: Option<Option<NaiveDateTime>>,
    pub deleted_by: Option<Option<String>>,
}

impl JobPatch {
    pub fn apply(&self, job: &mut Job) {
        if let Some(title) = &self.title {
            job.title = title.clone();
        }
        if let Some(description) = &self.description {
            job.description = description.clone();
        }
        if let Some(location) = &self.location {
            job.location = location.clone();
        }
        if let Some(kind) = &self.kind {
            job.kind = kind.clone();
        }
        if let Some(active) = self.active {
            job.active = active;
        }
        if let Some(status) = self.status {
            job.status = status;
        }
        if let Some(filled_at) = self.filled_at {
            job.filled_at = filled_at;
        }
        if let Some(hired_name) = &self.hired_name {
            job.hired_name = hired_name.clone();
        }
        if let Some(hired_contact) = &self.hired_contact {
            job.hired_contact = hired_contact.clone();
        }
        if let Some(hired_notes) = &self.hired_notes {
            job.hired_notes = hired_notes.clone();
        }
        if let Some(deleted_at) = self.deleted_at {
            job.deleted_at = deleted_at;
        }
        if let Some(deleted_by) = &self.deleted_by {
            job.deleted_by = deleted_by.clone();
        }
    }
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Contract over the relational store. Each write couples the job mutation
/// with its audit insertion in one transaction: both land or neither does.
///
/// Listing results are ordered by `created_at` descending; postings with the
/// same timestamp keep their insertion order.
pub trait JobStore: Send + Sync {
    fn create(&self, job: NewJob, audit: NewAuditEntry) -> Result<Job, StoreError>;
    fn find_one(&self, id: &JobId) -> Result<Option<Job>, StoreError>;
    fn update(&self, id: &JobId, patch: JobPatch, audit: NewAuditEntry) -> Result<Job, StoreError>;
    fn find(&self, filter: &JobFilter) -> Result<Vec<Job>, StoreError>;
    fn count(&self, filter: &JobFilter) -> Result<usize, StoreError>;
    fn audit_trail(&self, job_id: &JobId) -> Result<Vec<AuditEntry>, StoreError>;
}

#[derive(Debug, Default)]
struct MemoryState {
    jobs: Vec<Job>,
    audits: Vec<AuditEntry>,
    job_seq: u64,
    audit_seq: u64,
}

/// Mutex-guarded in-process store. Jobs live in insertion order so the
/// ordering contract falls out of a stable sort.
#[derive(Debug, Default, Clone)]
pub struct MemoryJobStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MemoryState>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::Unavailable("store mutex poisoned".to_string()))
    }

    fn stamp_audit(state: &mut MemoryState, job_id: JobId, audit: NewAuditEntry) {
        state.audit_seq += 1;
        state.audits.push(AuditEntry {
            id: state.audit_seq,
            job_id,
            action: audit.action,
            actor: audit.actor,
            meta: audit.meta,
            created_at: chrono::Local::now().naive_local(),
        });
    }
}

impl JobStore for MemoryJobStore {
    fn create(&self, job: NewJob, audit: NewAuditEntry) -> Result<Job, StoreError> {
        let mut state = self.lock()?;
        state.job_seq += 1;
        let id = JobId(format!("job-{:06}", state.job_seq));

        let record = Job {
            id: id.clone(),
            title: job.title,
            description: job.description,
            location: job.location,
            kind: job.kind,
            active: job.active,
            status: JobStatus::Open,
            filled_at: None,
            hired_name: None,
            hired_contact: None,
            hired_notes: None,
            deleted_at: None,
            deleted_by: None,
            created_at: job.created_at,
        };

        state.jobs.push(record.clone());
        Self::stamp_audit(&mut state, id, audit);
        Ok(record)
    }

    fn find_one(&self, id: &JobId) -> Result<Option<Job>, StoreError> {
        let state = self.lock()?;
        Ok(state.jobs.iter().find(|job| &job.id == id).cloned())
    }

    fn update(&self, id: &JobId, patch: JobPatch, audit: NewAuditEntry) -> Result<Job, StoreError> {
        let mut state = self.lock()?;
        let job = state
            .jobs
            .iter_mut()
            .find(|job| &job.id == id)
            .ok_or(StoreError::NotFound)?;

        patch.apply(job);
        let updated = job.clone();
        Self::stamp_audit(&mut state, id.clone(), audit);
        Ok(updated)
    }

    fn find(&self, filter: &JobFilter) -> Result<Vec<Job>, StoreError> {
        let state = self.lock()?;
        let mut jobs: Vec<Job> = state
            .jobs
            .iter()
            .filter(|job| filter.matches(job))
            .cloned()
            .collect();
        // Stable sort keeps insertion order for equal timestamps.
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(jobs)
    }

    fn count(&self, filter: &JobFilter) -> Result<usize, StoreError> {
        let state = self.lock()?;
        Ok(state.jobs.iter().filter(|job| filter.matches(job)).count())
    }

    fn audit_trail(&self, job_id: &JobId) -> Result<Vec<AuditEntry>, StoreError> {
        let state = self.lock()?;
        Ok(state
            .audits
            .iter()
            .filter(|entry| &entry.job_id == job_id)
            .cloned()
            .collect())
    }
}
