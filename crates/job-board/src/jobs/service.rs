use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::info;

use super::domain::{
    require_non_blank, AuditAction, AuditEntry, Caller, FillDetails, Job, JobContent, JobDraft,
    JobId, JobStatus, ValidationError,
};
use super::query::{JobFilter, JobView};
use super::store::{JobPatch, JobStore, NewAuditEntry, NewJob, StoreError};

/// Owns the posting state machine. Every mutation requires an admin
/// [`Caller`], validates its input before touching the store, and writes
/// exactly one audit entry in the same store call as the job write.
pub struct JobLifecycleService<S> {
    store: Arc<S>,
}

impl<S: JobStore> JobLifecycleService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    fn require_admin(caller: &Caller) -> Result<(), JobServiceError> {
        if caller.is_admin() {
            Ok(())
        } else {
            Err(JobServiceError::Unauthorized)
        }
    }

    fn now() -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }

    /// Create a new OPEN posting and its CREATE audit entry.
    pub fn create(&self, caller: &Caller, draft: JobDraft) -> Result<Job, JobServiceError> {
        Self::require_admin(caller)?;
        require_non_blank("title", &draft.title)?;
        require_non_blank("description", &draft.description)?;

        let mut audit = NewAuditEntry::new(AuditAction::Create, caller.actor())
            .with_meta("title", draft.title.clone())
            .with_meta("description", draft.description.clone())
            .with_meta("active", draft.active.to_string());
        if let Some(location) = &draft.location {
            audit = audit.with_meta("location", location.clone());
        }
        if let Some(kind) = &draft.kind {
            audit = audit.with_meta("type", kind.clone());
        }

        let job = self.store.create(
            NewJob {
                title: draft.title,
                description: draft.description,
                location: draft.location,
                kind: draft.kind,
                active: draft.active,
                created_at: Self::now(),
            },
            audit,
        )?;

        info!(job_id = %job.id, "job posting created");
        Ok(job)
    }

    /// Overwrite the content and visibility of a posting, leaving status,
    /// fill, and deletion fields untouched.
    pub fn update(
        &self,
        caller: &Caller,
        id: &JobId,
        content: JobContent,
    ) -> Result<Job, JobServiceError> {
        Self::require_admin(caller)?;
        require_non_blank("title", &content.title)?;
        require_non_blank("description", &content.description)?;

        let audit = NewAuditEntry::new(AuditAction::Update, caller.actor())
            .with_meta("title", content.title.clone())
            .with_meta("description", content.description.clone())
            .with_meta("active", content.active.to_string());

        let patch = JobPatch {
            title: Some(content.title),
            description: Some(content.description),
            location: Some(content.location),
            kind: Some(content.kind),
            active: Some(content.active),
            ..JobPatch::default()
        };

        Ok(self.store.update(id, patch, audit)?)
    }

    /// Flip only the visibility flag; backs the publish/hide toggle.
    pub fn set_active(
        &self,
        caller: &Caller,
        id: &JobId,
        active: bool,
    ) -> Result<Job, JobServiceError> {
        Self::require_admin(caller)?;

        let audit = NewAuditEntry::new(AuditAction::Update, caller.actor())
            .with_meta("active", active.to_string());
        let patch = JobPatch {
            active: Some(active),
            ..JobPatch::default()
        };

        Ok(self.store.update(id, patch, audit)?)
    }

    /// Transition OPEN -> FILLED, recording the hire and hiding the posting.
    ///
    /// Rejected for soft-deleted or already-filled postings; a second fill
    /// would silently re-stamp `filled_at` and the hired fields.
    pub fn fill(
        &self,
        caller: &Caller,
        id: &JobId,
        details: FillDetails,
    ) -> Result<Job, JobServiceError> {
        Self::require_admin(caller)?;
        require_non_blank("hired_name", &details.hired_name)?;

        let job = self.fetch(id)?;
        if job.deleted_at.is_some() {
            return Err(JobServiceError::InvalidTransition {
                intent: "fill",
                state: "soft-deleted",
            });
        }
        if job.status == JobStatus::Filled {
            return Err(JobServiceError::InvalidTransition {
                intent: "fill",
                state: "already filled",
            });
        }

        let mut audit = NewAuditEntry::new(AuditAction::Fill, caller.actor())
            .with_meta("hired_name", details.hired_name.clone());
        if let Some(contact) = &details.hired_contact {
            audit = audit.with_meta("hired_contact", contact.clone());
        }

        let patch = JobPatch {
            status: Some(JobStatus::Filled),
            filled_at: Some(Some(Self::now())),
            active: Some(false),
            hired_name: Some(Some(details.hired_name)),
            hired_contact: Some(details.hired_contact),
            hired_notes: Some(details.hired_notes),
            ..JobPatch::default()
        };

        let job = self.store.update(id, patch, audit)?;
        info!(job_id = %job.id, "job posting filled");
        Ok(job)
    }

    /// Transition FILLED -> OPEN, clearing every hired field. The identity
    /// and content fields survive the round trip untouched.
    pub fn unfill(&self, caller: &Caller, id: &JobId) -> Result<Job, JobServiceError> {
        Self::require_admin(caller)?;

        let job = self.fetch(id)?;
        if job.status == JobStatus::Open {
            return Err(JobServiceError::InvalidTransition {
                intent: "unfill",
                state: "already open",
            });
        }

        let audit = NewAuditEntry::new(AuditAction::Unfill, caller.actor());
        let patch = JobPatch {
            status: Some(JobStatus::Open),
            filled_at: Some(None),
            hired_name: Some(None),
            hired_contact: Some(None),
            hired_notes: Some(None),
            ..JobPatch::default()
        };

        Ok(self.store.update(id, patch, audit)?)
    }

    /// Mark a posting deleted and invisible. Repeat calls are allowed and
    /// each appends a fresh SOFT_DELETE audit entry; the trail records
    /// operator intent, not deduplicated state changes.
    pub fn soft_delete(&self, caller: &Caller, id: &JobId) -> Result<Job, JobServiceError> {
        Self::require_admin(caller)?;

        let audit = NewAuditEntry::new(AuditAction::SoftDelete, caller.actor());
        let patch = JobPatch {
            deleted_at: Some(Some(Self::now())),
            deleted_by: Some(Some(caller.actor().to_string())),
            active: Some(false),
            ..JobPatch::default()
        };

        let job = self.store.update(id, patch, audit)?;
        info!(job_id = %job.id, actor = caller.actor(), "job posting soft-deleted");
        Ok(job)
    }

    /// Clear the deletion marker. Does not republish: the posting stays
    /// hidden until an explicit `set_active`.
    pub fn restore(&self, caller: &Caller, id: &JobId) -> Result<Job, JobServiceError> {
        Self::require_admin(caller)?;

        let audit = NewAuditEntry::new(AuditAction::Restore, caller.actor());
        let patch = JobPatch {
            deleted_at: Some(None),
            deleted_by: Some(None),
            ..JobPatch::default()
        };

        Ok(self.store.update(id, patch, audit)?)
    }

    /// List postings for a caller and requested view, ordered newest first.
    pub fn list(&self, caller: &Caller, view: JobView) -> Result<Vec<Job>, JobServiceError> {
        let filter = JobFilter::for_caller(caller, view);
        Ok(self.store.find(&filter)?)
    }

    /// The audit trail for one posting, oldest first. Admin only.
    pub fn audit_trail(
        &self,
        caller: &Caller,
        id: &JobId,
    ) -> Result<Vec<AuditEntry>, JobServiceError> {
        Self::require_admin(caller)?;
        self.fetch(id)?;
        Ok(self.store.audit_trail(id)?)
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    fn fetch(&self, id: &JobId) -> Result<Job, JobServiceError> {
        self.store.find_one(id)?.ok_or(JobServiceError::NotFound)
    }
}

/// Error raised by the lifecycle engine.
#[derive(Debug, thiserror::Error)]
pub enum JobServiceError {
    #[error("administrator privileges required")]
    Unauthorized,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("job not found")]
    NotFound,
    #[error("cannot {intent} a job that is {state}")]
    InvalidTransition {
        intent: &'static str,
        state: &'static str,
    },
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for JobServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound => Self::NotFound,
            other => Self::Store(other),
        }
    }
}
