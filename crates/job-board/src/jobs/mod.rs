//! Job posting lifecycle, visibility resolution, and hiring reports.
//!
//! The lifecycle engine ([`service::JobLifecycleService`]) is the sole writer
//! of [`domain::Job`] and [`domain::AuditEntry`] records: every mutation is
//! validated, gated on an explicit [`domain::Caller`] capability, and coupled
//! to exactly one audit entry at the store boundary. Reads go through the
//! [`query`] resolver so public callers can never observe deleted, hidden,
//! or filled postings.

pub mod domain;
pub mod intake;
pub mod query;
pub mod report;
pub mod router;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use domain::{
    AuditAction, AuditEntry, Caller, FillDetails, Job, JobContent, JobDraft, JobId, JobStatus,
    ValidationError,
};
pub use intake::{
    CandidateApplication, CompanyApplication, IntakeError, Notification, NotificationSender,
    NotifyError,
};
pub use query::{JobFilter, JobView};
pub use report::{HiringReport, HiringTotals, RecentHire, RECENT_HIRES_LIMIT};
pub use router::{job_router, JobBoardState};
pub use service::{JobLifecycleService, JobServiceError};
pub use store::{JobPatch, JobStore, MemoryJobStore, NewAuditEntry, NewJob, StoreError};
