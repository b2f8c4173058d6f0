use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::config::AdminConfig;
use crate::jobs::domain::{AuditAction, Caller, FillDetails, Job, JobDraft, JobId};
use crate::jobs::intake::{Notification, NotificationSender, NotifyError};
use crate::jobs::router::{job_router, JobBoardState};
use crate::jobs::service::JobLifecycleService;
use crate::jobs::store::{JobPatch, JobStore, MemoryJobStore, NewAuditEntry, NewJob};

pub(super) const ADMIN_TOKEN: &str = "secret-token";

pub(super) fn admin() -> Caller {
    Caller::admin("admin")
}

pub(super) fn build_service() -> (Arc<MemoryJobStore>, JobLifecycleService<MemoryJobStore>) {
    let store = Arc::new(MemoryJobStore::new());
    let service = JobLifecycleService::new(store.clone());
    (store, service)
}

pub(super) fn draft(title: &str) -> JobDraft {
    JobDraft {
        title: title.to_string(),
        description: format!("{title} duties"),
        location: Some("Downtown".to_string()),
        kind: Some("full-time".to_string()),
        active: true,
    }
}

pub(super) fn fill_details(name: &str) -> FillDetails {
    FillDetails {
        hired_name: name.to_string(),
        hired_contact: Some(format!("{}@example.com", name.to_ascii_lowercase())),
        hired_notes: Some("Referred by staff".to_string()),
    }
}

pub(super) fn at(date: (i32, u32, u32), time: (u32, u32, u32)) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(date.0, date.1, date.2)
        .expect("valid date")
        .and_hms_opt(time.0, time.1, time.2)
        .expect("valid time")
}

/// Insert a posting directly at the store layer with a fixed creation time.
pub(super) fn seed_job(store: &MemoryJobStore, title: &str, created_at: NaiveDateTime) -> Job {
    store
        .create(
            NewJob {
                title: title.to_string(),
                description: format!("{title} duties"),
                location: None,
                kind: None,
                active: true,
                created_at,
            },
            NewAuditEntry::new(AuditAction::Create, "seed"),
        )
        .expect("seed job")
}

/// Force a posting into the FILLED state with an explicit fill timestamp so
/// report windows can be pinned in tests.
pub(super) fn backdate_fill(
    store: &MemoryJobStore,
    id: &JobId,
    hired_name: &str,
    filled_at: NaiveDateTime,
) -> Job {
    store
        .update(
            id,
            JobPatch {
                status: Some(crate::jobs::domain::JobStatus::Filled),
                active: Some(false),
                filled_at: Some(Some(filled_at)),
                hired_name: Some(Some(hired_name.to_string())),
                hired_contact: Some(Some(format!(
                    "{}@example.com",
                    hired_name.to_ascii_lowercase().replace(' ', ".")
                ))),
                hired_notes: Some(Some("seeded".to_string())),
                ..JobPatch::default()
            },
            NewAuditEntry::new(AuditAction::Fill, "seed"),
        )
        .expect("backdate fill")
}

#[derive(Default)]
pub(super) struct MemoryNotifier {
    sent: Mutex<Vec<Notification>>,
    pub(super) fail: bool,
}

impl MemoryNotifier {
    pub(super) fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub(super) fn sent(&self) -> Vec<Notification> {
        self.sent.lock().expect("notifier mutex poisoned").clone()
    }
}

impl NotificationSender for MemoryNotifier {
    fn send(&self, notification: Notification) -> Result<(), NotifyError> {
        if self.fail {
            return Err(NotifyError::Transport("smtp unreachable".to_string()));
        }
        self.sent
            .lock()
            .expect("notifier mutex poisoned")
            .push(notification);
        Ok(())
    }
}

pub(super) fn admin_config() -> AdminConfig {
    AdminConfig {
        user: "admin".to_string(),
        password: "hunter2".to_string(),
        token: ADMIN_TOKEN.to_string(),
    }
}

pub(super) struct TestApp {
    pub(super) service: Arc<JobLifecycleService<MemoryJobStore>>,
    pub(super) notifier: Arc<MemoryNotifier>,
    pub(super) router: axum::Router,
}

pub(super) fn test_app() -> TestApp {
    test_app_with_notifier(MemoryNotifier::default())
}

pub(super) fn test_app_with_notifier(notifier: MemoryNotifier) -> TestApp {
    let (_store, service) = build_service();
    let service = Arc::new(service);
    let notifier = Arc::new(notifier);
    let state = JobBoardState {
        service: service.clone(),
        notifier: notifier.clone(),
        admin: admin_config(),
        operator_email: "ops@example.com".to_string(),
    };
    TestApp {
        service,
        notifier,
        router: job_router(state),
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body is readable");
    serde_json::from_slice(&bytes).expect("body is json")
}

pub(super) async fn read_text_body(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body is readable");
    String::from_utf8(bytes.to_vec()).expect("body is utf-8")
}
