//! Hiring report computed over a realistic season of postings, driven purely
//! through the public API with backdated fill timestamps.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use job_board::jobs::{
    AuditAction, Caller, HiringReport, JobDraft, JobLifecycleService, JobPatch, JobStatus,
    JobStore, MemoryJobStore, NewAuditEntry,
};

fn evaluation_time() -> NaiveDateTime {
    // 2025-09-22 was a Monday.
    NaiveDate::from_ymd_opt(2025, 9, 24)
        .expect("valid date")
        .and_hms_opt(12, 0, 0)
        .expect("valid time")
}

fn hire(
    store: &MemoryJobStore,
    service: &JobLifecycleService<MemoryJobStore>,
    title: &str,
    name: &str,
    filled_at: NaiveDateTime,
) {
    let job = service
        .create(
            &Caller::admin("admin"),
            JobDraft {
                title: title.to_string(),
                description: format!("{title} duties"),
                location: None,
                kind: None,
                active: true,
            },
        )
        .expect("job created");
    store
        .update(
            &job.id,
            JobPatch {
                status: Some(JobStatus::Filled),
                active: Some(false),
                filled_at: Some(Some(filled_at)),
                hired_name: Some(Some(name.to_string())),
                ..JobPatch::default()
            },
            NewAuditEntry::new(AuditAction::Fill, "seed"),
        )
        .expect("backdated fill");
}

#[test]
fn report_splits_hires_across_calendar_and_rolling_windows() {
    let store = Arc::new(MemoryJobStore::new());
    let service = JobLifecycleService::new(store.clone());
    let now = evaluation_time();

    hire(&store, &service, "Cook", "This Week", now - Duration::days(1));
    hire(
        &store,
        &service,
        "Waiter",
        "Earlier This Month",
        now - Duration::days(14),
    );
    hire(
        &store,
        &service,
        "Driver",
        "Spring Hire",
        now - Duration::days(120),
    );
    hire(
        &store,
        &service,
        "Cleaner",
        "Last Year",
        now - Duration::days(400),
    );

    let report = HiringReport::compute(store.as_ref(), now).expect("report");
    let totals = &report.totals;

    assert_eq!(totals.total_all_time, 4);
    assert_eq!(totals.hired_this_week, 1);
    assert_eq!(totals.hired_this_month, 2);
    assert_eq!(totals.hired_this_year, 3);
    assert_eq!(totals.hired_last_7, 1);
    assert_eq!(totals.hired_last_30, 2);
    assert_eq!(totals.hired_last_365, 3);

    assert_eq!(report.recent_hires.len(), 4);
    assert_eq!(report.recent_hires[0].hired_name, "This Week");
    assert_eq!(report.recent_hires[3].hired_name, "Last Year");
}

#[test]
fn soft_deleted_hires_vanish_from_the_report() {
    let store = Arc::new(MemoryJobStore::new());
    let service = JobLifecycleService::new(store.clone());
    let now = evaluation_time();

    hire(&store, &service, "Cook", "Kept", now - Duration::days(1));
    hire(&store, &service, "Waiter", "Removed", now - Duration::days(2));

    let removed = service
        .list(&Caller::admin("admin"), job_board::jobs::JobView::Filled)
        .expect("filled view")
        .into_iter()
        .find(|job| job.hired_name.as_deref() == Some("Removed"))
        .expect("removed posting present");
    service
        .soft_delete(&Caller::admin("admin"), &removed.id)
        .expect("soft delete");

    let report = HiringReport::compute(store.as_ref(), now).expect("report");
    assert_eq!(report.totals.total_all_time, 1);
    assert_eq!(report.recent_hires.len(), 1);
    assert_eq!(report.recent_hires[0].hired_name, "Kept");
}

#[test]
fn printable_form_renders_the_same_report() {
    let store = Arc::new(MemoryJobStore::new());
    let service = JobLifecycleService::new(store.clone());
    let now = evaluation_time();

    hire(&store, &service, "Cook", "Jane Doe", now - Duration::days(1));

    let report = HiringReport::compute(store.as_ref(), now).expect("report");
    let document = report.render_printable("Seasonal hiring");

    assert!(document.starts_with("Seasonal hiring"));
    assert!(document.contains("Jane Doe"));
    assert!(document.contains("Week (Mon-Sun): 1"));
}
