use chrono::{Duration, Local, NaiveDateTime};
use clap::Args;
use job_board::error::AppError;
use job_board::jobs::{
    Caller, FillDetails, HiringReport, JobDraft, JobLifecycleService, JobServiceError, JobView,
    MemoryJobStore,
};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct ReportArgs {
    /// Evaluation instant (YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS). Defaults to now.
    #[arg(long, value_parser = crate::infra::parse_datetime)]
    pub(crate) now: Option<NaiveDateTime>,
    /// Render the printable document instead of JSON
    #[arg(long)]
    pub(crate) printable: bool,
    /// Title for the printable document
    #[arg(long, default_value = "Hiring report")]
    pub(crate) title: String,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Evaluation instant for the closing report (defaults to now)
    #[arg(long, value_parser = crate::infra::parse_datetime)]
    pub(crate) now: Option<NaiveDateTime>,
}

/// Render the hiring report over a seeded season of postings. The seed data
/// is synthetic; the command exists to show both report surfaces without a
/// running service.
pub(crate) fn run_hiring_report(args: ReportArgs) -> Result<(), AppError> {
    let now = args.now.unwrap_or_else(|| Local::now().naive_local());
    let (store, _service) = seeded_season(now)?;

    let report = HiringReport::compute(store.as_ref(), now).map_err(JobServiceError::from)?;

    if args.printable {
        println!("{}", report.render_printable(&args.title));
    } else {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(err) => println!("report serialization failed: {err}"),
        }
    }

    Ok(())
}

/// Walk one posting through create, fill, unfill, soft delete, and restore,
/// printing the listings and the audit trail along the way.
pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let now = args.now.unwrap_or_else(|| Local::now().naive_local());
    let store = Arc::new(MemoryJobStore::new());
    let service = JobLifecycleService::new(store.clone());
    let admin = Caller::admin("demo-admin");

    println!("Job board lifecycle demo");

    let cook = service.create(
        &admin,
        JobDraft {
            title: "Line Cook".to_string(),
            description: "Evening shifts, busy kitchen".to_string(),
            location: Some("Riverside".to_string()),
            kind: Some("full-time".to_string()),
            active: true,
        },
    )?;
    let porter = service.create(
        &admin,
        JobDraft {
            title: "Night Porter".to_string(),
            description: "Overnight front desk cover".to_string(),
            location: Some("Riverside".to_string()),
            kind: Some("part-time".to_string()),
            active: true,
        },
    )?;
    println!("- Created {} and {}", cook.id, porter.id);

    let public = service.list(&Caller::public(), JobView::All)?;
    println!("- Public listing shows {} open posting(s)", public.len());

    service.fill(
        &admin,
        &cook.id,
        FillDetails {
            hired_name: "Jordan Reyes".to_string(),
            hired_contact: Some("jordan.reyes@example.com".to_string()),
            hired_notes: Some("Starts next Monday".to_string()),
        },
    )?;
    println!("- Filled {} (hidden from the public listing)", cook.id);

    service.unfill(&admin, &cook.id)?;
    println!("- Reopened {} after the hire fell through", cook.id);

    service.soft_delete(&admin, &porter.id)?;
    println!("- Soft deleted {}", porter.id);
    service.restore(&admin, &porter.id)?;
    println!("- Restored {} (stays unpublished until toggled)", porter.id);

    println!("\nAdmin views");
    for view in [JobView::Published, JobView::Hidden, JobView::Deleted] {
        let jobs = service.list(&admin, view)?;
        let titles: Vec<&str> = jobs.iter().map(|job| job.title.as_str()).collect();
        println!("- {:?}: {:?}", view, titles);
    }

    println!("\nAudit trail for {}", cook.id);
    for entry in service.audit_trail(&admin, &cook.id)? {
        println!(
            "- {} by {} at {}",
            entry.action.label(),
            entry.actor,
            entry.created_at.format("%Y-%m-%d %H:%M:%S")
        );
    }

    let report = HiringReport::compute(store.as_ref(), now).map_err(JobServiceError::from)?;
    println!("\n{}", report.render_printable("Demo hiring report"));

    Ok(())
}

/// Seed a plausible hiring season: hires scattered across the current week,
/// month, year, and beyond, plus one posting still open.
fn seeded_season(
    now: NaiveDateTime,
) -> Result<(Arc<MemoryJobStore>, JobLifecycleService<MemoryJobStore>), AppError> {
    let store = Arc::new(MemoryJobStore::new());
    let service = JobLifecycleService::new(store.clone());
    let admin = Caller::admin("seed");

    let hires: &[(&str, &str, i64)] = &[
        ("Line Cook", "Jordan Reyes", 2),
        ("Waiter", "Sam Okafor", 12),
        ("Barista", "Alex Chen", 45),
        ("Driver", "Priya Nair", 180),
        ("Cleaner", "Marta Kowalska", 400),
    ];

    for (title, name, days_ago) in hires {
        let job = service.create(
            &admin,
            JobDraft {
                title: (*title).to_string(),
                description: format!("{title} duties"),
                location: Some("Riverside".to_string()),
                kind: Some("full-time".to_string()),
                active: true,
            },
        )?;
        service.fill(
            &admin,
            &job.id,
            FillDetails {
                hired_name: (*name).to_string(),
                hired_contact: Some(format!(
                    "{}@example.com",
                    name.to_ascii_lowercase().replace(' ', ".")
                )),
                hired_notes: None,
            },
        )?;
        backdate(&store, &job.id, now - Duration::days(*days_ago))?;
    }

    service.create(
        &admin,
        JobDraft {
            title: "Receptionist".to_string(),
            description: "Front desk, weekday mornings".to_string(),
            location: Some("Riverside".to_string()),
            kind: Some("part-time".to_string()),
            active: true,
        },
    )?;

    Ok((store, service))
}

fn backdate(
    store: &MemoryJobStore,
    id: &job_board::jobs::JobId,
    filled_at: NaiveDateTime,
) -> Result<(), AppError> {
    use job_board::jobs::{AuditAction, JobPatch, JobStore, NewAuditEntry};

    store
        .update(
            id,
            JobPatch {
                filled_at: Some(Some(filled_at)),
                ..JobPatch::default()
            },
            NewAuditEntry::new(AuditAction::Update, "seed"),
        )
        .map_err(JobServiceError::from)?;
    Ok(())
}
