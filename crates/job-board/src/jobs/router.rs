use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDateTime;
use serde::Deserialize;
use serde_json::json;

use crate::config::AdminConfig;

use super::domain::{Caller, FillDetails, JobContent, JobDraft, JobId, ValidationError};
use super::intake::{
    submit_candidate, submit_company, CandidateApplication, CompanyApplication, IntakeError,
    NotificationSender,
};
use super::query::JobView;
use super::report::HiringReport;
use super::service::{JobLifecycleService, JobServiceError};
use super::store::JobStore;

/// Shared state behind every route: the lifecycle engine, the notification
/// boundary, and the admin gate configuration.
pub struct JobBoardState<S, N> {
    pub service: Arc<JobLifecycleService<S>>,
    pub notifier: Arc<N>,
    pub admin: AdminConfig,
    pub operator_email: String,
}

impl<S, N> Clone for JobBoardState<S, N> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            notifier: self.notifier.clone(),
            admin: self.admin.clone(),
            operator_email: self.operator_email.clone(),
        }
    }
}

/// Router builder exposing the job board HTTP surface.
pub fn job_router<S, N>(state: JobBoardState<S, N>) -> Router
where
    S: JobStore + 'static,
    N: NotificationSender + 'static,
{
    Router::new()
        .route(
            "/api/v1/jobs",
            get(list_jobs_handler::<S, N>).post(create_job_handler::<S, N>),
        )
        .route(
            "/api/v1/jobs/:id",
            axum::routing::patch(patch_job_handler::<S, N>)
                .delete(delete_job_handler::<S, N>),
        )
        .route("/api/v1/jobs/:id/audits", get(audit_trail_handler::<S, N>))
        .route("/api/v1/admin/login", post(login_handler::<S, N>))
        .route(
            "/api/v1/admin/reports/hiring",
            get(hiring_report_handler::<S, N>),
        )
        .route(
            "/api/v1/admin/reports/hiring/printable",
            get(hiring_report_printable_handler::<S, N>),
        )
        .route(
            "/api/v1/job-application",
            post(candidate_application_handler::<S, N>),
        )
        .route(
            "/api/v1/company-application",
            post(company_application_handler::<S, N>),
        )
        .with_state(state)
}

/// Derive the request capability from the presented admin token
/// (`x-admin-token` header or bearer authorization).
fn caller_from_headers(headers: &HeaderMap, admin: &AdminConfig) -> Caller {
    let presented = headers
        .get("x-admin-token")
        .and_then(|value| value.to_str().ok())
        .or_else(|| {
            headers
                .get(header::AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.strip_prefix("Bearer "))
        });

    match presented {
        Some(token) if !token.is_empty() && token == admin.token => {
            Caller::admin(admin.user.clone())
        }
        _ => Caller::public(),
    }
}

pub(crate) fn status_for(err: &JobServiceError) -> StatusCode {
    match err {
        JobServiceError::Unauthorized => StatusCode::UNAUTHORIZED,
        JobServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        JobServiceError::NotFound => StatusCode::NOT_FOUND,
        JobServiceError::InvalidTransition { .. } => StatusCode::CONFLICT,
        JobServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn service_error_response(err: JobServiceError) -> Response {
    let payload = json!({ "ok": false, "error": err.to_string() });
    (status_for(&err), Json(payload)).into_response()
}

fn intake_error_response(err: IntakeError) -> Response {
    let status = match &err {
        IntakeError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        IntakeError::Notify(_) => StatusCode::BAD_GATEWAY,
    };
    let payload = json!({ "ok": false, "error": err.to_string() });
    (status, Json(payload)).into_response()
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListJobsParams {
    /// Must be explicitly requested alongside a valid token; otherwise the
    /// caller stays public even with admin credentials.
    #[serde(default)]
    admin: Option<String>,
    #[serde(default)]
    view: Option<JobView>,
    #[serde(default)]
    deleted: Option<String>,
    #[serde(default)]
    filled: Option<String>,
    #[serde(default)]
    all: Option<String>,
}

fn flag(value: &Option<String>) -> bool {
    matches!(value.as_deref(), Some("1") | Some("true"))
}

pub(crate) async fn list_jobs_handler<S, N>(
    State(state): State<JobBoardState<S, N>>,
    headers: HeaderMap,
    Query(params): Query<ListJobsParams>,
) -> Response
where
    S: JobStore + 'static,
    N: NotificationSender + 'static,
{
    let caller = caller_from_headers(&headers, &state.admin);
    let caller = if caller.is_admin() && flag(&params.admin) {
        caller
    } else {
        Caller::public()
    };

    let view = params.view.unwrap_or_else(|| {
        JobView::from_flags(flag(&params.deleted), flag(&params.filled), flag(&params.all))
    });

    match state.service.list(&caller, view) {
        Ok(jobs) => (StatusCode::OK, Json(jobs)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn create_job_handler<S, N>(
    State(state): State<JobBoardState<S, N>>,
    headers: HeaderMap,
    Json(draft): Json<JobDraft>,
) -> Response
where
    S: JobStore + 'static,
    N: NotificationSender + 'static,
{
    let caller = caller_from_headers(&headers, &state.admin);
    match state.service.create(&caller, draft) {
        Ok(job) => (StatusCode::CREATED, Json(job)).into_response(),
        Err(err) => service_error_response(err),
    }
}

/// Directive body for PATCH: exactly one of `fill` / `unfill` / `restore`,
/// or a content update (optionally just the `active` toggle).
#[derive(Debug, Default, Deserialize)]
pub(crate) struct JobDirective {
    #[serde(default)]
    restore: bool,
    #[serde(default)]
    fill: bool,
    #[serde(default)]
    unfill: bool,
    #[serde(default)]
    hired_name: Option<String>,
    #[serde(default)]
    hired_contact: Option<String>,
    #[serde(default)]
    hired_notes: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    active: Option<bool>,
}

pub(crate) async fn patch_job_handler<S, N>(
    State(state): State<JobBoardState<S, N>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(directive): Json<JobDirective>,
) -> Response
where
    S: JobStore + 'static,
    N: NotificationSender + 'static,
{
    let caller = caller_from_headers(&headers, &state.admin);
    let id = JobId(id);

    let result = if directive.restore {
        state.service.restore(&caller, &id)
    } else if directive.fill {
        state.service.fill(
            &caller,
            &id,
            FillDetails {
                hired_name: directive.hired_name.unwrap_or_default(),
                hired_contact: directive.hired_contact,
                hired_notes: directive.hired_notes,
            },
        )
    } else if directive.unfill {
        state.service.unfill(&caller, &id)
    } else if directive.title.is_none() && directive.description.is_none() {
        match directive.active {
            Some(active) => state.service.set_active(&caller, &id, active),
            None => Err(JobServiceError::Validation(ValidationError::Blank {
                field: "title",
            })),
        }
    } else {
        state.service.update(
            &caller,
            &id,
            JobContent {
                title: directive.title.unwrap_or_default(),
                description: directive.description.unwrap_or_default(),
                location: directive.location,
                kind: directive.kind,
                active: directive.active.unwrap_or(true),
            },
        )
    };

    match result {
        Ok(job) => (StatusCode::OK, Json(job)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn delete_job_handler<S, N>(
    State(state): State<JobBoardState<S, N>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response
where
    S: JobStore + 'static,
    N: NotificationSender + 'static,
{
    let caller = caller_from_headers(&headers, &state.admin);
    match state.service.soft_delete(&caller, &JobId(id)) {
        Ok(_) => (StatusCode::OK, Json(json!({ "ok": true }))).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn audit_trail_handler<S, N>(
    State(state): State<JobBoardState<S, N>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response
where
    S: JobStore + 'static,
    N: NotificationSender + 'static,
{
    let caller = caller_from_headers(&headers, &state.admin);
    match state.service.audit_trail(&caller, &JobId(id)) {
        Ok(entries) => (StatusCode::OK, Json(entries)).into_response(),
        Err(err) => service_error_response(err),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginRequest {
    user: String,
    pass: String,
}

pub(crate) async fn login_handler<S, N>(
    State(state): State<JobBoardState<S, N>>,
    Json(request): Json<LoginRequest>,
) -> Response
where
    S: JobStore + 'static,
    N: NotificationSender + 'static,
{
    if request.user == state.admin.user && request.pass == state.admin.password {
        let payload = json!({ "ok": true, "token": state.admin.token });
        (StatusCode::OK, Json(payload)).into_response()
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({ "ok": false }))).into_response()
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ReportParams {
    /// Evaluation instant override (`YYYY-MM-DDTHH:MM:SS`); defaults to the
    /// local wall clock.
    #[serde(default)]
    now: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

fn parse_report_now(raw: &Option<String>) -> Result<NaiveDateTime, Response> {
    match raw {
        None => Ok(chrono::Local::now().naive_local()),
        Some(value) => NaiveDateTime::parse_from_str(value.trim(), "%Y-%m-%dT%H:%M:%S").map_err(
            |err| {
                let payload = json!({
                    "ok": false,
                    "error": format!("failed to parse '{value}' as YYYY-MM-DDTHH:MM:SS ({err})"),
                });
                (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
            },
        ),
    }
}

pub(crate) async fn hiring_report_handler<S, N>(
    State(state): State<JobBoardState<S, N>>,
    headers: HeaderMap,
    Query(params): Query<ReportParams>,
) -> Response
where
    S: JobStore + 'static,
    N: NotificationSender + 'static,
{
    let caller = caller_from_headers(&headers, &state.admin);
    if !caller.is_admin() {
        return service_error_response(JobServiceError::Unauthorized);
    }

    let now = match parse_report_now(&params.now) {
        Ok(now) => now,
        Err(response) => return response,
    };

    match HiringReport::compute(state.service.store().as_ref(), now) {
        Ok(report) => {
            let payload = json!({
                "ok": true,
                "generated_at": report.generated_at,
                "totals": report.totals,
                "recent_hires": report.recent_hires,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => service_error_response(JobServiceError::from(err)),
    }
}

pub(crate) async fn hiring_report_printable_handler<S, N>(
    State(state): State<JobBoardState<S, N>>,
    headers: HeaderMap,
    Query(params): Query<ReportParams>,
) -> Response
where
    S: JobStore + 'static,
    N: NotificationSender + 'static,
{
    let caller = caller_from_headers(&headers, &state.admin);
    if !caller.is_admin() {
        return service_error_response(JobServiceError::Unauthorized);
    }

    let now = match parse_report_now(&params.now) {
        Ok(now) => now,
        Err(response) => return response,
    };

    let title = params.title.as_deref().unwrap_or("Hiring report");

    match HiringReport::compute(state.service.store().as_ref(), now) {
        Ok(report) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            report.render_printable(title),
        )
            .into_response(),
        Err(err) => service_error_response(JobServiceError::from(err)),
    }
}

pub(crate) async fn candidate_application_handler<S, N>(
    State(state): State<JobBoardState<S, N>>,
    Json(application): Json<CandidateApplication>,
) -> Response
where
    S: JobStore + 'static,
    N: NotificationSender + 'static,
{
    match submit_candidate(state.notifier.as_ref(), &state.operator_email, &application) {
        Ok(()) => (StatusCode::OK, Json(json!({ "ok": true }))).into_response(),
        Err(err) => intake_error_response(err),
    }
}

pub(crate) async fn company_application_handler<S, N>(
    State(state): State<JobBoardState<S, N>>,
    Json(application): Json<CompanyApplication>,
) -> Response
where
    S: JobStore + 'static,
    N: NotificationSender + 'static,
{
    match submit_company(state.notifier.as_ref(), &state.operator_email, &application) {
        Ok(()) => (StatusCode::OK, Json(json!({ "ok": true }))).into_response(),
        Err(err) => intake_error_response(err),
    }
}
