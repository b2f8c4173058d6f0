use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use job_board::jobs::{Notification, NotificationSender, NotifyError};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Notification boundary for deployments without an outbound mail relay:
/// intake submissions land in the service log instead of being dropped.
#[derive(Debug, Default)]
pub(crate) struct LogNotificationSender;

impl NotificationSender for LogNotificationSender {
    fn send(&self, notification: Notification) -> Result<(), NotifyError> {
        info!(
            to = %notification.to,
            subject = %notification.subject,
            body = %notification.body,
            "intake notification"
        );
        Ok(())
    }
}

pub(crate) fn parse_datetime(raw: &str) -> Result<NaiveDateTime, String> {
    let trimmed = raw.trim();
    if let Ok(value) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
        return Ok(value);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN))
        .map_err(|err| {
            format!("failed to parse '{raw}' as YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS ({err})")
        })
}
