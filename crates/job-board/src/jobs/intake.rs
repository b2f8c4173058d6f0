//! Candidate and company application intake.
//!
//! Submissions never touch the job store: they are formatted into a single
//! notification for the operator inbox and handed to whatever
//! [`NotificationSender`] the binary wires in. A failed dispatch is a failed
//! dispatch only; it cannot roll anything back because nothing was written.

use serde::{Deserialize, Serialize};

use super::domain::{require_non_blank, ValidationError};

/// A person applying for work through the public form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateApplication {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub cv_url: Option<String>,
}

/// A company asking to list positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyApplication {
    pub company_name: String,
    #[serde(default)]
    pub contact_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub positions: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}

/// Formatted message headed for the operator address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Outbound dispatch boundary (e-mail in production, in-memory in tests).
pub trait NotificationSender: Send + Sync {
    fn send(&self, notification: Notification) -> Result<(), NotifyError>;
}

/// Notification dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

/// Error raised by intake submission.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
}

fn field_line(label: &str, value: Option<&str>) -> String {
    format!("{label}: {}\n", value.filter(|v| !v.trim().is_empty()).unwrap_or("not provided"))
}

/// Build the operator notification for a candidate submission.
pub fn candidate_notification(operator: &str, application: &CandidateApplication) -> Notification {
    let mut body = String::new();
    body.push_str(&field_line("Name", Some(&application.name)));
    body.push_str(&field_line("Email", application.email.as_deref()));
    body.push_str(&field_line("Phone", application.phone.as_deref()));
    body.push_str(&field_line("Position of interest", application.position.as_deref()));
    body.push_str(&field_line("CV / portfolio", application.cv_url.as_deref()));
    body.push('\n');
    body.push_str("Message:\n");
    body.push_str(
        application
            .message
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or("No additional message."),
    );
    body.push('\n');

    Notification {
        to: operator.to_string(),
        subject: format!("New job application - {}", application.name),
        body,
    }
}

/// Build the operator notification for a company submission.
pub fn company_notification(operator: &str, application: &CompanyApplication) -> Notification {
    let mut body = String::new();
    body.push_str(&field_line("Company", Some(&application.company_name)));
    body.push_str(&field_line("Contact", application.contact_name.as_deref()));
    body.push_str(&field_line("Email", application.email.as_deref()));
    body.push_str(&field_line("Phone", application.phone.as_deref()));
    body.push_str(&field_line("City", application.city.as_deref()));
    body.push_str(&field_line("Positions needed", application.positions.as_deref()));
    body.push('\n');
    body.push_str("Details:\n");
    body.push_str(
        application
            .details
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or("No additional details."),
    );
    body.push('\n');

    Notification {
        to: operator.to_string(),
        subject: format!("New company request - {}", application.company_name),
        body,
    }
}

/// Validate and dispatch a candidate submission.
pub fn submit_candidate<N: NotificationSender>(
    sender: &N,
    operator: &str,
    application: &CandidateApplication,
) -> Result<(), IntakeError> {
    require_non_blank("name", &application.name)?;
    sender.send(candidate_notification(operator, application))?;
    Ok(())
}

/// Validate and dispatch a company submission.
pub fn submit_company<N: NotificationSender>(
    sender: &N,
    operator: &str,
    application: &CompanyApplication,
) -> Result<(), IntakeError> {
    require_non_blank("company_name", &application.company_name)?;
    sender.send(company_notification(operator, application))?;
    Ok(())
}
