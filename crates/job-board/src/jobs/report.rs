use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use super::domain::{JobId, JobStatus};
use super::query::JobFilter;
use super::store::{JobStore, StoreError};

/// Maximum number of entries in the recent-hires listing.
pub const RECENT_HIRES_LIMIT: usize = 30;

const PRINTABLE_ROWS_PER_PAGE: usize = 20;
const PRINTABLE_CONTACT_WIDTH: usize = 24;

/// Hire counts over calendar-aligned periods and rolling windows.
///
/// The calendar counts start at week/month/year boundaries (week starting
/// Monday 00:00); the rolling counts subtract whole days from the exact
/// evaluation instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HiringTotals {
    pub total_all_time: usize,
    pub hired_this_week: usize,
    pub hired_this_month: usize,
    pub hired_this_year: usize,
    pub hired_last_7: usize,
    pub hired_last_30: usize,
    pub hired_last_365: usize,
}

/// One row of the recent-hires listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentHire {
    pub id: JobId,
    pub title: String,
    pub filled_at: NaiveDateTime,
    pub hired_name: String,
    pub hired_contact: Option<String>,
    pub hired_notes: Option<String>,
}

/// Read-side derivation over live filled postings. Both the JSON endpoint
/// and the printable document render one of these, so their counts can
/// never diverge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HiringReport {
    pub generated_at: NaiveDateTime,
    pub totals: HiringTotals,
    pub recent_hires: Vec<RecentHire>,
}

/// Postings that count as hires: live, FILLED, with a fill timestamp.
fn filled_base() -> JobFilter {
    JobFilter {
        deleted: Some(false),
        status: Some(JobStatus::Filled),
        has_fill_record: Some(true),
        ..JobFilter::default()
    }
}

fn filled_since(instant: NaiveDateTime) -> JobFilter {
    JobFilter {
        filled_since: Some(instant),
        ..filled_base()
    }
}

pub(crate) fn start_of_week_monday(now: NaiveDateTime) -> NaiveDateTime {
    let date = now.date();
    let back = i64::from(date.weekday().num_days_from_monday());
    (date - Duration::days(back)).and_time(NaiveTime::MIN)
}

pub(crate) fn start_of_month(now: NaiveDateTime) -> NaiveDateTime {
    let date = now.date();
    // Day 1 exists in every month.
    date.with_day(1).unwrap_or(date).and_time(NaiveTime::MIN)
}

pub(crate) fn start_of_year(now: NaiveDateTime) -> NaiveDateTime {
    let date = now.date();
    NaiveDate::from_ymd_opt(date.year(), 1, 1)
        .unwrap_or(date)
        .and_time(NaiveTime::MIN)
}

impl HiringReport {
    /// Aggregate hire counts and the recent-hires listing as of `now`.
    /// Pure read: the store is only queried, never written.
    pub fn compute<S: JobStore>(store: &S, now: NaiveDateTime) -> Result<Self, StoreError> {
        let totals = HiringTotals {
            total_all_time: store.count(&filled_base())?,
            hired_this_week: store.count(&filled_since(start_of_week_monday(now)))?,
            hired_this_month: store.count(&filled_since(start_of_month(now)))?,
            hired_this_year: store.count(&filled_since(start_of_year(now)))?,
            hired_last_7: store.count(&filled_since(now - Duration::days(7)))?,
            hired_last_30: store.count(&filled_since(now - Duration::days(30)))?,
            hired_last_365: store.count(&filled_since(now - Duration::days(365)))?,
        };

        let mut filled = store.find(&filled_base())?;
        filled.sort_by(|a, b| b.filled_at.cmp(&a.filled_at));

        let recent_hires = filled
            .into_iter()
            .take(RECENT_HIRES_LIMIT)
            .filter_map(|job| {
                // The base filter guarantees both fields; skip rather than
                // panic if a store hands back a malformed row.
                let filled_at = job.filled_at?;
                let hired_name = job.hired_name?;
                Some(RecentHire {
                    id: job.id,
                    title: job.title,
                    filled_at,
                    hired_name,
                    hired_contact: job.hired_contact,
                    hired_notes: job.hired_notes,
                })
            })
            .collect();

        Ok(Self {
            generated_at: now,
            totals,
            recent_hires,
        })
    }

    /// Render the paginated printable document. Consumes the same counts as
    /// the JSON surface; notes are omitted and contacts truncated for
    /// display width.
    pub fn render_printable(&self, title: &str) -> String {
        let mut out = String::new();
        let totals = &self.totals;

        out.push_str(title);
        out.push('\n');
        out.push_str(&format!(
            "Generated: {}\n\n",
            self.generated_at.format("%Y-%m-%d %H:%M:%S")
        ));

        out.push_str("Summary\n");
        out.push_str(&format!(
            "  Week (Mon-Sun): {:<6} since {}\n",
            totals.hired_this_week,
            start_of_week_monday(self.generated_at).format("%Y-%m-%d")
        ));
        out.push_str(&format!(
            "  Month:          {:<6} since {}\n",
            totals.hired_this_month,
            start_of_month(self.generated_at).format("%Y-%m-%d")
        ));
        out.push_str(&format!(
            "  Year:           {:<6} since {}\n",
            totals.hired_this_year,
            start_of_year(self.generated_at).format("%Y-%m-%d")
        ));
        out.push_str(&format!("  All time:       {}\n\n", totals.total_all_time));

        out.push_str("Rolling windows\n");
        out.push_str(&format!(
            "  Last 7 days: {}  |  Last 30 days: {}  |  Last 365 days: {}\n\n",
            totals.hired_last_7, totals.hired_last_30, totals.hired_last_365
        ));

        out.push_str(&format!(
            "Recent hires (up to {RECENT_HIRES_LIMIT})\n"
        ));
        if self.recent_hires.is_empty() {
            out.push_str("  none\n");
        } else {
            for (index, chunk) in self
                .recent_hires
                .chunks(PRINTABLE_ROWS_PER_PAGE)
                .enumerate()
            {
                if index > 0 {
                    out.push_str(&format!("--- page {} ---\n", index + 1));
                }
                out.push_str(&format!(
                    "  {:<12} {:<34} {:<22} {}\n",
                    "Date", "Position", "Hired", "Contact"
                ));
                for hire in chunk {
                    let contact = hire
                        .hired_contact
                        .as_deref()
                        .map(|value| truncate_for_display(value, PRINTABLE_CONTACT_WIDTH))
                        .unwrap_or_else(|| "-".to_string());
                    out.push_str(&format!(
                        "  {:<12} {:<34} {:<22} {}\n",
                        hire.filled_at.format("%Y-%m-%d"),
                        truncate_for_display(
                            &format!("{} (#{})", hire.title, hire.id),
                            34
                        ),
                        truncate_for_display(&hire.hired_name, 22),
                        contact
                    ));
                }
            }
        }

        out.push_str("\nInternal hiring report\n");
        out
    }
}

fn truncate_for_display(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    let mut truncated: String = value.chars().take(max.saturating_sub(1)).collect();
    truncated.push('…');
    truncated
}
