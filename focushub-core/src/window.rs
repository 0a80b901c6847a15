/// Date windows for aggregate computations
///
/// All time-scoped aggregation in FocusHub runs over an explicit
/// [`DateWindow`], a half-open `[start, end)` range in UTC. Callers either
/// pass calendar dates (`YYYY-MM-DD`) or take a default of the trailing N
/// days; no call site parses nullable date strings ad hoc.
///
/// When explicit dates are given, the end bound covers the entire end day:
/// `end_date + 1 day` is used as the exclusive upper bound, so
/// `2024-01-01..2024-01-07` includes `2024-01-07T23:59:59` and excludes
/// `2024-01-08T00:00:00`.
///
/// # Example
///
/// ```
/// use focushub_core::window::DateWindow;
///
/// let window = DateWindow::resolve(Some("2024-01-01"), Some("2024-01-07")).unwrap();
/// assert_eq!(window.end - window.start, chrono::Duration::days(7));
///
/// // No dates: trailing seven days ending now
/// let default = DateWindow::resolve(None, None).unwrap();
/// assert_eq!(default.end - default.start, chrono::Duration::days(7));
/// ```

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Default window length for dashboard summaries, in days
pub const DEFAULT_SUMMARY_DAYS: i64 = 7;

/// Date format accepted for explicit window bounds
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Error type for window resolution
#[derive(Debug, thiserror::Error)]
pub enum WindowError {
    /// A date string did not parse as YYYY-MM-DD
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    /// Only one of start_date/end_date was supplied
    #[error("Both start_date and end_date are required when filtering by date")]
    IncompleteRange,
}

/// Half-open `[start, end)` UTC range scoping an aggregate computation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    /// Inclusive lower bound
    pub start: DateTime<Utc>,

    /// Exclusive upper bound
    pub end: DateTime<Utc>,
}

impl DateWindow {
    /// Window covering the trailing `days` days, ending now
    pub fn last_days(days: i64) -> Self {
        let end = Utc::now();
        Self {
            start: end - Duration::days(days),
            end,
        }
    }

    /// Resolves optional calendar-date bounds into a window
    ///
    /// - Neither date given: trailing [`DEFAULT_SUMMARY_DAYS`] ending now.
    /// - Both given: `[start 00:00, end + 1 day 00:00)` so the end day is
    ///   fully included.
    /// - One given without the other, or a malformed date: error.
    ///
    /// A half-specified range is deliberately rejected rather than treated
    /// as "no filter": a dropped query parameter would otherwise silently
    /// widen the reported range to the default window.
    pub fn resolve(start_date: Option<&str>, end_date: Option<&str>) -> Result<Self, WindowError> {
        match (start_date, end_date) {
            (None, None) => Ok(Self::last_days(DEFAULT_SUMMARY_DAYS)),
            (Some(start), Some(end)) => {
                let start = parse_date(start)?;
                let end = parse_date(end)? + Duration::days(1);
                Ok(Self { start, end })
            }
            _ => Err(WindowError::IncompleteRange),
        }
    }

    /// Checks whether a timestamp falls inside the window
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at < self.end
    }
}

fn parse_date(raw: &str) -> Result<DateTime<Utc>, WindowError> {
    let date = NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|_| WindowError::InvalidDate(raw.to_string()))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| WindowError::InvalidDate(raw.to_string()))?;
    Ok(DateTime::from_naive_utc_and_offset(midnight, Utc))
}
