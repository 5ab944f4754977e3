use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One swipe from a time-clock export. Derived per upload, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Punch {
    pub name: String,
    pub date: NaiveDate,
    pub at: NaiveDateTime,
}

/// Semi-monthly pay-period boundary (11th-25th or 26th-next 10th).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CutoffWindow {
    #[schema(example = "Jul 11 - Jul 25, 2026")]
    pub label: String,
    #[schema(value_type = String, format = "date")]
    pub start: NaiveDate,
    #[schema(value_type = String, format = "date")]
    pub end: NaiveDate,
}

impl CutoffWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Key that guards against publishing the same cutoff twice.
    pub fn period_key(&self) -> String {
        format!(
            "{}_{}",
            self.start.format("%Y%m%d"),
            self.end.format("%Y%m%d")
        )
    }
}

/// Reconciled totals for one employee-day, keyed by the exported name
/// (not yet resolved to an employee record).
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DayRecord {
    pub name: String,
    #[schema(value_type = String, format = "date")]
    pub date: NaiveDate,
    #[schema(value_type = String, format = "time", nullable = true)]
    pub time_in: Option<NaiveTime>,
    #[schema(value_type = String, format = "time", nullable = true)]
    pub time_out: Option<NaiveTime>,
    pub hours_worked: f64,
    pub days_worked: f64,
    pub tardiness_minutes: i64,
}

/// Persisted attendance line for a processed cutoff. Hours and days always
/// derive from the current in/out pair; edits re-run the derivation.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceRecord {
    pub id: u64,
    pub employee_id: u64,
    #[schema(value_type = String, format = "date")]
    pub date: NaiveDate,
    #[schema(value_type = String, format = "time", nullable = true)]
    pub time_in: Option<NaiveTime>,
    #[schema(value_type = String, format = "time", nullable = true)]
    pub time_out: Option<NaiveTime>,
    pub hours_worked: f64,
    pub days_worked: f64,
    pub tardiness_minutes: i64,
    #[schema(value_type = String, format = "date")]
    pub cutoff_start: NaiveDate,
    #[schema(value_type = String, format = "date")]
    pub cutoff_end: NaiveDate,
}
