use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use utoipa::ToSchema;

/// Draft lifecycle. Transitions are driven by the approval endpoints;
/// everything else only reads the status.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    sqlx::Type,
    ToSchema,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DraftStatus {
    Draft,
    PendingExec,
    PendingAdmin,
    Approved,
    Rejected,
}

impl DraftStatus {
    /// draft -> pending_exec -> pending_admin -> approved | rejected,
    /// with rejection possible from either pending state.
    pub fn can_transition(self, next: DraftStatus) -> bool {
        use DraftStatus::*;
        matches!(
            (self, next),
            (Draft, PendingExec)
                | (PendingExec, PendingAdmin)
                | (PendingExec, Rejected)
                | (PendingAdmin, Approved)
                | (PendingAdmin, Rejected)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, DraftStatus::Approved | DraftStatus::Rejected)
    }
}

/// One published payroll batch for a cutoff.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct PayrollDraft {
    pub id: u64,
    #[schema(example = "20260711_20260725")]
    pub period_key: String,
    #[schema(example = "Jul 11 - Jul 25, 2026")]
    pub cutoff_label: String,
    #[schema(value_type = String, format = "date")]
    pub cutoff_start: NaiveDate,
    #[schema(value_type = String, format = "date")]
    pub cutoff_end: NaiveDate,
    pub status: DraftStatus,
    /// Sum of worked days across the draft's lines.
    pub total_worked_days: f64,
    pub required_exec_approvals: u32,
    pub exec_approvals: u32,
    #[schema(value_type = String, format = "date-time", nullable = true)]
    pub created_at: Option<DateTime<Utc>>,
}

/// In/out pair shown on the draft line for one day.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TimePair {
    #[schema(value_type = String, format = "date")]
    pub date: NaiveDate,
    #[schema(value_type = String, format = "time", nullable = true)]
    pub time_in: Option<NaiveTime>,
    #[schema(value_type = String, format = "time", nullable = true)]
    pub time_out: Option<NaiveTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LineOt {
    pub request_id: u64,
    #[schema(value_type = f64)]
    pub hours: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LineOb {
    pub request_id: u64,
    #[schema(example = "assisted")]
    pub kind: String,
    #[schema(value_type = f64)]
    pub quantity: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LineLeave {
    pub request_id: u64,
    #[schema(value_type = String, format = "date")]
    pub start_date: NaiveDate,
    #[schema(value_type = String, format = "date")]
    pub end_date: NaiveDate,
}

/// One employee's line in a draft, with the approved adjustments that were
/// merged in at publish time.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct PayrollDraftLine {
    pub id: u64,
    pub draft_id: u64,
    pub employee_id: u64,
    pub name: String,
    pub days_worked: f64,
    pub hours_worked: f64,
    pub tardiness_minutes: i64,
    #[schema(value_type = Vec<TimePair>)]
    pub time_in_out: Json<Vec<TimePair>>,
    #[schema(value_type = Vec<LineOt>)]
    pub ot: Json<Vec<LineOt>>,
    #[schema(value_type = Vec<LineOb>)]
    pub ob: Json<Vec<LineOb>>,
    #[schema(value_type = Vec<LineLeave>)]
    pub leaves: Json<Vec<LineLeave>>,
}

#[cfg(test)]
mod tests {
    use super::DraftStatus::*;

    #[test]
    fn happy_path_transitions_are_allowed() {
        assert!(Draft.can_transition(PendingExec));
        assert!(PendingExec.can_transition(PendingAdmin));
        assert!(PendingAdmin.can_transition(Approved));
    }

    #[test]
    fn rejection_only_from_pending_states() {
        assert!(PendingExec.can_transition(Rejected));
        assert!(PendingAdmin.can_transition(Rejected));
        assert!(!Draft.can_transition(Rejected));
        assert!(!Approved.can_transition(Rejected));
    }

    #[test]
    fn terminal_states_accept_nothing() {
        for next in [Draft, PendingExec, PendingAdmin, Approved, Rejected] {
            assert!(!Approved.can_transition(next));
            assert!(!Rejected.can_transition(next));
        }
        assert!(Approved.is_terminal());
        assert!(Rejected.is_terminal());
        assert!(!PendingExec.is_terminal());
    }

    #[test]
    fn no_skipping_ahead() {
        assert!(!Draft.can_transition(PendingAdmin));
        assert!(!Draft.can_transition(Approved));
        assert!(!PendingExec.can_transition(Approved));
    }
}
