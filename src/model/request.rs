use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Adjustment kinds an employee can file against a cutoff.
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
pub enum RequestKind {
    Ot,
    Ob,
    Leave,
    Wfh,
}

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
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct AdjustmentRequest {
    pub id: u64,
    pub employee_id: u64,
    pub kind: RequestKind,
    pub status: RequestStatus,
    #[schema(value_type = String, format = "date")]
    pub start_date: NaiveDate,
    #[schema(value_type = String, format = "date")]
    pub end_date: NaiveDate,

    /// Approved overtime hours (OT only).
    #[schema(value_type = f64, nullable = true)]
    pub hours: Option<Decimal>,

    /// OB engagement kind, e.g. "assisted" (OB only).
    pub ob_kind: Option<String>,

    /// OB occurrence count (OB only).
    #[schema(value_type = f64, nullable = true)]
    pub quantity: Option<Decimal>,

    /// OT is only payable when the request carries its proof.
    pub has_proof: bool,

    pub reason: Option<String>,

    #[schema(value_type = String, format = "date-time", nullable = true)]
    pub created_at: Option<DateTime<Utc>>,
}

impl AdjustmentRequest {
    /// Inclusive day span of the request.
    pub fn span_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn request(start: NaiveDate, end: NaiveDate) -> AdjustmentRequest {
        AdjustmentRequest {
            id: 1,
            employee_id: 7,
            kind: RequestKind::Wfh,
            status: RequestStatus::Approved,
            start_date: start,
            end_date: end,
            hours: None,
            ob_kind: None,
            quantity: None,
            has_proof: false,
            reason: None,
            created_at: None,
        }
    }

    #[test]
    fn span_is_inclusive_of_both_endpoints() {
        let d = |day| NaiveDate::from_ymd_opt(2026, 7, day).unwrap();
        assert_eq!(request(d(13), d(13)).span_days(), 1);
        assert_eq!(request(d(13), d(17)).span_days(), 5);
    }

    #[test]
    fn kind_names_match_storage_values() {
        assert_eq!(RequestKind::Ot.to_string(), "ot");
        assert_eq!(RequestKind::Wfh.to_string(), "wfh");
        assert_eq!(RequestStatus::Pending.to_string(), "pending");
    }
}
