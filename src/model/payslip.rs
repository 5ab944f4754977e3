use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use utoipa::ToSchema;

/// One labelled amount on a payslip (earning or deduction).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PayLine {
    #[schema(example = "Basic Pay")]
    pub label: String,
    #[schema(value_type = f64, example = 10000.0)]
    pub amount: Decimal,
}

impl PayLine {
    pub fn new(label: impl Into<String>, amount: Decimal) -> Self {
        Self {
            label: label.into(),
            amount,
        }
    }
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
pub enum PayslipStatus {
    Unpublished,
    Published,
}

/// Terminal output of a payroll run for one employee and cutoff. Created
/// once per draft approval; only `status` changes afterwards.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Payslip {
    pub id: u64,
    pub draft_id: u64,
    pub employee_id: u64,
    #[schema(example = "Jul 11 - Jul 25, 2026")]
    pub cutoff_label: String,
    #[schema(value_type = Vec<PayLine>)]
    pub earnings: Json<Vec<PayLine>>,
    #[schema(value_type = Vec<PayLine>)]
    pub deductions: Json<Vec<PayLine>>,
    #[schema(value_type = f64)]
    pub total_earnings: Decimal,
    #[schema(value_type = f64)]
    pub total_deductions: Decimal,
    #[schema(value_type = f64)]
    pub net_pay: Decimal,
    pub status: PayslipStatus,
    #[schema(value_type = String, format = "date-time", nullable = true)]
    pub created_at: Option<DateTime<Utc>>,
}
