use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use utoipa::ToSchema;

use crate::model::category::EmployeeCategory;

/// Official-business rate configured on the employee for one OB kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ObRate {
    #[schema(example = "assisted")]
    pub kind: String,
    #[schema(value_type = f64, example = 1500.0)]
    pub rate: Decimal,
}

/// One billable item on a freelancer engagement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FreelanceItem {
    #[schema(example = "Landing page build")]
    pub label: String,
    #[schema(value_type = f64, example = 8000.0)]
    pub amount: Decimal,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "employee_code": "EMP-001",
        "first_name": "Maria",
        "last_name": "Santos",
        "email": "maria.santos@company.com",
        "clock_alias": "M.Santos",
        "category": "core",
        "monthly_salary": 26000.0,
        "sss": true,
        "philhealth": true,
        "pagibig": true,
        "hire_date": "2024-01-01",
        "status": "active"
    })
)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "EMP-001")]
    pub employee_code: String,

    #[schema(example = "Maria")]
    pub first_name: String,

    #[schema(example = "Santos")]
    pub last_name: String,

    #[schema(example = "maria.santos@company.com")]
    pub email: String,

    /// Name the biometric device exports for this employee, when it differs
    /// from "first last".
    #[schema(example = "M.Santos", nullable = true)]
    pub clock_alias: Option<String>,

    pub category: EmployeeCategory,

    /// Set for monthly-rated categories (core, owner).
    #[schema(value_type = f64, nullable = true, example = 26000.0)]
    pub monthly_salary: Option<Decimal>,

    /// Set for day-rated categories (probationary, intern, freelancer).
    #[schema(value_type = f64, nullable = true, example = 650.0)]
    pub per_day_rate: Option<Decimal>,

    #[schema(value_type = f64, nullable = true, example = 150.0)]
    pub allowance_per_day: Option<Decimal>,

    #[schema(value_type = Vec<ObRate>)]
    pub ob_rates: Json<Vec<ObRate>>,

    #[schema(value_type = Vec<FreelanceItem>)]
    pub freelance_items: Json<Vec<FreelanceItem>>,

    pub sss: bool,
    pub philhealth: bool,
    pub pagibig: bool,

    /// Shift ends here instead of the nominal end when set (e.g. 16:00:00).
    #[schema(value_type = String, format = "time", nullable = true)]
    pub shift_end_override: Option<NaiveTime>,

    #[schema(example = "2024-01-01", value_type = String, format = "date")]
    pub hire_date: NaiveDate,

    #[schema(example = "active")]
    pub status: String,
}

impl Employee {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Name to match against punch rows from the time clock.
    pub fn clock_name(&self) -> String {
        self.clock_alias
            .clone()
            .unwrap_or_else(|| self.display_name())
    }
}
