use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Cash advance repaid in per-cutoff installments. Each payroll run deducts
/// the lesser of `per_cutoff` and the remaining `balance`.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct CashAdvance {
    pub id: u64,
    pub employee_id: u64,
    #[schema(value_type = f64, example = 5000.0)]
    pub principal: Decimal,
    #[schema(value_type = f64, example = 500.0)]
    pub per_cutoff: Decimal,
    #[schema(value_type = f64, example = 3500.0)]
    pub balance: Decimal,
    #[schema(example = "open")]
    pub status: String,
    #[schema(value_type = String, format = "date-time", nullable = true)]
    pub created_at: Option<DateTime<Utc>>,
}

impl CashAdvance {
    /// Installment due this cutoff.
    pub fn due_now(&self) -> Decimal {
        self.per_cutoff.min(self.balance)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::CashAdvance;

    fn advance(per_cutoff: rust_decimal::Decimal, balance: rust_decimal::Decimal) -> CashAdvance {
        CashAdvance {
            id: 1,
            employee_id: 2,
            principal: dec!(5000),
            per_cutoff,
            balance,
            status: "open".into(),
            created_at: None,
        }
    }

    #[test]
    fn due_is_capped_by_remaining_balance() {
        assert_eq!(advance(dec!(500), dec!(3500)).due_now(), dec!(500));
        assert_eq!(advance(dec!(500), dec!(200)).due_now(), dec!(200));
        assert_eq!(advance(dec!(500), dec!(0)).due_now(), dec!(0));
    }
}
