use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Closed set of employment categories. Rate selection matches exhaustively
/// on this, so a new category cannot be silently mis-priced.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
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
pub enum EmployeeCategory {
    Core,
    CoreProbationary,
    Owner,
    Intern,
    Freelancer,
}

impl EmployeeCategory {
    /// Categories paid from a monthly salary rather than a stored day rate.
    pub fn is_monthly_rated(self) -> bool {
        matches!(self, EmployeeCategory::Core | EmployeeCategory::Owner)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::EmployeeCategory;

    #[test]
    fn round_trips_snake_case_names() {
        assert_eq!(
            EmployeeCategory::CoreProbationary.to_string(),
            "core_probationary"
        );
        assert_eq!(
            EmployeeCategory::from_str("core_probationary").unwrap(),
            EmployeeCategory::CoreProbationary
        );
        assert_eq!(
            EmployeeCategory::from_str("intern").unwrap(),
            EmployeeCategory::Intern
        );
        assert!(EmployeeCategory::from_str("contractor").is_err());
    }

    #[test]
    fn monthly_rated_covers_core_and_owner_only() {
        assert!(EmployeeCategory::Core.is_monthly_rated());
        assert!(EmployeeCategory::Owner.is_monthly_rated());
        assert!(!EmployeeCategory::CoreProbationary.is_monthly_rated());
        assert!(!EmployeeCategory::Intern.is_monthly_rated());
        assert!(!EmployeeCategory::Freelancer.is_monthly_rated());
    }
}
