use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::model::category::EmployeeCategory;
use crate::model::employee::ObRate;

/// Interns are paid a fixed amount per OB engagement.
pub const INTERN_OB_RATE: Decimal = dec!(500);
/// Default per-occurrence rate for "assisted" OB when the employee record
/// carries no override.
pub const ASSISTED_OB_FALLBACK: Decimal = dec!(1500);
pub const ASSISTED_OB_KIND: &str = "assisted";

const HOURS_PER_DAY: Decimal = dec!(8);

/// Daily rate per category. Monthly-rated categories divide by the
/// configured month-to-day divisor; the rest use their stored day rate.
/// Missing configuration yields zero, not an error.
pub fn daily_rate(
    category: EmployeeCategory,
    monthly_salary: Option<Decimal>,
    per_day_rate: Option<Decimal>,
    month_day_divisor: Decimal,
) -> Decimal {
    match category {
        EmployeeCategory::Core | EmployeeCategory::Owner => {
            if month_day_divisor.is_zero() {
                return Decimal::ZERO;
            }
            monthly_salary
                .map(|m| m / month_day_divisor)
                .unwrap_or(Decimal::ZERO)
        }
        EmployeeCategory::CoreProbationary
        | EmployeeCategory::Intern
        | EmployeeCategory::Freelancer => per_day_rate.unwrap_or(Decimal::ZERO),
    }
}

pub fn hourly_rate(daily: Decimal) -> Decimal {
    daily / HOURS_PER_DAY
}

/// Per-occurrence OB rate. Interns are fixed; everyone else uses the
/// employee-configured rate for the kind, with "assisted" falling back to
/// the standard amount. Unknown kinds contribute zero.
pub fn ob_rate(category: EmployeeCategory, kind: &str, configured: &[ObRate]) -> Decimal {
    match category {
        EmployeeCategory::Intern => INTERN_OB_RATE,
        EmployeeCategory::Core
        | EmployeeCategory::CoreProbationary
        | EmployeeCategory::Owner
        | EmployeeCategory::Freelancer => configured
            .iter()
            .find(|r| r.kind.eq_ignore_ascii_case(kind))
            .map(|r| r.rate)
            .unwrap_or_else(|| {
                if kind.eq_ignore_ascii_case(ASSISTED_OB_KIND) {
                    ASSISTED_OB_FALLBACK
                } else {
                    Decimal::ZERO
                }
            }),
    }
}

pub fn rdot_rate(hourly: Decimal) -> Decimal {
    hourly
}

pub fn regular_holiday_rate(daily: Decimal) -> Decimal {
    daily
}

pub fn special_holiday_rate(daily: Decimal) -> Decimal {
    daily * dec!(0.3)
}

pub fn night_diff_rate(hourly: Decimal) -> Decimal {
    hourly * dec!(0.1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monthly_categories_divide_by_the_divisor() {
        let rate = daily_rate(EmployeeCategory::Core, Some(dec!(26000)), None, dec!(26));
        assert_eq!(rate, dec!(1000));
        let rate = daily_rate(EmployeeCategory::Owner, Some(dec!(52000)), None, dec!(26));
        assert_eq!(rate, dec!(2000));
    }

    #[test]
    fn day_rated_categories_use_the_stored_rate() {
        let rate = daily_rate(
            EmployeeCategory::CoreProbationary,
            None,
            Some(dec!(650)),
            dec!(26),
        );
        assert_eq!(rate, dec!(650));
        // A stray monthly salary on a day-rated record is ignored.
        let rate = daily_rate(
            EmployeeCategory::Intern,
            Some(dec!(26000)),
            Some(dec!(400)),
            dec!(26),
        );
        assert_eq!(rate, dec!(400));
    }

    #[test]
    fn missing_rate_configuration_yields_zero() {
        assert_eq!(
            daily_rate(EmployeeCategory::Core, None, None, dec!(26)),
            Decimal::ZERO
        );
        assert_eq!(
            daily_rate(EmployeeCategory::Freelancer, None, None, dec!(26)),
            Decimal::ZERO
        );
        assert_eq!(
            daily_rate(EmployeeCategory::Core, Some(dec!(26000)), None, dec!(0)),
            Decimal::ZERO
        );
    }

    #[test]
    fn intern_ob_rate_is_fixed() {
        let configured = vec![ObRate {
            kind: "assisted".to_string(),
            rate: dec!(2000),
        }];
        // Even a configured override does not move the intern rate.
        assert_eq!(
            ob_rate(EmployeeCategory::Intern, "assisted", &configured),
            dec!(500)
        );
    }

    #[test]
    fn assisted_ob_falls_back_when_not_configured() {
        assert_eq!(
            ob_rate(EmployeeCategory::Core, "assisted", &[]),
            dec!(1500)
        );
        let configured = vec![ObRate {
            kind: "assisted".to_string(),
            rate: dec!(1800),
        }];
        assert_eq!(
            ob_rate(EmployeeCategory::Core, "assisted", &configured),
            dec!(1800)
        );
    }

    #[test]
    fn unknown_ob_kind_contributes_zero() {
        assert_eq!(
            ob_rate(EmployeeCategory::Core, "site-visit", &[]),
            Decimal::ZERO
        );
    }
}
