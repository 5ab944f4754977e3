use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::calc::rates;
use crate::model::category::EmployeeCategory;
use crate::model::employee::{Employee, FreelanceItem, ObRate};
use crate::model::payslip::PayLine;

/// Everything the calculator needs from the employee record.
#[derive(Debug, Clone, PartialEq)]
pub struct RateProfile {
    pub category: EmployeeCategory,
    pub monthly_salary: Option<Decimal>,
    pub per_day_rate: Option<Decimal>,
    pub allowance_per_day: Option<Decimal>,
    pub ob_rates: Vec<ObRate>,
    pub freelance_items: Vec<FreelanceItem>,
    pub sss: bool,
    pub philhealth: bool,
    pub pagibig: bool,
}

impl RateProfile {
    pub fn from_employee(employee: &Employee) -> Self {
        Self {
            category: employee.category,
            monthly_salary: employee.monthly_salary,
            per_day_rate: employee.per_day_rate,
            allowance_per_day: employee.allowance_per_day,
            ob_rates: employee.ob_rates.0.clone(),
            freelance_items: employee.freelance_items.0.clone(),
            sss: employee.sss,
            philhealth: employee.philhealth,
            pagibig: employee.pagibig,
        }
    }
}

/// Government-table amounts per cutoff, configured externally.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatutoryTable {
    pub sss: Decimal,
    pub philhealth: Decimal,
    pub pagibig: Decimal,
}

/// Open cash advance installment terms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CashAdvanceDue {
    pub per_cutoff: Decimal,
    pub balance: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObClaim {
    pub kind: String,
    pub quantity: Decimal,
}

/// Input for one employee's cutoff. Pure data; the calculator performs no
/// I/O and reads nothing ambient.
#[derive(Debug, Clone, PartialEq)]
pub struct PayrollInput {
    pub rates: RateProfile,
    /// Reconciled days, already inclusive of approved WFH credits.
    pub worked_days: Decimal,
    /// Approved-with-proof overtime hours.
    pub ot_hours: Decimal,
    pub ob_claims: Vec<ObClaim>,
    pub rdot_hours: Decimal,
    pub regular_holiday_days: Decimal,
    pub special_holiday_days: Decimal,
    pub night_diff_hours: Decimal,
    pub month_day_divisor: Decimal,
    pub statutory: StatutoryTable,
    pub cash_advance: Option<CashAdvanceDue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PayrollBreakdown {
    #[schema(value_type = f64)]
    pub daily_rate: Decimal,
    #[schema(value_type = f64)]
    pub hourly_rate: Decimal,
    #[schema(value_type = f64)]
    pub basic_pay: Decimal,
    #[schema(value_type = f64)]
    pub allowance_pay: Decimal,
    #[schema(value_type = f64)]
    pub ob_pay: Decimal,
    #[schema(value_type = f64)]
    pub ot_pay: Decimal,
    #[schema(value_type = f64)]
    pub rdot_pay: Decimal,
    #[schema(value_type = f64)]
    pub regular_holiday_pay: Decimal,
    #[schema(value_type = f64)]
    pub special_holiday_pay: Decimal,
    #[schema(value_type = f64)]
    pub night_diff_pay: Decimal,
    pub earnings: Vec<PayLine>,
    pub deductions: Vec<PayLine>,
    #[schema(value_type = f64)]
    pub gross_earnings: Decimal,
    #[schema(value_type = f64)]
    pub total_deductions: Decimal,
    #[schema(value_type = f64)]
    pub net_pay: Decimal,
}

/// Round to centavos, midpoint away from zero. Applied per line before
/// summation so totals always equal the sum of the displayed lines.
pub fn peso(v: Decimal) -> Decimal {
    v.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Compute one payslip's numbers. Pure: identical input, identical output.
pub fn calculate(input: &PayrollInput) -> PayrollBreakdown {
    let profile = &input.rates;

    let daily_rate = rates::daily_rate(
        profile.category,
        profile.monthly_salary,
        profile.per_day_rate,
        input.month_day_divisor,
    );
    let hourly_rate = rates::hourly_rate(daily_rate);

    let basic_pay = peso(daily_rate * input.worked_days);
    let allowance_pay = peso(
        profile.allowance_per_day.unwrap_or(Decimal::ZERO) * input.worked_days,
    );
    let ob_pay = peso(
        input
            .ob_claims
            .iter()
            .map(|c| c.quantity * rates::ob_rate(profile.category, &c.kind, &profile.ob_rates))
            .sum::<Decimal>(),
    );
    let ot_pay = peso(input.ot_hours * hourly_rate);
    let rdot_pay = peso(input.rdot_hours * rates::rdot_rate(hourly_rate));
    let regular_holiday_pay =
        peso(input.regular_holiday_days * rates::regular_holiday_rate(daily_rate));
    let special_holiday_pay =
        peso(input.special_holiday_days * rates::special_holiday_rate(daily_rate));
    let night_diff_pay = peso(input.night_diff_hours * rates::night_diff_rate(hourly_rate));

    // Fixed component ordering.
    let mut earnings = vec![PayLine::new("Basic Pay", basic_pay)];
    for item in &profile.freelance_items {
        earnings.push(PayLine::new(item.label.clone(), peso(item.amount)));
    }
    for (label, amount) in [
        ("Allowance", allowance_pay),
        ("OB Pay", ob_pay),
        ("OT Pay", ot_pay),
        ("RDOT Pay", rdot_pay),
        ("Regular Holiday Pay", regular_holiday_pay),
        ("Special Holiday Pay", special_holiday_pay),
        ("Night Differential", night_diff_pay),
    ] {
        if !amount.is_zero() {
            earnings.push(PayLine::new(label, amount));
        }
    }
    let gross_earnings = earnings.iter().map(|l| l.amount).sum::<Decimal>();

    let mut deductions = Vec::new();
    for (enrolled, label, amount) in [
        (profile.sss, "SSS", input.statutory.sss),
        (profile.philhealth, "PhilHealth", input.statutory.philhealth),
        (profile.pagibig, "Pag-IBIG", input.statutory.pagibig),
    ] {
        if enrolled && !amount.is_zero() {
            deductions.push(PayLine::new(label, peso(amount)));
        }
    }
    if let Some(advance) = &input.cash_advance {
        let due = advance.per_cutoff.min(advance.balance);
        if due > Decimal::ZERO {
            deductions.push(PayLine::new("Cash Advance", peso(due)));
        }
    }
    let total_deductions = deductions.iter().map(|l| l.amount).sum::<Decimal>();

    PayrollBreakdown {
        daily_rate,
        hourly_rate,
        basic_pay,
        allowance_pay,
        ob_pay,
        ot_pay,
        rdot_pay,
        regular_holiday_pay,
        special_holiday_pay,
        night_diff_pay,
        earnings,
        deductions,
        gross_earnings,
        total_deductions,
        net_pay: gross_earnings - total_deductions,
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn core_profile() -> RateProfile {
        RateProfile {
            category: EmployeeCategory::Core,
            monthly_salary: Some(dec!(26000)),
            per_day_rate: None,
            allowance_per_day: None,
            ob_rates: Vec::new(),
            freelance_items: Vec::new(),
            sss: false,
            philhealth: false,
            pagibig: false,
        }
    }

    fn bare_input(rates: RateProfile) -> PayrollInput {
        PayrollInput {
            rates,
            worked_days: Decimal::ZERO,
            ot_hours: Decimal::ZERO,
            ob_claims: Vec::new(),
            rdot_hours: Decimal::ZERO,
            regular_holiday_days: Decimal::ZERO,
            special_holiday_days: Decimal::ZERO,
            night_diff_hours: Decimal::ZERO,
            month_day_divisor: dec!(26),
            statutory: StatutoryTable {
                sss: dec!(600),
                philhealth: dec!(250),
                pagibig: dec!(100),
            },
            cash_advance: None,
        }
    }

    #[test]
    fn core_basic_pay_matches_hand_computation() {
        // dailyRate 1000, 10 worked days => 10,000 basic pay.
        let mut input = bare_input(core_profile());
        input.worked_days = dec!(10);
        let out = calculate(&input);
        assert_eq!(out.daily_rate, dec!(1000));
        assert_eq!(out.basic_pay, dec!(10000));
        assert_eq!(out.gross_earnings, dec!(10000));
        assert_eq!(out.net_pay, dec!(10000));
    }

    #[test]
    fn identical_input_yields_identical_output() {
        let mut input = bare_input(core_profile());
        input.worked_days = dec!(9.5);
        input.ot_hours = dec!(3);
        assert_eq!(calculate(&input), calculate(&input));
    }

    #[test]
    fn net_is_gross_minus_deductions() {
        let mut profile = core_profile();
        profile.sss = true;
        profile.philhealth = true;
        profile.pagibig = true;
        let mut input = bare_input(profile);
        input.worked_days = dec!(11);
        input.ot_hours = dec!(2.5);
        input.cash_advance = Some(CashAdvanceDue {
            per_cutoff: dec!(500),
            balance: dec!(3500),
        });
        let out = calculate(&input);
        assert_eq!(out.net_pay, out.gross_earnings - out.total_deductions);
        assert_eq!(out.total_deductions, dec!(600) + dec!(250) + dec!(100) + dec!(500));
    }

    #[test]
    fn ot_pay_uses_daily_over_eight() {
        let mut input = bare_input(core_profile());
        input.ot_hours = dec!(2);
        let out = calculate(&input);
        // hourly 125, 2h => 250.
        assert_eq!(out.ot_pay, dec!(250.00));
    }

    #[test]
    fn assisted_ob_defaults_to_1500_per_occurrence() {
        let mut input = bare_input(core_profile());
        input.ob_claims = vec![ObClaim {
            kind: "assisted".to_string(),
            quantity: dec!(2),
        }];
        let out = calculate(&input);
        assert_eq!(out.ob_pay, dec!(3000.00));
    }

    #[test]
    fn configured_ob_rate_beats_the_fallback() {
        let mut profile = core_profile();
        profile.ob_rates = vec![ObRate {
            kind: "assisted".to_string(),
            rate: dec!(1800),
        }];
        let mut input = bare_input(profile);
        input.ob_claims = vec![ObClaim {
            kind: "assisted".to_string(),
            quantity: dec!(1),
        }];
        assert_eq!(calculate(&input).ob_pay, dec!(1800.00));
    }

    #[test]
    fn intern_ob_is_flat_500() {
        let profile = RateProfile {
            category: EmployeeCategory::Intern,
            monthly_salary: None,
            per_day_rate: Some(dec!(400)),
            allowance_per_day: Some(dec!(150)),
            ob_rates: Vec::new(),
            freelance_items: Vec::new(),
            sss: false,
            philhealth: false,
            pagibig: false,
        };
        let mut input = bare_input(profile);
        input.worked_days = dec!(2);
        input.ob_claims = vec![ObClaim {
            kind: "assisted".to_string(),
            quantity: dec!(3),
        }];
        let out = calculate(&input);
        assert_eq!(out.ob_pay, dec!(1500.00));
        assert_eq!(out.basic_pay, dec!(800.00));
        assert_eq!(out.allowance_pay, dec!(300.00));
        assert_eq!(out.gross_earnings, dec!(2600.00));
    }

    #[test]
    fn cash_advance_deducts_lesser_of_installment_and_balance() {
        let mut input = bare_input(core_profile());
        input.worked_days = dec!(10);
        input.cash_advance = Some(CashAdvanceDue {
            per_cutoff: dec!(500),
            balance: dec!(200),
        });
        let out = calculate(&input);
        assert_eq!(out.total_deductions, dec!(200));

        input.cash_advance = Some(CashAdvanceDue {
            per_cutoff: dec!(500),
            balance: Decimal::ZERO,
        });
        assert!(calculate(&input).deductions.is_empty());
    }

    #[test]
    fn missing_rate_configuration_degrades_to_zero() {
        let mut profile = core_profile();
        profile.monthly_salary = None;
        let mut input = bare_input(profile);
        input.worked_days = dec!(10);
        let out = calculate(&input);
        assert_eq!(out.basic_pay, Decimal::ZERO);
        assert_eq!(out.gross_earnings, Decimal::ZERO);
        assert_eq!(out.net_pay, Decimal::ZERO);
    }

    #[test]
    fn freelance_items_are_itemized_lines() {
        let profile = RateProfile {
            category: EmployeeCategory::Freelancer,
            monthly_salary: None,
            per_day_rate: None,
            allowance_per_day: None,
            ob_rates: Vec::new(),
            freelance_items: vec![
                FreelanceItem {
                    label: "Landing page build".to_string(),
                    amount: dec!(8000),
                },
                FreelanceItem {
                    label: "Deploy support".to_string(),
                    amount: dec!(1500.505),
                },
            ],
            sss: false,
            philhealth: false,
            pagibig: false,
        };
        let out = calculate(&bare_input(profile));
        assert_eq!(out.earnings.len(), 3);
        assert_eq!(out.earnings[1].amount, dec!(8000.00));
        // Rounded per line, midpoint away from zero.
        assert_eq!(out.earnings[2].amount, dec!(1500.51));
        assert_eq!(out.gross_earnings, dec!(9500.51));
    }

    #[test]
    fn unenrolled_benefits_are_not_deducted() {
        let mut input = bare_input(core_profile());
        input.worked_days = dec!(10);
        let out = calculate(&input);
        assert!(out.deductions.is_empty());
        assert_eq!(out.total_deductions, Decimal::ZERO);
    }
}
