use dotenvy::dotenv;
use rust_decimal::Decimal;
use std::env;
use std::str::FromStr;

use crate::calc::calculator::StatutoryTable;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub server_addr: String,

    // Rate limiting
    pub rate_import_per_min: u32,
    pub rate_publish_per_min: u32,
    pub rate_general_per_min: u32,

    // Payroll knobs
    pub month_day_divisor: Decimal,
    pub required_exec_approvals: u32,
    pub sss_per_cutoff: Decimal,
    pub philhealth_per_cutoff: Decimal,
    pub pagibig_per_cutoff: Decimal,

    pub api_prefix: String,
}

fn amount_var(key: &str, default: &str) -> Decimal {
    Decimal::from_str(&env::var(key).unwrap_or_else(|_| default.to_string())).unwrap()
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),

            rate_import_per_min: env::var("RATE_IMPORT_PER_MIN")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap(),
            rate_publish_per_min: env::var("RATE_PUBLISH_PER_MIN")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap(),
            rate_general_per_min: env::var("RATE_GENERAL_PER_MIN")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .unwrap(),

            // Working days used to turn a monthly salary into a day rate.
            month_day_divisor: amount_var("MONTH_DAY_DIVISOR", "26"),
            required_exec_approvals: env::var("REQUIRED_EXEC_APPROVALS")
                .unwrap_or_else(|_| "1".to_string())
                .parse()
                .unwrap(),

            // Government-table amounts per cutoff.
            sss_per_cutoff: amount_var("SSS_PER_CUTOFF", "600"),
            philhealth_per_cutoff: amount_var("PHILHEALTH_PER_CUTOFF", "250"),
            pagibig_per_cutoff: amount_var("PAGIBIG_PER_CUTOFF", "100"),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),
        }
    }

    pub fn statutory(&self) -> StatutoryTable {
        StatutoryTable {
            sss: self.sss_per_cutoff,
            philhealth: self.philhealth_per_cutoff,
            pagibig: self.pagibig_per_cutoff,
        }
    }
}
