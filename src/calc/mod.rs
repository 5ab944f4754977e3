//! Payroll computation: a pure calculator over reconciled days and approved
//! adjustments, plus the per-category rate rules it leans on.

pub mod calculator;
pub mod rates;
