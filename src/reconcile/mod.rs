//! Attendance reconciliation: raw time-clock exports in, per-employee
//! per-day worked hours out. Pure logic; persistence and name resolution
//! live in the API layer.

pub mod cutoff;
pub mod parser;
pub mod shift;

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use crate::model::attendance::{CutoffWindow, DayRecord, Punch};
use self::shift::{DayPlan, ShiftPolicy, derive_day, pick_punches};

/// Shift rules plus per-employee plans, keyed by normalized clock name.
/// Built by the caller from employee records; the reconciler never reads
/// ambient state.
pub struct ReconcilePolicy {
    pub shift: ShiftPolicy,
    pub plans: HashMap<String, DayPlan>,
}

impl ReconcilePolicy {
    pub fn new(shift: ShiftPolicy) -> Self {
        Self {
            shift,
            plans: HashMap::new(),
        }
    }

    fn plan_for(&self, name: &str) -> DayPlan {
        self.plans
            .get(&normalize_name(name))
            .cloned()
            .unwrap_or_else(|| DayPlan::nominal(&self.shift))
    }
}

pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Group punches inside the confirmed window by (name, day) and derive each
/// day's totals. Days whose punches all fall outside the in/out pick windows
/// produce no record.
pub fn reconcile(
    punches: &[Punch],
    window: &CutoffWindow,
    policy: &ReconcilePolicy,
) -> Vec<DayRecord> {
    let mut grouped: BTreeMap<(String, NaiveDate), Vec<&Punch>> = BTreeMap::new();
    for punch in punches {
        if !window.contains(punch.date) {
            continue;
        }
        grouped
            .entry((normalize_name(&punch.name), punch.date))
            .or_default()
            .push(punch);
    }

    let mut records = Vec::new();
    for ((_, date), day_punches) in grouped {
        let times: Vec<_> = day_punches.iter().map(|p| p.at.time()).collect();
        let (time_in, time_out) = pick_punches(&times, &policy.shift);
        if time_in.is_none() && time_out.is_none() {
            continue;
        }
        // Display the name as the export wrote it.
        let name = &day_punches[0].name;
        let plan = policy.plan_for(name);
        records.push(derive_day(
            name,
            date,
            time_in,
            time_out,
            &plan,
            &policy.shift,
        ));
    }
    records
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};

    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 7, day).unwrap()
    }

    fn punch(name: &str, day: u32, h: u32, m: u32) -> Punch {
        Punch {
            name: name.to_string(),
            date: d(day),
            at: d(day).and_hms_opt(h, m, 0).unwrap(),
        }
    }

    fn july_window() -> CutoffWindow {
        CutoffWindow {
            label: "Jul 11 - Jul 25, 2026".to_string(),
            start: d(11),
            end: d(25),
        }
    }

    #[test]
    fn groups_by_name_and_day_within_the_window() {
        let punches = vec![
            punch("Santos", 13, 7, 0),
            punch("Santos", 13, 17, 30),
            punch("Santos", 14, 7, 5),
            punch("Reyes", 13, 6, 58),
            punch("Reyes", 13, 16, 45),
            // Outside the window, ignored.
            punch("Santos", 27, 7, 0),
        ];
        let policy = ReconcilePolicy::new(ShiftPolicy::default());
        let records = reconcile(&punches, &july_window(), &policy);

        assert_eq!(records.len(), 3);
        let santos_13 = records
            .iter()
            .find(|r| r.name == "Santos" && r.date == d(13))
            .unwrap();
        assert_eq!(santos_13.hours_worked, 8.0);
        assert_eq!(santos_13.days_worked, 1.0);

        // Lone morning punch: half day.
        let santos_14 = records
            .iter()
            .find(|r| r.name == "Santos" && r.date == d(14))
            .unwrap();
        assert_eq!(santos_14.hours_worked, 4.0);
        assert_eq!(santos_14.days_worked, 0.5);
    }

    #[test]
    fn multiple_swipes_collapse_to_earliest_in_latest_out() {
        let punches = vec![
            punch("Santos", 13, 7, 10),
            punch("Santos", 13, 7, 12),
            punch("Santos", 13, 12, 1),
            punch("Santos", 13, 16, 30),
            punch("Santos", 13, 17, 45),
        ];
        let policy = ReconcilePolicy::new(ShiftPolicy::default());
        let records = reconcile(&punches, &july_window(), &policy);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].time_in, NaiveTime::from_hms_opt(7, 10, 0));
        assert_eq!(records[0].time_out, NaiveTime::from_hms_opt(17, 45, 0));
        assert_eq!(records[0].tardiness_minutes, 10);
    }

    #[test]
    fn day_with_only_unusable_punches_yields_no_record() {
        // 14:30 is past the in window and before the out window.
        let punches = vec![punch("Santos", 13, 14, 30)];
        let policy = ReconcilePolicy::new(ShiftPolicy::default());
        assert!(reconcile(&punches, &july_window(), &policy).is_empty());
    }

    #[test]
    fn intern_plan_is_matched_case_insensitively() {
        let mut policy = ReconcilePolicy::new(ShiftPolicy::default());
        policy
            .plans
            .insert("j. cruz".to_string(), DayPlan::intern(&policy.shift));

        let punches = vec![punch("J. Cruz", 13, 7, 10), punch("J. Cruz", 13, 16, 5)];
        let records = reconcile(&punches, &july_window(), &policy);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].days_worked, 1.0);
        assert_eq!(records[0].hours_worked, 7.83);
        assert_eq!(records[0].name, "J. Cruz");
    }

    #[test]
    fn worked_days_accumulate_for_a_known_schedule() {
        // Ten full days: the round-trip fixture the calculator tests reuse.
        let mut punches = Vec::new();
        for day in 13..=22 {
            punches.push(punch("Santos", day, 7, 0));
            punches.push(punch("Santos", day, 17, 30));
        }
        let policy = ReconcilePolicy::new(ShiftPolicy::default());
        let records = reconcile(&punches, &july_window(), &policy);
        let total_days: f64 = records.iter().map(|r| r.days_worked).sum();
        assert_eq!(total_days, 10.0);
    }
}
