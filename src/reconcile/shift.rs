use chrono::{NaiveDate, NaiveTime};

use crate::model::attendance::DayRecord;

/// Nominal shift rules the reconciler clips punches against.
#[derive(Debug, Clone)]
pub struct ShiftPolicy {
    pub shift_start: NaiveTime,
    pub shift_end: NaiveTime,
    /// Effective shift end for intern-type employees.
    pub intern_shift_end: NaiveTime,
    pub lunch_start: NaiveTime,
    pub lunch_end: NaiveTime,
    /// Time-in candidates fall in [in_window_start, in_window_end).
    pub in_window_start: NaiveTime,
    pub in_window_end: NaiveTime,
    /// Time-out candidates fall at or after this.
    pub out_window_start: NaiveTime,
}

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).expect("valid wall-clock time")
}

impl Default for ShiftPolicy {
    fn default() -> Self {
        Self {
            shift_start: t(7, 0),
            shift_end: t(17, 30),
            intern_shift_end: t(16, 0),
            lunch_start: t(12, 0),
            lunch_end: t(13, 0),
            in_window_start: t(6, 0),
            in_window_end: t(14, 0),
            out_window_start: t(16, 0),
        }
    }
}

/// Per-employee adjustments to the nominal shift.
#[derive(Debug, Clone)]
pub struct DayPlan {
    /// Shift end this employee is clipped to.
    pub shift_end: NaiveTime,
    /// Credit a full day whenever the time-out is at or after the out
    /// window, regardless of computed hours (intern policy).
    pub credit_full_day_on_late_out: bool,
}

impl DayPlan {
    pub fn nominal(policy: &ShiftPolicy) -> Self {
        Self {
            shift_end: policy.shift_end,
            credit_full_day_on_late_out: false,
        }
    }

    pub fn intern(policy: &ShiftPolicy) -> Self {
        Self {
            shift_end: policy.intern_shift_end,
            credit_full_day_on_late_out: true,
        }
    }
}

/// Earliest punch inside the morning window and latest punch at or after the
/// out window. Punches outside both windows are ignored.
pub fn pick_punches(
    times: &[NaiveTime],
    policy: &ShiftPolicy,
) -> (Option<NaiveTime>, Option<NaiveTime>) {
    let time_in = times
        .iter()
        .copied()
        .filter(|t| *t >= policy.in_window_start && *t < policy.in_window_end)
        .min();
    let time_out = times
        .iter()
        .copied()
        .filter(|t| *t >= policy.out_window_start)
        .max();
    (time_in, time_out)
}

/// Snap a fraction of an 8-hour day to the nearest half day.
pub fn snap_days(hours: f64) -> f64 {
    ((hours / 8.0) * 2.0).round() / 2.0
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn lunch_overlap_minutes(start: NaiveTime, end: NaiveTime, policy: &ShiftPolicy) -> i64 {
    let s = start.max(policy.lunch_start);
    let e = end.min(policy.lunch_end);
    (e - s).num_minutes().max(0)
}

/// Derive the day's totals from an in/out pair. The same function backs the
/// batch reconcile and the operator's manual in/out override, so displayed
/// hours and days always agree with the stored punches.
pub fn derive_day(
    name: &str,
    date: NaiveDate,
    time_in: Option<NaiveTime>,
    time_out: Option<NaiveTime>,
    plan: &DayPlan,
    policy: &ShiftPolicy,
) -> DayRecord {
    let tardiness_minutes = time_in
        .map(|t| (t - policy.shift_start).num_minutes().max(0))
        .unwrap_or(0);

    let (hours_worked, mut days_worked) = match (time_in, time_out) {
        (Some(tin), Some(tout)) => {
            let start = tin.max(policy.shift_start);
            let end = tout.min(plan.shift_end);
            let mut minutes = (end - start).num_minutes().max(0);
            minutes -= lunch_overlap_minutes(start, end, policy);
            let hours = round2((minutes.max(0) as f64 / 60.0).min(8.0));
            (hours, snap_days(hours))
        }
        // One side only: flat half day, no clipping.
        (Some(_), None) | (None, Some(_)) => (4.0, 0.5),
        (None, None) => (0.0, 0.0),
    };

    if plan.credit_full_day_on_late_out
        && time_out.is_some_and(|t| t >= policy.out_window_start)
    {
        days_worked = 1.0;
    }

    DayRecord {
        name: name.to_string(),
        date,
        time_in,
        time_out,
        hours_worked,
        days_worked,
        tardiness_minutes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 7, 15).unwrap()
    }

    fn derive(
        time_in: Option<NaiveTime>,
        time_out: Option<NaiveTime>,
        plan: &DayPlan,
    ) -> DayRecord {
        let policy = ShiftPolicy::default();
        derive_day("dela cruz", date(), time_in, time_out, plan, &policy)
    }

    #[test]
    fn full_shift_caps_at_eight_hours() {
        let policy = ShiftPolicy::default();
        let rec = derive(Some(t(6, 30)), Some(t(17, 30)), &DayPlan::nominal(&policy));
        // 07:00-17:30 minus lunch is 9.5h, capped at 8.
        assert_eq!(rec.hours_worked, 8.0);
        assert_eq!(rec.days_worked, 1.0);
        assert_eq!(rec.tardiness_minutes, 0);
    }

    #[test]
    fn hours_never_negative() {
        let policy = ShiftPolicy::default();
        // Out clipped to 17:30, in at 13:50: short afternoon, no lunch left.
        let rec = derive(Some(t(13, 50)), Some(t(16, 0)), &DayPlan::nominal(&policy));
        assert!(rec.hours_worked >= 0.0);
        let rec = derive(Some(t(13, 0)), Some(t(16, 0)), &DayPlan::nominal(&policy));
        assert_eq!(rec.hours_worked, 3.0);
    }

    #[test]
    fn single_punch_is_a_flat_half_day() {
        let policy = ShiftPolicy::default();
        let rec = derive(Some(t(7, 0)), None, &DayPlan::nominal(&policy));
        assert_eq!(rec.hours_worked, 4.0);
        assert_eq!(rec.days_worked, 0.5);

        let rec = derive(None, Some(t(17, 0)), &DayPlan::nominal(&policy));
        assert_eq!(rec.hours_worked, 4.0);
        assert_eq!(rec.days_worked, 0.5);
        assert_eq!(rec.tardiness_minutes, 0);
    }

    #[test]
    fn lunch_hour_is_deducted_once() {
        let policy = ShiftPolicy::default();
        let rec = derive(Some(t(7, 0)), Some(t(17, 0)), &DayPlan::nominal(&policy));
        // 10h span minus 1h lunch is 9h, capped at 8.
        assert_eq!(rec.hours_worked, 8.0);

        let rec = derive(Some(t(9, 0)), Some(t(16, 0)), &DayPlan::nominal(&policy));
        // 7h span minus 1h lunch.
        assert_eq!(rec.hours_worked, 6.0);
        assert_eq!(rec.days_worked, 1.0);
    }

    #[test]
    fn tardiness_has_no_grace_period() {
        let policy = ShiftPolicy::default();
        let rec = derive(Some(t(7, 1)), Some(t(17, 30)), &DayPlan::nominal(&policy));
        assert_eq!(rec.tardiness_minutes, 1);

        let rec = derive(Some(t(6, 45)), Some(t(17, 30)), &DayPlan::nominal(&policy));
        assert_eq!(rec.tardiness_minutes, 0);
    }

    #[test]
    fn intern_late_checkout_forces_full_day() {
        let policy = ShiftPolicy::default();
        // In 07:10, out 16:05.
        let rec = derive(Some(t(7, 10)), Some(t(16, 5)), &DayPlan::intern(&policy));
        assert_eq!(rec.tardiness_minutes, 10);
        // 07:10-16:00 minus lunch = 7h50m.
        assert_eq!(rec.hours_worked, 7.83);
        assert_eq!(rec.days_worked, 1.0);
    }

    #[test]
    fn intern_early_checkout_keeps_snapped_days() {
        let policy = ShiftPolicy::default();
        let rec = derive(Some(t(7, 0)), None, &DayPlan::intern(&policy));
        assert_eq!(rec.days_worked, 0.5);
    }

    #[test]
    fn days_snap_to_halves() {
        assert_eq!(snap_days(8.0), 1.0);
        assert_eq!(snap_days(4.0), 0.5);
        assert_eq!(snap_days(0.9), 0.0);
        assert_eq!(snap_days(5.0), 0.5);
        assert_eq!(snap_days(6.5), 1.0);
        assert_eq!(snap_days(9.0), 1.0);
    }

    #[test]
    fn picks_earliest_in_and_latest_out() {
        let policy = ShiftPolicy::default();
        let times = [t(7, 2), t(6, 55), t(12, 10), t(16, 30), t(17, 31)];
        let (tin, tout) = pick_punches(&times, &policy);
        assert_eq!(tin, Some(t(6, 55)));
        assert_eq!(tout, Some(t(17, 31)));
    }

    #[test]
    fn punches_outside_both_windows_are_ignored() {
        let policy = ShiftPolicy::default();
        let times = [t(14, 30), t(15, 59)];
        let (tin, tout) = pick_punches(&times, &policy);
        assert_eq!(tin, None);
        assert_eq!(tout, None);

        let times = [t(5, 59)];
        assert_eq!(pick_punches(&times, &policy), (None, None));
    }
}
