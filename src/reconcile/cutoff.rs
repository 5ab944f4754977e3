use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};

use crate::model::attendance::{CutoffWindow, Punch};

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar day")
}

fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 { (year + 1, 1) } else { (year, month + 1) }
}

fn prev_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 { (year - 1, 12) } else { (year, month - 1) }
}

fn label(start: NaiveDate, end: NaiveDate) -> String {
    if start.year() == end.year() {
        format!(
            "{} - {}, {}",
            start.format("%b %-d"),
            end.format("%b %-d"),
            end.year()
        )
    } else {
        format!(
            "{} - {}",
            start.format("%b %-d, %Y"),
            end.format("%b %-d, %Y")
        )
    }
}

fn window(start: NaiveDate, end: NaiveDate) -> CutoffWindow {
    CutoffWindow {
        label: label(start, end),
        start,
        end,
    }
}

/// The two canonical semi-monthly windows anchored in a month: the 11th-25th,
/// and the 26th through the next month's 10th.
fn windows_for_month(year: i32, month: u32) -> [CutoffWindow; 2] {
    let (ny, nm) = next_month(year, month);
    [
        window(ymd(year, month, 11), ymd(year, month, 25)),
        window(ymd(year, month, 26), ymd(ny, nm, 10)),
    ]
}

/// Candidate cutoff windows for an upload: both canonical windows for every
/// year-month present in the data, plus one month either side. These are
/// suggestions for the operator to confirm — reconciliation only ever runs
/// against an explicitly chosen window.
pub fn build_cutoff_options(punches: &[Punch]) -> Vec<CutoffWindow> {
    let mut months: BTreeSet<(i32, u32)> = BTreeSet::new();
    for punch in punches {
        let ym = (punch.date.year(), punch.date.month());
        months.insert(ym);
        months.insert(prev_month(ym.0, ym.1));
        months.insert(next_month(ym.0, ym.1));
    }

    let mut seen: BTreeSet<(NaiveDate, NaiveDate)> = BTreeSet::new();
    let mut options = Vec::new();
    for (year, month) in months {
        for w in windows_for_month(year, month) {
            if seen.insert((w.start, w.end)) {
                options.push(w);
            }
        }
    }

    // Most recent first, matching how the operator scans the list.
    options.sort_by(|a, b| b.start.cmp(&a.start));
    options
}

/// Most recent window containing at least one punch. A default, not a
/// guarantee — several windows may contain data.
pub fn suggest_default<'a>(
    options: &'a [CutoffWindow],
    punches: &[Punch],
) -> Option<&'a CutoffWindow> {
    options
        .iter()
        .find(|w| punches.iter().any(|p| w.contains(p.date)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn punch(year: i32, month: u32, day: u32) -> Punch {
        let date = ymd(year, month, day);
        Punch {
            name: "Santos".to_string(),
            date,
            at: date.and_hms_opt(7, 0, 0).unwrap(),
        }
    }

    #[test]
    fn emits_both_windows_for_surrounding_months() {
        let options = build_cutoff_options(&[punch(2026, 7, 15)]);
        // June, July and August, two windows each.
        assert_eq!(options.len(), 6);
        assert!(options.iter().any(|w| w.start == ymd(2026, 6, 11)));
        assert!(options.iter().any(|w| w.start == ymd(2026, 8, 26)));
        // Sorted most recent first.
        assert_eq!(options[0].start, ymd(2026, 8, 26));
    }

    #[test]
    fn second_window_spans_the_month_boundary() {
        let options = build_cutoff_options(&[punch(2026, 12, 28)]);
        let w = options
            .iter()
            .find(|w| w.start == ymd(2026, 12, 26))
            .unwrap();
        assert_eq!(w.end, ymd(2027, 1, 10));
        assert_eq!(w.label, "Dec 26, 2026 - Jan 10, 2027");
    }

    #[test]
    fn labels_are_operator_friendly() {
        let options = build_cutoff_options(&[punch(2026, 7, 15)]);
        let w = options
            .iter()
            .find(|w| w.start == ymd(2026, 7, 11))
            .unwrap();
        assert_eq!(w.label, "Jul 11 - Jul 25, 2026");
    }

    #[test]
    fn default_is_most_recent_window_with_data() {
        let punches = [punch(2026, 7, 13), punch(2026, 7, 27)];
        let options = build_cutoff_options(&punches);
        let suggested = suggest_default(&options, &punches).unwrap();
        // Jul 26 - Aug 10 holds the later punch.
        assert_eq!(suggested.start, ymd(2026, 7, 26));
    }

    #[test]
    fn no_default_without_matching_data() {
        let options = build_cutoff_options(&[punch(2026, 7, 15)]);
        assert!(suggest_default(&options, &[]).is_none());
    }

    #[test]
    fn overlapping_months_dedupe_shared_windows() {
        // Punches in adjacent months share the +/-1 expansion.
        let options = build_cutoff_options(&[punch(2026, 7, 15), punch(2026, 8, 2)]);
        let july_b = options
            .iter()
            .filter(|w| w.start == ymd(2026, 7, 26))
            .count();
        assert_eq!(july_b, 1);
    }
}
