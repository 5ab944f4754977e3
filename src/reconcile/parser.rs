use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use utoipa::ToSchema;

use crate::model::attendance::Punch;

/// Header synonyms accepted for each column of interest. Comparison is
/// case-insensitive on trimmed cells.
const NAME_HEADERS: &[&str] = &["name", "employee", "employee name", "emp name", "person"];
const DATE_HEADERS: &[&str] = &["date", "att. date", "att date", "punch date"];
const TIME_HEADERS: &[&str] = &["time", "att. time", "att time", "punch time", "clock"];
const DATETIME_HEADERS: &[&str] = &[
    "date time",
    "datetime",
    "date/time",
    "date-time",
    "timestamp",
];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y", "%Y/%m/%d", "%m-%d-%Y"];
const TIME_FORMATS: &[&str] = &[
    "%H:%M:%S",
    "%H:%M",
    "%I:%M:%S %p",
    "%I:%M %p",
    "%I:%M%p",
    "%I:%M:%S%p",
];
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

#[derive(Debug, derive_more::Display)]
pub enum ParseError {
    #[display(fmt = "the uploaded file is empty")]
    Empty,
    #[display(
        fmt = "no usable header row: need a name column and a date or date-time column"
    )]
    MissingColumns,
}

impl std::error::Error for ParseError {}

/// A dropped input row, reported so the operator can fix data quality
/// instead of guessing from an aggregate count.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SkippedRow {
    /// 1-based line number in the uploaded file.
    pub line: usize,
    pub raw: String,
    #[schema(example = "unparseable date/time")]
    pub reason: String,
}

#[derive(Debug)]
pub struct ParseOutcome {
    pub punches: Vec<Punch>,
    pub skipped: Vec<SkippedRow>,
}

struct Columns {
    name: usize,
    datetime: Option<usize>,
    date: Option<usize>,
    time: Option<usize>,
}

fn norm_cell(cell: &str) -> String {
    cell.trim().trim_matches('"').to_lowercase()
}

fn find_column(cells: &[String], synonyms: &[&str]) -> Option<usize> {
    cells.iter().position(|c| synonyms.contains(&c.as_str()))
}

fn locate_columns(header_cells: &[String]) -> Option<Columns> {
    let name = find_column(header_cells, NAME_HEADERS)?;
    let datetime = find_column(header_cells, DATETIME_HEADERS);
    let date = find_column(header_cells, DATE_HEADERS);
    let time = find_column(header_cells, TIME_HEADERS);
    if datetime.is_none() && date.is_none() {
        return None;
    }
    Some(Columns {
        name,
        datetime,
        date,
        time,
    })
}

fn parse_date(cell: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(cell, f).ok())
}

fn parse_time(cell: &str) -> Option<NaiveTime> {
    // %p wants upper case meridiems; exports are inconsistent about it.
    let cell = cell.to_uppercase();
    TIME_FORMATS
        .iter()
        .find_map(|f| NaiveTime::parse_from_str(&cell, f).ok())
}

fn parse_datetime(cell: &str) -> Option<NaiveDateTime> {
    let upper = cell.to_uppercase();
    DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(&upper, f).ok())
}

fn cell_at<'a>(cells: &'a [&'a str], idx: usize) -> &'a str {
    cells.get(idx).copied().unwrap_or("").trim()
}

/// Timestamp extraction order: combined date-time cell, separate date+time
/// cells, date-only (midnight).
fn extract_timestamp(cells: &[&str], cols: &Columns) -> Result<NaiveDateTime, String> {
    if let Some(idx) = cols.datetime {
        let cell = cell_at(cells, idx);
        if !cell.is_empty() {
            if let Some(dt) = parse_datetime(cell) {
                return Ok(dt);
            }
            // Combined column sometimes carries a bare date.
            if let Some(d) = parse_date(cell) {
                return Ok(d.and_hms_opt(0, 0, 0).expect("midnight"));
            }
            return Err(format!("unparseable date/time '{cell}'"));
        }
    }

    let Some(date_idx) = cols.date else {
        return Err("missing date cell".to_string());
    };
    let date_cell = cell_at(cells, date_idx);
    let Some(date) = parse_date(date_cell) else {
        return Err(format!("unparseable date '{date_cell}'"));
    };

    if let Some(time_idx) = cols.time {
        let time_cell = cell_at(cells, time_idx);
        if !time_cell.is_empty() {
            return match parse_time(time_cell) {
                Some(t) => Ok(date.and_time(t)),
                None => Err(format!("unparseable time '{time_cell}'")),
            };
        }
    }

    Ok(date.and_hms_opt(0, 0, 0).expect("midnight"))
}

/// Parse a raw time-clock export into punches. The delimiter is sniffed from
/// the header row (tab beats comma); rows that cannot yield a name and a
/// valid timestamp are returned in `skipped`, never silently dropped.
pub fn parse(raw: &str) -> Result<ParseOutcome, ParseError> {
    let mut lines = raw.lines().enumerate();

    let (_, header) = lines
        .by_ref()
        .find(|(_, l)| !l.trim().is_empty())
        .ok_or(ParseError::Empty)?;
    let delimiter = if header.contains('\t') { '\t' } else { ',' };

    let header_cells: Vec<String> = header.split(delimiter).map(norm_cell).collect();
    let cols = locate_columns(&header_cells).ok_or(ParseError::MissingColumns)?;

    let mut punches = Vec::new();
    let mut skipped = Vec::new();

    for (idx, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        let line_no = idx + 1;
        let cells: Vec<&str> = line.split(delimiter).collect();

        let name_cell = cell_at(&cells, cols.name);
        if NAME_HEADERS.contains(&norm_cell(name_cell).as_str()) {
            skipped.push(SkippedRow {
                line: line_no,
                raw: line.to_string(),
                reason: "repeated header row".to_string(),
            });
            continue;
        }
        if name_cell.is_empty() {
            skipped.push(SkippedRow {
                line: line_no,
                raw: line.to_string(),
                reason: "empty name cell".to_string(),
            });
            continue;
        }

        match extract_timestamp(&cells, &cols) {
            Ok(at) => punches.push(Punch {
                name: name_cell.trim_matches('"').to_string(),
                date: at.date(),
                at,
            }),
            Err(reason) => skipped.push(SkippedRow {
                line: line_no,
                raw: line.to_string(),
                reason,
            }),
        }
    }

    Ok(ParseOutcome { punches, skipped })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniffs_tab_delimited_exports() {
        let raw = "Name\tDate\tTime\nSantos\t2026-07-13\t07:02:11\n";
        let out = parse(raw).unwrap();
        assert_eq!(out.punches.len(), 1);
        assert_eq!(out.punches[0].name, "Santos");
        assert_eq!(
            out.punches[0].at,
            NaiveDate::from_ymd_opt(2026, 7, 13)
                .unwrap()
                .and_hms_opt(7, 2, 11)
                .unwrap()
        );
    }

    #[test]
    fn accepts_combined_datetime_column() {
        let raw = "Employee,Timestamp\nReyes,07/13/2026 4:15:09 PM\n";
        let out = parse(raw).unwrap();
        assert_eq!(out.punches.len(), 1);
        assert_eq!(
            out.punches[0].at.time(),
            NaiveTime::from_hms_opt(16, 15, 9).unwrap()
        );
    }

    #[test]
    fn accepts_twelve_hour_times() {
        let raw = "Name,Date,Time\nReyes,07/13/2026,7:05 am\n";
        let out = parse(raw).unwrap();
        assert_eq!(
            out.punches[0].at.time(),
            NaiveTime::from_hms_opt(7, 5, 0).unwrap()
        );
    }

    #[test]
    fn date_only_rows_land_at_midnight() {
        let raw = "Name,Date\nSantos,2026-07-14\n";
        let out = parse(raw).unwrap();
        assert_eq!(
            out.punches[0].at.time(),
            NaiveTime::from_hms_opt(0, 0, 0).unwrap()
        );
    }

    #[test]
    fn bad_rows_are_reported_not_dropped() {
        let raw = "Name,Date,Time\nSantos,2026-07-13,07:00:00\nReyes,not-a-date,07:00:00\n,2026-07-13,08:00:00\n";
        let out = parse(raw).unwrap();
        assert_eq!(out.punches.len(), 1);
        assert_eq!(out.skipped.len(), 2);
        assert_eq!(out.skipped[0].line, 3);
        assert!(out.skipped[0].reason.contains("unparseable date"));
        assert_eq!(out.skipped[1].reason, "empty name cell");
    }

    #[test]
    fn mid_file_header_echo_is_skipped() {
        let raw = "Name,Date,Time\nSantos,2026-07-13,07:00:00\nName,Date,Time\nReyes,2026-07-13,16:30:00\n";
        let out = parse(raw).unwrap();
        assert_eq!(out.punches.len(), 2);
        assert_eq!(out.skipped.len(), 1);
        assert_eq!(out.skipped[0].reason, "repeated header row");
    }

    #[test]
    fn missing_required_columns_is_a_file_level_error() {
        let err = parse("Department,Time\nOps,07:00:00\n").unwrap_err();
        assert!(matches!(err, ParseError::MissingColumns));
        assert!(matches!(parse("\n\n").unwrap_err(), ParseError::Empty));
    }

    #[test]
    fn extra_columns_are_ignored() {
        // Department and device id columns present but unused.
        let raw = "ID,Name,Department,Date,Time,Device ID\n9,Santos,Ops,2026-07-13,07:00:00,D-1\n";
        let out = parse(raw).unwrap();
        assert_eq!(out.punches.len(), 1);
        assert_eq!(out.punches[0].name, "Santos");
    }
}
