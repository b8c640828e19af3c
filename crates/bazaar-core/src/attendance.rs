//! # Attendance Ledger
//!
//! Calendar store of one status per (employee, day), with monthly KPIs and a
//! CSV projection.
//!
//! ## Ledger Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  (employee_id, date)            → status                                │
//! │  ───────────────────────────────────────────                            │
//! │  ("8c1f…", 2026-03-02)          → Present                               │
//! │  ("8c1f…", 2026-03-03)          → Late                                  │
//! │  ("d2a9…", 2026-03-02)          → On Leave                              │
//! │                                                                         │
//! │  No entry = not marked. Marking again overwrites; no history is kept.   │
//! │                                                                         │
//! │  Stored text form: "{employeeId}-{yyyy-MM-dd}" → "Present"              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Keys are ordered by employee then date, so one employee's month is a
//! contiguous range scan.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreResult, ValidationError};
use crate::types::Employee;

/// Label used in exports for a day with no record.
pub const NOT_MARKED: &str = "Not Marked";

// =============================================================================
// Status
// =============================================================================

/// Attendance for one employee on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum AttendanceStatus {
    Present,
    Absent,
    #[serde(rename = "On Leave")]
    OnLeave,
    Late,
}

impl AttendanceStatus {
    pub const ALL: [AttendanceStatus; 4] = [
        AttendanceStatus::Present,
        AttendanceStatus::Absent,
        AttendanceStatus::OnLeave,
        AttendanceStatus::Late,
    ];

    pub const fn label(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "Present",
            AttendanceStatus::Absent => "Absent",
            AttendanceStatus::OnLeave => "On Leave",
            AttendanceStatus::Late => "Late",
        }
    }

    /// Present and Late both count as attended.
    pub const fn counts_as_attended(&self) -> bool {
        matches!(self, AttendanceStatus::Present | AttendanceStatus::Late)
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AttendanceStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "present" => Ok(AttendanceStatus::Present),
            "absent" => Ok(AttendanceStatus::Absent),
            "onleave" | "leave" => Ok(AttendanceStatus::OnLeave),
            "late" => Ok(AttendanceStatus::Late),
            _ => Err(ValidationError::NotAllowed {
                field: "attendance status".to_string(),
                allowed: AttendanceStatus::ALL
                    .iter()
                    .map(|s| s.label().to_string())
                    .collect(),
            }),
        }
    }
}

// =============================================================================
// Year-Month
// =============================================================================

/// A calendar month, written `yyyy-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    first: NaiveDate,
}

impl YearMonth {
    /// Returns `None` for a month outside 1..=12.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first| YearMonth { first })
    }

    /// The month a date falls in.
    pub fn containing(date: NaiveDate) -> Self {
        YearMonth {
            first: date - Days::new(u64::from(date.day0())),
        }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn last_day(&self) -> NaiveDate {
        self.days().last().unwrap_or(self.first)
    }

    /// Every calendar day of the month, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let month = self.first.month();
        self.first.iter_days().take_while(move |d| d.month() == month)
    }

    pub fn day_count(&self) -> u32 {
        self.days().count() as u32
    }

    /// Days that are not Saturday or Sunday.
    pub fn working_days(&self) -> u32 {
        self.days().filter(|d| !is_weekend(*d)).count() as u32
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for YearMonth {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidFormat {
            field: "month".to_string(),
            reason: format!("'{}' is not a yyyy-MM month", s),
        };

        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year = year.parse().map_err(|_| invalid())?;
        let month = month.parse().map_err(|_| invalid())?;
        YearMonth::new(year, month).ok_or_else(invalid)
    }
}

impl TryFrom<String> for YearMonth {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}

/// Saturday or Sunday.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

// =============================================================================
// Text Keys
// =============================================================================

/// `{employeeId}-{yyyy-MM-dd}`.
pub fn attendance_key(employee_id: &str, date: NaiveDate) -> String {
    format!("{}-{}", employee_id, date.format("%Y-%m-%d"))
}

/// Splits a text key back into employee id and date.
///
/// Employee ids contain hyphens themselves, so the date is taken from the
/// right.
pub fn parse_attendance_key(key: &str) -> Option<(String, NaiveDate)> {
    let mut parts = key.rsplitn(4, '-');
    let day = parts.next()?;
    let month = parts.next()?;
    let year = parts.next()?;
    let employee_id = parts.next()?;

    if employee_id.is_empty() || year.len() != 4 || month.len() != 2 || day.len() != 2 {
        return None;
    }

    let date = NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)?;
    Some((employee_id.to_string(), date))
}

// =============================================================================
// Ledger
// =============================================================================

/// Map of (employee, date) → status.
///
/// Serializes as the flat text-keyed map used by the storage key
/// `pos.attendance.v1`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, AttendanceStatus>",
    into = "BTreeMap<String, AttendanceStatus>"
)]
pub struct AttendanceLedger {
    records: BTreeMap<(String, NaiveDate), AttendanceStatus>,
}

impl AttendanceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets one cell, returning what it held before.
    pub fn mark(
        &mut self,
        employee_id: impl Into<String>,
        date: NaiveDate,
        status: AttendanceStatus,
    ) -> Option<AttendanceStatus> {
        self.records.insert((employee_id.into(), date), status)
    }

    /// Marks every listed employee present on `date`. Returns how many
    /// cells were written.
    pub fn mark_all_present<I, S>(&mut self, employee_ids: I, date: NaiveDate) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut written = 0;
        for id in employee_ids {
            self.mark(id, date, AttendanceStatus::Present);
            written += 1;
        }
        written
    }

    pub fn status(&self, employee_id: &str, date: NaiveDate) -> Option<AttendanceStatus> {
        self.records
            .get(&(employee_id.to_string(), date))
            .copied()
    }

    /// One employee's marked days within a month.
    pub fn load_month(&self, employee_id: &str, month: YearMonth) -> BTreeMap<NaiveDate, AttendanceStatus> {
        let start = (employee_id.to_string(), month.first_day());
        let end = (employee_id.to_string(), month.last_day());
        self.records
            .range(start..=end)
            .map(|((_, date), status)| (*date, *status))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, NaiveDate, AttendanceStatus)> {
        self.records
            .iter()
            .map(|((id, date), status)| (id.as_str(), *date, *status))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Extend<(String, NaiveDate, AttendanceStatus)> for AttendanceLedger {
    fn extend<T: IntoIterator<Item = (String, NaiveDate, AttendanceStatus)>>(&mut self, iter: T) {
        for (id, date, status) in iter {
            self.records.insert((id, date), status);
        }
    }
}

impl FromIterator<(String, NaiveDate, AttendanceStatus)> for AttendanceLedger {
    fn from_iter<T: IntoIterator<Item = (String, NaiveDate, AttendanceStatus)>>(iter: T) -> Self {
        let mut ledger = AttendanceLedger::new();
        ledger.extend(iter);
        ledger
    }
}

impl TryFrom<BTreeMap<String, AttendanceStatus>> for AttendanceLedger {
    type Error = ValidationError;

    fn try_from(map: BTreeMap<String, AttendanceStatus>) -> Result<Self, Self::Error> {
        map.into_iter()
            .map(|(key, status)| {
                parse_attendance_key(&key)
                    .map(|(id, date)| (id, date, status))
                    .ok_or_else(|| ValidationError::InvalidFormat {
                        field: "attendance key".to_string(),
                        reason: format!("'{}' is not employeeId-yyyy-MM-dd", key),
                    })
            })
            .collect()
    }
}

impl From<AttendanceLedger> for BTreeMap<String, AttendanceStatus> {
    fn from(ledger: AttendanceLedger) -> Self {
        ledger
            .records
            .into_iter()
            .map(|((id, date), status)| (attendance_key(&id, date), status))
            .collect()
    }
}

// =============================================================================
// Monthly KPIs
// =============================================================================

/// Attendance figures for one employee over one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MonthlyKpis {
    pub working_days: u32,
    pub present_days: u32,
    pub absent_days: u32,
    pub leave_days: u32,
    pub late_days: u32,

    /// `(present + late) / working × 100` to one decimal; "0.0" with no
    /// working days.
    pub attendance_percentage: String,
}

/// Aggregates one employee's records over the given days of a month.
///
/// Status counts include every marked day in `month_days`, weekends too,
/// so the percentage can exceed 100 when weekend work is recorded.
pub fn compute_monthly_kpis(
    records: &BTreeMap<NaiveDate, AttendanceStatus>,
    month_days: &[NaiveDate],
) -> MonthlyKpis {
    let working_days = month_days.iter().filter(|d| !is_weekend(**d)).count() as u32;

    let mut kpis = MonthlyKpis {
        working_days,
        present_days: 0,
        absent_days: 0,
        leave_days: 0,
        late_days: 0,
        attendance_percentage: String::new(),
    };

    for status in month_days.iter().filter_map(|d| records.get(d)) {
        match status {
            AttendanceStatus::Present => kpis.present_days += 1,
            AttendanceStatus::Absent => kpis.absent_days += 1,
            AttendanceStatus::OnLeave => kpis.leave_days += 1,
            AttendanceStatus::Late => kpis.late_days += 1,
        }
    }

    kpis.attendance_percentage = if working_days == 0 {
        "0.0".to_string()
    } else {
        let attended = f64::from(kpis.present_days + kpis.late_days);
        format!("{:.1}", attended / f64::from(working_days) * 100.0)
    };

    kpis
}

// =============================================================================
// Daily Counters
// =============================================================================

/// Roster head-count for one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DailyCounters {
    pub present: u32,
    pub absent: u32,
    pub on_leave: u32,
    pub late: u32,

    /// Employees with no record for the day; not part of the four above.
    pub not_marked: u32,
}

pub fn compute_daily_counters(
    employees: &[Employee],
    ledger: &AttendanceLedger,
    date: NaiveDate,
) -> DailyCounters {
    employees
        .iter()
        .fold(DailyCounters::default(), |mut counters, employee| {
            match ledger.status(&employee.id, date) {
                Some(AttendanceStatus::Present) => counters.present += 1,
                Some(AttendanceStatus::Absent) => counters.absent += 1,
                Some(AttendanceStatus::OnLeave) => counters.on_leave += 1,
                Some(AttendanceStatus::Late) => counters.late += 1,
                None => counters.not_marked += 1,
            }
            counters
        })
}

// =============================================================================
// CSV Export
// =============================================================================

/// One exported day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceCsvRow {
    #[serde(rename = "Employee ID")]
    pub employee_id: String,
    #[serde(rename = "Employee Name")]
    pub employee_name: String,
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Day")]
    pub day_name: String,
    /// Status label, or [`NOT_MARKED`].
    #[serde(rename = "Status")]
    pub status: String,
}

/// Lazily yields one row per calendar day of `month` for one employee.
pub fn export_rows<'a>(
    employee: &'a Employee,
    ledger: &'a AttendanceLedger,
    month: YearMonth,
) -> impl Iterator<Item = AttendanceCsvRow> + 'a {
    month.days().map(move |date| AttendanceCsvRow {
        employee_id: employee.id.clone(),
        employee_name: employee.name.clone(),
        date,
        day_name: date.format("%A").to_string(),
        status: ledger
            .status(&employee.id, date)
            .map(|s| s.label().to_string())
            .unwrap_or_else(|| NOT_MARKED.to_string()),
    })
}

/// Rows for a whole roster, employee by employee.
pub fn roster_rows<'a>(
    employees: &'a [Employee],
    ledger: &'a AttendanceLedger,
    month: YearMonth,
) -> impl Iterator<Item = AttendanceCsvRow> + 'a {
    employees
        .iter()
        .flat_map(move |employee| export_rows(employee, ledger, month))
}

/// Column names of the exported sheet, matching [`AttendanceCsvRow`].
pub const CSV_HEADER: [&str; 5] = ["Employee ID", "Employee Name", "Date", "Day", "Status"];

/// Writes a header plus `rows` as CSV. The header is written even when
/// there are no rows.
pub fn write_csv<W, I>(writer: W, rows: I) -> CoreResult<()>
where
    W: std::io::Write,
    I: IntoIterator<Item = AttendanceCsvRow>,
{
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv.write_record(CSV_HEADER)?;
    for row in rows {
        csv.serialize(row)?;
    }
    csv.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Renders `rows` to an in-memory CSV document.
pub fn render_csv<I>(rows: I) -> CoreResult<String>
where
    I: IntoIterator<Item = AttendanceCsvRow>,
{
    let mut buf = Vec::new();
    write_csv(&mut buf, rows)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn march() -> YearMonth {
        "2026-03".parse().unwrap()
    }

    #[test]
    fn test_year_month() {
        let ym = march();
        assert_eq!(ym.year(), 2026);
        assert_eq!(ym.month(), 3);
        assert_eq!(ym.day_count(), 31);
        assert_eq!(ym.last_day(), date(2026, 3, 31));
        // March 2026: 1st is a Sunday, 9 weekend days
        assert_eq!(ym.working_days(), 22);
        assert_eq!(ym.to_string(), "2026-03");

        assert_eq!("2028-02".parse::<YearMonth>().unwrap().day_count(), 29);
        assert_eq!(YearMonth::containing(date(2026, 3, 17)), ym);
        assert!("2026-13".parse::<YearMonth>().is_err());
        assert!("March".parse::<YearMonth>().is_err());
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(AttendanceStatus::OnLeave.to_string(), "On Leave");
        assert_eq!("on leave".parse::<AttendanceStatus>().unwrap(), AttendanceStatus::OnLeave);
        assert_eq!("LATE".parse::<AttendanceStatus>().unwrap(), AttendanceStatus::Late);
        assert!("holiday".parse::<AttendanceStatus>().is_err());
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::OnLeave).unwrap(),
            "\"On Leave\""
        );
    }

    #[test]
    fn test_key_round_trip() {
        let id = "550e8400-e29b-41d4-a716-446655440000";
        let key = attendance_key(id, date(2026, 3, 5));
        assert_eq!(key, "550e8400-e29b-41d4-a716-446655440000-2026-03-05");
        assert_eq!(parse_attendance_key(&key), Some((id.to_string(), date(2026, 3, 5))));

        assert_eq!(parse_attendance_key("emp1-2026-3-5"), None);
        assert_eq!(parse_attendance_key("-2026-03-05"), None);
        assert_eq!(parse_attendance_key("2026-03-05"), None);
    }

    #[test]
    fn test_mark_is_idempotent() {
        let mut once = AttendanceLedger::new();
        once.mark("e1", date(2026, 3, 2), AttendanceStatus::Present);

        let mut twice = AttendanceLedger::new();
        twice.mark("e1", date(2026, 3, 2), AttendanceStatus::Present);
        let previous = twice.mark("e1", date(2026, 3, 2), AttendanceStatus::Present);

        assert_eq!(previous, Some(AttendanceStatus::Present));
        assert_eq!(once, twice);
        assert_eq!(twice.len(), 1);
    }

    #[test]
    fn test_mark_overwrites() {
        let mut ledger = AttendanceLedger::new();
        ledger.mark("e1", date(2026, 3, 2), AttendanceStatus::Absent);
        ledger.mark("e1", date(2026, 3, 2), AttendanceStatus::Late);
        assert_eq!(ledger.status("e1", date(2026, 3, 2)), Some(AttendanceStatus::Late));
        assert_eq!(ledger.status("e1", date(2026, 3, 3)), None);
    }

    #[test]
    fn test_load_month_filters_employee_and_range() {
        let mut ledger = AttendanceLedger::new();
        ledger.mark("e1", date(2026, 2, 28), AttendanceStatus::Present);
        ledger.mark("e1", date(2026, 3, 1), AttendanceStatus::Present);
        ledger.mark("e1", date(2026, 3, 31), AttendanceStatus::Absent);
        ledger.mark("e1", date(2026, 4, 1), AttendanceStatus::Present);
        ledger.mark("e10", date(2026, 3, 10), AttendanceStatus::Late);
        ledger.mark_all_present(["e2", "e3"], date(2026, 3, 10));

        let month = ledger.load_month("e1", march());
        assert_eq!(month.len(), 2);
        assert_eq!(month[&date(2026, 3, 31)], AttendanceStatus::Absent);
        assert!(ledger.load_month("e2", march()).contains_key(&date(2026, 3, 10)));
    }

    #[test]
    fn test_ledger_serializes_as_text_keys() {
        let mut ledger = AttendanceLedger::new();
        ledger.mark("e-1", date(2026, 3, 2), AttendanceStatus::OnLeave);

        let json = serde_json::to_value(&ledger).unwrap();
        assert_eq!(json["e-1-2026-03-02"], "On Leave");

        let back: AttendanceLedger = serde_json::from_value(json).unwrap();
        assert_eq!(back, ledger);

        let bad = serde_json::json!({ "garbage": "Present" });
        assert!(serde_json::from_value::<AttendanceLedger>(bad).is_err());
    }

    #[test]
    fn test_monthly_kpis() {
        let mut ledger = AttendanceLedger::new();
        ledger.mark("e1", date(2026, 3, 2), AttendanceStatus::Present);
        ledger.mark("e1", date(2026, 3, 3), AttendanceStatus::Late);
        ledger.mark("e1", date(2026, 3, 4), AttendanceStatus::Absent);
        ledger.mark("e1", date(2026, 3, 5), AttendanceStatus::OnLeave);

        let days: Vec<_> = march().days().collect();
        let kpis = compute_monthly_kpis(&ledger.load_month("e1", march()), &days);

        assert_eq!(kpis.working_days, 22);
        assert_eq!(kpis.present_days, 1);
        assert_eq!(kpis.late_days, 1);
        assert_eq!(kpis.absent_days, 1);
        assert_eq!(kpis.leave_days, 1);
        // 2 / 22 = 9.09%
        assert_eq!(kpis.attendance_percentage, "9.1");
    }

    #[test]
    fn test_kpis_with_no_working_days() {
        // a weekend-only span
        let days = [date(2026, 3, 7), date(2026, 3, 8)];
        let mut records = BTreeMap::new();
        records.insert(date(2026, 3, 7), AttendanceStatus::Present);

        let kpis = compute_monthly_kpis(&records, &days);
        assert_eq!(kpis.working_days, 0);
        assert_eq!(kpis.present_days, 1);
        assert_eq!(kpis.attendance_percentage, "0.0");

        let empty = compute_monthly_kpis(&BTreeMap::new(), &[]);
        assert_eq!(empty.attendance_percentage, "0.0");
    }

    #[test]
    fn test_daily_counters() {
        let staff: Vec<Employee> = ["A", "B", "C", "D", "E"]
            .iter()
            .map(|n| Employee::new(*n, Role::Cashier))
            .collect();
        let day = date(2026, 3, 2);

        let mut ledger = AttendanceLedger::new();
        ledger.mark(staff[0].id.clone(), day, AttendanceStatus::Present);
        ledger.mark(staff[1].id.clone(), day, AttendanceStatus::Late);
        ledger.mark(staff[2].id.clone(), day, AttendanceStatus::OnLeave);
        ledger.mark(staff[3].id.clone(), date(2026, 3, 3), AttendanceStatus::Absent);

        let counters = compute_daily_counters(&staff, &ledger, day);
        assert_eq!(
            counters,
            DailyCounters {
                present: 1,
                absent: 0,
                on_leave: 1,
                late: 1,
                not_marked: 2,
            }
        );
    }

    #[test]
    fn test_csv_has_one_row_per_day() {
        let employee = Employee::new("Asha", Role::Manager);
        let mut ledger = AttendanceLedger::new();
        ledger.mark(employee.id.clone(), date(2026, 2, 2), AttendanceStatus::Present);
        ledger.mark(employee.id.clone(), date(2026, 2, 3), AttendanceStatus::OnLeave);

        let month: YearMonth = "2026-02".parse().unwrap();
        let text = render_csv(export_rows(&employee, &ledger, month)).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Employee ID,Employee Name,Date,Day,Status");
        assert_eq!(lines.len(), 1 + 28);

        let rows: Vec<Vec<&str>> = lines[1..].iter().map(|l| l.split(',').collect()).collect();
        assert!(rows.iter().all(|r| r.len() == 5));
        assert_eq!(rows[0][2], "2026-02-01");
        assert_eq!(rows[0][3], "Sunday");
        assert_eq!(rows[0][4], NOT_MARKED);
        assert_eq!(rows[1][4], "Present");
        assert_eq!(rows[2][4], "On Leave");
        assert_eq!(rows.iter().filter(|r| r[4] == NOT_MARKED).count(), 26);
    }

    #[test]
    fn test_roster_export_parses_back() {
        let staff = vec![
            Employee::new("Asha", Role::Manager),
            Employee::new("Ravi, Jr.", Role::Cashier),
        ];
        let ledger = AttendanceLedger::new();
        let text = render_csv(roster_rows(&staff, &ledger, march())).unwrap();

        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let rows: Vec<AttendanceCsvRow> = reader.deserialize().collect::<Result<_, _>>().unwrap();
        assert_eq!(rows.len(), 62);
        assert_eq!(rows[31].employee_name, "Ravi, Jr.");
        assert_eq!(rows[31].date, date(2026, 3, 1));
    }

    #[test]
    fn test_empty_roster_still_has_header() {
        let ledger = AttendanceLedger::new();
        let text = render_csv(roster_rows(&[], &ledger, march())).unwrap();
        assert_eq!(text, "Employee ID,Employee Name,Date,Day,Status\n");

        let mut reader = csv::Reader::from_reader(text.as_bytes());
        assert_eq!(reader.headers().unwrap().iter().collect::<Vec<_>>(), CSV_HEADER);
        assert_eq!(reader.records().count(), 0);
    }
}
