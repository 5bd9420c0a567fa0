use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

use crate::{
    config::LeavePolicy,
    error::AppError,
    models::{
        attendance::{AttendanceCell, AttendanceRow},
        employee::Employee,
    },
    services::{
        aggregation::{aggregate, MonthlyAggregate},
        calendar::{days_of_month, year_bounds, CalendarRules},
        leave::{balance, leave_ledger, LeaveBalance, LeaveEntry},
        roster,
    },
    state::AppState,
    types::EmployeeId,
};

#[derive(Debug, Clone, Copy, Deserialize, Validate, IntoParams)]
pub struct MonthQuery {
    #[validate(range(min = 2000, max = 2100))]
    pub year: i32,
    #[validate(range(min = 1, max = 12))]
    pub month: u32,
}

/// Everything the month views need, loaded with one attendance query over
/// the whole year (leave usage is counted over the year).
pub struct MonthSnapshot {
    pub year: i32,
    pub month: u32,
    pub rules: CalendarRules,
    pub days: Vec<NaiveDate>,
    pub workdays: u32,
    /// Roster employees in display order.
    pub employees: Vec<Employee>,
    policy: LeavePolicy,
    cells: HashMap<EmployeeId, BTreeMap<NaiveDate, AttendanceCell>>,
    leave: BTreeMap<EmployeeId, Vec<LeaveEntry>>,
}

/// One employee's month, ready for the grid, payroll or export.
pub struct EmployeeMonth<'a> {
    pub employee: &'a Employee,
    pub cells: &'a BTreeMap<NaiveDate, AttendanceCell>,
    pub aggregate: MonthlyAggregate,
    pub leave: LeaveBalance,
}

impl MonthSnapshot {
    pub async fn load(state: &AppState, year: i32, month: u32) -> Result<Self, AppError> {
        let rules = state.calendar();
        let days = days_of_month(year, month)?;
        let workdays = rules.workdays_in_month(year, month)?;

        let employees = roster::arrange(
            state.employees.list().await?,
            &state.config.rules.roster,
        );
        let (year_start, year_end) = year_bounds(year)?;
        let rows = state.attendance.list_range(year_start, year_end).await?;
        tracing::debug!(
            year,
            month,
            employees = employees.len(),
            rows = rows.len(),
            "Loaded month snapshot"
        );

        Ok(Self {
            year,
            month,
            rules,
            days,
            workdays,
            employees,
            policy: state.config.rules.leave.clone(),
            cells: month_cells(&rows, year, month),
            leave: leave_ledger(&rows),
        })
    }

    pub fn employee_months(&self) -> Result<Vec<EmployeeMonth<'_>>, AppError> {
        self.employees
            .iter()
            .map(|employee| self.employee_month(employee))
            .collect()
    }

    pub fn find(&self, id: EmployeeId) -> Option<&Employee> {
        self.employees.iter().find(|emp| emp.id == id)
    }

    pub fn employee_month<'a>(
        &'a self,
        employee: &'a Employee,
    ) -> Result<EmployeeMonth<'a>, AppError> {
        static EMPTY: BTreeMap<NaiveDate, AttendanceCell> = BTreeMap::new();
        let cells = self.cells.get(&employee.id).unwrap_or(&EMPTY);
        let aggregate = aggregate(self.year, self.month, cells, &self.rules)?;
        let entries = self
            .leave
            .get(&employee.id)
            .map(Vec::as_slice)
            .unwrap_or_default();

        Ok(EmployeeMonth {
            employee,
            cells,
            aggregate,
            leave: balance(employee, self.year, self.month, entries, &self.policy),
        })
    }
}

fn month_cells(
    rows: &[AttendanceRow],
    year: i32,
    month: u32,
) -> HashMap<EmployeeId, BTreeMap<NaiveDate, AttendanceCell>> {
    let mut cells: HashMap<EmployeeId, BTreeMap<NaiveDate, AttendanceCell>> = HashMap::new();
    for row in rows
        .iter()
        .filter(|row| row.date.year() == year && row.date.month() == month)
    {
        cells
            .entry(row.employee_id)
            .or_default()
            .insert(row.date, row.to_cell());
    }
    cells
}

/// `from..=to` covering every date in `dates`.
pub fn date_span(dates: impl IntoIterator<Item = NaiveDate>) -> Option<(NaiveDate, NaiveDate)> {
    dates.into_iter().fold(None, |span, date| match span {
        None => Some((date, date)),
        Some((from, to)) => Some((from.min(date), to.max(date))),
    })
}
