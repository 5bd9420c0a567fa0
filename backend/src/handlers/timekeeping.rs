use axum::{
    body::Body,
    extract::{Query, State},
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
        HeaderValue,
    },
    response::Response,
    Json,
};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use validator::Validate;

use crate::{
    error::AppError,
    models::attendance::{AttendanceCell, DetailedCell},
    services::{
        aggregation::MonthlyAggregate,
        calendar::CalendarDay,
        day_decoder::{default_cell, display, to_detailed, DayDisplay},
        export,
        leave::LeaveBalance,
        payroll::OvertimeSplit,
    },
    state::AppState,
    types::EmployeeId,
};

use super::common::{MonthQuery, MonthSnapshot};

#[derive(Debug, Serialize)]
pub struct DayView {
    pub date: NaiveDate,
    pub day: u32,
    pub is_holiday: bool,
    pub cell: Option<AttendanceCell>,
    /// What the cell editor opens with.
    pub entry: DetailedCell,
    pub display: DayDisplay,
}

#[derive(Debug, Serialize)]
pub struct TimekeepingRow {
    pub employee_id: EmployeeId,
    pub code: String,
    pub full_name: String,
    pub department: String,
    pub aggregate: MonthlyAggregate,
    pub total_onsite: f64,
    pub leave: LeaveBalance,
    pub leave_remaining_days: f64,
    pub overtime: OvertimeSplit,
    pub days: Vec<DayView>,
}

#[derive(Debug, Serialize)]
pub struct TimekeepingResponse {
    pub year: i32,
    pub month: u32,
    pub workdays: u32,
    pub calendar: Vec<CalendarDay>,
    pub employees: Vec<TimekeepingRow>,
}

pub async fn get_timekeeping(
    State(state): State<AppState>,
    Query(q): Query<MonthQuery>,
) -> Result<Json<TimekeepingResponse>, AppError> {
    q.validate()?;
    let snapshot = MonthSnapshot::load(&state, q.year, q.month).await?;
    let payroll_settings = &state.config.rules.payroll;

    let employees = snapshot
        .employee_months()?
        .into_iter()
        .map(|month| {
            let days = snapshot
                .days
                .iter()
                .map(|&date| {
                    let is_holiday = snapshot.rules.is_holiday(date);
                    let cell = month.cells.get(&date);
                    DayView {
                        date,
                        day: date.day(),
                        is_holiday,
                        cell: cell.cloned(),
                        entry: cell.map_or_else(
                            || default_cell(is_holiday),
                            |cell| to_detailed(cell, is_holiday),
                        ),
                        display: display(cell, is_holiday),
                    }
                })
                .collect();

            TimekeepingRow {
                employee_id: month.employee.id,
                code: month.employee.code.clone(),
                full_name: month.employee.full_name.clone(),
                department: month.employee.department_name().to_string(),
                total_onsite: month.aggregate.total_onsite(),
                overtime: OvertimeSplit::from_converted(
                    month.aggregate.total_converted_ot,
                    payroll_settings,
                ),
                aggregate: month.aggregate,
                leave_remaining_days: month.leave.remaining_days(),
                leave: month.leave,
                days,
            }
        })
        .collect();

    Ok(Json(TimekeepingResponse {
        year: snapshot.year,
        month: snapshot.month,
        workdays: snapshot.workdays,
        calendar: snapshot.rules.list_month(snapshot.year, snapshot.month)?,
        employees,
    }))
}

pub async fn export_timekeeping(
    State(state): State<AppState>,
    Query(q): Query<MonthQuery>,
) -> Result<Response, AppError> {
    q.validate()?;
    let snapshot = MonthSnapshot::load(&state, q.year, q.month).await?;
    let payroll_settings = &state.config.rules.payroll;

    let months = snapshot.employee_months()?;
    let rows: Vec<export::ExportRow<'_>> = months
        .iter()
        .map(|month| export::ExportRow {
            employee: month.employee,
            aggregate: month.aggregate,
            leave_remaining_hours: month.leave.remaining_hours,
            overtime: OvertimeSplit::from_converted(
                month.aggregate.total_converted_ot,
                payroll_settings,
            ),
            cells: month.cells,
        })
        .collect();

    let body = export::render(&snapshot.days, &rows)?;
    let filename = export::file_name(q.year, q.month);
    tracing::info!(
        year = q.year,
        month = q.month,
        rows = rows.len(),
        "Exported timekeeping sheet"
    );

    let mut response = Response::new(Body::from(body));
    response.headers_mut().insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/csv; charset=utf-8"),
    );
    response.headers_mut().insert(
        CONTENT_DISPOSITION,
        HeaderValue::from_str(&format!("attachment; filename=\"{}\"", filename))
            .unwrap_or_else(|_| HeaderValue::from_static("attachment")),
    );
    Ok(response)
}
