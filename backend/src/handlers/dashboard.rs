use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

use crate::{
    error::AppError,
    models::attendance::AttendanceRow,
    services::day_decoder::{is_late, presence_status, PresenceStatus, PresenceSummary},
    state::AppState,
    types::EmployeeId,
    utils::time,
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct PresenceQuery {
    /// Defaults to today in the configured time zone.
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct PresenceEntry {
    pub employee_id: EmployeeId,
    pub code: String,
    pub full_name: String,
    pub status: PresenceStatus,
    pub late: bool,
    pub check_in: Option<NaiveTime>,
}

#[derive(Debug, Serialize)]
pub struct PresenceResponse {
    pub date: NaiveDate,
    pub total: u32,
    pub summary: PresenceSummary,
    pub employees: Vec<PresenceEntry>,
}

pub async fn get_presence(
    State(state): State<AppState>,
    Query(q): Query<PresenceQuery>,
) -> Result<Json<PresenceResponse>, AppError> {
    let date = q
        .date
        .unwrap_or_else(|| time::today_local(&state.config.time_zone));
    let settings = &state.config.rules.presence;

    let rows: HashMap<EmployeeId, AttendanceRow> = state
        .attendance
        .list_range(date, date)
        .await?
        .into_iter()
        .map(|row| (row.employee_id, row))
        .collect();

    let mut summary = PresenceSummary::default();
    let employees: Vec<PresenceEntry> = state
        .employees
        .list()
        .await?
        .into_iter()
        .map(|employee| {
            let row = rows.get(&employee.id);
            let status = presence_status(row, &employee.code, settings);
            let check_in = row.and_then(|row| row.check_in);
            // Any late punch counts, whatever the day's status.
            let late = is_late(check_in, settings);
            summary.record(status, late);
            PresenceEntry {
                employee_id: employee.id,
                code: employee.code,
                full_name: employee.full_name,
                status,
                late,
                check_in,
            }
        })
        .collect();

    Ok(Json(PresenceResponse {
        date,
        total: summary.total(),
        summary,
        employees,
    }))
}
