use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    error::AppError,
    models::attendance::{AttendanceRow, CellKey, DetailedCell},
    services::{
        punch::{self, RawPunch},
        timesheet::{EditCommand, EditOutcome, MonthSheet},
    },
    state::AppState,
    types::EmployeeId,
    validation::rules::validate_cell,
};

use super::common::date_span;

#[derive(Debug, Deserialize, Validate)]
pub struct UpsertCellRequest {
    pub employee_id: EmployeeId,
    pub date: NaiveDate,
    #[validate(custom(function = "validate_cell"))]
    pub cell: DetailedCell,
}

#[derive(Debug, Deserialize, Validate)]
pub struct BulkUpsertRequest {
    #[validate(length(min = 1, max = 2000))]
    pub keys: Vec<CellKey>,
    #[validate(custom(function = "validate_cell"))]
    pub cell: DetailedCell,
}

#[derive(Debug, Deserialize)]
pub struct DeleteCellQuery {
    pub employee_id: EmployeeId,
    pub date: NaiveDate,
}

#[derive(Debug, Deserialize, Validate)]
pub struct BulkDeleteRequest {
    #[validate(length(min = 1, max = 2000))]
    pub keys: Vec<CellKey>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PunchImportRequest {
    #[validate(length(min = 1, max = 50000))]
    pub punches: Vec<RawPunch>,
}

#[derive(Debug, Serialize)]
pub struct PunchImportResponse {
    pub upserted: usize,
    pub unknown_device_users: usize,
    pub unknown_codes: usize,
}

pub async fn upsert_cell(
    State(state): State<AppState>,
    Json(payload): Json<UpsertCellRequest>,
) -> Result<Json<EditOutcome>, AppError> {
    payload.validate()?;
    let key = CellKey::new(payload.employee_id, payload.date);
    apply(
        &state,
        EditCommand::Upsert {
            keys: vec![key],
            cell: payload.cell,
        },
    )
    .await
}

pub async fn bulk_upsert_cells(
    State(state): State<AppState>,
    Json(payload): Json<BulkUpsertRequest>,
) -> Result<Json<EditOutcome>, AppError> {
    payload.validate()?;
    apply(
        &state,
        EditCommand::Upsert {
            keys: payload.keys,
            cell: payload.cell,
        },
    )
    .await
}

pub async fn delete_cell(
    State(state): State<AppState>,
    Query(q): Query<DeleteCellQuery>,
) -> Result<Json<EditOutcome>, AppError> {
    let key = CellKey::new(q.employee_id, q.date);
    apply(&state, EditCommand::Delete { keys: vec![key] }).await
}

pub async fn bulk_delete_cells(
    State(state): State<AppState>,
    Json(payload): Json<BulkDeleteRequest>,
) -> Result<Json<EditOutcome>, AppError> {
    payload.validate()?;
    apply(&state, EditCommand::Delete { keys: payload.keys }).await
}

/// Loads the confirmed cells the command touches, then runs it.
async fn apply(state: &AppState, command: EditCommand) -> Result<Json<EditOutcome>, AppError> {
    let keys = match &command {
        EditCommand::Upsert { keys, .. } | EditCommand::Delete { keys } => keys,
    };
    let Some((from, to)) = date_span(keys.iter().map(|key| key.date)) else {
        return Ok(Json(EditOutcome::default()));
    };

    let rows = state.attendance.list_range(from, to).await?;
    let mut sheet = MonthSheet::from_rows(&rows);
    let outcome = sheet.execute(command, state.attendance.as_ref()).await?;
    tracing::info!(
        upserted = outcome.upserted,
        deleted = outcome.deleted,
        "Attendance updated"
    );
    Ok(Json(outcome))
}

pub async fn import_punches(
    State(state): State<AppState>,
    Json(payload): Json<PunchImportRequest>,
) -> Result<Json<PunchImportResponse>, AppError> {
    payload.validate()?;

    let employees_by_code: HashMap<String, EmployeeId> = state
        .employees
        .list()
        .await?
        .into_iter()
        .map(|emp| (emp.code, emp.id))
        .collect();
    let summary = punch::summarize(
        &payload.punches,
        &state.config.rules.punch,
        &employees_by_code,
    );

    let Some((from, to)) = date_span(summary.days.iter().map(|day| day.key.date)) else {
        tracing::warn!(
            punches = payload.punches.len(),
            unknown_device_users = summary.unknown_device_users,
            unknown_codes = summary.unknown_codes,
            "No punch matched a known employee"
        );
        return Ok(Json(PunchImportResponse {
            upserted: 0,
            unknown_device_users: summary.unknown_device_users,
            unknown_codes: summary.unknown_codes,
        }));
    };

    let existing: HashMap<CellKey, AttendanceRow> = state
        .attendance
        .list_range(from, to)
        .await?
        .into_iter()
        .map(|row| (row.key(), row))
        .collect();
    let rows: Vec<AttendanceRow> = summary
        .days
        .iter()
        .map(|day| day.apply_to(existing.get(&day.key)))
        .collect();

    state.attendance.upsert_many(&rows).await?;
    tracing::info!(
        rows = rows.len(),
        unknown_device_users = summary.unknown_device_users,
        unknown_codes = summary.unknown_codes,
        "Punches imported"
    );

    Ok(Json(PunchImportResponse {
        upserted: rows.len(),
        unknown_device_users: summary.unknown_device_users,
        unknown_codes: summary.unknown_codes,
    }))
}
