use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    error::AppError,
    models::employee::EmploymentStatus,
    services::{
        calendar::year_bounds,
        leave::{
            balance, employment_status, ensure_reset_confirmed, leave_ledger,
            live_accrual_month, quota_days_to_hours, LeaveBalance, LeaveEntry,
        },
    },
    state::AppState,
    types::EmployeeId,
    utils::time,
};

#[derive(Debug, Deserialize, Validate, IntoParams)]
pub struct LeaveQuery {
    #[validate(range(min = 2000, max = 2100))]
    pub year: i32,
    /// Accrual cut-off month; defaults to the current calendar month for
    /// every year.
    #[validate(range(min = 0, max = 12))]
    pub through_month: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct LeaveSummary {
    pub employee_id: EmployeeId,
    pub code: String,
    pub full_name: String,
    pub department: String,
    pub status: EmploymentStatus,
    pub balance: LeaveBalance,
    pub quota_days: f64,
    pub used_days: f64,
    pub remaining_days: f64,
    pub ledger: Vec<LeaveEntry>,
}

#[derive(Debug, Serialize)]
pub struct LeaveResponse {
    pub year: i32,
    pub through_month: u32,
    pub employees: Vec<LeaveSummary>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateQuotaRequest {
    #[validate(range(min = 0.0, max = 366.0))]
    pub days: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UpdateQuotaResponse {
    pub employee_id: String,
    pub quota_hours: f64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ResetQuotasRequest {
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ResetQuotasResponse {
    pub reset: u64,
}

pub async fn list_leave(
    State(state): State<AppState>,
    Query(q): Query<LeaveQuery>,
) -> Result<Json<LeaveResponse>, AppError> {
    q.validate()?;
    let through_month = q
        .through_month
        .unwrap_or_else(|| default_through_month(&state));

    let (from, to) = year_bounds(q.year)?;
    let rows = state.attendance.list_range(from, to).await?;
    let mut ledger = leave_ledger(&rows);
    let policy = &state.config.rules.leave;

    let employees = state
        .employees
        .list()
        .await?
        .into_iter()
        .map(|employee| {
            let entries = ledger.remove(&employee.id).unwrap_or_default();
            let balance = balance(&employee, q.year, through_month, &entries, policy);
            LeaveSummary {
                employee_id: employee.id,
                department: employee.department_name().to_string(),
                status: employment_status(&employee, policy),
                quota_days: balance.quota_days(),
                used_days: balance.used_days(),
                remaining_days: balance.remaining_days(),
                balance,
                ledger: entries,
                code: employee.code,
                full_name: employee.full_name,
            }
        })
        .collect();

    Ok(Json(LeaveResponse {
        year: q.year,
        through_month,
        employees,
    }))
}

fn default_through_month(state: &AppState) -> u32 {
    live_accrual_month(time::today_local(&state.config.time_zone))
}

pub async fn update_leave_quota(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateQuotaRequest>,
) -> Result<Json<UpdateQuotaResponse>, AppError> {
    payload.validate()?;
    let employee_id = EmployeeId::from_str(&id)
        .map_err(|_| AppError::BadRequest("Invalid employee ID".into()))?;
    let hours = quota_days_to_hours(payload.days)?;

    if !state.employees.update_leave_quota(employee_id, hours).await? {
        return Err(AppError::NotFound("Employee not found".into()));
    }
    tracing::info!(employee_id = %employee_id, quota_hours = hours, "Leave quota updated");

    Ok(Json(UpdateQuotaResponse {
        employee_id: employee_id.to_string(),
        quota_hours: hours,
    }))
}

pub async fn reset_leave_quotas(
    State(state): State<AppState>,
    Json(payload): Json<ResetQuotasRequest>,
) -> Result<Json<ResetQuotasResponse>, AppError> {
    ensure_reset_confirmed(payload.confirm)?;
    let reset = state.employees.reset_leave_quotas().await?;
    tracing::warn!(employees = reset, "All leave quotas reset to zero");
    Ok(Json(ResetQuotasResponse { reset }))
}
