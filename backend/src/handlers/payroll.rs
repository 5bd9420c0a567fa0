use std::collections::HashMap;

use axum::{extract::State, response::Html, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    error::AppError,
    models::payroll::{PayrollLine, SalaryInput},
    services::{
        dispatch::{self, DispatchSummary, PayslipRecipient},
        payroll::{payroll, OvertimeSplit},
        payslip::{self, PayslipContext},
    },
    state::AppState,
    types::EmployeeId,
};

use super::common::{EmployeeMonth, MonthSnapshot};

#[derive(Debug, Clone, Copy, Deserialize, Validate)]
pub struct SalaryEntry {
    pub employee_id: EmployeeId,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub basic_salary: i64,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub allowance: i64,
}

impl SalaryEntry {
    fn input(&self) -> SalaryInput {
        SalaryInput {
            basic_salary: self.basic_salary,
            allowance: self.allowance,
        }
    }
}

/// Salary figures for a month. Employees without an entry are paid on zero
/// inputs.
#[derive(Debug, Deserialize, Validate)]
pub struct PayrollRequest {
    #[validate(range(min = 2000, max = 2100))]
    pub year: i32,
    #[validate(range(min = 1, max = 12))]
    pub month: u32,
    #[validate(nested)]
    #[serde(default)]
    pub salaries: Vec<SalaryEntry>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PayslipRequest {
    #[validate(range(min = 2000, max = 2100))]
    pub year: i32,
    #[validate(range(min = 1, max = 12))]
    pub month: u32,
    #[validate(nested)]
    #[serde(flatten)]
    pub salary: SalaryEntry,
}

#[derive(Debug, Serialize)]
pub struct PayrollRow {
    pub employee_id: EmployeeId,
    pub code: String,
    pub full_name: String,
    pub department: String,
    pub email: Option<String>,
    pub overtime: OvertimeSplit,
    pub line: PayrollLine,
}

#[derive(Debug, Serialize)]
pub struct PayrollResponse {
    pub year: i32,
    pub month: u32,
    pub workdays: u32,
    pub employees: Vec<PayrollRow>,
}

fn payroll_line(
    state: &AppState,
    snapshot: &MonthSnapshot,
    month: &EmployeeMonth<'_>,
    input: SalaryInput,
) -> PayrollLine {
    payroll(
        &month.aggregate,
        snapshot.workdays,
        input,
        month.leave.remaining_hours,
        &state.config.rules.payroll,
    )
}

fn salaries_by_employee(entries: &[SalaryEntry]) -> HashMap<EmployeeId, SalaryInput> {
    entries
        .iter()
        .map(|entry| (entry.employee_id, entry.input()))
        .collect()
}

pub async fn compute_payroll(
    State(state): State<AppState>,
    Json(payload): Json<PayrollRequest>,
) -> Result<Json<PayrollResponse>, AppError> {
    payload.validate()?;
    let snapshot = MonthSnapshot::load(&state, payload.year, payload.month).await?;
    let salaries = salaries_by_employee(&payload.salaries);

    let employees = snapshot
        .employee_months()?
        .iter()
        .map(|month| {
            let input = salaries
                .get(&month.employee.id)
                .copied()
                .unwrap_or_default();
            PayrollRow {
                employee_id: month.employee.id,
                code: month.employee.code.clone(),
                full_name: month.employee.full_name.clone(),
                department: month.employee.department_name().to_string(),
                email: month.employee.email_address().map(str::to_string),
                overtime: OvertimeSplit::from_converted(
                    month.aggregate.total_converted_ot,
                    &state.config.rules.payroll,
                ),
                line: payroll_line(&state, &snapshot, month, input),
            }
        })
        .collect();

    Ok(Json(PayrollResponse {
        year: snapshot.year,
        month: snapshot.month,
        workdays: snapshot.workdays,
        employees,
    }))
}

pub async fn render_payslip(
    State(state): State<AppState>,
    Json(payload): Json<PayslipRequest>,
) -> Result<Html<String>, AppError> {
    payload.validate()?;
    let snapshot = MonthSnapshot::load(&state, payload.year, payload.month).await?;
    let employee = snapshot
        .find(payload.salary.employee_id)
        .ok_or_else(|| AppError::NotFound("Employee not found".into()))?;
    let month = snapshot.employee_month(employee)?;
    let line = payroll_line(&state, &snapshot, &month, payload.salary.input());

    Ok(Html(payslip::render(&PayslipContext {
        employee_name: &employee.full_name,
        year: snapshot.year,
        month: snapshot.month,
        line: &line,
        tax_rate: state.config.rules.payroll.tax_rate,
        letterhead: &state.config.rules.letterhead,
    })))
}

pub async fn send_all_payslips(
    State(state): State<AppState>,
    Json(payload): Json<PayrollRequest>,
) -> Result<Json<DispatchSummary>, AppError> {
    payload.validate()?;
    let snapshot = MonthSnapshot::load(&state, payload.year, payload.month).await?;
    let salaries = salaries_by_employee(&payload.salaries);
    let subject = payslip::subject(snapshot.year, snapshot.month);

    let recipients: Vec<PayslipRecipient> = snapshot
        .employee_months()?
        .iter()
        .map(|month| {
            let input = salaries
                .get(&month.employee.id)
                .copied()
                .unwrap_or_default();
            let line = payroll_line(&state, &snapshot, month, input);
            PayslipRecipient {
                employee_id: month.employee.id,
                name: month.employee.full_name.clone(),
                email: month.employee.email_address().map(str::to_string),
                subject: subject.clone(),
                html: payslip::render(&PayslipContext {
                    employee_name: &month.employee.full_name,
                    year: snapshot.year,
                    month: snapshot.month,
                    line: &line,
                    tax_rate: state.config.rules.payroll.tax_rate,
                    letterhead: &state.config.rules.letterhead,
                }),
            }
        })
        .collect();

    tracing::info!(
        year = snapshot.year,
        month = snapshot.month,
        recipients = recipients.len(),
        "Starting payslip run"
    );
    let summary = dispatch::send_all(
        state.mailer.as_ref(),
        recipients,
        state.config.payslip_send_delay(),
    )
    .await;
    Ok(Json(summary))
}
