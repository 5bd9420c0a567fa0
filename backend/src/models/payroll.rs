use serde::{Deserialize, Serialize};

/// Salary figures typed in by HR for one employee and month. Not persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SalaryInput {
    pub basic_salary: i64,
    pub allowance: i64,
}

/// One employee's payroll for a month. Money is in whole currency units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollLine {
    pub basic_salary: i64,
    pub allowance: i64,
    pub workdays_in_month: u32,
    pub standard_hours_in_month: f64,
    pub total_standard: f64,
    pub total_converted_ot: f64,
    pub total_leave: f64,
    pub total_onsite_in: f64,
    pub total_onsite_out: f64,
    pub total_work: f64,
    pub leave_hours_remaining: f64,
    pub basic_work_wage: f64,
    pub wage_before_tax: i64,
    pub tax: i64,
    pub net_salary: i64,
}
