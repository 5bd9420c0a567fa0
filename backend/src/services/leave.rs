use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use thiserror::Error;

use crate::{
    config::LeavePolicy,
    models::{
        attendance::AttendanceRow,
        employee::{Employee, EmploymentStatus, HOURS_PER_DAY},
    },
    types::EmployeeId,
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LeaveError {
    #[error("leave quota must be a non-negative number of days, got {0}")]
    InvalidQuota(f64),
    #[error("resetting every leave quota requires explicit confirmation")]
    ResetNotConfirmed,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LeaveEntry {
    pub date: NaiveDate,
    pub hours: f64,
}

/// Annual leave position of one employee. `remaining_hours` is not clamped
/// and goes negative when more leave was taken than earned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LeaveBalance {
    pub base_quota_hours: f64,
    pub accrued_hours: f64,
    pub used_hours: f64,
    pub remaining_hours: f64,
}

impl LeaveBalance {
    pub fn used_days(&self) -> f64 {
        hours_to_days(self.used_hours)
    }

    pub fn remaining_days(&self) -> f64 {
        hours_to_days(self.remaining_hours)
    }

    pub fn quota_days(&self) -> f64 {
        hours_to_days(self.base_quota_hours + self.accrued_hours)
    }
}

/// Hours expressed in days, one decimal.
pub fn hours_to_days(hours: f64) -> f64 {
    (hours / HOURS_PER_DAY * 10.0).round() / 10.0
}

pub fn employment_status(employee: &Employee, policy: &LeavePolicy) -> EmploymentStatus {
    if policy.is_probation(&employee.code) {
        EmploymentStatus::Probation
    } else {
        EmploymentStatus::Active
    }
}

/// Month the leave page accrues through when none is given: the current
/// calendar month, whichever year is viewed. The cutoff year and probation
/// are applied by [`accrued_hours`].
pub fn live_accrual_month(today: NaiveDate) -> u32 {
    today.month()
}

/// Leave earned in `year` up to and including `through_month`.
pub fn accrued_hours(
    status: EmploymentStatus,
    year: i32,
    through_month: u32,
    policy: &LeavePolicy,
) -> f64 {
    if year <= policy.accrual_cutoff_year || status == EmploymentStatus::Probation {
        return 0.0;
    }
    f64::from(through_month.min(12)) * policy.accrual_hours_per_month
}

/// `entries` may span any period; only those dated in `year` are counted,
/// including dates after `through_month`.
pub fn balance(
    employee: &Employee,
    year: i32,
    through_month: u32,
    entries: &[LeaveEntry],
    policy: &LeavePolicy,
) -> LeaveBalance {
    let base_quota_hours = employee.base_quota_hours();
    let accrued_hours = accrued_hours(
        employment_status(employee, policy),
        year,
        through_month,
        policy,
    );
    let used_hours: f64 = entries
        .iter()
        .filter(|entry| entry.date.year() == year)
        .map(|entry| entry.hours)
        .sum();

    LeaveBalance {
        base_quota_hours,
        accrued_hours,
        used_hours,
        remaining_hours: base_quota_hours + accrued_hours - used_hours,
    }
}

/// Groups the leave taken in `rows` per employee, in date order.
pub fn leave_ledger(rows: &[AttendanceRow]) -> BTreeMap<EmployeeId, Vec<LeaveEntry>> {
    let mut ledger: BTreeMap<EmployeeId, Vec<LeaveEntry>> = BTreeMap::new();
    for row in rows.iter().filter(|row| row.leave_hours > 0.0) {
        ledger.entry(row.employee_id).or_default().push(LeaveEntry {
            date: row.date,
            hours: row.leave_hours,
        });
    }
    for entries in ledger.values_mut() {
        entries.sort_by_key(|entry| entry.date);
    }
    ledger
}

/// Quotas are entered in days and stored in hours.
pub fn quota_days_to_hours(days: f64) -> Result<f64, LeaveError> {
    if !days.is_finite() || days < 0.0 {
        return Err(LeaveError::InvalidQuota(days));
    }
    Ok(days * HOURS_PER_DAY)
}

pub fn ensure_reset_confirmed(confirm: bool) -> Result<(), LeaveError> {
    if confirm {
        Ok(())
    } else {
        Err(LeaveError::ResetNotConfirmed)
    }
}
