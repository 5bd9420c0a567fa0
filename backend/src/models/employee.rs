use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::types::EmployeeId;

pub const HOURS_PER_DAY: f64 = 8.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Employee {
    pub id: EmployeeId,
    pub code: String,
    pub full_name: String,
    pub email: Option<String>,
    pub department: Option<String>,
    /// Base annual leave in hours; a missing quota counts as zero.
    pub leave_quota: Option<f64>,
}

impl Employee {
    pub fn base_quota_hours(&self) -> f64 {
        self.leave_quota.unwrap_or(0.0)
    }

    pub fn department_name(&self) -> &str {
        self.department.as_deref().unwrap_or("N/A")
    }

    /// Addresses that are blank are treated as missing.
    pub fn email_address(&self) -> Option<&str> {
        self.email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentStatus {
    Active,
    Probation,
}
