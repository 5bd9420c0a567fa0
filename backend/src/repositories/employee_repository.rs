//! Employee directory as the timekeeping engine sees it.

use async_trait::async_trait;

use crate::db::connection::DbPool;
use crate::error::AppError;
use crate::models::employee::Employee;
use crate::types::EmployeeId;

const SELECT_EMPLOYEE: &str = "SELECT e.id, e.code, e.full_name, e.email, d.name AS department, e.leave_quota \
     FROM employees e LEFT JOIN departments d ON d.id = e.department_id";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmployeeRepositoryTrait: Send + Sync {
    /// All employees ordered by code.
    async fn list(&self) -> Result<Vec<Employee>, AppError>;

    /// Returns `false` when no employee has this id.
    async fn update_leave_quota(&self, id: EmployeeId, hours: f64) -> Result<bool, AppError>;

    /// Sets every employee's quota to zero and returns how many were touched.
    async fn reset_leave_quotas(&self) -> Result<u64, AppError>;
}

#[derive(Clone)]
pub struct EmployeeRepository {
    pool: DbPool,
}

impl EmployeeRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmployeeRepositoryTrait for EmployeeRepository {
    async fn list(&self) -> Result<Vec<Employee>, AppError> {
        let query = format!("{} ORDER BY e.code", SELECT_EMPLOYEE);
        let employees = sqlx::query_as::<_, Employee>(&query)
            .fetch_all(self.pool.as_ref())
            .await?;
        Ok(employees)
    }

    async fn update_leave_quota(&self, id: EmployeeId, hours: f64) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE employees SET leave_quota = $2 WHERE id = $1")
            .bind(id)
            .bind(hours)
            .execute(self.pool.as_ref())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn reset_leave_quotas(&self) -> Result<u64, AppError> {
        let result = sqlx::query("UPDATE employees SET leave_quota = 0")
            .execute(self.pool.as_ref())
            .await?;
        Ok(result.rows_affected())
    }
}
