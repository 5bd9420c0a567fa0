//! Attendance repository trait for dependency injection and testing.
//!
//! Rows are keyed by `(employee_id, date)`. Writes are last-write-wins.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::db::connection::DbPool;
use crate::error::AppError;
use crate::models::attendance::{AttendanceRow, CellKey};

const SELECT_COLUMNS: &str = "employee_id, date, standard_hours, ot_hours, ot_weekend, leave_hours, \
     is_onsite, onsite_mode, onsite_place, check_in, check_out";

/// Use `MockAttendanceRepositoryTrait` in unit tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttendanceRepositoryTrait: Send + Sync {
    /// Rows dated within `from..=to`.
    async fn list_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AttendanceRow>, AppError>;

    /// Inserts or replaces every row in one transaction.
    async fn upsert_many(&self, rows: &[AttendanceRow]) -> Result<(), AppError>;

    /// Returns the number of rows removed.
    async fn delete_many(&self, keys: &[CellKey]) -> Result<u64, AppError>;
}

#[derive(Clone)]
pub struct AttendanceRepository {
    pool: DbPool,
}

impl AttendanceRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttendanceRepositoryTrait for AttendanceRepository {
    async fn list_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AttendanceRow>, AppError> {
        let query = format!(
            "SELECT {} FROM attendance WHERE date BETWEEN $1 AND $2 ORDER BY date, employee_id",
            SELECT_COLUMNS
        );
        let rows = sqlx::query_as::<_, AttendanceRow>(&query)
            .bind(from)
            .bind(to)
            .fetch_all(self.pool.as_ref())
            .await?;
        Ok(rows)
    }

    async fn upsert_many(&self, rows: &[AttendanceRow]) -> Result<(), AppError> {
        if rows.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;
        for row in rows {
            sqlx::query(
                "INSERT INTO attendance (employee_id, date, standard_hours, ot_hours, ot_weekend, \
                 leave_hours, is_onsite, onsite_mode, onsite_place, check_in, check_out, updated_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, NOW()) \
                 ON CONFLICT (employee_id, date) DO UPDATE SET \
                 standard_hours = EXCLUDED.standard_hours, ot_hours = EXCLUDED.ot_hours, \
                 ot_weekend = EXCLUDED.ot_weekend, leave_hours = EXCLUDED.leave_hours, \
                 is_onsite = EXCLUDED.is_onsite, onsite_mode = EXCLUDED.onsite_mode, \
                 onsite_place = EXCLUDED.onsite_place, check_in = EXCLUDED.check_in, \
                 check_out = EXCLUDED.check_out, updated_at = NOW()",
            )
            .bind(row.employee_id)
            .bind(row.date)
            .bind(row.standard_hours)
            .bind(row.ot_hours)
            .bind(row.ot_weekend)
            .bind(row.leave_hours)
            .bind(row.is_onsite)
            .bind(row.onsite_mode)
            .bind(row.onsite_place)
            .bind(row.check_in)
            .bind(row.check_out)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn delete_many(&self, keys: &[CellKey]) -> Result<u64, AppError> {
        if keys.is_empty() {
            return Ok(0);
        }

        let employee_ids: Vec<uuid::Uuid> = keys.iter().map(|k| k.employee_id.into()).collect();
        let dates: Vec<NaiveDate> = keys.iter().map(|k| k.date).collect();
        let result = sqlx::query(
            "DELETE FROM attendance a USING UNNEST($1::uuid[], $2::date[]) AS k(employee_id, date) \
             WHERE a.employee_id = k.employee_id AND a.date = k.date",
        )
        .bind(&employee_ids)
        .bind(&dates)
        .execute(self.pool.as_ref())
        .await?;
        Ok(result.rows_affected())
    }
}
