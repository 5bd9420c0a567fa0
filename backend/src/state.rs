use std::sync::Arc;

use crate::{
    config::Config,
    db::connection::DbPool,
    repositories::{
        AttendanceRepository, AttendanceRepositoryTrait, EmployeeRepository,
        EmployeeRepositoryTrait,
    },
    services::{calendar::CalendarRules, dispatch::PayslipMailer},
};

#[derive(Clone)]
pub struct AppState {
    pub employees: Arc<dyn EmployeeRepositoryTrait>,
    pub attendance: Arc<dyn AttendanceRepositoryTrait>,
    pub mailer: Arc<dyn PayslipMailer>,
    pub config: Config,
}

impl AppState {
    pub fn new(
        employees: Arc<dyn EmployeeRepositoryTrait>,
        attendance: Arc<dyn AttendanceRepositoryTrait>,
        mailer: Arc<dyn PayslipMailer>,
        config: Config,
    ) -> Self {
        Self {
            employees,
            attendance,
            mailer,
            config,
        }
    }

    /// Postgres-backed repositories sharing one pool.
    pub fn with_pool(pool: DbPool, mailer: Arc<dyn PayslipMailer>, config: Config) -> Self {
        Self::new(
            Arc::new(EmployeeRepository::new(pool.clone())),
            Arc::new(AttendanceRepository::new(pool)),
            mailer,
            config,
        )
    }

    pub fn calendar(&self) -> CalendarRules {
        CalendarRules::from_settings(&self.config.rules.calendar)
    }
}
