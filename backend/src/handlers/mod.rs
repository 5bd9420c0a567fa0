pub mod attendance;
pub mod calendar;
pub mod common;
pub mod dashboard;
pub mod leave;
pub mod payroll;
pub mod timekeeping;
