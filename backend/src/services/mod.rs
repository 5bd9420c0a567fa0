//! Attendance-to-payroll engine. Everything here except the timesheet
//! command runner and the payslip dispatch loop is pure and synchronous.

pub mod aggregation;
pub mod calendar;
pub mod day_decoder;
pub mod dispatch;
pub mod export;
pub mod leave;
pub mod payroll;
pub mod payslip;
pub mod punch;
pub mod roster;
pub mod timesheet;
