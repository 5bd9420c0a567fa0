//! Data models shared across database access, the engine and API handlers.

pub mod attendance;
pub mod employee;
pub mod payroll;
